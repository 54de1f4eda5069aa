// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含扫描编排用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 去重模块
///
/// 跨扇区、跨关键词的全局去重索引
pub mod dedup;

/// 领域模块
///
/// 包含核心业务实体和领域服务
pub mod domain;

/// 引擎模块
///
/// 实现地图搜索的页面抓取引擎
pub mod engines;

/// 队列模块
///
/// 实现扫描任务队列
pub mod queue;

/// 输出模块
///
/// 记录的持久化输出
pub mod sink;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现后台任务处理和工作器管理
pub mod workers;
