// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含核心业务实体
pub mod models;

/// 领域服务模块
///
/// 包含半径模型、网格生成和条目解析等纯业务逻辑
pub mod services;
