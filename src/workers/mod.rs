// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器管理器
pub mod manager;

/// 扫描工作器
pub mod scan_worker;

/// 运行统计
pub mod stats;
