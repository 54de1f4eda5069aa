// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 条目解析服务
pub mod entry_parser;

/// 网格生成服务
pub mod grid_generator;

/// 扫描半径模型
pub mod radius_model;
