// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 地图搜索引擎实现
pub mod maps_engine;

/// 引擎特质与错误类型
pub mod traits;
