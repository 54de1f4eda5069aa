// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// CSV输出实现
pub mod csv_sink;

/// 输出特质与错误类型
pub mod traits;
