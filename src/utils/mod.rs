// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 地理计算工具
pub mod geo;

/// 重试策略
pub mod retry_policy;

/// 遥测初始化
pub mod telemetry;
