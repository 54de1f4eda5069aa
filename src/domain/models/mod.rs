// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 城市实体
pub mod city;

/// 地点记录与原始条目
pub mod place;

/// 扇区实体
pub mod sector;

/// 扫描任务实体
pub mod task;
