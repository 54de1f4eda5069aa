// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sector::Sector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 扫描任务实体
///
/// 表示一个(扇区 × 关键词)的原子工作单元。任务在队列中等待，
/// 同一时刻最多被一个工作器持有；完成或永久失败后销毁。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTask {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 目标扇区
    pub sector: Sector,
    /// 搜索关键词
    pub keyword: String,
    /// 已重试次数
    pub attempt_count: u32,
    /// 最大重试次数
    pub max_retries: u32,
}

impl ScanTask {
    /// 创建新的扫描任务
    pub fn new(sector: Sector, keyword: impl Into<String>, max_retries: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            sector,
            keyword: keyword.into(),
            attempt_count: 0,
            max_retries,
        }
    }

    /// 是否还有重试预算
    pub fn can_retry(&self) -> bool {
        self.attempt_count < self.max_retries
    }
}
