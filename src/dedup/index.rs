// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::place::PlaceRecord;
use dashmap::DashSet;

/// 全局去重索引
///
/// 整个运行过程中每个真实商户最多被接纳一次。重叠的扇区半径
/// 和多个关键词会让同一商户在邻近扇区被反复看到，没有这一层，
/// 边界附近的每个实体都会被重复计数。
///
/// `admit`通过DashSet的原子insert做并发仲裁：两个工作器同时
/// 发现"同一个"商户时只有一个insert返回true。
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: DashSet<String>,
}

impl DedupIndex {
    /// 创建空的去重索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试接纳一条记录
    ///
    /// # 返回值
    ///
    /// * `true` - 首次见到该商户，已标记为存在
    /// * `false` - 重复，调用方应丢弃
    pub fn admit(&self, record: &PlaceRecord) -> bool {
        self.seen.insert(Self::dedup_key(record))
    }

    /// 预置已知键（断点续扫：输出文件里已有的商户不再重复写入）
    pub fn preseed<I: IntoIterator<Item = String>>(&self, keys: I) {
        for key in keys {
            self.seen.insert(key);
        }
    }

    /// 已接纳的唯一商户数量
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// 计算去重键
    ///
    /// 首选link；缺失时回退到规范化名称（小写、空白折叠）加
    /// 五位小数坐标，容忍相邻扇区重复目击之间的坐标抖动
    fn dedup_key(record: &PlaceRecord) -> String {
        if let Some(link) = record.link.as_deref() {
            if !link.is_empty() {
                return link.to_string();
            }
        }
        format!(
            "{}@{:.5},{:.5}",
            Self::normalize_name(&record.name),
            record.latitude,
            record.longitude
        )
    }

    /// 规范化名称：小写并折叠空白
    fn normalize_name(name: &str) -> String {
        name.to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
