// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 扇区实体
///
/// 一个网格单元的搜索中心，代表一次有界区域查询。
/// 身份由坐标决定，id仅用于日志和重试追踪。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// 扇区序号，按网格生成顺序分配
    pub id: u32,
    /// 扇区中心纬度
    pub center_lat: f64,
    /// 扇区中心经度
    pub center_lng: f64,
}

impl Sector {
    pub fn new(id: u32, center_lat: f64, center_lng: f64) -> Self {
        Self {
            id,
            center_lat,
            center_lng,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sector {} @{:.5},{:.5}",
            self.id, self.center_lat, self.center_lng
        )
    }
}
