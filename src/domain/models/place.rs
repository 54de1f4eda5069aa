// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 原始条目
///
/// 抓取引擎从一张结果卡片中提取的未结构化数据，
/// 仅在抓取它的工作器内部短暂存在。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntry {
    /// 卡片的innerText全文
    #[serde(default)]
    pub text: String,
    /// 卡片链接的aria-label（通常以地点名开头）
    #[serde(default)]
    pub aria_label: String,
    /// 卡片链接的href
    #[serde(default)]
    pub href: String,
}

/// 地点记录
///
/// 规范化后的持久化单元。name与坐标必须存在；
/// link（缺失时为规范化名称+坐标）作为去重键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaceRecord {
    /// 所属城市名称
    pub city: String,
    /// 地点名称
    pub name: String,
    /// 类别（可选）
    pub category: Option<String>,
    /// 评分（可选，新商户常缺失）
    pub rating: Option<f32>,
    /// 纬度
    pub latitude: f64,
    /// 经度
    pub longitude: f64,
    /// 地点详情链接（可选，首选去重键）
    pub link: Option<String>,
}
