// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::place::{PlaceRecord, RawEntry};
use crate::domain::models::sector::Sector;
use crate::utils::geo::haversine_km;
use regex::Regex;

/// 条目解析器
///
/// 将抓取引擎返回的原始条目规范化为地点记录。
/// 地图服务的字段缺失和格式不一致是常态而不是错误：
/// 解析失败返回None（丢弃），绝不panic也不返回错误。
pub struct EntryParser {
    /// href中嵌入坐标的匹配模式 `!3d<lat>!4d<lng>`
    coord_re: Regex,
    /// 文本中评分token的匹配模式（如 "4.5"）
    rating_re: Regex,
    /// 地理围栏半径（公里）
    geofence_km: f64,
}

impl EntryParser {
    /// 创建新的条目解析器
    ///
    /// # 参数
    ///
    /// * `geofence_km` - 结果与扇区中心的最大允许距离
    pub fn new(geofence_km: f64) -> Self {
        Self {
            coord_re: Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").expect("static pattern"),
            rating_re: Regex::new(r"(?:^|\s)([0-5]\.\d)(?:\s|$)").expect("static pattern"),
            geofence_km,
        }
    }

    /// 解析单个原始条目
    ///
    /// 最低可用字段为名称加可定位坐标：坐标优先从href中提取，
    /// 缺失时回退到扇区中心（此时必须存在链接作为身份）。
    /// 超出地理围栏的条目被丢弃，防止服务端注入的远处结果污染扇区。
    ///
    /// # 返回值
    ///
    /// * `Some(PlaceRecord)` - 成功规范化的记录
    /// * `None` - 缺少最低可用字段或越过地理围栏，丢弃
    pub fn parse(&self, raw: &RawEntry, city: &str, sector: &Sector) -> Option<PlaceRecord> {
        // 无链接的卡片无法定位也无法去重
        if raw.href.is_empty() {
            return None;
        }

        let name = self.extract_name(raw)?;

        let (latitude, longitude) = match self.extract_coords(&raw.href) {
            Some((lat, lng)) => {
                let dist = haversine_km(sector.center_lat, sector.center_lng, lat, lng);
                if dist > self.geofence_km {
                    return None;
                }
                (lat, lng)
            }
            // 坐标未嵌入链接时回退到扇区中心
            None => (sector.center_lat, sector.center_lng),
        };

        let link = raw
            .href
            .split('?')
            .next()
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Some(PlaceRecord {
            city: city.to_string(),
            name,
            category: Self::extract_category(&raw.text),
            rating: self.extract_rating(&raw.text),
            latitude,
            longitude,
            link,
        })
    }

    /// 提取地点名称
    ///
    /// 优先使用aria-label（截掉" · "之后的评分/类别尾巴），
    /// 回退到innerText首行；私有区图标码点一律剔除
    fn extract_name(&self, raw: &RawEntry) -> Option<String> {
        let candidate = if !raw.aria_label.is_empty() {
            let mut name = raw.aria_label.split(" · ").next().unwrap_or_default();
            for marker in [" 3.", " 4.", " 5."] {
                if let Some(pos) = name.find(marker) {
                    name = &name[..pos];
                }
            }
            name.to_string()
        } else {
            raw.text.lines().next().unwrap_or_default().to_string()
        };

        let cleaned: String = candidate
            .chars()
            .filter(|c| !('\u{e000}'..='\u{f8ff}').contains(c))
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }

    /// 从href提取嵌入坐标
    fn extract_coords(&self, href: &str) -> Option<(f64, f64)> {
        let caps = self.coord_re.captures(href)?;
        let lat = caps.get(1)?.as_str().parse().ok()?;
        let lng = caps.get(2)?.as_str().parse().ok()?;
        Some((lat, lng))
    }

    /// 从文本块提取评分，新商户常无评分
    fn extract_rating(&self, text: &str) -> Option<f32> {
        let caps = self.rating_re.captures(text)?;
        caps.get(1)?.as_str().parse().ok()
    }

    /// 从innerText第二行提取类别
    ///
    /// 第二行常为"4.5 (123) · Bank"之类的混合行，取" · "后
    /// 的片段；纯数字行视为无类别
    fn extract_category(text: &str) -> Option<String> {
        let line = text.lines().nth(1)?.trim();
        if line.is_empty() {
            return None;
        }
        let candidate = match line.rsplit(" · ").next() {
            Some(tail) => tail.trim(),
            None => line,
        };
        if candidate.is_empty() || candidate.chars().all(|c| !c.is_alphabetic()) {
            return None;
        }
        Some(candidate.to_string())
    }
}
