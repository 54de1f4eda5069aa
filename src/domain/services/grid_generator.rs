// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sector::Sector;
use crate::utils::geo::haversine_km;

/// 每纬度一度约111公里
const KM_PER_DEGREE_LAT: f64 = 111.0;

/// 将以(center_lat, center_lng)为圆心、radius_km为半径的圆盘
/// 铺成固定角步长的扇区网格
///
/// 策略：
/// - 经度跨度按纬度修正：`radius / (111 · cos(lat))`，cos下限0.01
/// - 行优先顺序：纬度升序，每行内经度升序，同输入必得同序列
/// - 圆形裁剪：仅保留与圆心大圆距离 ≤ radius_km 的格点（边界含）
/// - 圆心格点恒被保留，radius ≥ 0 时序列永不为空
pub fn generate(center_lat: f64, center_lng: f64, radius_km: f64, step_degrees: f64) -> Vec<Sector> {
    debug_assert!(step_degrees > 0.0);
    debug_assert!(radius_km >= 0.0);

    let lat_span = radius_km / KM_PER_DEGREE_LAT;
    let cos_lat = center_lat.to_radians().cos().max(0.01);
    let lng_span = radius_km / (KM_PER_DEGREE_LAT * cos_lat);

    // 整数格点索引避免浮点累加漂移
    let lat_steps = (lat_span / step_degrees).floor() as i64;
    let lng_steps = (lng_span / step_degrees).floor() as i64;

    let mut sectors = Vec::new();
    let mut next_id: u32 = 0;
    for i in -lat_steps..=lat_steps {
        let lat = center_lat + i as f64 * step_degrees;
        for j in -lng_steps..=lng_steps {
            let lng = center_lng + j as f64 * step_degrees;
            if haversine_km(center_lat, center_lng, lat, lng) <= radius_km {
                sectors.push(Sector::new(next_id, lat, lng));
                next_id += 1;
            }
        }
    }

    sectors
}
