// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 最小扫描半径（公里），小城镇下限
const MIN_RADIUS_KM: f64 = 4.0;

/// 最大扫描半径（公里），大城市上限
const MAX_RADIUS_KM: f64 = 15.0;

/// 人口缺失时的默认值，落在最小半径档位
const DEFAULT_POPULATION: u64 = 50_000;

/// 根据人口计算扫描半径（公里）
///
/// 纯函数，对所有输入全序：每10万人口1公里，夹在[4, 15]区间内。
/// 人口缺失按最小城镇默认值处理，不报错。
/// 单调非减：人口越多半径越大（或相等）。
pub fn scan_radius_km(population: Option<u64>) -> f64 {
    let pop = population.unwrap_or(DEFAULT_POPULATION);
    ((pop / 100_000) as f64).clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}
