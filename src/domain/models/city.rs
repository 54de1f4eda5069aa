// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 城市目录错误类型
#[derive(Error, Debug)]
pub enum CatalogError {
    /// 目录文件读取失败
    #[error("Failed to read city catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 目录文件格式非法
    #[error("Invalid city catalog {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 目录为空
    #[error("City catalog {0} contains no cities")]
    Empty(String),
}

/// 城市实体
///
/// 一次扫描运行的输入单元，从外部城市目录加载后只读。
/// 人口字段可能缺失，缺失时按最小城镇处理而不是报错。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    /// 城市名称
    #[serde(alias = "city")]
    pub name: String,
    /// 城市中心纬度
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// 城市中心经度
    #[serde(alias = "lng")]
    pub longitude: f64,
    /// 人口数量（可选）
    #[serde(default, deserialize_with = "lenient_population")]
    pub population: Option<u64>,
}

/// 人口字段的宽容反序列化
///
/// 城市目录里既有整数也有浮点写法（估算值），都按人数截断接受
fn lenient_population<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|p| p.max(0.0) as u64))
}

/// 从JSON文件加载城市目录
///
/// # 参数
///
/// * `path` - 目录文件路径
///
/// # 返回值
///
/// * `Ok(Vec<City>)` - 非空的城市列表
/// * `Err(CatalogError)` - 读取或解析失败
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<City>, CatalogError> {
    let path_str = path.as_ref().display().to_string();
    let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
        path: path_str.clone(),
        source,
    })?;
    let cities: Vec<City> = serde_json::from_str(&raw).map_err(|source| CatalogError::Format {
        path: path_str.clone(),
        source,
    })?;
    if cities.is_empty() {
        return Err(CatalogError::Empty(path_str));
    }
    Ok(cities)
}
