// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// 配置校验错误类型
///
/// 启动时快速失败，保证非法配置不会进入任务调度阶段
#[derive(Error, Debug)]
pub enum SettingsError {
    /// 并发数必须大于零
    #[error("workers.concurrency must be at least 1")]
    ZeroConcurrency,

    /// 网格步长必须为正数
    #[error("scan.step_degrees must be positive, got {0}")]
    InvalidStep(f64),

    /// 关键词列表不能为空
    #[error("scan.keywords must contain at least one keyword")]
    NoKeywords,

    /// 地理围栏半径必须为正数
    #[error("scan.geofence_km must be positive, got {0}")]
    InvalidGeofence(f64),
}

/// 应用程序配置设置
///
/// 包含扫描网格、工作器、页面抓取与输入输出等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 扫描配置
    pub scan: ScanSettings,
    /// 工作器配置
    pub workers: WorkerSettings,
    /// 抓取配置
    pub fetch: FetchSettings,
    /// 输入输出配置
    pub io: IoSettings,
}

/// 扫描网格配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// 网格步长（度），决定扇区密度
    pub step_degrees: f64,
    /// 地图缩放级别
    pub zoom_level: u8,
    /// 搜索关键词列表，按顺序应用于每个扇区
    pub keywords: Vec<String>,
    /// 地理围栏半径（公里），超出扇区中心该距离的结果被丢弃
    pub geofence_km: f64,
    /// 结果列表滚动轮数
    pub scroll_rounds: u32,
}

/// 工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 并发工作器数量
    pub concurrency: usize,
    /// 瞬时抓取失败的最大重试次数
    pub max_retries: u32,
}

/// 页面抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 单次抓取的超时时间（秒）
    pub timeout_secs: u64,
    /// 每轮滚动后的等待时间（毫秒）
    pub settle_ms: u64,
}

/// 输入输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct IoSettings {
    /// 城市目录JSON文件路径
    pub cities_path: String,
    /// 输出CSV文件路径
    pub output_path: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default scan grid settings (~2.5km sectors, street-level zoom)
            .set_default("scan.step_degrees", 0.025)?
            .set_default("scan.zoom_level", 15)?
            .set_default("scan.keywords", Vec::<String>::new())?
            .set_default("scan.geofence_km", 6.0)?
            .set_default("scan.scroll_rounds", 3)?
            // Default worker settings
            .set_default("workers.concurrency", 5)?
            .set_default("workers.max_retries", 3)?
            // Default fetch settings
            .set_default("fetch.timeout_secs", 15)?
            .set_default("fetch.settle_ms", 700)?
            // Default IO settings
            .set_default("io.cities_path", "cities.json")?
            .set_default("io.output_path", "places.csv")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("GRIDSCAN").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 校验配置合法性
    ///
    /// 在任何任务入队之前调用，非法配置直接终止启动
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.workers.concurrency == 0 {
            return Err(SettingsError::ZeroConcurrency);
        }
        if self.scan.step_degrees <= 0.0 {
            return Err(SettingsError::InvalidStep(self.scan.step_degrees));
        }
        if self.scan.keywords.is_empty() {
            return Err(SettingsError::NoKeywords);
        }
        if self.scan.geofence_km <= 0.0 {
            return Err(SettingsError::InvalidGeofence(self.scan.geofence_km));
        }
        Ok(())
    }
}
