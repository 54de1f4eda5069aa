// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试辅助工具
//!
//! 提供脚本化抓取器与内存输出，让流水线测试在不启动
//! 浏览器、不写磁盘的前提下覆盖真实组件组合

use async_trait::async_trait;
use gridscan::config::settings::{FetchSettings, IoSettings, ScanSettings, Settings, WorkerSettings};
use gridscan::domain::models::place::{PlaceRecord, RawEntry};
use gridscan::domain::models::sector::Sector;
use gridscan::engines::traits::{FetchError, SectorFetcher};
use gridscan::sink::traits::{RecordSink, SinkError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// 构造一条可解析的原始条目
///
/// href为空时解析器会拒绝该条目，调用方自行保证非空
pub fn entry(name: &str, href: &str) -> RawEntry {
    RawEntry {
        text: format!("{}\n4.1 (52) · Bank", name),
        aria_label: name.to_string(),
        href: href.to_string(),
    }
}

/// 构造测试配置
///
/// 抓取超时与滚动参数与真实引擎无关，保留默认值即可
pub fn test_settings(keywords: &[&str], concurrency: usize, step_degrees: f64) -> Settings {
    Settings {
        scan: ScanSettings {
            step_degrees,
            zoom_level: 15,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            geofence_km: 6.0,
            scroll_rounds: 3,
        },
        workers: WorkerSettings {
            concurrency,
            max_retries: 2,
        },
        fetch: FetchSettings {
            timeout_secs: 15,
            settle_ms: 700,
        },
        io: IoSettings {
            cities_path: "cities.json".to_string(),
            output_path: "places.csv".to_string(),
        },
    }
}

/// 对所有(扇区 × 关键词)返回同一批条目的抓取器
pub struct CannedFetcher {
    pub entries: Vec<RawEntry>,
}

#[async_trait]
impl SectorFetcher for CannedFetcher {
    async fn fetch(&self, _: &Sector, _: &str) -> Result<Vec<RawEntry>, FetchError> {
        Ok(self.entries.clone())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

/// 按关键词脚本化的抓取器
///
/// 未脚本化的关键词返回空列表（合法结果）；
/// `fail_keyword`命中的任务永远以导航失败告终，并统计调用次数
pub struct KeywordFetcher {
    pub by_keyword: HashMap<String, Vec<RawEntry>>,
    pub fail_keyword: Option<String>,
    pub failed_calls: AtomicU32,
}

impl KeywordFetcher {
    pub fn new(by_keyword: HashMap<String, Vec<RawEntry>>) -> Self {
        Self {
            by_keyword,
            fail_keyword: None,
            failed_calls: AtomicU32::new(0),
        }
    }

    pub fn with_failing_keyword(mut self, keyword: &str) -> Self {
        self.fail_keyword = Some(keyword.to_string());
        self
    }
}

#[async_trait]
impl SectorFetcher for KeywordFetcher {
    async fn fetch(&self, _: &Sector, keyword: &str) -> Result<Vec<RawEntry>, FetchError> {
        if self.fail_keyword.as_deref() == Some(keyword) {
            self.failed_calls.fetch_add(1, Ordering::SeqCst);
            return Err(FetchError::Navigation("connection reset".to_string()));
        }
        Ok(self.by_keyword.get(keyword).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// 收集记录的内存输出
#[derive(Default)]
pub struct MemorySink {
    pub records: Mutex<Vec<PlaceRecord>>,
}

impl MemorySink {
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.lock().iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append(&self, record: &PlaceRecord) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// 每次写入都失败的输出，用于验证致命错误路径
#[derive(Default)]
pub struct BrokenSink;

#[async_trait]
impl RecordSink for BrokenSink {
    async fn append(&self, _: &PlaceRecord) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("disk full")))
    }
}
