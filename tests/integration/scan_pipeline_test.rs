// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 扫描流水线集成测试
//!
//! 用真实的网格、队列、解析与去重组件走完整条流水线，
//! 只把浏览器引擎和CSV输出替换为脚本化实现

use super::helpers::{entry, test_settings, BrokenSink, CannedFetcher, MemorySink};
use gridscan::application::usecases::run_scan::RunScanUseCase;
use gridscan::dedup::index::DedupIndex;
use gridscan::domain::models::city::City;
use gridscan::domain::services::{grid_generator, radius_model};
use std::sync::Arc;

fn casablanca(population: Option<u64>) -> City {
    City {
        name: "Casablanca".to_string(),
        latitude: 33.57,
        longitude: -7.59,
        population,
    }
}

#[tokio::test]
async fn test_overlapping_sectors_yield_single_record() {
    // 同一家银行出现在每个扇区的搜索结果里，
    // 整个运行只允许落盘一次
    let settings = Arc::new(test_settings(&["bank"], 3, 0.025));
    let href = "https://www.google.com/maps/place/cih!3d33.5705!4d-7.5898?hl=en";
    let fetcher = Arc::new(CannedFetcher {
        entries: vec![entry("CIH Bank", href)],
    });
    let sink = Arc::new(MemorySink::default());
    let dedup = Arc::new(DedupIndex::new());

    let city = casablanca(None);
    let expected_sectors = grid_generator::generate(
        city.latitude,
        city.longitude,
        radius_model::scan_radius_km(city.population),
        settings.scan.step_degrees,
    )
    .len() as u64;
    assert!(expected_sectors > 1, "need overlapping sectors for this test");

    let usecase = RunScanUseCase::new(settings, fetcher, sink.clone(), dedup);
    let summary = usecase.execute(&[city]).await;

    assert_eq!(summary.tasks_completed, expected_sectors);
    assert_eq!(summary.entries_fetched, expected_sectors);
    assert_eq!(summary.records_accepted, 1);
    assert_eq!(summary.duplicates, expected_sectors - 1);
    assert_eq!(sink.records.lock().len(), 1);
    assert_eq!(sink.records.lock()[0].link.as_deref(), Some(href.split('?').next().unwrap()));
}

#[tokio::test]
async fn test_large_city_completes_full_task_matrix() {
    // 三百万人口封顶在15公里半径；每个扇区跑满全部关键词
    let settings = Arc::new(test_settings(&["bank", "atm"], 8, 0.04));
    let fetcher = Arc::new(CannedFetcher { entries: vec![] });
    let sink = Arc::new(MemorySink::default());

    let city = casablanca(Some(3_000_000));
    let radius = radius_model::scan_radius_km(city.population);
    assert_eq!(radius, 15.0);

    let sectors = grid_generator::generate(city.latitude, city.longitude, radius, 0.04).len() as u64;

    let usecase = RunScanUseCase::new(settings, fetcher, sink, Arc::new(DedupIndex::new()));
    let summary = usecase.execute(&[city]).await;

    assert_eq!(summary.tasks_completed, sectors * 2);
    assert_eq!(summary.tasks_dropped, 0);
    assert_eq!(summary.records_accepted, 0);
}

#[tokio::test]
async fn test_preseeded_index_skips_known_places() {
    // 断点续扫：输出文件里已有的链接不再重复落盘
    let settings = Arc::new(test_settings(&["bank"], 2, 0.025));
    let href = "https://www.google.com/maps/place/awb!3d33.5712!4d-7.5889";
    let fetcher = Arc::new(CannedFetcher {
        entries: vec![entry("Attijariwafa Bank", href)],
    });
    let sink = Arc::new(MemorySink::default());
    let dedup = Arc::new(DedupIndex::new());
    dedup.preseed([href.to_string()]);

    let usecase = RunScanUseCase::new(settings, fetcher, sink.clone(), dedup);
    let summary = usecase.execute(&[casablanca(None)]).await;

    assert_eq!(summary.records_accepted, 0);
    assert!(summary.duplicates > 0);
    assert!(sink.records.lock().is_empty());
}

#[tokio::test]
async fn test_sink_failure_aborts_run() {
    // 写入失败不允许静默丢数据：运行终止且计数器可见
    let settings = Arc::new(test_settings(&["bank"], 1, 0.025));
    let fetcher = Arc::new(CannedFetcher {
        entries: vec![entry("CIH Bank", "https://maps/cih!3d33.5705!4d-7.5898")],
    });

    let usecase = RunScanUseCase::new(
        settings,
        fetcher,
        Arc::new(BrokenSink),
        Arc::new(DedupIndex::new()),
    );
    let summary = usecase.execute(&[casablanca(None)]).await;

    assert_eq!(summary.sink_failures, 1);
    assert_eq!(summary.records_accepted, 0);
}
