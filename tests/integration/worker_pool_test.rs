// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 工作器池集成测试
//!
//! 直接驱动队列与工作管理器，验证重试隔离与
//! 并发级别无关的结果集

use super::helpers::{entry, KeywordFetcher, MemorySink};
use gridscan::dedup::index::DedupIndex;
use gridscan::domain::models::place::RawEntry;
use gridscan::domain::models::sector::Sector;
use gridscan::domain::models::task::ScanTask;
use gridscan::domain::services::entry_parser::EntryParser;
use gridscan::engines::traits::SectorFetcher;
use gridscan::queue::task_queue::{InMemoryTaskQueue, TaskQueue};
use gridscan::utils::retry_policy::RetryPolicy;
use gridscan::workers::manager::WorkerManager;
use gridscan::workers::stats::RunStats;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const MAX_RETRIES: u32 = 2;

fn seeded_queue(keywords: &[&str]) -> Arc<InMemoryTaskQueue> {
    let sector = Sector::new(0, 33.57, -7.59);
    let tasks = keywords
        .iter()
        .map(|kw| ScanTask::new(sector, *kw, MAX_RETRIES))
        .collect();
    Arc::new(InMemoryTaskQueue::seeded(tasks))
}

fn manager(
    queue: Arc<InMemoryTaskQueue>,
    fetcher: Arc<dyn SectorFetcher>,
    sink: Arc<MemorySink>,
    stats: Arc<RunStats>,
) -> WorkerManager<InMemoryTaskQueue> {
    WorkerManager::new(
        queue,
        fetcher,
        Arc::new(EntryParser::new(6.0)),
        Arc::new(DedupIndex::new()),
        sink,
        stats,
        RetryPolicy::fast(MAX_RETRIES),
    )
}

fn scripted_entries() -> HashMap<String, Vec<RawEntry>> {
    let mut map = HashMap::new();
    map.insert(
        "bank".to_string(),
        vec![
            entry("CIH Bank", "https://maps/cih!3d33.5705!4d-7.5898"),
            entry("Bank of Africa", "https://maps/boa!3d33.5691!4d-7.5910"),
            entry("Shared Kiosk", "https://maps/shared!3d33.5700!4d-7.5900"),
        ],
    );
    map.insert(
        "atm".to_string(),
        vec![
            entry("BMCE ATM", "https://maps/bmce!3d33.5720!4d-7.5880"),
            entry("Shared Kiosk", "https://maps/shared!3d33.5700!4d-7.5900"),
        ],
    );
    map
}

#[tokio::test]
async fn test_exhausted_retries_do_not_block_siblings() {
    // 一个任务反复失败直至放弃，兄弟任务照常完成
    let queue = seeded_queue(&["bank", "atm", "pharmacy"]);
    let fetcher =
        Arc::new(KeywordFetcher::new(scripted_entries()).with_failing_keyword("pharmacy"));
    let sink = Arc::new(MemorySink::default());
    let stats = Arc::new(RunStats::new());

    let mut manager = manager(queue.clone(), fetcher.clone(), sink.clone(), stats.clone());
    manager.start_workers(2, "Casablanca");
    manager.join().await;

    // 首次尝试 + MAX_RETRIES次重试
    assert_eq!(fetcher.failed_calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    assert!(queue.is_drained());

    let snap = stats.snapshot();
    assert_eq!(snap.tasks_completed, 2);
    assert_eq!(snap.tasks_dropped, 1);
    assert_eq!(snap.records_accepted, 4);
    assert_eq!(snap.duplicates, 1);
    assert_eq!(
        sink.names(),
        vec!["BMCE ATM", "Bank of Africa", "CIH Bank", "Shared Kiosk"]
    );
}

#[tokio::test]
async fn test_accepted_set_is_independent_of_concurrency() {
    // 并发只是吞吐量手段，接纳的记录集合必须一致
    let mut accepted_sets = Vec::new();

    for concurrency in [1usize, 8] {
        let queue = seeded_queue(&["bank", "atm"]);
        let fetcher = Arc::new(KeywordFetcher::new(scripted_entries()));
        let sink = Arc::new(MemorySink::default());
        let stats = Arc::new(RunStats::new());

        let mut manager = manager(queue, fetcher, sink.clone(), stats.clone());
        manager.start_workers(concurrency, "Casablanca");
        manager.join().await;

        assert_eq!(stats.snapshot().tasks_completed, 2);
        accepted_sets.push(sink.names());
    }

    assert_eq!(accepted_sets[0], accepted_sets[1]);
    assert_eq!(accepted_sets[0].len(), 4);
}
