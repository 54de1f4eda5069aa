// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::dedup::index::DedupIndex;
use crate::domain::models::city::City;
use crate::domain::models::task::ScanTask;
use crate::domain::services::{grid_generator, radius_model};
use crate::engines::traits::SectorFetcher;
use crate::queue::task_queue::{InMemoryTaskQueue, TaskQueue};
use crate::sink::traits::RecordSink;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::manager::WorkerManager;
use crate::workers::stats::{RunStats, StatsSnapshot};
use crate::domain::services::entry_parser::EntryParser;
use std::sync::Arc;
use tracing::{info, warn};

/// 扫描运行用例
///
/// 逐城市编排整条流水线：人口 → 半径 → 扇区网格 →
/// (扇区 × 关键词)任务队列 → 工作器池 → 汇总。
/// 去重索引跨越整个运行，城市之间也不会重复接纳同一商户。
pub struct RunScanUseCase {
    settings: Arc<Settings>,
    fetcher: Arc<dyn SectorFetcher>,
    sink: Arc<dyn RecordSink>,
    dedup: Arc<DedupIndex>,
    stats: Arc<RunStats>,
}

impl RunScanUseCase {
    pub fn new(
        settings: Arc<Settings>,
        fetcher: Arc<dyn SectorFetcher>,
        sink: Arc<dyn RecordSink>,
        dedup: Arc<DedupIndex>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            sink,
            dedup,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// 执行整次扫描运行
    ///
    /// 城市顺序处理；收到关闭信号后剩余城市不再开始
    ///
    /// # 返回值
    ///
    /// 运行结束时的统计快照
    pub async fn execute(&self, cities: &[City]) -> StatsSnapshot {
        let retry_policy = RetryPolicy::standard(self.settings.workers.max_retries);
        let parser = Arc::new(EntryParser::new(self.settings.scan.geofence_km));
        let mut interrupted = false;

        for city in cities {
            if interrupted {
                warn!("Skipping {} after shutdown signal", city.name);
                continue;
            }

            // 计数器全程累计，城市汇总以此刻为基线求差
            let baseline = self.stats.snapshot();
            let radius_km = radius_model::scan_radius_km(city.population);
            let sectors = grid_generator::generate(
                city.latitude,
                city.longitude,
                radius_km,
                self.settings.scan.step_degrees,
            );

            // M×K笛卡尔积，任务总量在工作器启动前对操作者可见
            let tasks: Vec<ScanTask> = sectors
                .iter()
                .flat_map(|sector| {
                    self.settings.scan.keywords.iter().map(|keyword| {
                        ScanTask::new(*sector, keyword.clone(), self.settings.workers.max_retries)
                    })
                })
                .collect();

            info!(
                city = %city.name,
                radius_km,
                sectors = sectors.len(),
                tasks = tasks.len(),
                "Starting city scan"
            );

            let queue = Arc::new(InMemoryTaskQueue::seeded(tasks));
            let mut manager = WorkerManager::new(
                queue.clone(),
                self.fetcher.clone(),
                parser.clone(),
                self.dedup.clone(),
                self.sink.clone(),
                self.stats.clone(),
                retry_policy.clone(),
            );
            manager.start_workers(self.settings.workers.concurrency, &city.name);
            manager.run_until_drained().await;

            if queue.is_closed() && !queue.is_drained() {
                interrupted = true;
            }

            let city_snap = self.stats.snapshot().delta_since(&baseline);
            info!(
                city = %city.name,
                tasks_completed = city_snap.tasks_completed,
                tasks_dropped = city_snap.tasks_dropped,
                records_accepted = city_snap.records_accepted,
                duplicates = city_snap.duplicates,
                "City scan finished"
            );
        }

        self.stats.snapshot()
    }
}
