// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::dedup::index::DedupIndex;
use crate::domain::models::task::ScanTask;
use crate::domain::services::entry_parser::EntryParser;
use crate::engines::traits::SectorFetcher;
use crate::queue::task_queue::TaskQueue;
use crate::sink::traits::{RecordSink, SinkError};
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::stats::RunStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 无任务可领时的轮询间隔
const IDLE_POLL: Duration = Duration::from_millis(100);

/// 扫描工作器
///
/// 循环：领取任务 → 抓取 → 逐条解析 → 去重仲裁 → 持久化。
/// 单个任务的失败被隔离在本任务内，绝不影响兄弟任务；
/// 输出写入失败是唯一的致命错误，会关闭队列终止整个运行。
pub struct ScanWorker {
    fetcher: Arc<dyn SectorFetcher>,
    parser: Arc<EntryParser>,
    dedup: Arc<DedupIndex>,
    sink: Arc<dyn RecordSink>,
    stats: Arc<RunStats>,
    retry_policy: RetryPolicy,
    /// 当前城市名称，写入每条记录
    city: String,
    worker_id: Uuid,
}

impl ScanWorker {
    /// 创建新的扫描工作器实例
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fetcher: Arc<dyn SectorFetcher>,
        parser: Arc<EntryParser>,
        dedup: Arc<DedupIndex>,
        sink: Arc<dyn RecordSink>,
        stats: Arc<RunStats>,
        retry_policy: RetryPolicy,
        city: String,
    ) -> Self {
        Self {
            fetcher,
            parser,
            dedup,
            sink,
            stats,
            retry_policy,
            city,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行工作器
    ///
    /// 队列排空或关闭后退出
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: TaskQueue + Send + Sync,
    {
        debug!("Scan worker {} started", self.worker_id);

        loop {
            if queue.is_closed() {
                break;
            }

            match queue.dequeue().await {
                Ok(Some(task)) => {
                    if let Err(e) = self.process_task(queue.as_ref(), task).await {
                        // 输出写入失败：数据丢失不可接受，终止运行
                        error!("Sink write failed, stopping run: {}", e);
                        self.stats.sink_failure();
                        queue.close();
                        break;
                    }
                }
                Ok(None) => {
                    if queue.is_drained() {
                        break;
                    }
                    // 队列暂空但有在途任务可能重新入队
                    sleep(IDLE_POLL).await;
                }
                Err(_) => break,
            }
        }

        debug!("Scan worker {} stopped", self.worker_id);
    }

    #[instrument(skip(self, queue, task), fields(task_id = %task.id, sector = %task.sector, keyword = %task.keyword))]
    async fn process_task<Q>(&self, queue: &Q, task: ScanTask) -> Result<(), SinkError>
    where
        Q: TaskQueue,
    {
        match self.fetcher.fetch(&task.sector, &task.keyword).await {
            Ok(entries) => {
                self.stats.entries_fetched(entries.len() as u64);
                let mut accepted = 0u64;

                // 条目按抓取顺序处理，保证测试基线可复现
                for entry in &entries {
                    let Some(record) = self.parser.parse(entry, &self.city, &task.sector) else {
                        self.stats.parse_skipped();
                        continue;
                    };

                    if self.dedup.admit(&record) {
                        self.sink.append(&record).await?;
                        self.stats.record_accepted();
                        accepted += 1;
                    } else {
                        self.stats.duplicate();
                    }
                }

                if accepted > 0 {
                    info!("Found {} new places ({} entries seen)", accepted, entries.len());
                }
                queue.complete(task.id).await;
                self.stats.task_completed();
            }
            Err(e) => {
                self.handle_fetch_failure(queue, task, e).await;
            }
        }

        Ok(())
    }

    /// 抓取失败处理：瞬时错误有界重试，其余直接放弃
    async fn handle_fetch_failure<Q>(
        &self,
        queue: &Q,
        mut task: ScanTask,
        error: crate::engines::traits::FetchError,
    ) where
        Q: TaskQueue,
    {
        if self
            .retry_policy
            .should_retry_with_error(task.attempt_count, &error)
        {
            task.attempt_count += 1;
            let backoff = self.retry_policy.calculate_backoff(task.attempt_count);
            warn!(
                "Fetch failed ({}), retry {}/{} in {:?}",
                error, task.attempt_count, task.max_retries, backoff
            );
            self.backoff_or_close(queue, backoff).await;

            if queue.requeue(task).await.is_err() {
                // 队列已关闭，在途重试按放弃计
                self.stats.task_dropped();
            }
        } else {
            warn!(
                "Task abandoned after {} attempts, coverage lost: {}",
                task.attempt_count + 1,
                error
            );
            queue.abandon(task.id).await;
            self.stats.task_dropped();
        }
    }

    /// 重试退避等待，队列关闭后立即放行
    ///
    /// 退避可能长达数十秒，整段睡过去会让优雅停止
    /// 卡在一个打盹的工作器上
    async fn backoff_or_close<Q>(&self, queue: &Q, backoff: Duration)
    where
        Q: TaskQueue,
    {
        let deadline = tokio::time::Instant::now() + backoff;
        loop {
            if queue.is_closed() {
                return;
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return;
            }
            sleep((deadline - now).min(IDLE_POLL)).await;
        }
    }
}
