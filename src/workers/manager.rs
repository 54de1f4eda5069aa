// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::dedup::index::DedupIndex;
use crate::domain::services::entry_parser::EntryParser;
use crate::engines::traits::SectorFetcher;
use crate::queue::task_queue::TaskQueue;
use crate::sink::traits::RecordSink;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::scan_worker::ScanWorker;
use crate::workers::stats::RunStats;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::info;

/// 工作管理器
///
/// 启动固定数量的扫描工作器并等待队列排空。收到关闭信号时
/// 优雅停止：队列关闭，在途任务正常收尾，不产生半行输出。
pub struct WorkerManager<Q>
where
    Q: TaskQueue + 'static,
{
    queue: Arc<Q>,
    fetcher: Arc<dyn SectorFetcher>,
    parser: Arc<EntryParser>,
    dedup: Arc<DedupIndex>,
    sink: Arc<dyn RecordSink>,
    stats: Arc<RunStats>,
    retry_policy: RetryPolicy,
    handles: Vec<JoinHandle<()>>,
}

impl<Q> WorkerManager<Q>
where
    Q: TaskQueue + Send + Sync,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<Q>,
        fetcher: Arc<dyn SectorFetcher>,
        parser: Arc<EntryParser>,
        dedup: Arc<DedupIndex>,
        sink: Arc<dyn RecordSink>,
        stats: Arc<RunStats>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            fetcher,
            parser,
            dedup,
            sink,
            stats,
            retry_policy,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量（配置校验保证 ≥ 1）
    /// * `city` - 当前扫描城市名称
    pub fn start_workers(&mut self, count: usize, city: &str) {
        for _ in 0..count {
            let worker = ScanWorker::new(
                self.fetcher.clone(),
                self.parser.clone(),
                self.dedup.clone(),
                self.sink.clone(),
                self.stats.clone(),
                self.retry_policy.clone(),
                city.to_string(),
            );

            let queue = self.queue.clone();
            // Spawn each worker loop on its own task so the pool drains
            // the queue concurrently.
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }
    }

    /// 等待队列排空或关闭信号
    ///
    /// ctrl-c触发优雅停止：关闭队列后继续等待在途任务收尾
    pub async fn run_until_drained(self) {
        let queue = self.queue.clone();
        let handles = self.handles;

        let drained = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        tokio::pin!(drained);

        tokio::select! {
            _ = &mut drained => {}
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received, finishing in-flight tasks");
                queue.close();
                drained.await;
            }
        }
    }

    /// 仅等待队列排空，不监听信号（测试场景）
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}
