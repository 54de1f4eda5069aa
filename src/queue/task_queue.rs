// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::ScanTask;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列已关闭，不再接受任务
    #[error("Queue closed")]
    Closed,
}

/// 任务队列特质
///
/// FIFO即可，无优先级需求。出队必须并发安全：一个任务同一
/// 时刻最多被一个工作器持有。队列在全部任务完成或放弃后排空。
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 入队任务
    async fn enqueue(&self, task: ScanTask) -> Result<(), QueueError>;

    /// 出队任务
    ///
    /// `Ok(None)`表示当前无可领取的任务；只有`is_drained`同时
    /// 为true时工作器才能退出，否则还有在途任务可能重新入队
    async fn dequeue(&self) -> Result<Option<ScanTask>, QueueError>;

    /// 重试路径：任务退回队尾，不改变未完成计数
    async fn requeue(&self, task: ScanTask) -> Result<(), QueueError>;

    /// 完成任务
    async fn complete(&self, task_id: Uuid);

    /// 放弃任务（重试预算耗尽）
    async fn abandon(&self, task_id: Uuid);

    /// 队列是否已排空（无排队任务且无在途任务）
    fn is_drained(&self) -> bool;

    /// 是否已关闭（优雅停止）
    fn is_closed(&self) -> bool;

    /// 关闭队列：在途任务照常收尾，排队任务不再下发
    fn close(&self);

    /// 当前排队任务数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 内存任务队列实现
///
/// 任务列表在运行开始时一次性生成（M×K笛卡尔积），
/// 运行中除有界重试外不产生新任务，无无界增长风险。
#[derive(Debug, Default)]
pub struct InMemoryTaskQueue {
    /// 排队中的任务
    queue: Mutex<VecDeque<ScanTask>>,
    /// 未完成任务数（排队中 + 在途），归零即排空
    outstanding: AtomicUsize,
    /// 关闭标志
    closed: AtomicBool,
}

impl InMemoryTaskQueue {
    /// 创建新的空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 用任务列表一次性建队
    pub fn seeded(tasks: Vec<ScanTask>) -> Self {
        let queue = Self::new();
        queue.outstanding.store(tasks.len(), Ordering::SeqCst);
        *queue.queue.lock() = tasks.into();
        queue
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task: ScanTask) -> Result<(), QueueError> {
        if self.is_closed() {
            return Err(QueueError::Closed);
        }
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().push_back(task);
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<ScanTask>, QueueError> {
        if self.is_closed() {
            return Ok(None);
        }
        Ok(self.queue.lock().pop_front())
    }

    async fn requeue(&self, task: ScanTask) -> Result<(), QueueError> {
        if self.is_closed() {
            // 停止中的重试直接视为放弃
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueError::Closed);
        }
        self.queue.lock().push_back(task);
        Ok(())
    }

    async fn complete(&self, _task_id: Uuid) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    async fn abandon(&self, _task_id: Uuid) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    fn is_drained(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) == 0
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

#[async_trait]
impl<T: TaskQueue + ?Sized> TaskQueue for Arc<T> {
    async fn enqueue(&self, task: ScanTask) -> Result<(), QueueError> {
        (**self).enqueue(task).await
    }

    async fn dequeue(&self) -> Result<Option<ScanTask>, QueueError> {
        (**self).dequeue().await
    }

    async fn requeue(&self, task: ScanTask) -> Result<(), QueueError> {
        (**self).requeue(task).await
    }

    async fn complete(&self, task_id: Uuid) {
        (**self).complete(task_id).await
    }

    async fn abandon(&self, task_id: Uuid) {
        (**self).abandon(task_id).await
    }

    fn is_drained(&self) -> bool {
        (**self).is_drained()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&self) {
        (**self).close()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
