// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// 运行统计
///
/// 全运行共享的原子计数器。单个任务的失败从不致命，
/// 但丢失的覆盖必须对操作者可见，运行结束时输出汇总。
#[derive(Debug, Default)]
pub struct RunStats {
    /// 成功完成的任务数
    tasks_completed: AtomicU64,
    /// 重试耗尽后放弃的任务数（丢失的覆盖）
    tasks_dropped: AtomicU64,
    /// 抓取到的原始条目总数
    entries_fetched: AtomicU64,
    /// 因字段缺失或越界被解析层丢弃的条目数
    parse_skipped: AtomicU64,
    /// 首次接纳并持久化的记录数
    records_accepted: AtomicU64,
    /// 被去重层拒绝的重复目击数
    duplicates: AtomicU64,
    /// 输出写入失败数（任何一次都会终止运行）
    sink_failures: AtomicU64,
}

/// 统计快照，用于运行汇总日志
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub tasks_completed: u64,
    pub tasks_dropped: u64,
    pub entries_fetched: u64,
    pub parse_skipped: u64,
    pub records_accepted: u64,
    pub duplicates: u64,
    pub sink_failures: u64,
}

impl StatsSnapshot {
    /// 两个快照之差
    ///
    /// 计数器跨越整次运行累计，单城市汇总用城市开始前的
    /// 快照做基线求差得出
    pub fn delta_since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            tasks_completed: self.tasks_completed - earlier.tasks_completed,
            tasks_dropped: self.tasks_dropped - earlier.tasks_dropped,
            entries_fetched: self.entries_fetched - earlier.entries_fetched,
            parse_skipped: self.parse_skipped - earlier.parse_skipped,
            records_accepted: self.records_accepted - earlier.records_accepted,
            duplicates: self.duplicates - earlier.duplicates,
            sink_failures: self.sink_failures - earlier.sink_failures,
        }
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_completed(&self) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_dropped(&self) {
        self.tasks_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn entries_fetched(&self, count: u64) {
        self.entries_fetched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn parse_skipped(&self) {
        self.parse_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accepted(&self) {
        self.records_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// 取当前计数快照
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_dropped: self.tasks_dropped.load(Ordering::Relaxed),
            entries_fetched: self.entries_fetched.load(Ordering::Relaxed),
            parse_skipped: self.parse_skipped.load(Ordering::Relaxed),
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}
