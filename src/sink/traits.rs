// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::place::PlaceRecord;
use async_trait::async_trait;
use thiserror::Error;

/// 输出错误类型
///
/// 写入失败是严重错误：静默吞掉等于数据丢失，
/// 必须向上层暴露并终止运行
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO错误
    #[error("Sink IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV序列化错误
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 记录输出特质
///
/// 仅追加，核心不需要更新或删除
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// 持久化追加一条已接纳的记录
    async fn append(&self, record: &PlaceRecord) -> Result<(), SinkError>;
}
