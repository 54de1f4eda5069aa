// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::place::PlaceRecord;
use crate::sink::traits::{RecordSink, SinkError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// CSV输出
///
/// 追加模式写入：新文件写表头，已有文件直接续写，支持断点续扫。
/// 每行写入后立即flush，运行被中断时不会留下半行记录。
/// 写入器由互斥锁保护，并发工作器的行不会交错。
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// 打开（或创建）输出文件
    ///
    /// # 参数
    ///
    /// * `path` - 输出CSV文件路径
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let exists = path
            .as_ref()
            .metadata()
            .map(|m| m.len() > 0)
            .unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        let writer = csv::WriterBuilder::new()
            // 续写已有文件时不能重复表头
            .has_headers(!exists)
            .from_writer(file);

        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// 读取已有输出文件中的link列
    ///
    /// 用于在运行开始前预置去重索引；文件不存在时返回空列表
    pub fn existing_links<P: AsRef<Path>>(path: P) -> Result<Vec<String>, SinkError> {
        if !path.as_ref().exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let link_idx = reader
            .headers()?
            .iter()
            .position(|h| h.eq_ignore_ascii_case("link"));

        let Some(idx) = link_idx else {
            return Ok(Vec::new());
        };

        let mut links = Vec::new();
        for row in reader.records() {
            let row = row?;
            if let Some(link) = row.get(idx) {
                if !link.is_empty() {
                    links.push(link.to_string());
                }
            }
        }
        Ok(links)
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn append(&self, record: &PlaceRecord) -> Result<(), SinkError> {
        let mut writer = self.writer.lock();
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
