// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::place::RawEntry;
use crate::domain::models::sector::Sector;
use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 整体抓取超时
    #[error("Timeout")]
    Timeout,

    /// 浏览器故障（启动、页面创建失败等）
    #[error("Browser error: {0}")]
    Browser(String),

    /// 页面导航失败（网络、限流、反爬挑战均表现为此类）
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// 结果提取失败（页面结构变化等，重试无益）
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 瞬时错误（超时、导航、浏览器故障）返回true；
    /// 提取错误属于结构性问题，返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout => true,
            FetchError::Browser(_) => true,
            FetchError::Navigation(_) => true,
            FetchError::Extraction(_) => false,
        }
    }
}

/// 扇区抓取特质
///
/// 给定一个扇区中心和关键词，返回该次搜索中可见的原始地点条目。
/// 空列表是合法结果（该扇区确无匹配），不是错误。
#[async_trait]
pub trait SectorFetcher: Send + Sync {
    /// 执行一次(扇区 × 关键词)搜索
    async fn fetch(&self, sector: &Sector, keyword: &str) -> Result<Vec<RawEntry>, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
