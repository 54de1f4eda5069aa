// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{FetchSettings, ScanSettings};
use crate::domain::models::place::RawEntry;
use crate::domain::models::sector::Sector;
use crate::engines::traits::{FetchError, SectorFetcher};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{GrantPermissionsParams, PermissionType};
use chromiumoxide::cdp::browser_protocol::emulation::SetGeolocationOverrideParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

// Global browser instance to avoid re-launching Chrome on every request.
// This significantly improves performance for browser-based scraping.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

// Asynchronously gets or initializes the shared browser instance.
// This function ensures that the browser is launched only once.
async fn get_browser() -> Result<&'static Browser, FetchError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let remote_debugging_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();

            let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url)
                    .await
                    .map_err(|e| FetchError::Browser(format!("remote connect: {}", e)))?
            } else {
                let builder = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(30))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    // 结果卡片提取不需要图片和字体，省带宽提速度
                    .arg("--blink-settings=imagesEnabled=false");

                Browser::launch(
                    builder
                        .build()
                        .map_err(|e| FetchError::Browser(e.to_string()))?,
                )
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?
            };

            // Spawn a handler to process browser events
            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            // 预授地理定位权限，页面级坐标伪装无需弹窗确认
            browser
                .execute(GrantPermissionsParams::new(vec![PermissionType::Geolocation]))
                .await
                .map_err(|e| FetchError::Browser(format!("grant geolocation: {}", e)))?;

            Ok(browser)
        })
        .await
}

/// 结果卡片提取脚本
///
/// 在页面内收集所有 div[role="article"] 卡片的文本、
/// 链接aria-label和href
const EXTRACT_SCRIPT: &str = r#"(() => {
    const items = document.querySelectorAll('div[role="article"]');
    return Array.from(items).map(item => {
        const linkEl = item.querySelector('a');
        return {
            text: item.innerText,
            aria_label: linkEl ? (linkEl.getAttribute('aria-label') || "") : "",
            href: linkEl ? linkEl.href : ""
        };
    });
})()"#;

/// 结果列表滚动脚本，驱动懒加载
///
/// 返回是否应停止滚动：列表底部的到底提示出现后，
/// 继续滚动只是白等settle时间
const SCROLL_SCRIPT: &str = r#"(() => {
    const feed = document.querySelector('div[role="feed"]');
    if (!feed) { return true; }
    feed.scrollBy(0, 4000);
    return feed.innerText.includes("You've reached the end");
})()"#;

/// 地图搜索引擎
///
/// 基于chromiumoxide实现的地图搜索抓取引擎：共享浏览器实例，
/// 每次抓取新建页面，导航到扇区中心的搜索URL，滚动结果列表
/// 触发懒加载，然后在页面内提取全部结果卡片。
pub struct MapsEngine {
    /// 地图缩放级别
    zoom_level: u8,
    /// 滚动轮数
    scroll_rounds: u32,
    /// 每轮滚动后的停顿
    settle: Duration,
    /// 单次抓取的整体超时
    timeout: Duration,
}

impl MapsEngine {
    /// 创建新的地图搜索引擎实例
    pub fn new(scan: &ScanSettings, fetch: &FetchSettings) -> Self {
        Self {
            zoom_level: scan.zoom_level,
            scroll_rounds: scan.scroll_rounds,
            settle: Duration::from_millis(fetch.settle_ms),
            timeout: Duration::from_secs(fetch.timeout_secs),
        }
    }

    /// 构造扇区搜索URL
    ///
    /// 关键词经过百分号编码，`hl=en`固定界面语言以稳定DOM结构
    fn search_url(&self, sector: &Sector, keyword: &str) -> String {
        format!(
            "https://www.google.com/maps/search/{}/@{},{},{}z?hl=en",
            urlencoding::encode(keyword),
            sector.center_lat,
            sector.center_lng,
            self.zoom_level
        )
    }

    /// 扇区中心的GPS伪装参数
    ///
    /// 让地图服务认为浏览器就站在扇区中心：围栏只能丢弃
    /// 跑偏的结果，伪装从源头提升结果的本地性
    fn geolocation_override(sector: &Sector) -> SetGeolocationOverrideParams {
        SetGeolocationOverrideParams::builder()
            .latitude(sector.center_lat)
            .longitude(sector.center_lng)
            .accuracy(5.0)
            .build()
    }
}

/// 页面内提取脚本的返回形状
#[derive(Debug, Deserialize)]
struct ExtractedCard {
    #[serde(default)]
    text: String,
    #[serde(default)]
    aria_label: String,
    #[serde(default)]
    href: String,
}

#[async_trait]
impl SectorFetcher for MapsEngine {
    /// 执行一次(扇区 × 关键词)搜索
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<RawEntry>)` - 该扇区搜索可见的原始条目（可为空）
    /// * `Err(FetchError)` - 超时、导航或提取失败
    async fn fetch(&self, sector: &Sector, keyword: &str) -> Result<Vec<RawEntry>, FetchError> {
        let url = self.search_url(sector, keyword);

        // Wrap the entire operation in a timeout
        tokio::time::timeout(self.timeout, async {
            let browser = get_browser().await?;

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;

            let result = async {
                page.emulate_geolocation(Self::geolocation_override(sector))
                    .await
                    .map_err(|e| FetchError::Browser(e.to_string()))?;

                page.goto(&url)
                    .await
                    .map_err(|e| FetchError::Navigation(e.to_string()))?;

                // 滚动结果列表，驱动懒加载出更多卡片；到底即停
                for _ in 0..self.scroll_rounds {
                    let end_reached: bool = page
                        .evaluate(SCROLL_SCRIPT)
                        .await
                        .map_err(|e| FetchError::Navigation(e.to_string()))?
                        .into_value()
                        .map_err(|e| FetchError::Navigation(e.to_string()))?;
                    if end_reached {
                        break;
                    }
                    tokio::time::sleep(self.settle).await;
                }

                let cards: Vec<ExtractedCard> = page
                    .evaluate(EXTRACT_SCRIPT)
                    .await
                    .map_err(|e| FetchError::Extraction(e.to_string()))?
                    .into_value()
                    .map_err(|e| FetchError::Extraction(e.to_string()))?;

                Ok(cards
                    .into_iter()
                    .map(|card| RawEntry {
                        text: card.text,
                        aria_label: card.aria_label,
                        href: card.href,
                    })
                    .collect())
            }
            .await;

            // Close the page regardless of outcome; the browser is reused.
            let _ = page.close().await;

            result
        })
        .await
        .map_err(|_| FetchError::Timeout)?
    }

    fn name(&self) -> &'static str {
        "maps_engine"
    }
}
