// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use gridscan::application::usecases::run_scan::RunScanUseCase;
use gridscan::config::settings::Settings;
use gridscan::dedup::index::DedupIndex;
use gridscan::domain::models::city;
use gridscan::engines::maps_engine::MapsEngine;
use gridscan::sink::csv_sink::CsvSink;
use gridscan::utils::telemetry;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 应用程序入口点：初始化遥测、加载并校验配置、加载城市目录、
/// 预置断点续扫的去重索引，然后执行扫描并输出运行汇总
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting gridscan...");

    // 2. Load and validate configuration (fail fast before any task runs)
    let settings = Arc::new(Settings::new()?);
    settings.validate()?;
    info!(
        keywords = settings.scan.keywords.len(),
        concurrency = settings.workers.concurrency,
        step_degrees = settings.scan.step_degrees,
        "Configuration loaded"
    );

    // 3. Load city catalog
    let cities = city::load_catalog(&settings.io.cities_path)
        .context("loading city catalog")?;
    info!("Loaded {} cities from {}", cities.len(), settings.io.cities_path);

    // 4. Seed dedup index from an existing output file (resume support)
    let dedup = Arc::new(DedupIndex::new());
    let known = CsvSink::existing_links(&settings.io.output_path)?;
    if !known.is_empty() {
        info!("Resuming: ignoring {} known places", known.len());
        dedup.preseed(known);
    }

    // 5. Open sink and fetch engine
    let sink = Arc::new(CsvSink::open(&settings.io.output_path)?);
    let fetcher = Arc::new(MapsEngine::new(&settings.scan, &settings.fetch));

    // 6. Run the scan
    let usecase = RunScanUseCase::new(settings.clone(), fetcher, sink, dedup);
    let summary = usecase.execute(&cities).await;

    info!(
        tasks_completed = summary.tasks_completed,
        tasks_dropped = summary.tasks_dropped,
        entries_fetched = summary.entries_fetched,
        parse_skipped = summary.parse_skipped,
        records_accepted = summary.records_accepted,
        duplicates = summary.duplicates,
        "Run finished"
    );

    if summary.sink_failures > 0 {
        anyhow::bail!("run aborted: {} sink write failures", summary.sink_failures);
    }

    Ok(())
}
