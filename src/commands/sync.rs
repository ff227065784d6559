//! `boatsync sync`

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};

use boatsync::app::App;
use boatsync::config::Config;
use boatsync::utils::format_duration;

/// Run a single sync in the foreground and print what it did
pub async fn sync_once(
    mut config: Config,
    page_size: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(page_size) = page_size {
        config.sync.page_size = page_size;
    }

    let app = App::from_config(config)?;
    let handle = app
        .query()
        .refresh()
        .context("A sync is already running")?;

    let report = handle.wait().await?;
    let stats = app.query().stats();

    println!("Sync complete");
    println!("=============");
    println!("  Run: {}", report.run_id);
    println!("  Catalog total: {}", report.epoch_total);
    println!("  Pages requested: {}", report.pages_requested);
    println!("  Pages skipped: {}", report.skipped.len());
    println!("  Fetched: {}", report.fetched);
    println!("  Cached: {}", report.cached());
    println!("  Missing id: {}", report.dedup.missing_id);
    println!("  Duration: {}", format_duration(report.duration));
    if report.stopped_early {
        println!("  Stopped early on an empty page");
    }
    for skipped in &report.skipped {
        println!(
            "  ! page {} (offset {}): {}",
            skipped.page, skipped.offset, skipped.error
        );
    }

    println!();
    println!("Statistics");
    println!("  Price: avg {:.0}, min {:.0}, max {:.0}", stats.avg_price, stats.min_price, stats.max_price);
    println!("  Year: avg {}, min {}, max {}", stats.avg_year, stats.min_year, stats.max_year);

    if let Some(path) = output {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), app.query().list_cached().as_slice())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("Wrote {} boats to {}", report.cached(), path.display());
    }

    Ok(())
}
