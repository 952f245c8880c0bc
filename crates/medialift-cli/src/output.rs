//! CLI output rendering

use anyhow::Result;
use medialift_core::domain::outcome::{BatchStatus, BatchSummary};
use medialift_core::domain::source_item::{PublishedItem, SourceItem};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Renders a completed batch summary.
pub fn render_summary(format: OutputFormat, summary: &BatchSummary) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Human => {
            println!(
                "scanned {} file(s), catalog holds {} item(s)",
                summary.scanned.len(),
                summary.catalog.len()
            );
            match summary.status {
                BatchStatus::NoNewItems => println!("nothing new to upload"),
                BatchStatus::Processed => {
                    println!("uploaded {} item(s):", summary.uploaded.len());
                    for item in &summary.uploaded {
                        println!("\u{2713} {}", item.display_name);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Renders the work list a run would process.
pub fn render_work_list(
    format: OutputFormat,
    scanned: &[SourceItem],
    catalog: &[PublishedItem],
    work: &[SourceItem],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "scanned": scanned.len(),
                "catalog": catalog.len(),
                "new": work,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Human => {
            println!(
                "scanned {} file(s), catalog holds {} item(s)",
                scanned.len(),
                catalog.len()
            );
            if work.is_empty() {
                println!("nothing new to upload");
            } else {
                println!("{} new item(s):", work.len());
                for item in work {
                    println!("  {} ({})", item.display_name, item.remote_id);
                }
            }
        }
    }
    Ok(())
}
