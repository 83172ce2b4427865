//! # chat-timeline CLI
//!
//! Command-line interface for the chat-timeline library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, fmt};

use chat_timeline::TimelineError;
use chat_timeline::cli::Args;
use chat_timeline::config::PipelineConfig;
use chat_timeline::pipeline::{Pipeline, RunReport, SourceStatus};

fn main() {
    init_logging();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool, TimelineError> {
    let start = Instant::now();
    let config = PipelineConfig::from(<Args as ClapParser>::parse());

    // Print header
    println!("🧵 chat-timeline v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Source:  {}", config.source_dir.display());
    println!("💾 Output:  {}", config.output_dir.display());
    println!(
        "👥 People:  {} / {}",
        config.participants.first.id, config.participants.second.id
    );
    println!();

    let report = Pipeline::new(config).run()?;
    print_summary(&report, start.elapsed().as_secs_f64());

    Ok(report.is_success())
}

fn print_summary(report: &RunReport, seconds: f64) {
    println!("📖 Sources:");
    for source in &report.sources {
        let status = match &source.status {
            SourceStatus::Parsed => format!("{} events", source.events),
            SourceStatus::Missing => "not found".to_string(),
            SourceStatus::Failed(reason) => format!("failed ({})", reason),
        };
        println!("   {:<9} {} - {}", source.platform, source.path.display(), status);
    }
    println!();

    if report.timezone_applied {
        println!("🕐 Local hours normalized");
    } else {
        println!("⏭️  No timezone config, local hours left unset");
    }

    println!();
    println!("📊 Summary:");
    println!("   Events:    {}", report.events);
    println!("   Dropped:   {} records", report.dropped());
    println!(
        "   Range:     {} → {}",
        report.stats.date_range.start, report.stats.date_range.end
    );
    println!("   Per day:   {:.2}", report.stats.messages_per_day);

    println!();
    for file in &report.export.written {
        println!("   ✓ {} ({} records)", file.path.display(), file.records);
    }
    for failure in &report.export.failures {
        println!("   ✗ {}", failure);
    }

    println!();
    if report.is_success() {
        println!("✅ Done in {:.2}s", seconds);
    } else {
        println!(
            "❌ {} output file(s) failed to write",
            report.export.failures.len()
        );
    }
}
