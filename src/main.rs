// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, controlled by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Write the reports and print a short summary
// 5. Exit with proper code (0 = success, 1 = site could not be analyzed, 2 = error)
//
// Rust concepts used:
// - async/await: Pages and stylesheets are fetched over the network
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod analyze;
mod catalog;
mod cli;
mod config;
mod detector;
mod extract;
mod fetch;
mod model;
mod report;

use analyze::{analyze_corpus, analyze_site};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use fetch::HttpFetcher;
use model::{CorpusReport, CssAnalysis, SiteReport};
use report::{render_text, write_charts, ChartData};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const JSON_REPORT: &str = "css_usage_analysis.json";
const TEXT_REPORT: &str = "css_usage_report.txt";
const CHARTS_DIR: &str = "css_visualizations";

#[tokio::main]
async fn main() {
    // Logs go to stderr; with --json, stdout only carries the JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("css_census=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            out_dir,
            json,
            stylesheet_delay_ms,
            site_delay_ms,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(ms) = stylesheet_delay_ms {
                config.pacing.stylesheet = Duration::from_millis(ms);
            }
            if let Some(ms) = site_delay_ms {
                config.pacing.site = Duration::from_millis(ms);
            }
            handle_run(&config, &out_dir, json).await
        }
        Commands::Site { name, url, config, json } => {
            let config = Config::load(config.as_deref())?;
            handle_site(&config, &name, &url, json).await
        }
        Commands::Detect { file, config, json } => {
            let config = Config::load(config.as_deref())?;
            handle_detect(&config, &file, json)
        }
        Commands::Report { input, config, out_dir } => {
            let config = Config::load(config.as_deref())?;
            handle_report(&config, &input, &out_dir)
        }
    }
}

// Handles the 'run' subcommand: the whole corpus
// With --json, stdout carries the JSON report and nothing else
async fn handle_run(config: &Config, out_dir: &Path, json: bool) -> Result<i32> {
    if !json {
        println!(
            "🔍 Analyzing {} site(s) in {} categor(ies) for {} feature(s)",
            config.sites.site_count(),
            config.sites.categories().len(),
            config.features.len()
        );
    }

    let fetcher = HttpFetcher::new(&config.http)?;
    let report = analyze_corpus(&fetcher, &config.features, &config.sites, &config.pacing).await;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let json_path = out_dir.join(JSON_REPORT);
    let serialized = serde_json::to_string_pretty(&report)?;
    std::fs::write(&json_path, &serialized)
        .with_context(|| format!("failed to write {}", json_path.display()))?;
    info!(path = %json_path.display(), "JSON report written");

    let (text_path, charts_dir, charts) = write_derived_reports(&report, config, out_dir)?;

    if json {
        println!("{}", serialized);
    } else {
        print_written(&text_path, &charts_dir, charts);
        print_corpus_summary(&report);
    }
    Ok(0)
}

// Handles the 'site' subcommand: one site, printed to stdout
async fn handle_site(config: &Config, name: &str, url: &str, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Analyzing {}: {}", name, url);
    }

    let fetcher = HttpFetcher::new(&config.http)?;
    let report = analyze_site(&fetcher, &config.features, &config.pacing, name, url).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_site(&report);
    }

    Ok(if report.is_ok() { 0 } else { 1 })
}

// Handles the 'detect' subcommand: a local stylesheet, no network
fn handle_detect(config: &Config, file: &Path, json: bool) -> Result<i32> {
    let css = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let analysis = detector::detect(&css, &file.display().to_string(), &config.features);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(0)
}

// Handles the 'report' subcommand: re-render from a saved JSON report
fn handle_report(config: &Config, input: &Path, out_dir: &Path) -> Result<i32> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let report: CorpusReport = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid report", input.display()))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let (text_path, charts_dir, charts) = write_derived_reports(&report, config, out_dir)?;

    print_written(&text_path, &charts_dir, charts);
    print_corpus_summary(&report);
    Ok(0)
}

// Writes the text report and the chart data next to the JSON report
//
// Returns: the text report path, the chart directory and how many chart
//          files made it to disk
fn write_derived_reports(
    report: &CorpusReport,
    config: &Config,
    out_dir: &Path,
) -> Result<(PathBuf, PathBuf, usize)> {
    let text_path = out_dir.join(TEXT_REPORT);
    std::fs::write(&text_path, render_text(report, &config.features))
        .with_context(|| format!("failed to write {}", text_path.display()))?;

    let charts_dir = out_dir.join(CHARTS_DIR);
    let data = ChartData::from_report(report, &config.features);
    let written = write_charts(&data, &charts_dir)?;

    Ok((text_path, charts_dir, written.len()))
}

fn print_written(text_path: &Path, charts_dir: &Path, charts: usize) {
    println!("📄 Text report: {}", text_path.display());
    println!("📊 Chart data: {} file(s) in {}", charts, charts_dir.display());
}

fn print_corpus_summary(report: &CorpusReport) {
    let failed = report.sites().filter(|(_, site)| !site.is_ok()).count();
    let with_features = report
        .sites()
        .filter(|(_, site)| site.total_features_found > 0)
        .count();

    println!();
    println!("📊 Summary:");
    println!("   📋 Sites: {}", report.total_sites);
    println!("   ✅ Using modern CSS: {}", with_features);
    println!("   ❌ Failed: {}", failed);
}

fn print_site(report: &SiteReport) {
    if let Some(error) = &report.error {
        println!("❌ {}", error);
    }

    if report.inline_css.is_some() {
        println!("   inline <style> analyzed");
    }
    println!("   {} stylesheet(s) analyzed", report.external_css.len());
    println!("   Distinct features found: {}", report.total_features_found);

    for (key, feature) in report.features_summary.iter() {
        println!("{:<20} {:<30} {:>6}", key, feature.display_name, feature.total_occurrences);
    }
}

fn print_analysis(analysis: &CssAnalysis) {
    println!(
        "📄 {} ({} lines, {} chars)",
        analysis.source, analysis.total_lines, analysis.total_chars
    );

    if analysis.features.is_empty() {
        println!("   No modern CSS features found");
        return;
    }

    for (key, hits) in analysis.features.iter() {
        println!("{:<20} {:<30} {:>6}", key, hits.display_name, hits.count);
        for instance in &hits.instances {
            println!("   line {:<6} {}", instance.line_number, instance.matched_text);
        }
    }
}
