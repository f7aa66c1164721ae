// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - run: Analyze every configured site and write all reports
// - site: Analyze a single site
// - detect: Detect features in a local CSS file
// - report: Re-render the text report and chart data from a saved JSON report
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "css-census",
    version,
    about = "Crawls websites and reports which modern CSS features they use",
    long_about = "css-census downloads each configured site, extracts its inline and linked CSS, \
                  detects modern CSS features (container queries, subgrid, nesting, cascade layers, \
                  :has(), modern color functions) and aggregates usage per site, per category and overall."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze every configured site
    ///
    /// Writes css_usage_analysis.json, css_usage_report.txt and the
    /// css_visualizations/ chart data into the output directory.
    Run {
        /// TOML config file (sites, features, pacing, HTTP settings)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the reports are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Also print the full JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Pause between stylesheet fetches, in milliseconds (overrides config)
        #[arg(long)]
        stylesheet_delay_ms: Option<u64>,

        /// Pause between sites, in milliseconds (overrides config)
        #[arg(long)]
        site_delay_ms: Option<u64>,
    },

    /// Analyze a single site
    ///
    /// Example: css-census site "HTML Academy" https://htmlacademy.ru
    Site {
        /// Display name of the site
        name: String,

        /// Page URL
        url: String,

        /// TOML config file (only features, pacing and HTTP settings are used)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the site report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Detect features in a local CSS file
    Detect {
        /// Path to the stylesheet
        file: PathBuf,

        /// TOML config file (only the feature catalog is used)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the analysis as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the text report and chart data from a saved JSON report
    Report {
        /// A css_usage_analysis.json written by `run`
        input: PathBuf,

        /// TOML config file (only the feature catalog is used)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the reports are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::parse_from(["css-census", "run", "--site-delay-ms", "0", "--json"]);
        match cli.command {
            Commands::Run { site_delay_ms, stylesheet_delay_ms, json, out_dir, .. } => {
                assert_eq!(site_delay_ms, Some(0));
                assert_eq!(stylesheet_delay_ms, None);
                assert!(json);
                assert_eq!(out_dir, PathBuf::from("."));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_site() {
        let cli = Cli::parse_from(["css-census", "site", "Hexlet", "https://hexlet.io"]);
        assert!(matches!(
            cli.command,
            Commands::Site { ref name, ref url, .. } if name == "Hexlet" && url == "https://hexlet.io"
        ));
    }
}
