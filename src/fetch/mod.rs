// src/fetch/mod.rs
// =============================================================================
// This module is the boundary between the analysis and the network.
//
// Submodules:
// - http: The real implementation, built on reqwest
//
// The analysis code only talks to the `Fetcher` trait, so tests can swap in
// an in-memory fetcher and never touch the network.
//
// Rust concepts:
// - Traits: An interface the analysis depends on
// - async-trait: Lets us write `async fn` in a trait used as `&dyn Fetcher`
// =============================================================================

mod http;

use anyhow::Result;
use async_trait::async_trait;

pub use http::HttpFetcher;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page's HTML. The error is the reason the page could not be loaded.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Fetches raw text (a stylesheet). Any failure yields an empty string.
    async fn fetch_raw(&self, url: &str) -> String;
}
