// src/fetch/http.rs
// =============================================================================
// Downloads pages and stylesheets over HTTP.
//
// Key functionality:
// - One shared reqwest Client (connection pooling, timeout, redirect limit)
// - Non-2xx responses count as failures
// - Turns reqwest errors into short, readable reasons for the report
//
// Note: pages are fetched as served. JavaScript is not executed, so styles
// injected at runtime are not seen.
// =============================================================================

use super::Fetcher;
use crate::config::HttpSettings;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client })
    }

    // GETs a URL and returns its body as text
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!(describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {}", status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }

    async fn fetch_raw(&self, url: &str) -> String {
        match self.get_text(url).await {
            Ok(text) => text,
            Err(e) => {
                debug!(%url, error = %e, "stylesheet fetch failed");
                String::new()
            }
        }
    }
}

// Categorizes reqwest errors into a one-line reason
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn describe_error(error: &reqwest::Error) -> String {
    let error_string = error.to_string();

    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            format!("Connection failed: {}", error_string)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    }
}
