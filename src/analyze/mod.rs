// src/analyze/mod.rs
// =============================================================================
// This module drives the analysis: page -> CSS -> features -> reports.
//
// Submodules:
// - site: Analyzes one website (inline CSS + every linked stylesheet)
// - corpus: Walks every configured category and site, one at a time
//
// Politeness:
// - Sites and stylesheets are fetched strictly sequentially
// - A fixed pause separates successive stylesheet fetches, and a longer one
//   separates successive sites
// =============================================================================

mod corpus;
mod site;

use std::time::Duration;

pub use corpus::analyze_corpus;
pub use site::analyze_site;

/// Delays between outbound requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause between two stylesheet fetches of the same site
    pub stylesheet: Duration,
    /// Pause between two sites
    pub site: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            stylesheet: Duration::from_millis(500),
            site: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
impl Pacing {
    pub fn none() -> Self {
        Self {
            stylesheet: Duration::ZERO,
            site: Duration::ZERO,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
