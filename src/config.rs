// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Everything has a built-in default, so the tool runs with no config file.
// An optional TOML file can override any section:
//
//   [pacing]
//   stylesheet_delay_ms = 500
//   site_delay_ms = 1000
//
//   [http]
//   timeout_secs = 30
//   user_agent = "..."
//
//   [[category]]
//   name = "news"
//   [[category.site]]
//   name = "Example"
//   url = "https://example.com"
//
//   [[feature]]
//   key = "has_selector"
//   name = ":has() Selector"
//   patterns = [':has\(']
//   description = "Parent selector"
//
// A `[[category]]` list replaces the whole built-in site list, and a
// `[[feature]]` list replaces the whole built-in feature catalog.
// =============================================================================

use crate::analyze::Pacing;
use crate::catalog::{FeatureCatalog, FeatureDefinition, SiteCatalog, SiteCategory};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct PacingSection {
    stylesheet_delay_ms: u64,
    site_delay_ms: u64,
}

impl Default for PacingSection {
    fn default() -> Self {
        let pacing = Pacing::default();
        Self {
            stylesheet_delay_ms: pacing.stylesheet.as_millis() as u64,
            site_delay_ms: pacing.site.as_millis() as u64,
        }
    }
}

// The file as written on disk
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    pacing: PacingSection,
    http: HttpSettings,
    #[serde(rename = "category")]
    categories: Option<Vec<SiteCategory>>,
    #[serde(rename = "feature")]
    features: Option<Vec<FeatureDefinition>>,
}

/// Validated configuration, ready to use
#[derive(Debug, Clone)]
pub struct Config {
    pub pacing: Pacing,
    pub http: HttpSettings,
    pub sites: SiteCatalog,
    pub features: FeatureCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            http: HttpSettings::default(),
            sites: SiteCatalog::builtin(),
            features: FeatureCatalog::builtin(),
        }
    }
}

impl Config {
    // Loads the config file if one is given, otherwise the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_toml_str(&text)
                    .with_context(|| format!("invalid config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;

        let sites = match file.categories {
            Some(categories) => SiteCatalog::new(categories)?,
            None => SiteCatalog::builtin(),
        };
        let features = match file.features {
            Some(definitions) => FeatureCatalog::new(definitions)?,
            None => FeatureCatalog::builtin(),
        };

        Ok(Self {
            pacing: Pacing {
                stylesheet: Duration::from_millis(file.pacing.stylesheet_delay_ms),
                site: Duration::from_millis(file.pacing.site_delay_ms),
            },
            http: file.http,
            sites,
            features,
        })
    }
}
