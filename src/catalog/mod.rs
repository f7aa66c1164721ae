// src/catalog/mod.rs
// =============================================================================
// Static configuration data: what to look for, and where to look.
//
// Submodules:
// - features: The CSS feature catalog (key, name, regex patterns, description)
// - sites: The website catalog (category -> site name -> url)
//
// Both catalogs are immutable values built once at startup and passed
// explicitly into the analysis functions. Nothing here is a global, so tests
// can build small synthetic catalogs.
// =============================================================================

mod features;
mod sites;

use thiserror::Error;

pub use features::{Feature, FeatureCatalog, FeatureDefinition};
pub use sites::{SiteCatalog, SiteCategory, SiteEntry};

// Problems found while building a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("feature '{key}' has an invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("feature '{0}' is defined more than once")]
    DuplicateFeature(String),

    #[error("feature '{0}' has no patterns")]
    NoPatterns(String),

    #[error("category '{0}' is defined more than once")]
    DuplicateCategory(String),

    #[error("site '{site}' appears more than once in category '{category}'")]
    DuplicateSite { category: String, site: String },
}
