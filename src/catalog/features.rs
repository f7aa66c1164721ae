// src/catalog/features.rs
// =============================================================================
// The catalog of modern CSS features we detect.
//
// Each feature is a list of regular expressions. Patterns are compiled once,
// case-insensitive and in multi-line mode (`.` still stops at newlines).
// Catalog order matters: it is the order features are scanned in and the
// order they are displayed in every report.
// =============================================================================

use super::CatalogError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A feature as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    /// Unique id, e.g. "has_selector"
    pub key: String,
    /// Human-readable name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Regex sources, applied in order
    pub patterns: Vec<String>,
    pub description: String,
    /// Hex color used by chart consumers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FeatureDefinition {
    fn new(key: &str, display_name: &str, patterns: &[&str], description: &str, color: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            description: description.to_string(),
            color: Some(color.to_string()),
        }
    }
}

/// A feature with its patterns compiled
#[derive(Debug, Clone)]
pub struct Feature {
    definition: FeatureDefinition,
    regexes: Vec<Regex>,
}

impl Feature {
    pub fn key(&self) -> &str {
        &self.definition.key
    }

    pub fn display_name(&self) -> &str {
        &self.definition.display_name
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn color(&self) -> Option<&str> {
        self.definition.color.as_deref()
    }

    pub fn regexes(&self) -> &[Regex] {
        &self.regexes
    }
}

#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    features: Vec<Feature>,
}

impl FeatureCatalog {
    // Builds a catalog, compiling every pattern
    //
    // Fails on an invalid regex, a repeated key, or a feature without patterns.
    pub fn new(definitions: Vec<FeatureDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut features = Vec::with_capacity(definitions.len());

        for definition in definitions {
            if !seen.insert(definition.key.clone()) {
                return Err(CatalogError::DuplicateFeature(definition.key));
            }
            if definition.patterns.is_empty() {
                return Err(CatalogError::NoPatterns(definition.key));
            }

            let regexes = definition
                .patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .multi_line(true)
                        .build()
                        .map_err(|source| CatalogError::InvalidPattern {
                            key: definition.key.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            features.push(Feature { definition, regexes });
        }

        Ok(Self { features })
    }

    // The six features the tool ships with
    pub fn builtin() -> Self {
        // The built-in patterns are constants covered by tests
        Self::new(builtin_definitions()).expect("built-in feature patterns must compile")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key() == key)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

fn builtin_definitions() -> Vec<FeatureDefinition> {
    vec![
        FeatureDefinition::new(
            "container_queries",
            "CSS Container Queries",
            &[
                r"@container\s+",
                r"container-type:\s*\w+",
                r"container-name:\s*[\w-]+",
                r"container:\s*[\w\s/]+",
            ],
            "Адаптивность на уровне компонентов",
            "#FF6B6B",
        ),
        FeatureDefinition::new(
            "grid_subgrid",
            "CSS Grid Subgrid",
            &[
                r"grid-template-columns:\s*subgrid",
                r"grid-template-rows:\s*subgrid",
                r"grid-template:\s*subgrid",
            ],
            "Вложенные grid-сетки",
            "#4ECDC4",
        ),
        FeatureDefinition::new(
            "css_nesting",
            "CSS Nesting (native)",
            &[r"&\s*\{", r"&\s*:\w+", r"&\s*>\s*\w+", r"&\s*\.\w+"],
            "Нативная вложенность селекторов",
            "#45B7D1",
        ),
        FeatureDefinition::new(
            "css_layers",
            "CSS Cascade Layers",
            &[r"@layer\s+[\w-]+", r"@layer\s*\{"],
            "Управление каскадом через слои",
            "#FFA07A",
        ),
        FeatureDefinition::new(
            "has_selector",
            ":has() Selector",
            &[r":has\("],
            "Родительский селектор",
            "#98D8C8",
        ),
        // lch( and lab( are anchored so "oklch(" and "oklab(" don't count twice
        FeatureDefinition::new(
            "color_functions",
            "Modern Color Functions",
            &[r"oklch\(", r"oklab\(", r"\blch\(", r"\blab\(", r"\bcolor\("],
            "Современные цветовые функции",
            "#F7DC6F",
        ),
    ]
}
