// src/report/charts.rs
// =============================================================================
// The numbers behind the charts.
//
// Drawing is left to external tooling; this module computes the series each
// chart needs and writes them as JSON files into the visualizations folder:
// - feature_adoption.json: share of sites using each feature, plus the split
//   of sites with / without any modern feature
// - category_features.json: per-category site counts for each feature
// - site_ranking.json: top sites by number of distinct features
// - category_comparison.json: per-category average features and adoption
//
// Sites whose analysis failed are left out of every series. Percentages are
// still taken over the corpus total_sites.
// =============================================================================

use super::percentage;
use crate::catalog::FeatureCatalog;
use crate::model::{CorpusReport, OrderedMap};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// How many sites the ranking keeps
pub const RANKING_SIZE: usize = 15;

/// Color for features that don't define one
const FALLBACK_COLOR: &str = "#95A5A6";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAdoption {
    pub key: String,
    pub name: String,
    pub color: String,
    /// Number of sites using the feature
    pub sites: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdoptionSplit {
    pub with_modern_css: usize,
    pub without_modern_css: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFeatures {
    pub category: String,
    /// feature key -> number of sites in this category using it
    pub counts: OrderedMap<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteScore {
    pub category: String,
    pub site: String,
    pub features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    /// "web_courses" -> "Web Courses"
//
// Words are split on '_' only, so "top10sites" stays "Top10sites" (Python's
// str.title() would give "Top10Sites").
    pub label: String,
    pub average_features: f64,
    pub adoption_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub total_sites: usize,
    pub feature_adoption: Vec<FeatureAdoption>,
    pub adoption_split: AdoptionSplit,
    pub category_features: Vec<CategoryFeatures>,
    pub site_ranking: Vec<SiteScore>,
    pub category_comparison: Vec<CategoryComparison>,
}

impl ChartData {
    pub fn from_report(report: &CorpusReport, catalog: &FeatureCatalog) -> Self {
        let total_sites = report.total_sites;
        let analyzed: Vec<_> = report.sites().filter(|(_, site)| site.is_ok()).collect();

        let feature_adoption = catalog
            .iter()
            .filter_map(|feature| {
                let sites = analyzed
                    .iter()
                    .filter(|(_, site)| site.features_summary.contains_key(feature.key()))
                    .count();
                (sites > 0).then(|| FeatureAdoption {
                    key: feature.key().to_string(),
                    name: feature.display_name().to_string(),
                    color: feature.color().unwrap_or(FALLBACK_COLOR).to_string(),
                    sites,
                    percentage: percentage(sites, total_sites),
                })
            })
            .collect();

        let with_modern_css = analyzed
            .iter()
            .filter(|(_, site)| !site.features_summary.is_empty())
            .count();
        let adoption_split = AdoptionSplit {
            with_modern_css,
            without_modern_css: total_sites.saturating_sub(with_modern_css),
        };

        let category_features = report
            .categories
            .iter()
            .map(|(name, category)| {
                let mut counts = OrderedMap::new();
                for feature in catalog.iter() {
                    let count = category
                        .sites
                        .values()
                        .filter(|site| site.is_ok() && site.features_summary.contains_key(feature.key()))
                        .count();
                    if count > 0 {
                        counts.insert(feature.key(), count);
                    }
                }
                CategoryFeatures {
                    category: name.to_string(),
                    counts,
                }
            })
            .collect();

        let mut site_ranking: Vec<SiteScore> = analyzed
            .iter()
            .map(|(category, site)| SiteScore {
                category: category.to_string(),
                site: site.name.clone(),
                features: site.total_features_found,
            })
            .collect();
        // sort_by is stable, so ties keep report order
        site_ranking.sort_by(|a, b| b.features.cmp(&a.features));
        site_ranking.truncate(RANKING_SIZE);

        let category_comparison = report
            .categories
            .iter()
            .filter_map(|(name, category)| {
                let valid: Vec<_> = category.sites.values().filter(|s| s.is_ok()).collect();
                if valid.is_empty() {
                    return None;
                }
                let features: usize = valid.iter().map(|s| s.total_features_found).sum();
                let adopters = valid.iter().filter(|s| s.total_features_found > 0).count();
                Some(CategoryComparison {
                    category: name.to_string(),
                    label: title_case(name),
                    average_features: features as f64 / valid.len() as f64,
                    adoption_percentage: percentage(adopters, valid.len()),
                })
            })
            .collect();

        Self {
            total_sites,
            feature_adoption,
            adoption_split,
            category_features,
            site_ranking,
            category_comparison,
        }
    }
}

// Writes one JSON file per chart into `dir`
//
// A chart that fails to write is logged and skipped; the others still get
// written. Returns the paths that were written.
pub fn write_charts(data: &ChartData, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let charts: [(&str, serde_json::Result<String>); 4] = [
        (
            "feature_adoption.json",
            serde_json::to_string_pretty(&serde_json::json!({
                "total_sites": data.total_sites,
                "features": data.feature_adoption,
                "split": data.adoption_split,
            })),
        ),
        ("category_features.json", serde_json::to_string_pretty(&data.category_features)),
        ("site_ranking.json", serde_json::to_string_pretty(&data.site_ranking)),
        ("category_comparison.json", serde_json::to_string_pretty(&data.category_comparison)),
    ];

    let mut written = Vec::new();
    for (file_name, rendered) in charts {
        let path = dir.join(file_name);
        let result = rendered
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));

        match result {
            Ok(()) => written.push(path),
            Err(e) => warn!(chart = file_name, error = %e, "chart data not written"),
        }
    }

    Ok(written)
}

// "web_courses" -> "Web Courses"
//
// Words are split on '_' only, so "top10sites" stays "Top10sites" (Python's
// str.title() would give "Top10Sites").
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryReport, FeatureTotal, SiteReport};

    fn site(name: &str, features: &[&str]) -> SiteReport {
        let mut report = SiteReport::new(name, "https://example.com");
        for key in features {
            report.features_summary.insert(
                *key,
                FeatureTotal {
                    display_name: key.to_string(),
                    total_occurrences: 1,
                    description: String::new(),
                },
            );
        }
        report.total_features_found = features.len();
        report
    }

    fn corpus() -> CorpusReport {
        let mut report = CorpusReport::default();

        let mut unis = CategoryReport { declared_site_count: 3, ..Default::default() };
        unis.sites.insert("u1", site("u1", &["has_selector"]));
        unis.sites.insert("u2", site("u2", &[]));
        unis.sites.insert("u3", SiteReport::failed("u3", "https://u3.example", "HTTP 500"));
        report.categories.insert("universities", unis);

        let mut courses = CategoryReport { declared_site_count: 2, ..Default::default() };
        courses.sites.insert("c1", site("c1", &["css_layers", "has_selector", "css_nesting"]));
        courses.sites.insert("c2", site("c2", &["has_selector"]));
        report.categories.insert("web_courses", courses);

        report.total_sites = 5;
        report
    }

    #[test]
    fn test_feature_adoption() {
        let data = ChartData::from_report(&corpus(), &FeatureCatalog::builtin());

        let keys: Vec<_> = data.feature_adoption.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["css_nesting", "css_layers", "has_selector"]);

        let has = &data.feature_adoption[2];
        assert_eq!(has.sites, 3);
        assert_eq!(has.percentage, 60.0);
        assert_eq!(has.color, "#98D8C8");

        assert_eq!(data.adoption_split, AdoptionSplit { with_modern_css: 3, without_modern_css: 2 });
    }

    #[test]
    fn test_site_ranking_excludes_failures() {
        let data = ChartData::from_report(&corpus(), &FeatureCatalog::builtin());
        let ranking: Vec<_> = data
            .site_ranking
            .iter()
            .map(|s| (s.site.as_str(), s.features))
            .collect();
        assert_eq!(ranking, vec![("c1", 3), ("u1", 1), ("c2", 1), ("u2", 0)]);
    }

    #[test]
    fn test_category_comparison() {
        let data = ChartData::from_report(&corpus(), &FeatureCatalog::builtin());

        let unis = &data.category_comparison[0];
        assert_eq!(unis.label, "Universities");
        assert_eq!(unis.average_features, 0.5);
        assert_eq!(unis.adoption_percentage, 50.0);

        let courses = &data.category_comparison[1];
        assert_eq!(courses.label, "Web Courses");
        assert_eq!(courses.average_features, 2.0);
        assert_eq!(courses.adoption_percentage, 100.0);

        assert_eq!(data.category_features[1].counts.get("has_selector"), Some(&2));
    }

    #[test]
    fn test_category_without_valid_sites_is_skipped() {
        let mut report = CorpusReport::default();
        let mut down = CategoryReport { declared_site_count: 1, ..Default::default() };
        down.sites.insert("d", SiteReport::failed("d", "https://d.example", "timeout"));
        report.categories.insert("down", down);
        report.total_sites = 1;

        let data = ChartData::from_report(&report, &FeatureCatalog::builtin());
        assert!(data.category_comparison.is_empty());
        assert!(data.site_ranking.is_empty());
    }

    #[test]
    fn test_write_charts() {
        let dir = tempfile::tempdir().unwrap();
        let data = ChartData::from_report(&corpus(), &FeatureCatalog::builtin());

        let written = write_charts(&data, &dir.path().join("charts")).unwrap();
        assert_eq!(written.len(), 4);

        let ranking = std::fs::read_to_string(dir.path().join("charts/site_ranking.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&ranking).unwrap();
        assert_eq!(value[0]["site"], "c1");
    }

    #[test]
    fn test_title_case_splits_on_underscores_only() {
        assert_eq!(title_case("web_courses"), "Web Courses");
        assert_eq!(title_case("UNIVERSITIES"), "Universities");
        assert_eq!(title_case("top10sites"), "Top10sites");
    }
}
