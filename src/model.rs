// src/model.rs
// =============================================================================
// The report data structures produced by the analysis.
//
// Shape (what ends up in css_usage_analysis.json):
//   CorpusReport
//     └── categories: name -> CategoryReport
//           └── sites: name -> SiteReport
//                 ├── inline_css: CssAnalysis (optional)
//                 ├── external_css: [CssAnalysis]
//                 └── features_summary: key -> FeatureTotal
//
// Every keyed mapping uses OrderedMap so that categories, sites and features
// come out in the same order they were configured.
//
// Rust concepts:
// - Custom Serialize/Deserialize impls: OrderedMap writes a JSON object but
//   remembers insertion order (a HashMap would shuffle it)
// - #[serde(rename = ...)]: Keep the JSON field names stable
// =============================================================================

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

// A string-keyed map that iterates in insertion order
//
// Backed by a Vec because the maps here are small (a handful of features,
// a few dozen sites) and order matters more than lookup speed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Inserts a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Implemented by hand so `V` doesn't need to be Default
impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One regex match inside a stylesheet
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureInstance {
    /// The exact text the pattern matched
    #[serde(rename = "match")]
    pub matched_text: String,
    /// 1-based line of the match start
    #[serde(rename = "line")]
    pub line_number: usize,
    /// Surrounding text, trimmed and capped
    pub context: String,
}

/// All hits of one feature inside one stylesheet
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureHits {
    #[serde(rename = "name")]
    pub display_name: String,
    /// Total number of matches, never capped
    pub count: usize,
    /// The first few matches, for display
    pub instances: Vec<FeatureInstance>,
    pub description: String,
}

/// Detection result for one CSS blob (the inline styles or one stylesheet)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CssAnalysis {
    /// Stylesheet URL, or "{page url} (inline)"
    pub source: String,
    pub total_lines: usize,
    pub total_chars: usize,
    /// Only features with at least one hit, in catalog order
    pub features: OrderedMap<FeatureHits>,
}

/// Per-site total for one feature
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureTotal {
    #[serde(rename = "name")]
    pub display_name: String,
    pub total_occurrences: usize,
    pub description: String,
}

/// Everything we learned about one website
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SiteReport {
    pub name: String,
    pub url: String,
    /// Older archives write `{}` here for a page without <style> blocks
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "inline_css_or_empty"
    )]
    pub inline_css: Option<CssAnalysis>,
    #[serde(default)]
    pub external_css: Vec<CssAnalysis>,
    #[serde(default)]
    pub features_summary: OrderedMap<FeatureTotal>,
    /// Number of DISTINCT features found, not the sum of occurrences
    #[serde(default)]
    pub total_features_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Accepts null, `{}` or a full analysis
fn inline_css_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CssAnalysis>, D::Error> {
    #[derive(serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Empty {}

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum InlineCss {
        Analysis(CssAnalysis),
        Empty(Empty),
    }

    Ok(match Option::<InlineCss>::deserialize(deserializer)? {
        Some(InlineCss::Analysis(analysis)) => Some(analysis),
        Some(InlineCss::Empty(_)) | None => None,
    })
}

impl SiteReport {
    // An empty report, filled in as the analysis goes
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            inline_css: None,
            external_css: Vec::new(),
            features_summary: OrderedMap::new(),
            total_features_found: 0,
            error: None,
        }
    }

    // A report for a site whose page could not be loaded at all
    pub fn failed(name: &str, url: &str, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(name, url)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// All sites of one category
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryReport {
    /// How many sites the configuration lists for this category
    #[serde(rename = "total_sites")]
    pub declared_site_count: usize,
    pub sites: OrderedMap<SiteReport>,
}

/// The final artifact of a run
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CorpusReport {
    /// Incremented once per processed site, failed or not
    pub total_sites: usize,
    pub categories: OrderedMap<CategoryReport>,
}

impl CorpusReport {
    // Walks (category name, site report) pairs in report order
    pub fn sites(&self) -> impl Iterator<Item = (&str, &SiteReport)> {
        self.categories
            .iter()
            .flat_map(|(category, report)| report.sites.values().map(move |site| (category, site)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut map = OrderedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        map.insert("b", 3);

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("b", &3), ("a", &2)]);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mu", 3);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2,"mu":3}"#);

        let back: OrderedMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_failed_report_serialization() {
        let report = SiteReport::failed("Example", "https://example.com", "HTTP 500");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["error"], "HTTP 500");
        assert_eq!(value["total_features_found"], 0);
        assert!(value.get("inline_css").is_none());
        assert!(!report.is_ok());
    }

    #[test]
    fn test_archive_with_empty_inline_css_loads() {
        let json = r#"{
            "total_sites": 2,
            "categories": {
                "universities": {
                    "total_sites": 2,
                    "sites": {
                        "МГУ": {
                            "name": "МГУ",
                            "url": "https://www.msu.ru",
                            "inline_css": {},
                            "external_css": [],
                            "features_summary": {},
                            "total_features_found": 0,
                            "error": "Timeout"
                        },
                        "ИТМО": {
                            "name": "ИТМО",
                            "url": "https://itmo.ru",
                            "inline_css": {},
                            "external_css": [{
                                "source": "https://itmo.ru/a.css",
                                "total_lines": 1,
                                "total_chars": 12,
                                "features": {
                                    "has_selector": {
                                        "name": ":has() Selector",
                                        "count": 1,
                                        "instances": [{"match": ":has(", "line": 1, "context": "a:has(b) {}"}],
                                        "description": "Родительский селектор"
                                    }
                                }
                            }],
                            "features_summary": {
                                "has_selector": {
                                    "name": ":has() Selector",
                                    "total_occurrences": 1,
                                    "description": "Родительский селектор"
                                }
                            },
                            "total_features_found": 1
                        }
                    }
                }
            }
        }"#;

        let report: CorpusReport = serde_json::from_str(json).unwrap();
        let names: Vec<_> = report.sites().map(|(_, site)| site.name.as_str()).collect();
        assert_eq!(names, vec!["МГУ", "ИТМО"]);

        let itmo = report.categories.get("universities").unwrap().sites.get("ИТМО").unwrap();
        assert!(itmo.inline_css.is_none());
        assert_eq!(itmo.external_css[0].features.get("has_selector").unwrap().instances[0].line_number, 1);
        assert_eq!(report.sites().filter(|(_, site)| !site.is_ok()).count(), 1);
    }

    #[test]
    fn test_corpus_report_round_trip() {
        let mut features = OrderedMap::new();
        features.insert(
            "css_layers",
            FeatureHits {
                display_name: "CSS Cascade Layers".to_string(),
                count: 6,
                instances: vec![FeatureInstance {
                    matched_text: "@layer base".to_string(),
                    line_number: 2,
                    context: "@layer base;".to_string(),
                }],
                description: "Управление каскадом через слои".to_string(),
            },
        );

        let mut site = SiteReport::new("Stepik", "https://stepik.org");
        site.inline_css = Some(CssAnalysis {
            source: "https://stepik.org (inline)".to_string(),
            total_lines: 3,
            total_chars: 40,
            features,
        });
        site.features_summary.insert(
            "css_layers",
            FeatureTotal {
                display_name: "CSS Cascade Layers".to_string(),
                total_occurrences: 6,
                description: "Управление каскадом через слои".to_string(),
            },
        );
        site.total_features_found = 1;

        let mut category = CategoryReport {
            declared_site_count: 2,
            sites: OrderedMap::new(),
        };
        category.sites.insert("Stepik", site);
        category
            .sites
            .insert("Hexlet", SiteReport::failed("Hexlet", "https://hexlet.io", "HTTP 403"));

        let mut report = CorpusReport {
            total_sites: 2,
            categories: OrderedMap::new(),
        };
        report.categories.insert("web_courses", category);

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: CorpusReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_category_uses_total_sites_key() {
        let category = CategoryReport {
            declared_site_count: 8,
            sites: OrderedMap::new(),
        };
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["total_sites"], 8);
    }
}
