// src/catalog/sites.rs
// =============================================================================
// The websites to analyze, grouped by category.
//
// Categories and the sites inside them are kept in a Vec so the report comes
// out in exactly the configured order. Names must be unique (per category for
// sites) because the report is keyed by them.
// =============================================================================

use super::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCategory {
    pub name: String,
    /// In TOML this is written as repeated `[[category.site]]` tables
    #[serde(rename = "site", default)]
    pub sites: Vec<SiteEntry>,
}

#[derive(Debug, Clone)]
pub struct SiteCatalog {
    categories: Vec<SiteCategory>,
}

impl SiteCatalog {
    pub fn new(categories: Vec<SiteCategory>) -> Result<Self, CatalogError> {
        let mut category_names = HashSet::new();

        for category in &categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }

            let mut site_names = HashSet::new();
            for site in &category.sites {
                if !site_names.insert(site.name.as_str()) {
                    return Err(CatalogError::DuplicateSite {
                        category: category.name.clone(),
                        site: site.name.clone(),
                    });
                }
            }
        }

        Ok(Self { categories })
    }

    // The default corpus: Russian universities and online web-dev courses
    pub fn builtin() -> Self {
        fn category(name: &str, sites: &[(&str, &str)]) -> SiteCategory {
            SiteCategory {
                name: name.to_string(),
                sites: sites
                    .iter()
                    .map(|(name, url)| SiteEntry {
                        name: name.to_string(),
                        url: url.to_string(),
                    })
                    .collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    "universities",
                    &[
                        ("МГУ", "https://www.msu.ru"),
                        ("СПбГУ", "https://spbu.ru"),
                        ("МФТИ", "https://mipt.ru"),
                        ("ВШЭ", "https://www.hse.ru"),
                        ("ИТМО", "https://itmo.ru"),
                        ("МИСиС", "https://misis.ru"),
                        ("МИФИ", "https://mephi.ru"),
                        ("Бауманка", "https://bmstu.ru"),
                    ],
                ),
                category(
                    "web_courses",
                    &[
                        ("Яндекс Практикум", "https://practicum.yandex.ru"),
                        ("Skillbox", "https://skillbox.ru"),
                        ("GeekBrains", "https://geekbrains.ru"),
                        ("HTML Academy", "https://htmlacademy.ru"),
                        ("Нетология", "https://netology.ru"),
                        ("Hexlet", "https://hexlet.io"),
                        ("Stepik", "https://stepik.org"),
                        ("Coursera", "https://coursera.org"),
                    ],
                ),
            ],
        }
    }

    pub fn categories(&self) -> &[SiteCategory] {
        &self.categories
    }

    pub fn site_count(&self) -> usize {
        self.categories.iter().map(|c| c.sites.len()).sum()
    }
}
