// src/analyze/corpus.rs
// =============================================================================
// Runs the site analysis over every configured site.
//
// Order is part of the contract: categories in configured order, sites in
// configured order inside each, and the report keeps that order. Every
// configured site gets exactly one entry, successful or not.
// =============================================================================

use super::{analyze_site, pause, Pacing};
use crate::catalog::{FeatureCatalog, SiteCatalog};
use crate::fetch::Fetcher;
use crate::model::{CategoryReport, CorpusReport, OrderedMap};
use tracing::info;

pub async fn analyze_corpus(
    fetcher: &dyn Fetcher,
    catalog: &FeatureCatalog,
    sites: &SiteCatalog,
    pacing: &Pacing,
) -> CorpusReport {
    let mut report = CorpusReport::default();
    let mut first_site = true;

    for category in sites.categories() {
        info!(category = %category.name, sites = category.sites.len(), "analyzing category");

        let mut category_report = CategoryReport {
            declared_site_count: category.sites.len(),
            sites: OrderedMap::new(),
        };

        for site in &category.sites {
            // Polite crawling: never hit the next site right away
            if !first_site {
                pause(pacing.site).await;
            }
            first_site = false;

            let site_report = analyze_site(fetcher, catalog, pacing, &site.name, &site.url).await;
            category_report.sites.insert(site.name.clone(), site_report);
            report.total_sites += 1;
        }

        report.categories.insert(category.name.clone(), category_report);
    }

    report
}
