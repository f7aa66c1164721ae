// src/analyze/site.rs
// =============================================================================
// Analyzes a single website.
//
// How it works:
// 1. Fetch the page (failure = the site's report carries the error, done)
// 2. Run the detector on the inline <style> blocks, if any
// 3. Fetch every linked stylesheet and run the detector on each one
//    (a stylesheet that can't be fetched is skipped, silently)
// 4. Merge all results into one per-feature summary
//
// About `total_features_found`: it is the number of DISTINCT features, the
// size of the union of feature keys over all sources. A feature seen 50 times
// in one stylesheet adds 1, not 50.
// =============================================================================

use super::{pause, Pacing};
use crate::catalog::FeatureCatalog;
use crate::detector::detect;
use crate::extract::{extract_inline_styles, extract_stylesheet_links};
use crate::fetch::Fetcher;
use crate::model::{CssAnalysis, FeatureTotal, OrderedMap, SiteReport};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

// Analyzes one site and always returns a report
//
// Parameters:
//   fetcher: where pages and stylesheets come from
//   catalog: the features to look for
//   pacing: delay between stylesheet fetches
//   name, url: the site as configured
//
// Errors are never returned; they end up in `SiteReport::error`.
pub async fn analyze_site(
    fetcher: &dyn Fetcher,
    catalog: &FeatureCatalog,
    pacing: &Pacing,
    name: &str,
    url: &str,
) -> SiteReport {
    let html = match fetcher.fetch_page(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(site = name, %url, error = %e, "page could not be loaded");
            return SiteReport::failed(name, url, format!("{:#}", e));
        }
    };

    let mut report = SiteReport::new(name, url);

    if let Err(e) = collect(fetcher, catalog, pacing, &html, &mut report).await {
        warn!(site = name, %url, error = %e, "site analysis failed");
        report.error = Some(format!("{:#}", e));
    }

    info!(
        site = name,
        stylesheets = report.external_css.len(),
        features = report.total_features_found,
        "site analyzed"
    );

    report
}

// Fills `report` from the fetched page; partial results stay on failure
async fn collect(
    fetcher: &dyn Fetcher,
    catalog: &FeatureCatalog,
    pacing: &Pacing,
    html: &str,
    report: &mut SiteReport,
) -> Result<()> {
    let inline_css = extract_inline_styles(html);
    if !inline_css.is_empty() {
        let source = format!("{} (inline)", report.url);
        report.inline_css = Some(detect(&inline_css, &source, catalog));
    }

    let stylesheet_urls =
        extract_stylesheet_links(html, &report.url).context("could not resolve stylesheet links")?;
    debug!(url = %report.url, count = stylesheet_urls.len(), "stylesheets found");

    for (index, css_url) in stylesheet_urls.iter().enumerate() {
        if index > 0 {
            pause(pacing.stylesheet).await;
        }

        let css = fetcher.fetch_raw(css_url).await;
        if css.is_empty() {
            debug!(url = %css_url, "stylesheet skipped");
            continue;
        }

        report.external_css.push(detect(&css, css_url, catalog));
    }

    report.features_summary = summarize(catalog, report.inline_css.iter().chain(&report.external_css));
    report.total_features_found = report.features_summary.len();

    Ok(())
}

// Sums feature counts over all sources
//
// Keys come out in catalog order. Names and descriptions are taken from the
// catalog, not from the individual results.
pub(crate) fn summarize<'a>(
    catalog: &FeatureCatalog,
    sources: impl Iterator<Item = &'a CssAnalysis> + Clone,
) -> OrderedMap<FeatureTotal> {
    let mut summary = OrderedMap::new();

    for feature in catalog.iter() {
        let mut present = false;
        let mut total = 0;

        for hits in sources.clone().filter_map(|s| s.features.get(feature.key())) {
            present = true;
            total += hits.count;
        }

        if present {
            summary.insert(
                feature.key(),
                FeatureTotal {
                    display_name: feature.display_name().to_string(),
                    total_occurrences: total,
                    description: feature.description().to_string(),
                },
            );
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::testing::{assert_elapsed, StubFetcher};
    use std::time::Duration;
    use tokio::time::Instant;

    const URL: &str = "https://example.com/";

    async fn run(fetcher: &StubFetcher) -> SiteReport {
        analyze_site(fetcher, &FeatureCatalog::builtin(), &Pacing::none(), "Example", URL).await
    }

    #[tokio::test]
    async fn test_page_failure_is_terminal() {
        let fetcher = StubFetcher::default();
        let report = run(&fetcher).await;

        assert!(report.error.as_deref().unwrap().contains("Connection failed"));
        assert_eq!(report.total_features_found, 0);
        assert!(report.features_summary.is_empty());
        assert!(report.inline_css.is_none());
        assert_eq!(fetcher.requests(), vec![URL]);
    }

    #[tokio::test]
    async fn test_inline_and_external_counts_add_up() {
        let html = r#"
            <html><head>
              <style>.a:has(b) {} .c:has(d) {} .e:has(f) {}</style>
              <link rel="stylesheet" href="/main.css">
            </head></html>
        "#;
        let fetcher = StubFetcher::default()
            .with_page(URL, html)
            .with_stylesheet("https://example.com/main.css", ".x:has(y) {}\n.z:has(w) {}");

        let report = run(&fetcher).await;

        assert!(report.is_ok());
        assert_eq!(
            report.inline_css.as_ref().unwrap().source,
            "https://example.com/ (inline)"
        );
        assert_eq!(report.external_css.len(), 1);
        assert_eq!(report.external_css[0].source, "https://example.com/main.css");

        let has = report.features_summary.get("has_selector").unwrap();
        assert_eq!(has.total_occurrences, 5);
        assert_eq!(has.display_name, ":has() Selector");
        assert_eq!(report.total_features_found, 1);
    }

    #[tokio::test]
    async fn test_distinct_features_not_occurrences() {
        let html = r#"<link rel="stylesheet" href="a.css"><link rel="stylesheet" href="b.css">"#;
        let fetcher = StubFetcher::default()
            .with_page(URL, html)
            .with_stylesheet("https://example.com/a.css", &"@layer base;\n".repeat(50))
            .with_stylesheet("https://example.com/b.css", "@layer theme; .a:has(b) {}");

        let report = run(&fetcher).await;

        assert_eq!(report.total_features_found, 2);
        assert_eq!(report.total_features_found, report.features_summary.len());
        assert_eq!(
            report.features_summary.get("css_layers").unwrap().total_occurrences,
            51
        );
        assert!(report.features_summary.values().all(|f| f.total_occurrences >= 1));
        let keys: Vec<_> = report.features_summary.keys().collect();
        assert_eq!(keys, vec!["css_layers", "has_selector"]);
    }

    #[tokio::test]
    async fn test_missing_stylesheet_is_skipped() {
        let html = r#"
            <link rel="stylesheet" href="/gone.css">
            <link rel="stylesheet" href="/ok.css">
        "#;
        let fetcher = StubFetcher::default()
            .with_page(URL, html)
            .with_stylesheet("https://example.com/ok.css", "a { color: oklch(1 2 3) }");

        let report = run(&fetcher).await;

        assert!(report.error.is_none());
        assert_eq!(report.external_css.len(), 1);
        assert_eq!(report.total_features_found, 1);
        assert_eq!(
            fetcher.requests(),
            vec![
                URL,
                "https://example.com/gone.css",
                "https://example.com/ok.css"
            ]
        );
    }

    #[tokio::test]
    async fn test_analysis_failure_keeps_partial_results() {
        // The stub serves this page even though the URL can't be a link base
        let url = "not a url";
        let html = "<style>.a:has(b) {}</style>";
        let fetcher = StubFetcher::default().with_page(url, html);

        let report =
            analyze_site(&fetcher, &FeatureCatalog::builtin(), &Pacing::none(), "Broken", url).await;

        assert!(report
            .error
            .as_deref()
            .unwrap()
            .contains("could not resolve stylesheet links"));
        assert!(report.inline_css.is_some());
        assert_eq!(report.total_features_found, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_stylesheets() {
        let html = r#"
            <link rel="stylesheet" href="/a.css">
            <link rel="stylesheet" href="/b.css">
            <link rel="stylesheet" href="/c.css">
        "#;
        let fetcher = StubFetcher::default().with_page(URL, html);
        let pacing = Pacing {
            stylesheet: Duration::from_millis(500),
            site: Duration::from_secs(1),
        };

        let start = Instant::now();
        analyze_site(&fetcher, &FeatureCatalog::builtin(), &pacing, "Example", URL).await;

        // Three stylesheets, two gaps; the site delay belongs to the corpus walk
        assert_elapsed(start, Duration::from_secs(1));
        assert_eq!(fetcher.requests().len(), 4);
    }

    #[test]
    fn test_summarize_ignores_sources_without_the_feature() {
        let catalog = FeatureCatalog::builtin();
        let inline = detect("a:has(b) {}", "inline", &catalog);
        let external = detect("@layer x;", "ext", &catalog);

        let summary = summarize(&catalog, [&inline, &external].into_iter());

        assert_eq!(summary.get("has_selector").unwrap().total_occurrences, 1);
        assert_eq!(summary.get("css_layers").unwrap().total_occurrences, 1);
        assert_eq!(summary.len(), 2);
    }
}
