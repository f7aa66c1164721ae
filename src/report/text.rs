// src/report/text.rs
// =============================================================================
// Renders the human-readable summary report (css_usage_report.txt).
//
// Two parts:
// 1. Overall statistics: for each catalog feature, how many sites use it
//    ("used" = the feature appears in the site's summary at all)
// 2. Detailed report: every site of every category, with its features
//
// The report is in Russian, like the site list it describes.
// =============================================================================

use super::percentage;
use crate::catalog::FeatureCatalog;
use crate::model::CorpusReport;

/// How many site names are listed under each feature
const SITES_LISTED: usize = 5;

pub fn render_text(report: &CorpusReport, catalog: &FeatureCatalog) -> String {
    let rule = "=".repeat(80);
    let mut lines = vec![
        rule.clone(),
        "ИТОГОВЫЙ ОТЧЕТ: ИСПОЛЬЗОВАНИЕ СОВРЕМЕННЫХ CSS".to_string(),
        rule.clone(),
        format!("Всего сайтов проанализировано: {}", report.total_sites),
        String::new(),
        "ОБЩАЯ СТАТИСТИКА ПО CSS-ВОЗМОЖНОСТЯМ".to_string(),
        "-".repeat(80),
        String::new(),
    ];

    for feature in catalog.iter() {
        let users: Vec<&str> = report
            .sites()
            .filter(|(_, site)| site.features_summary.contains_key(feature.key()))
            .map(|(_, site)| site.name.as_str())
            .collect();

        lines.push(feature.display_name().to_string());
        lines.push(format!("   Описание: {}", feature.description()));
        lines.push(format!(
            "   Использование: {}/{} сайтов ({:.1}%)",
            users.len(),
            report.total_sites,
            percentage(users.len(), report.total_sites)
        ));
        if !users.is_empty() {
            let listed: Vec<_> = users.iter().take(SITES_LISTED).copied().collect();
            lines.push(format!("   Сайты: {}", listed.join(", ")));
        }
        lines.push(String::new());
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push("ДЕТАЛЬНЫЙ ОТЧЕТ ПО КАТЕГОРИЯМ".to_string());
    lines.push(rule);

    let banner = "#".repeat(80);
    for (category_name, category) in report.categories.iter() {
        lines.push(format!("\n{}", banner));
        lines.push(format!("# {}", category_name.to_uppercase()));
        lines.push(format!("{}\n", banner));

        for site in category.sites.values() {
            lines.push(site.name.clone());
            lines.push(format!("   URL: {}", site.url));

            match &site.error {
                Some(error) => lines.push(format!("   Ошибка: {}", error)),
                None => {
                    lines.push(format!(
                        "   Найдено современных возможностей: {}",
                        site.total_features_found
                    ));
                    if site.features_summary.is_empty() {
                        lines.push("      Современные CSS-возможности не обнаружены".to_string());
                    }
                    for feature in site.features_summary.values() {
                        lines.push(format!(
                            "      {}: {} упоминаний",
                            feature.display_name, feature.total_occurrences
                        ));
                    }
                }
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
