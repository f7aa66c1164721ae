// src/detector/mod.rs
// =============================================================================
// Scans a blob of CSS text for the features in the catalog.
//
// How it works:
// 1. For each feature (catalog order), run each of its patterns (in order)
// 2. Collect every non-overlapping match, left to right
// 3. Record the line number and a window of surrounding text for each match
// 4. Keep the total count, but only the first few matches for display
//
// The detector is a pure function: same text + same catalog = same result.
// Text that matches two different features counts for both.
//
// Rust concepts:
// - Byte offsets vs characters: regex gives byte offsets, but the context
//   window is measured in characters so we never slice through a UTF-8
//   code point
// =============================================================================

use crate::catalog::FeatureCatalog;
use crate::model::{CssAnalysis, FeatureHits, FeatureInstance, OrderedMap};

/// How many matches per feature are kept in `instances`
pub const MAX_INSTANCES: usize = 5;

/// Characters of context taken on each side of a match
const CONTEXT_RADIUS: usize = 100;

/// Maximum length of a context string, in characters
const MAX_CONTEXT_CHARS: usize = 200;

// Detects catalog features in `css`
//
// Parameters:
//   css: the stylesheet text
//   source: where the text came from (a URL, or "{url} (inline)")
//   catalog: the features to look for
//
// Returns: a CssAnalysis that only lists features with at least one hit
pub fn detect(css: &str, source: &str, catalog: &FeatureCatalog) -> CssAnalysis {
    let mut features = OrderedMap::new();

    for feature in catalog.iter() {
        let mut count = 0;
        let mut instances = Vec::new();

        for regex in feature.regexes() {
            for found in regex.find_iter(css) {
                count += 1;
                if instances.len() < MAX_INSTANCES {
                    instances.push(FeatureInstance {
                        matched_text: found.as_str().to_string(),
                        line_number: line_number(css, found.start()),
                        context: context_window(css, found.start(), found.end()),
                    });
                }
            }
        }

        if count > 0 {
            features.insert(
                feature.key(),
                FeatureHits {
                    display_name: feature.display_name().to_string(),
                    count,
                    instances,
                    description: feature.description().to_string(),
                },
            );
        }
    }

    CssAnalysis {
        source: source.to_string(),
        total_lines: css.split('\n').count(),
        total_chars: css.chars().count(),
        features,
    }
}

// 1-based line of the byte offset `start`
fn line_number(text: &str, start: usize) -> usize {
    text[..start].matches('\n').count() + 1
}

// Text around [start, end), clamped to the string, trimmed and capped
fn context_window(text: &str, start: usize, end: usize) -> String {
    // Byte index CONTEXT_RADIUS characters before `start`, or 0
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);

    // Byte index CONTEXT_RADIUS characters after `end`, or the end of the text
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[from..to].trim().chars().take(MAX_CONTEXT_CHARS).collect()
}
