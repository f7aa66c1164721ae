// src/report/mod.rs
// =============================================================================
// Everything that turns a CorpusReport into something for humans.
//
// Submodules:
// - text: The plain-text summary (overall adoption + per-site details)
// - charts: The numbers behind the charts, written as JSON files
// =============================================================================

mod charts;
mod text;

pub use charts::{write_charts, ChartData};
pub use text::render_text;

// Share of `part` in `total`, in percent (0 when there is nothing to divide)
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
