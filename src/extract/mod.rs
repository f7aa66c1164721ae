// src/extract/mod.rs
// =============================================================================
// This module pulls CSS out of HTML pages.
//
// Submodules:
// - html: Finds inline <style> blocks and <link rel="stylesheet"> tags
//
// The detector only ever sees plain CSS text; everything markup-related
// stays behind this module boundary.
// =============================================================================

mod html;

pub use html::{extract_inline_styles, extract_stylesheet_links};
