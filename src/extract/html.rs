// src/extract/html.rs
// =============================================================================
// This module extracts CSS from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so tag names are
//   case-insensitive and <style> contents are read as raw text
//
// We also use the `url` crate to:
// - Resolve relative stylesheet links to absolute URLs
//
// Rust concepts:
// - Result<T, E>: For operations that can fail
// - Iterators: For processing collections
// - Closures: Anonymous functions (|x| ...)
// =============================================================================

use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use url::Url;

// Collects the contents of every <style> block
//
// Parameters:
//   html: the HTML content to parse
//
// Returns: all blocks joined with "\n" in document order,
//          or an empty string when the page has none
//
// Example:
//   html = "<style>a{}</style><p>hi</p><style>b{}</style>"
//   result = "a{}\nb{}"
pub fn extract_inline_styles(html: &str) -> String {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("style").unwrap();

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// Extracts the stylesheet URLs a page links to
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: absolute URLs of every <link rel="stylesheet" href="...">,
//          in document order. Tags without a usable href are skipped.
//          Fails only when `base_url` itself is not a valid URL.
//
// Example:
//   html = "<link rel='stylesheet' href='/css/main.css'>"
//   base_url = "https://example.com/page"
//   result = ["https://example.com/css/main.css"]
pub fn extract_stylesheet_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url).map_err(|e| anyhow!("Invalid base URL '{}': {}", base_url, e))?;

    let document = Html::parse_document(html);
    let selector = Selector::parse("link[rel]").unwrap();

    let links = document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
        })
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .filter_map(|href| resolve_url(&base, href))
        .collect();

    Ok(links)
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/css/a.css" -> Some("https://example.com/css/a.css")
//   href = "a.css?v=2" -> Some("https://example.com/a.css?v=2")
//   href = "https://CDN.example.net" -> Some("https://CDN.example.net")
//   href = "//cdn.example.net/c.css" -> Some("https://cdn.example.net/c.css")
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    // An absolute href is kept exactly as written (no normalization)
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    base.join(href).ok().map(|url| url.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a real HTML parser instead of regexes?
//    - A regex like <style[^>]*>(.*?)</style> breaks on comments, odd
//      attribute quoting and unclosed tags
//    - html5ever parses the page the way a browser does, so <STYLE>, REL=
//      and unquoted attributes all just work
//
// 2. What does .is_some_and() do?
//    - Returns true only if the Option is Some AND the closure says true
//    - A tag without a rel attribute is simply not a stylesheet
//
// 3. Why not join() every href?
//    - Url::join normalizes what it returns: the host is lowercased, an
//      empty path becomes "/" and spaces are percent-encoded
//    - An href that already parses on its own is returned untouched, so the
//      stylesheet's source matches what the page wrote
//    - Relative hrefs follow the URL standard: "//host/x" keeps only the base
//      scheme and "../x" walks up from the base path
// -----------------------------------------------------------------------------
