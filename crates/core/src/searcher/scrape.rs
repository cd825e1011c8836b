//! HTML helpers shared by the page scrapers.
//!
//! `scraper::Html` is not `Send`, so documents are parsed inside synchronous
//! functions that return owned rows and never live across an await point.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{fetch_body, SearchError};

/// One row of a listing page before its magnet is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListingRow {
    pub title: String,
    pub detail_url: Option<String>,
    pub magnet: Option<String>,
    pub size: String,
    pub seeders: u32,
    pub leechers: u32,
}

pub(crate) fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Internal(format!("bad selector {}: {:?}", css, e)))
}

/// Collapsed, trimmed text content of an element.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Leading count in a cell, 0 if absent.
pub(crate) fn parse_count(text: &str) -> u32 {
    text.trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Resolve a possibly-relative link against the site base URL.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// First `magnet:` link on a detail page.
pub(crate) fn parse_detail_magnet(html: &str) -> Result<Option<String>, SearchError> {
    let document = Html::parse_document(html);
    let magnet_link = selector("a[href^='magnet:']")?;

    Ok(document
        .select(&magnet_link)
        .filter_map(|a| a.value().attr("href"))
        .next()
        .map(str::to_string))
}

/// Fetch a detail page and pull its magnet. Failures yield `None`.
pub(crate) async fn fetch_detail_magnet(client: &Client, url: &str, source: &str) -> Option<String> {
    let body = match fetch_body(client.get(url)).await {
        Ok(body) => body,
        Err(e) => {
            debug!(source = source, url = url, error = %e, "Detail page fetch failed");
            return None;
        }
    };

    match parse_detail_magnet(&body) {
        Ok(magnet) => magnet,
        Err(e) => {
            debug!(source = source, url = url, error = %e, "Detail page parse failed");
            None
        }
    }
}
