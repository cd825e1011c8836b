//! The Pirate Bay HTML scraper.

use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::extract::UNKNOWN_SIZE;

use super::scrape::{
    absolute_url, element_text, fetch_detail_magnet, parse_count, selector, ListingRow,
};
use super::{build_client, fetch_body, Candidate, SearchError, SourceAdapter, SourceQuery};

static DESCRIPTION_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Size ([^,]+)").unwrap());

/// Adapter scraping Pirate Bay search listings.
///
/// Rows normally carry an inline magnet; rows without one fall back to the
/// detail page.
pub struct PirateBayAdapter {
    client: Client,
    base_url: String,
}

impl PirateBayAdapter {
    pub fn new(endpoint: &EndpointConfig, user_agent: &str) -> Self {
        Self {
            client: build_client(endpoint.timeout_secs, user_agent),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_search_url(&self, query: &SourceQuery) -> String {
        format!(
            "{}/search/{}/1/99/0",
            self.base_url,
            urlencoding::encode(query.search_text().trim())
        )
    }
}

/// Parse result rows. Rows without an `a.detLink` (such as the header) are
/// skipped.
pub(crate) fn parse_listing(
    html: &str,
    base_url: &str,
    limit: Option<usize>,
) -> Result<Vec<ListingRow>, SearchError> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr")?;
    let link_sel = selector("a.detLink")?;
    let magnet_sel = selector("a[href^='magnet:']")?;
    let desc_sel = selector("font.detDesc")?;
    let cell_sel = selector("td")?;

    let rows = document
        .select(&row_sel)
        .filter_map(|row| {
            let link = row.select(&link_sel).next()?;

            let magnet = row
                .select(&magnet_sel)
                .find_map(|a| a.value().attr("href"))
                .map(str::to_string);

            let size = row
                .select(&desc_sel)
                .next()
                .and_then(|desc| {
                    let text = element_text(&desc);
                    DESCRIPTION_SIZE
                        .captures(&text)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().trim().to_string())
                })
                .unwrap_or_else(|| UNKNOWN_SIZE.to_string());

            // Seeders and leechers are the last two cells.
            let counts: Vec<u32> = row
                .select(&cell_sel)
                .map(|cell| parse_count(&element_text(&cell)))
                .collect();
            let (seeders, leechers) = match counts.as_slice() {
                [.., seeders, leechers] => (*seeders, *leechers),
                [leechers] => (0, *leechers),
                [] => (0, 0),
            };

            Some(ListingRow {
                title: element_text(&link),
                detail_url: link.value().attr("href").map(|href| absolute_url(base_url, href)),
                magnet,
                size,
                seeders,
                leechers,
            })
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    Ok(rows)
}

#[async_trait]
impl SourceAdapter for PirateBayAdapter {
    fn name(&self) -> &str {
        "piratebay"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError> {
        let url = self.build_search_url(query);
        debug!(source = self.name(), url = %url, "Searching Pirate Bay");

        let body = fetch_body(self.client.get(&url)).await?;
        let rows = parse_listing(&body, &self.base_url, query.limit)?;

        let magnets = join_all(rows.iter().map(|row| async move {
            match (&row.magnet, &row.detail_url) {
                (Some(magnet), _) => Some(magnet.clone()),
                (None, Some(detail_url)) => {
                    fetch_detail_magnet(&self.client, detail_url, "PirateBay").await
                }
                (None, None) => None,
            }
        }))
        .await;

        let candidates: Vec<Candidate> = rows
            .into_iter()
            .zip(magnets)
            .filter_map(|(row, magnet)| {
                Some(Candidate::from_listing(
                    row.title,
                    magnet?,
                    row.size,
                    row.seeders,
                    row.leechers,
                    "PirateBay",
                ))
            })
            .collect();

        debug!(
            source = self.name(),
            results = candidates.len(),
            "Pirate Bay search complete"
        );
        Ok(candidates)
    }
}
