//! 1337x HTML scraper.

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::EndpointConfig;
use crate::extract::UNKNOWN_SIZE;

use super::scrape::{
    absolute_url, element_text, fetch_detail_magnet, parse_count, selector, ListingRow,
};
use super::{build_client, fetch_body, Candidate, SearchError, SourceAdapter, SourceQuery};

/// Adapter scraping 1337x search listings. Each row's magnet lives on its
/// detail page.
pub struct LeetxAdapter {
    client: Client,
    base_url: String,
}

impl LeetxAdapter {
    pub fn new(endpoint: &EndpointConfig, user_agent: &str) -> Self {
        Self {
            client: build_client(endpoint.timeout_secs, user_agent),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_search_url(&self, query: &SourceQuery) -> String {
        let terms = urlencoding::encode(query.search_text().trim()).replace("%20", "+");
        format!("{}/search/{}/1/", self.base_url, terms)
    }
}

/// Parse listing rows. Rows without a `/torrent/` name link are skipped.
pub(crate) fn parse_listing(
    html: &str,
    base_url: &str,
    limit: Option<usize>,
) -> Result<Vec<ListingRow>, SearchError> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr")?;
    let name_sel = selector("td.name a[href*='/torrent/']")?;
    let seeds_sel = selector("td.seeds")?;
    let leeches_sel = selector("td.leeches")?;
    let cell_sel = selector("td")?;

    let rows = document
        .select(&row_sel)
        .filter_map(|row| {
            let link = row.select(&name_sel).next()?;
            let href = link.value().attr("href")?;

            let count = |sel: &Selector| {
                row.select(sel)
                    .next()
                    .map(|cell| parse_count(&element_text(&cell)))
                    .unwrap_or(0)
            };

            // Size cell carries the seeder count in a nested span.
            let size = row
                .select(&cell_sel)
                .nth(4)
                .and_then(|cell| cell.text().map(str::trim).find(|t| !t.is_empty()))
                .map(|t| t.replace('\u{a0}', " "))
                .unwrap_or_else(|| UNKNOWN_SIZE.to_string());

            Some(ListingRow {
                title: element_text(&link),
                detail_url: Some(absolute_url(base_url, href)),
                magnet: None,
                size,
                seeders: count(&seeds_sel),
                leechers: count(&leeches_sel),
            })
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    Ok(rows)
}

#[async_trait]
impl SourceAdapter for LeetxAdapter {
    fn name(&self) -> &str {
        "1337x"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError> {
        let url = self.build_search_url(query);
        debug!(source = self.name(), url = %url, "Searching 1337x");

        let body = fetch_body(self.client.get(&url)).await?;
        let rows = parse_listing(&body, &self.base_url, query.limit)?;

        let magnets = join_all(rows.iter().map(|row| async move {
            match &row.detail_url {
                Some(detail_url) => fetch_detail_magnet(&self.client, detail_url, "1337x").await,
                None => None,
            }
        }))
        .await;

        let candidates: Vec<Candidate> = rows
            .into_iter()
            .zip(magnets)
            .filter_map(|(row, magnet)| {
                let magnet = magnet?;
                Some(Candidate::from_listing(
                    row.title,
                    magnet,
                    row.size,
                    row.seeders,
                    row.leechers,
                    "1337x",
                ))
            })
            .collect();

        debug!(source = self.name(), results = candidates.len(), "1337x search complete");
        Ok(candidates)
    }
}
