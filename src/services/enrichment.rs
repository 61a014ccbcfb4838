//! Enrichment fetcher.
//!
//! Scrapes the description block of a product's storefront page.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Enrichment, FREE_RATING, SourceConfig};

/// Length of the short description, in characters.
pub const SHORT_DESCRIPTION_CHARS: usize = 160;

/// Source of descriptive fields for a product slug.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    async fn fetch(&self, slug: &str) -> Result<Enrichment>;
}

/// Reads enrichment from the storefront's product detail pages.
pub struct StorefrontEnrichment {
    client: Client,
    base_url: Url,
    selector: String,
}

impl StorefrontEnrichment {
    pub fn new(client: Client, config: &SourceConfig) -> Result<Self> {
        parse_selector(&config.description_selector)?;
        Ok(Self {
            client,
            base_url: Url::parse(&config.detail_base_url)?,
            selector: config.description_selector.clone(),
        })
    }

    /// Detail page URL for a slug, appended as the last path segment.
    pub fn page_url(&self, slug: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("{} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(slug);
        Ok(url)
    }
}

#[async_trait]
impl EnrichmentSource for StorefrontEnrichment {
    async fn fetch(&self, slug: &str) -> Result<Enrichment> {
        let url = self.page_url(slug)?;
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let selector = parse_selector(&self.selector)?;
        extract_enrichment(&html, &selector).ok_or_else(|| {
            AppError::enrichment(slug, format!("no element matches '{}'", self.selector))
        })
    }
}

/// Extract enrichment from a detail page.
///
/// The short description is the first 160 characters of the block's text,
/// cut without regard for word boundaries.
pub fn extract_enrichment(html: &str, selector: &Selector) -> Option<Enrichment> {
    let document = Html::parse_document(html);
    let block = document.select(selector).next()?;
    let text: String = block.text().collect();

    Some(Enrichment {
        rating: FREE_RATING.to_string(),
        short_description: text.chars().take(SHORT_DESCRIPTION_CHARS).collect(),
        description: block.inner_html(),
    })
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> Selector {
        parse_selector(".description").unwrap()
    }

    #[test]
    fn extracts_description_block() {
        let html = r#"<html><body>
            <div class="header">ignored</div>
            <div class="description"><p>Fight <b>hard</b>.</p></div>
        </body></html>"#;

        let enrichment = extract_enrichment(html, &selector()).unwrap();
        assert_eq!(enrichment.rating, "FREE");
        assert_eq!(enrichment.short_description, "Fight hard.");
        assert_eq!(enrichment.description, "<p>Fight <b>hard</b>.</p>");
    }

    #[test]
    fn short_description_is_exactly_160_chars() {
        let long = "word ".repeat(100);
        let html = format!(r#"<div class="description">{long}</div>"#);

        let enrichment = extract_enrichment(&html, &selector()).unwrap();
        assert_eq!(enrichment.short_description.chars().count(), 160);
        assert_eq!(enrichment.short_description, &long[..160]);
        assert!(enrichment.short_description.ends_with("word "));
    }

    #[test]
    fn short_description_counts_characters_not_bytes() {
        let long = "é".repeat(200);
        let html = format!(r#"<div class="description">{long}</div>"#);

        let enrichment = extract_enrichment(&html, &selector()).unwrap();
        assert_eq!(enrichment.short_description, "é".repeat(160));
    }

    #[test]
    fn missing_block_yields_none() {
        let html = "<html><body><p>No description here</p></body></html>";
        assert!(extract_enrichment(html, &selector()).is_none());
    }

    #[test]
    fn page_url_appends_slug() {
        let source = StorefrontEnrichment::new(Client::new(), &SourceConfig::default()).unwrap();
        assert_eq!(
            source.page_url("alpha_x").unwrap().as_str(),
            "https://www.gog.com/game/alpha_x"
        );
    }

    #[test]
    fn page_url_without_trailing_slash_keeps_base_path() {
        let config = SourceConfig {
            detail_base_url: "https://www.gog.com/en/game".into(),
            ..SourceConfig::default()
        };
        let source = StorefrontEnrichment::new(Client::new(), &config).unwrap();
        assert_eq!(
            source.page_url("alpha").unwrap().as_str(),
            "https://www.gog.com/en/game/alpha"
        );
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let config = SourceConfig {
            description_selector: "[[invalid".into(),
            ..SourceConfig::default()
        };
        assert!(StorefrontEnrichment::new(Client::new(), &config).is_err());
    }
}
