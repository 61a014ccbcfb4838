//! Storefront listing client.

use reqwest::Client;

use crate::error::Result;
use crate::models::{ListingResponse, ProductListing, SourceConfig};
use crate::utils::listing_url;

/// Fetches the filtered product listing.
pub struct ListingClient {
    client: Client,
    base_url: String,
}

impl ListingClient {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            base_url: config.listing_url.clone(),
        }
    }

    /// Fetch the first popularity-sorted page of games matching `params`.
    pub async fn fetch(&self, params: &[(String, String)]) -> Result<Vec<ProductListing>> {
        let url = listing_url(&self.base_url, params)?;
        log::info!("Fetching listing: {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let listing = response.json::<ListingResponse>().await?;
        Ok(listing.products)
    }
}
