//! Image upload pipeline.
//!
//! Downloads a storefront image and attaches it to a stored game through the
//! backend's upload endpoint. Transfers share one semaphore so the batch never
//! has more than `max_concurrent_uploads` images in flight.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Semaphore;

use crate::error::{AppError, Result};
use crate::models::{GameRecord, ImageField, ImageUpload};
use crate::storage::CatalogStorage;
use crate::utils::image_url;

/// Maximum gallery images uploaded per game.
pub const GALLERY_LIMIT: usize = 5;

/// Source of image bytes.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloads images over HTTP.
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Uploads cover and gallery images for stored games.
pub struct ImageUploader {
    source: Arc<dyn ImageSource>,
    storage: Arc<dyn CatalogStorage>,
    suffix: String,
    permits: Semaphore,
}

impl ImageUploader {
    pub fn new(
        source: Arc<dyn ImageSource>,
        storage: Arc<dyn CatalogStorage>,
        suffix: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            source,
            storage,
            suffix: suffix.into(),
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Download `reference` and attach it to `game` in the `field` slot.
    pub async fn upload(&self, reference: &str, game: &GameRecord, field: ImageField) -> Result<()> {
        let url = image_url(reference, &self.suffix);
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::image(&url, e))?;

        let bytes = self.source.download(&url).await?;
        let file_name = format!("{}.jpg", game.slug);
        log::info!("Uploading {} image: {}", field, file_name);

        self.storage
            .upload(ImageUpload {
                ref_id: game.id.clone(),
                field,
                file_name,
                bytes,
            })
            .await
    }
}

/// Gallery references that will be uploaded, in listing order.
pub fn gallery_selection(gallery: &[String]) -> &[String] {
    &gallery[..gallery.len().min(GALLERY_LIMIT)]
}
