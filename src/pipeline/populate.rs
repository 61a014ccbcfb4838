// src/pipeline/populate.rs

//! Population pipeline.
//!
//! A run has two phases separated by a hard barrier:
//!
//! 1. every distinct relation name of the batch is resolved (found or created);
//! 2. every product is turned into a game, concurrently across products and
//!    strictly ordered within one: lookup, create, cover, gallery, pause.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;

use crate::error::Result;
use crate::models::{
    Config, EntryId, GameRecord, ImageField, NewGame, PopulateReport, ProductListing,
    ProductOutcome, RelationKind,
};
use crate::services::images::gallery_selection;
use crate::services::{
    EnrichmentSource, HttpImageSource, ImageSource, ImageUploader, ListingClient,
    RelationResolver, StorefrontEnrichment, collect_relation_names, precompute_relations,
};
use crate::storage::CatalogStorage;

/// Drives a population run against one storage backend.
pub struct Populator {
    listing: ListingClient,
    storage: Arc<dyn CatalogStorage>,
    resolver: RelationResolver,
    enrichment: Arc<dyn EnrichmentSource>,
    images: ImageUploader,
    settle_delay: Duration,
}

impl Populator {
    /// Create a populator that scrapes and downloads over `client`.
    pub fn new(config: &Config, client: Client, storage: Arc<dyn CatalogStorage>) -> Result<Self> {
        let enrichment = Arc::new(StorefrontEnrichment::new(client.clone(), &config.source)?);
        let images = Arc::new(HttpImageSource::new(client.clone()));
        Ok(Self::with_sources(config, client, storage, enrichment, images))
    }

    /// Create a populator with explicit enrichment and image sources.
    pub fn with_sources(
        config: &Config,
        client: Client,
        storage: Arc<dyn CatalogStorage>,
        enrichment: Arc<dyn EnrichmentSource>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            listing: ListingClient::new(client, &config.source),
            resolver: RelationResolver::new(
                Arc::clone(&storage),
                config.populate.slug_sanitization,
            ),
            images: ImageUploader::new(
                images,
                Arc::clone(&storage),
                config.source.image_suffix.clone(),
                config.populate.max_concurrent_uploads,
            ),
            storage,
            enrichment,
            settle_delay: Duration::from_millis(config.populate.settle_delay_ms),
        }
    }

    /// Fetch the listing filtered by `params` and populate the backend.
    ///
    /// Only a listing failure is returned as an error; everything after that
    /// is reported per item.
    pub async fn populate(&self, params: &[(String, String)]) -> Result<PopulateReport> {
        let products = self.listing.fetch(params).await?;
        log::info!("Listing returned {} products", products.len());
        Ok(self.run(&products).await)
    }

    /// Populate the backend from an already fetched listing.
    pub async fn run(&self, products: &[ProductListing]) -> PopulateReport {
        let names = collect_relation_names(products);
        log::info!(
            "[STEP 1/2] Resolving {} relations ({} developers, {} publishers, {} categories, {} platforms)",
            names.len(),
            names.developers.len(),
            names.publishers.len(),
            names.categories.len(),
            names.platforms.len()
        );
        let relations = precompute_relations(&self.resolver, &names).await;

        log::info!("[STEP 2/2] Creating {} games", products.len());
        let outcomes = self.create_games(products).await;

        PopulateReport::from_outcomes(relations, outcomes)
    }

    /// Create a game for every product; returns once all products settle.
    pub async fn create_games(&self, products: &[ProductListing]) -> Vec<ProductOutcome> {
        join_all(products.iter().map(|product| self.create_game(product))).await
    }

    async fn create_game(&self, product: &ProductListing) -> ProductOutcome {
        let title = product.title.clone();

        match self.storage.find_game(&title).await {
            Ok(Some(_)) => {
                log::debug!("Skipping existing game: {}", title);
                return ProductOutcome::Skipped { title };
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("[find_game] {}: {}", title, e);
                return ProductOutcome::Failed {
                    title,
                    reason: e.to_string(),
                };
            }
        }

        log::info!("Creating: {}...", title);
        let mut game = self.assemble(product).await;

        let enriched = match self.enrichment.fetch(&product.slug).await {
            Ok(enrichment) => {
                game.apply_enrichment(enrichment);
                true
            }
            Err(e) => {
                log::warn!("[enrichment] {}: {}", product.slug, e);
                false
            }
        };

        let record = match self.storage.create_game(&game).await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("[create_game] {}: {}", title, e);
                return ProductOutcome::Failed {
                    title,
                    reason: e.to_string(),
                };
            }
        };

        let (images_uploaded, images_failed) = self.upload_images(product, &record).await;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        ProductOutcome::Created {
            title,
            enriched,
            images_uploaded,
            images_failed,
        }
    }

    /// Map listing fields and attach already resolved relations.
    async fn assemble(&self, product: &ProductListing) -> NewGame {
        let categories = self.lookup_ids(RelationKind::Category, &product.genres).await;
        let platforms = self
            .lookup_ids(RelationKind::Platform, &product.supported_operating_systems)
            .await;

        let developers = match product.developer_name() {
            Some(name) => self
                .resolver
                .lookup(RelationKind::Developer, name)
                .await
                .map(|e| e.id)
                .into_iter()
                .collect(),
            None => Vec::new(),
        };

        let publisher = match product.publisher_name() {
            Some(name) => self
                .resolver
                .lookup(RelationKind::Publisher, name)
                .await
                .map(|e| e.id),
            None => None,
        };

        NewGame {
            name: product.title.clone(),
            slug: product.game_slug(),
            price: product.price.amount,
            release_date: product.release_date_iso(),
            categories,
            platforms,
            developers,
            publisher,
            rating: None,
            short_description: None,
            description: None,
        }
    }

    /// Resolve names to ids, keeping listing order and dropping misses.
    async fn lookup_ids(&self, kind: RelationKind, names: &[String]) -> Vec<EntryId> {
        let lookups = names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.resolver.lookup(kind, name));

        join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .map(|entity| entity.id)
            .collect()
    }

    /// Upload the cover, then the capped gallery. Returns `(uploaded, failed)`.
    async fn upload_images(&self, product: &ProductListing, record: &GameRecord) -> (usize, usize) {
        let mut uploaded = 0;
        let mut failed = 0;

        if let Some(cover) = product.image.as_deref().filter(|c| !c.trim().is_empty()) {
            match self.images.upload(cover, record, ImageField::Cover).await {
                Ok(()) => uploaded += 1,
                Err(e) => {
                    log::warn!("[upload_image] cover of {}: {}", record.slug, e);
                    failed += 1;
                }
            }
        }

        let gallery = gallery_selection(&product.gallery);
        let results = join_all(
            gallery
                .iter()
                .map(|reference| self.images.upload(reference, record, ImageField::Gallery)),
        )
        .await;

        for (reference, result) in gallery.iter().zip(results) {
            match result {
                Ok(()) => uploaded += 1,
                Err(e) => {
                    log::warn!("[upload_image] gallery {} of {}: {}", reference, record.slug, e);
                    failed += 1;
                }
            }
        }

        (uploaded, failed)
    }
}
