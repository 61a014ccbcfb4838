//! Stub collaborators shared by unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Config, Enrichment, FREE_RATING, GameRecord, NewGame};
use crate::services::{EnrichmentSource, ImageSource};
use crate::storage::{CatalogStorage, MemoryStorage};

/// Config with no settle delay and a short image suffix.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.populate.settle_delay_ms = 0;
    config.source.image_suffix = "_t.jpg".into();
    config
}

/// Store a bare game so uploads have an owner.
pub async fn store_game(storage: &MemoryStorage, name: &str, slug: &str) -> GameRecord {
    let game = NewGame {
        name: name.into(),
        slug: slug.into(),
        price: None,
        release_date: None,
        categories: vec![],
        platforms: vec![],
        developers: vec![],
        publisher: None,
        rating: None,
        short_description: None,
        description: None,
    };
    storage.create_game(&game).await.unwrap()
}

/// Image source returning fixed bytes and recording every requested URL.
#[derive(Default)]
pub struct StubImages {
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl StubImages {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSource for StubImages {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(AppError::image(url, "404 Not Found"));
        }
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}

/// Enrichment source answering from memory.
#[derive(Default)]
pub struct StubEnrichment {
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl StubEnrichment {
    pub fn failing(slugs: &[&str]) -> Self {
        Self {
            failing: slugs.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnrichmentSource for StubEnrichment {
    async fn fetch(&self, slug: &str) -> Result<Enrichment> {
        self.requested.lock().unwrap().push(slug.to_string());
        if self.failing.contains(slug) {
            return Err(AppError::enrichment(slug, "connection reset"));
        }
        Ok(Enrichment {
            rating: FREE_RATING.to_string(),
            short_description: format!("About {slug}"),
            description: format!("<p>About {slug}</p>"),
        })
    }
}
