//! Storage abstractions for catalog persistence.
//!
//! The backend is a generic record store: typed `find`/`create` per
//! collection plus a binary upload endpoint.
//!
//! - `RestStorage`: talks to the CMS over its REST API
//! - `MemoryStorage`: in-process store for dry runs and tests

pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GameRecord, ImageUpload, NewGame, NewRelation, RelationEntity, RelationKind};

// Re-export for convenience
pub use memory::{MemoryStorage, StoredUpload};
pub use rest::RestStorage;

/// Trait for catalog storage backends.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Find a relation entity of `kind` whose name is exactly `name`.
    async fn find_relation(&self, kind: RelationKind, name: &str)
    -> Result<Option<RelationEntity>>;

    /// Create a relation entity of `kind`.
    async fn create_relation(
        &self,
        kind: RelationKind,
        relation: &NewRelation,
    ) -> Result<RelationEntity>;

    /// Find a game whose name is exactly `name`.
    async fn find_game(&self, name: &str) -> Result<Option<GameRecord>>;

    /// Create a game.
    async fn create_game(&self, game: &NewGame) -> Result<GameRecord>;

    /// Attach an image to an existing record.
    async fn upload(&self, upload: ImageUpload) -> Result<()>;
}
