//! In-memory storage implementation.
//!
//! Keeps every record in process memory. Used for `--dry-run` and as the
//! backend of pipeline tests, where it doubles as a record of what a run
//! created and uploaded.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{
    EntryId, GameRecord, ImageField, ImageUpload, NewGame, NewRelation, RelationEntity,
    RelationKind,
};
use crate::storage::CatalogStorage;

/// Metadata of an accepted upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub ref_id: EntryId,
    pub field: ImageField,
    pub file_name: String,
    pub size: usize,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    relations: HashMap<RelationKind, Vec<RelationEntity>>,
    games: Vec<(GameRecord, NewGame)>,
    uploads: Vec<StoredUpload>,
    rejected_games: HashSet<String>,
    broken_relations: HashSet<String>,
    broken_game_lookups: HashSet<String>,
    relation_creates: usize,
    game_creates: usize,
}

impl MemoryState {
    fn next_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId::Number(self.next_id)
    }
}

/// In-process storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a relation entity as if an earlier run had created it.
    pub fn seed_relation(&self, kind: RelationKind, name: &str, slug: &str) -> RelationEntity {
        let mut state = self.state();
        let entity = RelationEntity {
            id: state.next_id(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        state.relations.entry(kind).or_default().push(entity.clone());
        entity
    }

    /// Make `create_game` fail for the given title.
    pub fn reject_game(&self, name: &str) {
        self.state().rejected_games.insert(name.to_string());
    }

    /// Make `find_relation` and `create_relation` fail for the given name,
    /// whatever its kind.
    pub fn break_relation(&self, name: &str) {
        self.state().broken_relations.insert(name.to_string());
    }

    /// Make `find_game` fail for the given title.
    pub fn break_game_lookup(&self, name: &str) {
        self.state().broken_game_lookups.insert(name.to_string());
    }

    /// Stored relation entities of `kind`, in creation order.
    pub fn relations(&self, kind: RelationKind) -> Vec<RelationEntity> {
        self.state()
            .relations
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored game by name.
    pub fn game(&self, name: &str) -> Option<(GameRecord, NewGame)> {
        self.state()
            .games
            .iter()
            .find(|(record, _)| record.name == name)
            .cloned()
    }

    /// Every accepted upload, in arrival order.
    pub fn uploads(&self) -> Vec<StoredUpload> {
        self.state().uploads.clone()
    }

    /// Number of successful `create_relation` calls.
    pub fn relation_creates(&self) -> usize {
        self.state().relation_creates
    }

    /// Number of successful `create_game` calls.
    pub fn game_creates(&self) -> usize {
        self.state().game_creates
    }
}

#[async_trait]
impl CatalogStorage for MemoryStorage {
    async fn find_relation(
        &self,
        kind: RelationKind,
        name: &str,
    ) -> Result<Option<RelationEntity>> {
        let state = self.state();
        if state.broken_relations.contains(name) {
            return Err(AppError::storage(
                format!("find {}", kind.collection().path()),
                500,
                format!("lookup of {name} failed"),
            ));
        }
        Ok(state
            .relations
            .get(&kind)
            .and_then(|entities| entities.iter().find(|e| e.name == name))
            .cloned())
    }

    async fn create_relation(
        &self,
        kind: RelationKind,
        relation: &NewRelation,
    ) -> Result<RelationEntity> {
        let mut state = self.state();
        if state.broken_relations.contains(&relation.name) {
            return Err(AppError::storage(
                format!("create {}", kind.collection().path()),
                500,
                format!("insert of {} failed", relation.name),
            ));
        }
        let entity = RelationEntity {
            id: state.next_id(),
            name: relation.name.clone(),
            slug: relation.slug.clone(),
        };
        state.relations.entry(kind).or_default().push(entity.clone());
        state.relation_creates += 1;
        Ok(entity)
    }

    async fn find_game(&self, name: &str) -> Result<Option<GameRecord>> {
        let state = self.state();
        if state.broken_game_lookups.contains(name) {
            return Err(AppError::storage("find games", 503, "service unavailable"));
        }
        Ok(state
            .games
            .iter()
            .find(|(record, _)| record.name == name)
            .map(|(record, _)| record.clone()))
    }

    async fn create_game(&self, game: &NewGame) -> Result<GameRecord> {
        let mut state = self.state();
        if state.rejected_games.contains(&game.name) {
            return Err(AppError::storage(
                "create games",
                400,
                format!("rejected game {}", game.name),
            ));
        }
        let record = GameRecord {
            id: state.next_id(),
            name: game.name.clone(),
            slug: game.slug.clone(),
        };
        state.games.push((record.clone(), game.clone()));
        state.game_creates += 1;
        Ok(record)
    }

    async fn upload(&self, upload: ImageUpload) -> Result<()> {
        let mut state = self.state();
        let owner_exists = state.games.iter().any(|(record, _)| record.id == upload.ref_id);
        if !owner_exists {
            return Err(AppError::storage(
                "upload",
                404,
                format!("no game with id {}", upload.ref_id),
            ));
        }
        state.uploads.push(StoredUpload {
            ref_id: upload.ref_id,
            field: upload.field,
            file_name: upload.file_name,
            size: upload.bytes.len(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_matches_exact_name_per_kind() {
        let storage = MemoryStorage::new();
        storage.seed_relation(RelationKind::Category, "Action", "action");

        let found = storage
            .find_relation(RelationKind::Category, "Action")
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.slug), Some("action".to_string()));

        assert!(
            storage
                .find_relation(RelationKind::Platform, "Action")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .find_relation(RelationKind::Category, "action")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn upload_requires_existing_game() {
        let storage = MemoryStorage::new();
        let upload = ImageUpload {
            ref_id: EntryId::Number(99),
            field: ImageField::Cover,
            file_name: "ghost.jpg".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(storage.upload(upload).await.is_err());
        assert!(storage.uploads().is_empty());
    }

    #[tokio::test]
    async fn rejected_game_is_not_stored() {
        let storage = MemoryStorage::new();
        storage.reject_game("Broken");
        let game = NewGame {
            name: "Broken".into(),
            slug: "broken".into(),
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
        assert!(storage.create_game(&game).await.is_err());
        assert_eq!(storage.game_creates(), 0);
    }
}
