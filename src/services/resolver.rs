//! Lookup/create resolver for relation entities.
//!
//! Every entity is looked up by exact name before it is created. There is no
//! storage-level uniqueness constraint, so two resolvers racing on the same
//! name can still create duplicates.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::models::{NewRelation, RelationEntity, RelationKind, SlugSanitization};
use crate::services::slug::relation_slug;
use crate::storage::CatalogStorage;

/// A resolved entity and whether this call created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entity: RelationEntity,
    pub created: bool,
}

type CacheKey = (RelationKind, String);

/// Resolves relation names to stored entities, creating missing ones.
///
/// Successful resolutions are cached for the lifetime of the resolver so
/// that record assembly can reuse them without another round trip.
pub struct RelationResolver {
    storage: Arc<dyn CatalogStorage>,
    sanitization: SlugSanitization,
    cache: RwLock<HashMap<CacheKey, RelationEntity>>,
}

impl RelationResolver {
    pub fn new(storage: Arc<dyn CatalogStorage>, sanitization: SlugSanitization) -> Self {
        Self {
            storage,
            sanitization,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Return the existing entity named `name`, or create it.
    pub async fn try_resolve(&self, kind: RelationKind, name: &str) -> Result<Resolution> {
        if let Some(entity) = self.storage.find_relation(kind, name).await? {
            self.remember(kind, name, &entity);
            return Ok(Resolution {
                entity,
                created: false,
            });
        }

        let relation = NewRelation {
            name: name.to_string(),
            slug: relation_slug(name, self.sanitization),
        };
        let entity = self.storage.create_relation(kind, &relation).await?;
        log::debug!("Created {} '{}' with slug '{}'", kind, name, entity.slug);
        self.remember(kind, name, &entity);

        Ok(Resolution {
            entity,
            created: true,
        })
    }

    /// Soft variant of [`try_resolve`](Self::try_resolve): errors are logged
    /// and resolve to `None`.
    pub async fn resolve(&self, kind: RelationKind, name: &str) -> Option<RelationEntity> {
        match self.try_resolve(kind, name).await {
            Ok(resolution) => Some(resolution.entity),
            Err(e) => {
                log::warn!("[resolve] {} '{}': {}", kind, name, e);
                None
            }
        }
    }

    /// Find an entity without creating it, preferring the cache.
    pub async fn lookup(&self, kind: RelationKind, name: &str) -> Option<RelationEntity> {
        if let Some(entity) = self.cached(kind, name) {
            return Some(entity);
        }

        match self.storage.find_relation(kind, name).await {
            Ok(Some(entity)) => {
                self.remember(kind, name, &entity);
                Some(entity)
            }
            Ok(None) => {
                log::warn!("[lookup] {} '{}' not found; reference left unset", kind, name);
                None
            }
            Err(e) => {
                log::warn!("[lookup] {} '{}': {}", kind, name, e);
                None
            }
        }
    }

    /// Number of cached entities.
    pub fn cached_count(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, kind: RelationKind, name: &str) -> Option<RelationEntity> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(kind, name.to_string()))
            .cloned()
    }

    fn remember(&self, kind: RelationKind, name: &str, entity: &RelationEntity) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((kind, name.to_string()), entity.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn resolver() -> (Arc<MemoryStorage>, RelationResolver) {
        let storage = Arc::new(MemoryStorage::new());
        let resolver = RelationResolver::new(storage.clone(), SlugSanitization::FirstOnly);
        (storage, resolver)
    }

    #[tokio::test]
    async fn creates_missing_entity_with_slug() {
        let (storage, resolver) = resolver();

        let resolution = resolver
            .try_resolve(RelationKind::Developer, "CD PROJEKT RED")
            .await
            .unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.entity.slug, "cdprojektred");
        assert_eq!(storage.relations(RelationKind::Developer).len(), 1);
    }

    #[tokio::test]
    async fn returns_existing_entity_unchanged() {
        let (storage, resolver) = resolver();
        let seeded = storage.seed_relation(RelationKind::Publisher, "Pub1", "legacy-slug");

        let resolution = resolver
            .try_resolve(RelationKind::Publisher, "Pub1")
            .await
            .unwrap();

        assert!(!resolution.created);
        assert_eq!(resolution.entity, seeded);
        assert_eq!(storage.relation_creates(), 0);
    }

    #[tokio::test]
    async fn repeated_resolution_creates_once() {
        let (storage, resolver) = resolver();

        let first = resolver.resolve(RelationKind::Category, "Action").await;
        let second = resolver.resolve(RelationKind::Category, "Action").await;

        assert_eq!(first, second);
        assert_eq!(storage.relation_creates(), 1);
    }

    #[tokio::test]
    async fn same_name_different_kind_is_distinct() {
        let (storage, resolver) = resolver();

        resolver.resolve(RelationKind::Developer, "Larian").await;
        resolver.resolve(RelationKind::Publisher, "Larian").await;

        assert_eq!(storage.relation_creates(), 2);
    }

    #[tokio::test]
    async fn lookup_uses_cache_and_never_creates() {
        let (storage, resolver) = resolver();

        assert!(resolver.lookup(RelationKind::Platform, "Linux").await.is_none());
        assert_eq!(storage.relation_creates(), 0);

        resolver.resolve(RelationKind::Platform, "Linux").await;
        assert_eq!(resolver.cached_count(), 1);
        let hit = resolver.lookup(RelationKind::Platform, "Linux").await;
        assert_eq!(hit.map(|e| e.slug), Some("linux".to_string()));
    }

    #[tokio::test]
    async fn storage_error_resolves_to_none() {
        let (storage, resolver) = resolver();
        storage.break_relation("Flaky");

        assert!(resolver.try_resolve(RelationKind::Category, "Flaky").await.is_err());
        assert!(resolver.resolve(RelationKind::Category, "Flaky").await.is_none());
        assert!(resolver.lookup(RelationKind::Category, "Flaky").await.is_none());
        assert_eq!(resolver.cached_count(), 0);
        assert_eq!(storage.relation_creates(), 0);
    }
}
