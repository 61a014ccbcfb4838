//! Relation precomputation.
//!
//! Collects every distinct developer, publisher, category and platform name
//! of a batch and resolves them all before any game is assembled.

use std::collections::HashSet;

use futures::future::join_all;

use crate::models::{ProductListing, RelationKind, RelationSummary};
use crate::services::RelationResolver;

/// Distinct relation names of a batch, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationNames {
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub categories: Vec<String>,
    pub platforms: Vec<String>,
}

impl RelationNames {
    pub fn names(&self, kind: RelationKind) -> &[String] {
        match kind {
            RelationKind::Developer => &self.developers,
            RelationKind::Publisher => &self.publishers,
            RelationKind::Category => &self.categories,
            RelationKind::Platform => &self.platforms,
        }
    }

    fn names_mut(&mut self, kind: RelationKind) -> &mut Vec<String> {
        match kind {
            RelationKind::Developer => &mut self.developers,
            RelationKind::Publisher => &mut self.publishers,
            RelationKind::Category => &mut self.categories,
            RelationKind::Platform => &mut self.platforms,
        }
    }

    /// Every `(kind, name)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, &str)> + '_ {
        RelationKind::ALL
            .into_iter()
            .flat_map(move |kind| self.names(kind).iter().map(move |n| (kind, n.as_str())))
    }

    pub fn len(&self) -> usize {
        RelationKind::ALL.iter().map(|k| self.names(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scan the batch once and collect the distinct names per relation kind.
///
/// Missing genre or OS lists contribute nothing; blank names are ignored.
pub fn collect_relation_names(products: &[ProductListing]) -> RelationNames {
    let mut names = RelationNames::default();
    let mut seen: HashSet<(RelationKind, String)> = HashSet::new();

    let mut add = |kind: RelationKind, name: &str| {
        if name.trim().is_empty() {
            return;
        }
        if seen.insert((kind, name.to_string())) {
            names.names_mut(kind).push(name.to_string());
        }
    };

    for product in products {
        for genre in &product.genres {
            add(RelationKind::Category, genre);
        }
        for os in &product.supported_operating_systems {
            add(RelationKind::Platform, os);
        }
        if let Some(developer) = product.developer_name() {
            add(RelationKind::Developer, developer);
        }
        if let Some(publisher) = product.publisher_name() {
            add(RelationKind::Publisher, publisher);
        }
    }

    names
}

/// Resolve every collected name concurrently and wait for all of them.
///
/// Failures are logged and recorded; they never stop the other resolutions.
pub async fn precompute_relations(
    resolver: &RelationResolver,
    names: &RelationNames,
) -> RelationSummary {
    let results = join_all(names.iter().map(|(kind, name)| async move {
        (kind, name, resolver.try_resolve(kind, name).await)
    }))
    .await;

    let mut summary = RelationSummary::default();
    for (kind, name, result) in results {
        match result {
            Ok(resolution) if resolution.created => summary.created += 1,
            Ok(_) => summary.existing += 1,
            Err(e) => {
                log::warn!("[resolve] {} '{}': {}", kind, name, e);
                summary.record_failure(kind, name, e);
            }
        }
    }

    summary
}
