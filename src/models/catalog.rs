// src/models/catalog.rs

//! Records held by the content-storage backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rating written for every ingested listing; only free titles are ingested.
pub const FREE_RATING: &str = "FREE";

/// Upload `ref` naming the model that owns attachments.
pub const GAME_REF: &str = "game";

/// Backend record identifier (numeric or string, depending on the database).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Backend collections touched by the populator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Developers,
    Publishers,
    Categories,
    Platforms,
    Games,
}

impl Collection {
    /// REST path segment of the collection.
    pub fn path(self) -> &'static str {
        match self {
            Self::Developers => "developers",
            Self::Publishers => "publishers",
            Self::Categories => "categories",
            Self::Platforms => "platforms",
            Self::Games => "games",
        }
    }
}

/// Shared lookup tables referenced by games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    Developer,
    Publisher,
    Category,
    Platform,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Developer,
        RelationKind::Publisher,
        RelationKind::Category,
        RelationKind::Platform,
    ];

    pub fn collection(self) -> Collection {
        match self {
            Self::Developer => Collection::Developers,
            Self::Publisher => Collection::Publishers,
            Self::Category => Collection::Categories,
            Self::Platform => Collection::Platforms,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Publisher => "publisher",
            Self::Category => "category",
            Self::Platform => "platform",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored developer, publisher, category or platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEntity {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Attributes of a relation entity about to be created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRelation {
    pub name: String,
    pub slug: String,
}

/// A stored game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Descriptive fields scraped from the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub rating: String,
    pub short_description: String,
    pub description: String,
}

/// Attributes of a game about to be created.
///
/// Relation fields hold backend ids in listing order; unresolved names are
/// left out rather than sent as nulls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGame {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub categories: Vec<EntryId>,
    pub platforms: Vec<EntryId>,
    pub developers: Vec<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewGame {
    /// Overlay scraped fields onto the record.
    pub fn apply_enrichment(&mut self, enrichment: Enrichment) {
        self.rating = Some(enrichment.rating);
        self.short_description = Some(enrichment.short_description);
        self.description = Some(enrichment.description);
    }
}

/// Attachment slot on a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageField {
    Cover,
    Gallery,
}

impl ImageField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ImageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloaded image bound for a game's attachment slot.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub ref_id: EntryId,
    pub field: ImageField,
    pub file_name: String,
    pub bytes: Vec<u8>,
}
