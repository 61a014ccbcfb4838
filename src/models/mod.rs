// src/models/mod.rs

//! Domain models for the populator.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod catalog;
mod config;
mod product;
mod report;

// Re-export all public types
pub use catalog::{
    Collection, EntryId, Enrichment, FREE_RATING, GAME_REF, GameRecord, ImageField, ImageUpload,
    NewGame, NewRelation, RelationEntity, RelationKind,
};
pub use config::{
    Config, HttpConfig, LoggingConfig, PopulateConfig, SlugSanitization, SourceConfig,
    StorageConfig,
};
pub use product::{ListingResponse, Price, ProductListing};
pub use report::{
    FailedProduct, PopulateReport, ProductOutcome, RelationFailure, RelationSummary,
};
