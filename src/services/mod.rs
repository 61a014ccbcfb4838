//! Service layer for the populator.
//!
//! This module contains the building blocks of a population run:
//! - Listing fetch (`ListingClient`)
//! - Relation resolution (`RelationResolver`) and precomputation
//! - Description scraping (`StorefrontEnrichment`)
//! - Image transfer (`ImageUploader`)

pub mod enrichment;
pub mod images;
pub mod listing;
pub mod relations;
pub mod resolver;
pub mod slug;

pub use enrichment::{EnrichmentSource, StorefrontEnrichment};
pub use images::{GALLERY_LIMIT, HttpImageSource, ImageSource, ImageUploader};
pub use listing::ListingClient;
pub use relations::{RelationNames, collect_relation_names, precompute_relations};
pub use resolver::{RelationResolver, Resolution};
