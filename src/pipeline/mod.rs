//! Pipeline entry points.
//!
//! - `Populator::populate`: fetch the listing and populate the backend
//! - `Populator::run`: populate from an already fetched listing

pub mod populate;

pub use populate::Populator;
