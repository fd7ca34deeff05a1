//! Remote song/album catalog
//!
//! This module provides:
//! - HTTP client for the catalog API (search, albums, single tracks)
//! - Data structures for tracks and their download candidates
//! - Quality tier preference and stream URL selection

pub mod api;
pub mod models;
pub mod quality;

pub use api::CatalogClient;
pub use quality::{QualityTier, select_url};
