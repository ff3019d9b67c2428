//! Host-facing services module
//!
//! This module contains the media host that turns local files into playable
//! handles and the decoration seeder for the page background.

pub mod decorations;
pub mod media;

// Re-export main types
pub use decorations::{seed_decorations, Blob, BlobProfile};
pub use media::{LocalMediaHost, MediaError, MediaHandle, MediaHost};
