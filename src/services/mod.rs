//! Services layer - external integrations and utilities.
//!
//! This module contains code that interfaces with the outside world:
//! - Blob storage for palette persistence
//! - HTTP retrieval of background images
//! - Image decoding
//! - Emoji classification for insertion callers

pub mod blob_store;
pub mod emoji;
pub mod image_decode;
pub mod image_fetch;
