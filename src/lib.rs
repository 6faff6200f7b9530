//! Document engine for an emoji sticker canvas editor.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Board, Sticker, Background, Palette)
//! - `controllers/` - Orchestration (BoardController, PaletteStore)
//! - `services/` - External operations (image fetch, image decode, blob store, emoji)
//! - `state.rs` - Session coordinator wiring a board to a palette collection
//! - `error.rs` - Shared error type

pub mod controllers;
pub mod domain;
pub mod error;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::board_controller::{BoardController, FetchStatus};
pub use controllers::palette_store::PaletteStore;
pub use domain::{Background, Board, Palette, Sticker, StickerId};
pub use error::{AppError, Result};
pub use services::blob_store::{BlobStore, FileStore, MemoryStore};
pub use services::emoji::is_emoji;
pub use services::image_decode::BackgroundImage;
pub use services::image_fetch::{HttpImageFetcher, ImageFetcher, direct_image_url};
pub use state::AppState;
