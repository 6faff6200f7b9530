//! Stateful coordinators between the domain model and its callers.
//!
//! [`BoardController`] wraps one open board with selection state and the
//! background fetch machine. [`PaletteStore`] keeps a named palette list
//! persisted through a [`crate::services::blob_store::BlobStore`].

pub mod board_controller;
pub mod palette_store;

pub use board_controller::{BoardController, FetchStatus};
pub use palette_store::PaletteStore;
