//! Top-level application state wiring.

use std::sync::Arc;

use crate::controllers::board_controller::BoardController;
use crate::controllers::palette_store::PaletteStore;
use crate::services::blob_store::{BlobStore, FileStore};
use crate::services::image_fetch::{HttpImageFetcher, ImageFetcher};

/// Everything a running editor session owns: the open board and the
/// user's palette collection. Lives on the one thread that drives the
/// editor.
pub struct AppState {
    pub board: BoardController,
    pub palettes: PaletteStore,
}

impl AppState {
    /// Build a session with the default collaborators: HTTP retrieval for
    /// url backgrounds and palette persistence under the user's config
    /// directory.
    pub fn new(palette_store_name: &str) -> Self {
        Self::with_collaborators(
            palette_store_name,
            Arc::new(HttpImageFetcher::new()),
            Box::new(FileStore::new()),
        )
    }

    /// Build a session around explicit collaborators. Tests use this to
    /// swap in in-memory stand-ins.
    pub fn with_collaborators(
        palette_store_name: &str,
        fetcher: Arc<dyn ImageFetcher>,
        store: Box<dyn BlobStore>,
    ) -> Self {
        Self {
            board: BoardController::new(fetcher),
            palettes: PaletteStore::new(palette_store_name, store),
        }
    }
}
