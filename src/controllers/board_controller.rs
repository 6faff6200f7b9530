use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use url::Url;

use crate::domain::board::{Background, Board, Sticker, StickerId};
use crate::error::Result;
use crate::services::image_decode::{self, BackgroundImage};
use crate::services::image_fetch::ImageFetcher;

/// Where background retrieval currently stands. Failures do not get their
/// own state; they resolve back to Idle with no image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
}

/// A finished fetch handed back from a worker thread. `bytes` is None when
/// the retrieval failed.
struct FetchMessage {
    url: Url,
    bytes: Option<Vec<u8>>,
}

/// Selection and document facade for one open board.
///
/// Owns the board, the selection set, and the background fetch machine. All
/// methods must be called from the single owning thread; background
/// retrieval runs on worker threads that hand their results back over a
/// channel, drained by [`BoardController::process_fetch_results`].
///
/// Every mutation that references sticker ids is best-effort; ids that no
/// longer resolve are skipped silently.
pub struct BoardController {
    board: Board,
    selection: HashSet<StickerId>,
    fetch_status: FetchStatus,
    background_image: Option<BackgroundImage>,
    fetcher: Arc<dyn ImageFetcher>,
    fetch_tx: Sender<FetchMessage>,
    fetch_rx: Receiver<FetchMessage>,
}

impl BoardController {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        Self {
            board: Board::new(),
            selection: HashSet::new(),
            fetch_status: FetchStatus::Idle,
            background_image: None,
            fetcher,
            fetch_tx,
            fetch_rx,
        }
    }

    // --- Background fetch machine ---

    /// Replace the background. Starts or clears the background image only
    /// when the value actually changed.
    pub fn set_background(&mut self, background: Background) {
        let changed = *self.board.background() != background;
        self.board.set_background(background);
        if changed {
            self.refresh_background_image();
        }
    }

    fn refresh_background_image(&mut self) {
        self.background_image = None;
        match self.board.background() {
            Background::Url(url) => {
                self.fetch_status = FetchStatus::Fetching;
                let url = url.clone();
                let fetcher = Arc::clone(&self.fetcher);
                let tx = self.fetch_tx.clone();
                thread::spawn(move || {
                    let bytes = fetcher.fetch(&url).ok();
                    let _ = tx.send(FetchMessage { url, bytes });
                });
            }
            Background::ImageData(bytes) => {
                self.background_image = image_decode::decode_image(bytes);
                self.fetch_status = FetchStatus::Idle;
            }
            Background::Blank => {
                self.fetch_status = FetchStatus::Idle;
            }
        }
    }

    /// Drain finished fetches from the worker channel. Call periodically
    /// from the owning thread.
    pub fn process_fetch_results(&mut self) {
        while let Ok(message) = self.fetch_rx.try_recv() {
            self.apply_fetch_message(message);
        }
    }

    fn apply_fetch_message(&mut self, message: FetchMessage) {
        // A reply only counts while the background it was fetched for is
        // still current; anything else is stale and ignored outright.
        let still_current = matches!(
            self.board.background(),
            Background::Url(current) if *current == message.url
        );
        if !still_current {
            return;
        }

        self.fetch_status = FetchStatus::Idle;
        if let Some(bytes) = message.bytes {
            self.background_image = image_decode::decode_image(&bytes);
        }
    }

    // --- Selection ---

    pub fn toggle_selection(&mut self, id: StickerId) {
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: StickerId) -> bool {
        self.selection.contains(&id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn selected_ids(&self) -> &HashSet<StickerId> {
        &self.selection
    }

    pub fn move_selected(&mut self, dx: f64, dy: f64) {
        for id in &self.selection {
            self.board.move_sticker(*id, dx, dy);
        }
    }

    pub fn scale_selected(&mut self, factor: f64) {
        for id in &self.selection {
            self.board.scale_sticker(*id, factor);
        }
    }

    /// Remove every selected sticker, then clear the selection, including
    /// ids that no longer resolved to a sticker.
    pub fn remove_selected(&mut self) {
        for id in &self.selection {
            self.board.remove_sticker(*id);
        }
        self.selection.clear();
    }

    // --- Document pass-throughs ---

    pub fn add_sticker(&mut self, text: &str, x: i32, y: i32, size: i32) -> StickerId {
        self.board.add_sticker(text, x, y, size)
    }

    pub fn move_sticker(&mut self, id: StickerId, dx: f64, dy: f64) {
        self.board.move_sticker(id, dx, dy);
    }

    pub fn scale_sticker(&mut self, id: StickerId, factor: f64) {
        self.board.scale_sticker(id, factor);
    }

    // --- Document persistence ---

    pub fn save_document(&self) -> Result<String> {
        self.board.to_json()
    }

    /// Replace the whole document. Clears the selection and refreshes the
    /// background image when the background changed. The current state is
    /// untouched when the document does not parse.
    pub fn load_document(&mut self, json: &str) -> Result<()> {
        let board = Board::from_json(json)?;
        let background_changed = *board.background() != *self.board.background();
        self.board = board;
        self.selection.clear();
        if background_changed {
            self.refresh_background_image();
        }
        Ok(())
    }

    // --- Read accessors for the view layer ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stickers(&self) -> &[Sticker] {
        self.board.stickers()
    }

    pub fn background(&self) -> &Background {
        self.board.background()
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.fetch_status
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.background_image.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    use crate::error::AppError;

    struct MapFetcher {
        responses: HashMap<String, Vec<u8>>,
    }

    impl MapFetcher {
        fn new(responses: &[(&Url, Vec<u8>)]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses
                    .iter()
                    .map(|(url, bytes)| (url.as_str().to_string(), bytes.clone()))
                    .collect(),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                responses: HashMap::new(),
            })
        }
    }

    impl ImageFetcher for MapFetcher {
        fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
            match self.responses.get(url.as_str()) {
                Some(bytes) => Ok(bytes.clone()),
                None => Err(AppError::Fetch(format!("no response for {}", url))),
            }
        }
    }

    fn test_url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn recv_message(controller: &BoardController) -> FetchMessage {
        controller
            .fetch_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("fetch worker did not reply in time")
    }

    fn image_size(controller: &BoardController) -> Option<(u32, u32)> {
        controller
            .background_image()
            .map(|image| (image.width, image.height))
    }

    #[test]
    fn test_new_controller_is_idle_and_blank() {
        let controller = BoardController::new(MapFetcher::empty());
        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(*controller.background(), Background::Blank);
        assert!(controller.background_image().is_none());
        assert!(!controller.has_selection());
        assert!(controller.stickers().is_empty());
    }

    #[test]
    fn test_url_fetch_success_publishes_image() {
        let url = test_url("https://example.com/a.png");
        let fetcher = MapFetcher::new(&[(&url, png_bytes(2, 2))]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url));
        assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
        assert!(controller.background_image().is_none());

        let message = recv_message(&controller);
        controller.apply_fetch_message(message);

        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(image_size(&controller), Some((2, 2)));
    }

    #[test]
    fn test_fetch_failure_resolves_to_idle_without_image() {
        let url = test_url("https://example.com/missing.png");
        let mut controller = BoardController::new(MapFetcher::empty());

        controller.set_background(Background::Url(url));
        let message = recv_message(&controller);
        controller.apply_fetch_message(message);

        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert!(controller.background_image().is_none());
    }

    #[test]
    fn test_undecodable_fetch_resolves_to_idle_without_image() {
        let url = test_url("https://example.com/not-an-image");
        let fetcher = MapFetcher::new(&[(&url, b"plain text".to_vec())]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url));
        let message = recv_message(&controller);
        controller.apply_fetch_message(message);

        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert!(controller.background_image().is_none());
    }

    #[test]
    fn test_stale_reply_is_discarded_entirely() {
        let url_a = test_url("https://example.com/a.png");
        let url_b = test_url("https://example.com/b.png");
        let fetcher = MapFetcher::new(&[(&url_a, png_bytes(2, 2)), (&url_b, png_bytes(3, 1))]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url_a.clone()));
        controller.set_background(Background::Url(url_b));

        let first = recv_message(&controller);
        let second = recv_message(&controller);
        let (reply_a, reply_b) = if first.url == url_a {
            (first, second)
        } else {
            (second, first)
        };

        // A's reply arrives first but its target has been superseded.
        controller.apply_fetch_message(reply_a);
        assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
        assert!(controller.background_image().is_none());

        controller.apply_fetch_message(reply_b);
        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(image_size(&controller), Some((3, 1)));
    }

    #[test]
    fn test_stale_reply_after_current_applied_changes_nothing() {
        let url_a = test_url("https://example.com/a.png");
        let url_b = test_url("https://example.com/b.png");
        let fetcher = MapFetcher::new(&[(&url_a, png_bytes(2, 2)), (&url_b, png_bytes(3, 1))]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url_a.clone()));
        controller.set_background(Background::Url(url_b));

        let first = recv_message(&controller);
        let second = recv_message(&controller);
        let (reply_a, reply_b) = if first.url == url_a {
            (first, second)
        } else {
            (second, first)
        };

        controller.apply_fetch_message(reply_b);
        assert_eq!(image_size(&controller), Some((3, 1)));

        controller.apply_fetch_message(reply_a);
        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(image_size(&controller), Some((3, 1)));
    }

    #[test]
    fn test_process_fetch_results_drains_channel() {
        let url = test_url("https://example.com/a.png");
        let fetcher = MapFetcher::new(&[(&url, png_bytes(2, 2))]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url));
        let mut waited = 0;
        while controller.fetch_status() == FetchStatus::Fetching {
            controller.process_fetch_results();
            thread::sleep(Duration::from_millis(10));
            waited += 1;
            assert!(waited < 500, "fetch never resolved");
        }
        assert_eq!(image_size(&controller), Some((2, 2)));
    }

    #[test]
    fn test_image_data_background_decodes_synchronously() {
        let mut controller = BoardController::new(MapFetcher::empty());
        controller.set_background(Background::ImageData(png_bytes(4, 5)));

        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(image_size(&controller), Some((4, 5)));
        assert!(controller.fetch_rx.try_recv().is_err());
    }

    #[test]
    fn test_undecodable_image_data_leaves_no_image() {
        let mut controller = BoardController::new(MapFetcher::empty());
        controller.set_background(Background::ImageData(b"junk".to_vec()));

        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert!(controller.background_image().is_none());
    }

    #[test]
    fn test_blank_background_clears_image() {
        let mut controller = BoardController::new(MapFetcher::empty());
        controller.set_background(Background::ImageData(png_bytes(4, 5)));
        assert!(controller.background_image().is_some());

        controller.set_background(Background::Blank);
        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert!(controller.background_image().is_none());
    }

    #[test]
    fn test_equal_background_does_not_restart_fetch() {
        let url = test_url("https://example.com/a.png");
        let fetcher = MapFetcher::new(&[(&url, png_bytes(2, 2))]);
        let mut controller = BoardController::new(fetcher);

        controller.set_background(Background::Url(url.clone()));
        let message = recv_message(&controller);
        controller.apply_fetch_message(message);
        assert_eq!(image_size(&controller), Some((2, 2)));

        controller.set_background(Background::Url(url));
        assert_eq!(controller.fetch_status(), FetchStatus::Idle);
        assert_eq!(image_size(&controller), Some((2, 2)));
        assert!(controller.fetch_rx.try_recv().is_err());
    }

    #[test]
    fn test_toggle_selection() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let id = controller.add_sticker("😀", 0, 0, 40);

        controller.toggle_selection(id);
        assert!(controller.is_selected(id));
        assert!(controller.has_selection());

        controller.toggle_selection(id);
        assert!(!controller.is_selected(id));
        assert!(!controller.has_selection());
    }

    #[test]
    fn test_deselect_all() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let a = controller.add_sticker("😀", 0, 0, 40);
        let b = controller.add_sticker("😎", 0, 0, 40);
        controller.toggle_selection(a);
        controller.toggle_selection(b);

        controller.deselect_all();
        assert!(!controller.has_selection());
        assert!(controller.selected_ids().is_empty());
    }

    #[test]
    fn test_move_selected_only_moves_selected() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let moved = controller.add_sticker("😀", 10, 10, 40);
        let still = controller.add_sticker("😎", 20, 20, 40);
        controller.toggle_selection(moved);

        controller.move_selected(10.9, -3.9);

        let moved_sticker = controller.board().sticker_by_id(moved).unwrap();
        assert_eq!((moved_sticker.x(), moved_sticker.y()), (20, 7));
        let still_sticker = controller.board().sticker_by_id(still).unwrap();
        assert_eq!((still_sticker.x(), still_sticker.y()), (20, 20));
    }

    #[test]
    fn test_scale_selected_scales_every_selected_sticker() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let a = controller.add_sticker("😀", 0, 0, 40);
        let b = controller.add_sticker("😎", 0, 0, 5);
        controller.toggle_selection(a);
        controller.toggle_selection(b);

        controller.scale_selected(0.5);

        assert_eq!(controller.board().sticker_by_id(a).unwrap().size(), 20);
        assert_eq!(controller.board().sticker_by_id(b).unwrap().size(), 3);
    }

    #[test]
    fn test_selection_tolerates_unknown_ids() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let real = controller.add_sticker("😀", 1, 2, 40);
        controller.toggle_selection(StickerId(99));

        controller.move_selected(5.0, 5.0);
        controller.scale_selected(2.0);

        let sticker = controller.board().sticker_by_id(real).unwrap();
        assert_eq!((sticker.x(), sticker.y(), sticker.size()), (1, 2, 40));

        controller.remove_selected();
        assert!(!controller.has_selection());
        assert_eq!(controller.stickers().len(), 1);
    }

    #[test]
    fn test_remove_selected_removes_and_clears() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let a = controller.add_sticker("😀", 0, 0, 40);
        let b = controller.add_sticker("😎", 0, 0, 40);
        let survivor = controller.add_sticker("🤓", 0, 0, 40);
        controller.toggle_selection(a);
        controller.toggle_selection(b);

        controller.remove_selected();

        assert_eq!(controller.stickers().len(), 1);
        assert_eq!(controller.stickers()[0].id(), survivor);
        assert!(!controller.has_selection());
    }

    #[test]
    fn test_facade_add_matches_document_ids() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let first = controller.add_sticker("🥎", -200, -100, 80);
        let second = controller.add_sticker("🏉", 50, 100, 40);

        assert_eq!(first, StickerId(1));
        assert_eq!(second, StickerId(2));
        assert_eq!(controller.stickers()[0].text(), "🥎");
        assert_eq!(controller.stickers()[1].text(), "🏉");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut controller = BoardController::new(MapFetcher::empty());
        controller.add_sticker("🥎", -200, -100, 80);
        controller.add_sticker("🏉", 50, 100, 40);
        let json = controller.save_document().unwrap();

        let mut other = BoardController::new(MapFetcher::empty());
        other.load_document(&json).unwrap();

        assert_eq!(other.board(), controller.board());
        assert_eq!(other.add_sticker("😀", 0, 0, 40), StickerId(3));
    }

    #[test]
    fn test_load_document_clears_selection() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let id = controller.add_sticker("😀", 0, 0, 40);
        controller.toggle_selection(id);

        let other = Board::new();
        controller.load_document(&other.to_json().unwrap()).unwrap();

        assert!(!controller.has_selection());
        assert!(controller.stickers().is_empty());
    }

    #[test]
    fn test_load_document_with_url_background_starts_fetch() {
        let url = test_url("https://example.com/a.png");
        let fetcher = MapFetcher::new(&[(&url, png_bytes(2, 2))]);
        let mut controller = BoardController::new(fetcher);

        let mut saved = Board::new();
        saved.set_background(Background::Url(url));
        saved.add_sticker("😀", 0, 0, 40);
        controller.load_document(&saved.to_json().unwrap()).unwrap();

        assert_eq!(controller.fetch_status(), FetchStatus::Fetching);
        let message = recv_message(&controller);
        controller.apply_fetch_message(message);
        assert_eq!(image_size(&controller), Some((2, 2)));
    }

    #[test]
    fn test_load_document_rejects_garbage_and_keeps_state() {
        let mut controller = BoardController::new(MapFetcher::empty());
        let id = controller.add_sticker("😀", 0, 0, 40);
        controller.toggle_selection(id);

        assert!(controller.load_document("not a document").is_err());
        assert_eq!(controller.stickers().len(), 1);
        assert!(controller.is_selected(id));
    }
}
