use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerId(pub u64);

/// The document's single backdrop source. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    Blank,
    Url(Url),
    ImageData(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// A placed emoji: one grapheme at a position and size on the canvas.
/// Identity is the id alone; text and id never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    text: String,
    x: i32, // offset from the document center
    y: i32, // offset from the document center
    size: i32,
    id: StickerId,
}

impl Sticker {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn id(&self) -> StickerId {
        self.id
    }
}

/// The sticker-canvas document: a background plus an ordered sticker
/// sequence. Sequence order is z-order, back to front.
///
/// Mutations that reference a sticker id are silent no-ops when the id is
/// absent. Callers are expected to validate sticker text with
/// [`crate::services::emoji::is_emoji`] before insertion; the document does
/// not re-check it.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    background: Background,
    stickers: Vec<Sticker>,
    #[serde(skip)]
    next_sticker_id: u64,
}

impl Board {
    pub fn new() -> Self {
        Self {
            background: Background::Blank,
            stickers: Vec::new(),
            next_sticker_id: 1,
        }
    }

    fn next_id(&mut self) -> StickerId {
        let id = StickerId(self.next_sticker_id);
        self.next_sticker_id += 1;
        id
    }

    /// Append a sticker at the end of the sequence (frontmost in z-order).
    /// Ids are monotonically increasing and never reused, even after removal.
    pub fn add_sticker(&mut self, text: &str, x: i32, y: i32, size: i32) -> StickerId {
        let id = self.next_id();
        self.stickers.push(Sticker {
            text: text.to_string(),
            x,
            y,
            size,
            id,
        });
        id
    }

    /// Remove a sticker by id. Order of the remaining stickers is preserved.
    pub fn remove_sticker(&mut self, id: StickerId) {
        let idx = match self.stickers.iter().position(|s| s.id == id) {
            Some(i) => i,
            None => return,
        };
        self.stickers.remove(idx);
    }

    /// Move a sticker by a fractional offset. Offset components are
    /// truncated toward zero before being added to the position.
    pub fn move_sticker(&mut self, id: StickerId, dx: f64, dy: f64) {
        if let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) {
            sticker.x += dx as i32;
            sticker.y += dy as i32;
        }
    }

    /// Scale a sticker's size by a factor, rounding to the nearest integer
    /// with ties away from zero. No minimum size is enforced.
    pub fn scale_sticker(&mut self, id: StickerId, factor: f64) {
        if let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) {
            sticker.size = (sticker.size as f64 * factor).round() as i32;
        }
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn sticker_by_id(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn count(&self) -> usize {
        self.stickers.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Board> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// The id counter is derived state, not part of document identity.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.background == other.background && self.stickers == other.stickers
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoardData {
            background: Background,
            stickers: Vec<Sticker>,
        }

        let data = BoardData::deserialize(deserializer)?;
        // Rebuild the id counter from the highest stored id so newly added
        // stickers can never collide with a loaded one.
        let next_sticker_id = data
            .stickers
            .iter()
            .map(|s| s.id.0)
            .max()
            .map_or(1, |max| max + 1);
        Ok(Board {
            background: data.background,
            stickers: data.stickers,
            next_sticker_id,
        })
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(D::Error::custom)
    }
}
