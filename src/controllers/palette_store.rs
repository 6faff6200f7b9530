use crate::domain::palette::Palette;
use crate::services::blob_store::BlobStore;

/// Palettes a fresh store is seeded with, in id order.
const BUILTIN_PALETTES: [(&str, &str); 9] = [
    ("vehicles", "🚗🚕🚙🚌🚎🏎️🚓🚑🚒🚐🛻🚚🚛🚜🛴🚲🛵🏍️🛺🚔🚍🚘🚖🚡🚡🚁"),
    ("sports", "⚽️🏀🏈⚾️🥎🏐🏉🏓🏒🥍🏏"),
    ("music", "🎤🎧🎼🎹🪇🥁🪘🎷🎺🎸🪕🎻"),
    ("Animals", "🐛🦋🐌🐞🐜🪰🦕🦖🦐🦞🐬🐠🦈🦭🐆🐪🐍"),
    ("Animal Faces", "🐶🐱🐭🐹🐰🦊🐻🐼🐻‍❄️🐨🐯🦁🐮🐷🐵🙈🙉"),
    ("Flora", "🌵🎄🌲🌳🌴🌱🌿🍀🪴🍁🍄🌺🌸🌼"),
    ("Weather", "☀️🌤️⛅️🌦️🌧️🌩️❄️☃️☔️"),
    ("COVID", "😷🤧🤒🦠💉"),
    ("Faces", "😃☺️😘🤨😎🤓☹️😡😭🥶😋🥹😍🤣🥸"),
];

/// A named, ordered, persisted collection of palettes.
///
/// On construction the store restores its palette list from the blob store;
/// an absent or unreadable blob falls back to the built-in set. The list is
/// never empty after construction, and every mutation re-serializes the
/// whole list back to the blob store.
pub struct PaletteStore {
    name: String,
    palettes: Vec<Palette>,
    store: Box<dyn BlobStore>,
}

impl PaletteStore {
    pub fn new(name: &str, store: Box<dyn BlobStore>) -> Self {
        let mut palette_store = Self {
            name: name.to_string(),
            palettes: Vec::new(),
            store,
        };
        palette_store.restore();
        if palette_store.palettes.is_empty() {
            palette_store.seed_builtins();
        }
        palette_store
    }

    fn storage_key(&self) -> String {
        format!("PaletteStore:{}", self.name)
    }

    fn restore(&mut self) {
        let bytes = match self.store.get(&self.storage_key()) {
            Some(b) => b,
            None => return,
        };
        match serde_json::from_slice(&bytes) {
            Ok(palettes) => self.palettes = palettes,
            Err(e) => {
                eprintln!("Failed to parse stored palettes: {}. Using built-ins.", e);
            }
        }
    }

    // Inserting each built-in at index 0 leaves the newest first in the
    // list while ids ascend in declaration order.
    fn seed_builtins(&mut self) {
        for (name, emojis) in BUILTIN_PALETTES {
            self.insert_palette(0, name, emojis);
        }
    }

    fn persist(&mut self) {
        let json = match serde_json::to_vec(&self.palettes) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Failed to serialize palettes: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key(), &json) {
            eprintln!("Failed to save palettes: {}", e);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn count(&self) -> usize {
        self.palettes.len()
    }

    /// Look up a palette with the index clamped into range. The list is
    /// never empty, so this always yields a palette.
    pub fn palette_at(&self, index: usize) -> &Palette {
        let safe_index = index.min(self.palettes.len() - 1);
        &self.palettes[safe_index]
    }

    /// Remove the palette at `index`, keeping at least one palette. Returns
    /// the removal position wrapped into the remaining list, a suggested
    /// next index for a selector to display.
    pub fn remove_palette(&mut self, index: usize) -> usize {
        if self.palettes.len() > 1 && index < self.palettes.len() {
            self.palettes.remove(index);
            self.persist();
        }
        index % self.palettes.len()
    }

    /// Insert a new palette at `index`, clamped into `[0, count]`. The new
    /// palette's id is one greater than the current maximum.
    pub fn insert_palette(&mut self, index: usize, name: &str, emojis: &str) {
        let id = self.palettes.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let palette = Palette {
            name: name.to_string(),
            emojis: emojis.to_string(),
            id,
        };
        let safe_index = index.min(self.palettes.len());
        self.palettes.insert(safe_index, palette);
        self.persist();
    }
}
