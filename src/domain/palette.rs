use serde::{Deserialize, Serialize};

/// A named group of candidate emoji characters offered for placement.
/// The emoji string is not validated character by character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub emojis: String,
    pub id: u64,
}
