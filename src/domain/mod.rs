//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Board, Sticker and StickerId
//! - Background variants for the canvas backdrop
//! - Palette records for the palette store

pub mod board;
pub mod palette;

pub use board::{Background, Board, Sticker, StickerId};
pub use palette::Palette;
