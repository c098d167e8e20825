//! Text helpers (run segmentation, character classes, markup escaping).
//!
//! These helpers are pure (string in/string out) and live under `core` so the diff and render
//! layers can share them without depending on each other.

pub mod segment;
pub mod utils;
