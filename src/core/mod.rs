//! Core parsing primitives: edit-block extraction, content hashing, text helpers.

pub mod edit_block;
pub mod hash;
pub mod text;
