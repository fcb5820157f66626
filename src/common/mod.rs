//! Common utilities shared across the mocktail codebase.

pub mod text;

pub use text::{capitalize_first, fold_identifier, is_identifier};
