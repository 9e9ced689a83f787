//! Format implementations
//!
//! This module contains all format implementations that convert between a
//! [`crate::Document`] and its text representations.

pub mod storage;
pub mod text;

pub use storage::StorageFormat;
pub use text::TextFormat;
