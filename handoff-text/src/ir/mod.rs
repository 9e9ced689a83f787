//! Intermediate Representation (IR) for formatted documents.
//!
//! A document is first classified line by line into [`nodes::Block`]s, then
//! flattened into an [`events::Event`] stream that serializers consume.

pub mod events;
pub mod nodes;
