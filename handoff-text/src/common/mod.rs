//! Contains logic for mapping between different document representations.

pub mod lines_to_events;
