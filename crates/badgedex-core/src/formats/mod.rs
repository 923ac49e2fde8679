//! # Formats Module
//!
//! Binary snapshot of the owned set (postcard + header).
//!
//! File and database I/O live in [`crate::storage`]; this module only
//! converts between [`crate::OwnedSet`] and bytes.

mod persistence;

pub use persistence::*;
