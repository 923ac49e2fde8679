//! # Storage Module
//!
//! Durable home for the visitor's owned set, using redb.
//!
//! Uses redb embedded database for:
//! - ACID transactions (a toggle is either saved or not)
//! - Crash safety (copy-on-write B-trees)
//! - A single file that survives restarts

mod redb_store;

pub use redb_store::{PREFERENCES, RedbOwnedStore};
