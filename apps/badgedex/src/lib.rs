//! # badgedex Library
//!
//! This library exposes the badgedex modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod views;

// Re-export the engine and client for convenience
pub use badgedex_core;
pub use badgedex_github;
