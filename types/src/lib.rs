//! Shared types for the tracker event pipeline.
//!
//! Kept free of heavy dependencies so binaries and downstream consumers can
//! depend on it without pulling in the core crate.

pub mod config;
pub mod formatting;

pub use config::{DEFAULT_MAX_PENDING, ProcessorConfig};
