#![deny(unsafe_code)]

//! Shared test utilities for the Redactle workspace.
//!
//! Config builders, sample documents, on-disk corpus fixtures, and a tracing
//! initialiser, so crate tests stay short.
//!
//! ```toml
//! [dev-dependencies]
//! redactle-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod corpus;
pub mod fixtures;
pub mod tracing_setup;
