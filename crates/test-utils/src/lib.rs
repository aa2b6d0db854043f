//! Shared test utilities for the fishspot workspace.
//!
//! Synthetic grid generators and an in-memory dataset implementing
//! `grid_pipeline::GriddedDataset`, so pipeline and renderer tests never
//! touch the network.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;
pub mod memory_dataset;

pub use generators::*;
pub use memory_dataset::MemoryDataset;
