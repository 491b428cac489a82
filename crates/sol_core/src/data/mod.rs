//! Level fixture data.
//!
//! Pure data structures deserialized from RON. The built-in catalog is
//! embedded in the binary; loading other files from disk is left to the
//! tools and headless crates.
//!
//! **Note:** This module contains no IO - it only defines data types.

mod level_data;

pub use level_data::{LevelData, LevelRegistry, PlanetTemplate};
