//! Level catalog loading for headless runs.
//!
//! The built-in campaign is embedded in `sol_core`; a RON file with the
//! same shape can replace it for balance experiments.

use std::path::Path;

use sol_core::data::LevelRegistry;

use crate::error::Result;

/// Load the catalog from `path`, or the built-in campaign when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_levels(path: Option<&Path>) -> Result<LevelRegistry> {
    let Some(path) = path else {
        return Ok(LevelRegistry::builtin()?);
    };

    let content = std::fs::read_to_string(path)?;
    let registry = LevelRegistry::from_ron_str(&content, &path.display().to_string())?;
    registry.validate()?;
    tracing::info!(
        "Loaded {} levels from {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}
