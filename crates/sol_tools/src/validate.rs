//! Level data validation.
//!
//! Level files are RON lists of `LevelData`, the same format as the
//! catalog embedded in `sol_core`. A path may name a single file or a
//! directory, in which case every `.ron` file directly inside it is checked.

use std::path::{Path, PathBuf};

use sol_core::data::LevelRegistry;
use sol_core::error::GameError;
use sol_core::math::Fixed;
use sol_core::owner::Owner;
use thiserror::Error;

/// Errors produced while validating level data.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// File or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Level data failed to parse or validate.
    #[error(transparent)]
    Game(#[from] GameError),
    /// A directory held no level files.
    #[error("no .ron files found in {0}")]
    Empty(PathBuf),
}

/// Summary of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Files checked.
    pub files: usize,
    /// Levels checked.
    pub levels: usize,
    /// Planets checked.
    pub planets: usize,
    /// Non-fatal observations.
    pub warnings: Vec<String>,
}

/// Validate every level in a registry.
///
/// Hard errors (empty names, duplicate ids, missing player or AI planets,
/// negative values) fail the check. Neutral planets with a production rate
/// are legal but produce nothing until captured, so they are reported as
/// warnings.
///
/// # Errors
///
/// Returns the first hard error found.
pub fn validate_levels(registry: &LevelRegistry) -> Result<ValidationReport, ValidateError> {
    registry.validate()?;

    let mut report = ValidationReport {
        levels: registry.len(),
        ..ValidationReport::default()
    };
    for level in registry.levels() {
        report.planets += level.planets.len();
        for planet in &level.planets {
            if planet.owner == Owner::Neutral && planet.production_rate > Fixed::ZERO {
                report.warnings.push(format!(
                    "level {} ({}): neutral planet {} has production rate {} that only applies once captured",
                    level.id, level.name, planet.name, planet.production_rate
                ));
            }
        }
    }
    Ok(report)
}

/// Validate a single level file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn validate_file(path: &Path) -> Result<ValidationReport, ValidateError> {
    let text = std::fs::read_to_string(path).map_err(|source| ValidateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = LevelRegistry::from_ron_str(&text, &path.display().to_string())?;

    let mut report = validate_levels(&registry)?;
    report.files = 1;
    tracing::debug!(path = %path.display(), levels = report.levels, "Level file valid");
    Ok(report)
}

/// Validate a level file, or every `.ron` file in a directory.
///
/// # Errors
///
/// Returns the first failure, or [`ValidateError::Empty`] for a directory
/// without level files.
pub fn validate_path(path: &Path) -> Result<ValidationReport, ValidateError> {
    if !path.is_dir() {
        return validate_file(path);
    }

    let io_err = |source| ValidateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ValidateError::Empty(path.to_path_buf()));
    }

    let mut total = ValidationReport::default();
    for file in files {
        let report = validate_file(&file)?;
        total.files += report.files;
        total.levels += report.levels;
        total.planets += report.planets;
        total.warnings.extend(report.warnings);
    }
    Ok(total)
}
