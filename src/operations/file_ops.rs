use anyhow::{Context, Result};
use carousel_core::{load_criteria, load_library, save_criteria, FilterCriteria};
use std::path::Path;

use crate::state::AppState;

/// File operations orchestration
/// Handles library and criteria I/O against the application state
pub struct FileOperations<'a> {
    state: &'a mut AppState,
}

impl<'a> FileOperations<'a> {
    pub fn new(state: &'a mut AppState) -> Self {
        Self { state }
    }

    /// Load a library file and feed its sets to the store
    pub fn add_library(&mut self, path: &Path) -> Result<usize> {
        let sets = load_library(path)
            .with_context(|| format!("Failed to load library '{}'", path.display()))?;
        Ok(self.state.add_library(sets, path.to_path_buf()))
    }

    /// Save the requested criteria
    pub fn save_criteria(&self, path: &Path) -> Result<()> {
        save_criteria(self.state.carousel.criteria(), path)
            .with_context(|| format!("Failed to save criteria to '{}'", path.display()))
    }

    /// Read a criteria file without applying it
    pub fn read_criteria(path: &Path) -> Result<FilterCriteria> {
        load_criteria(path)
            .with_context(|| format!("Failed to load criteria '{}'", path.display()))
    }
}
