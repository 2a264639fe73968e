use crate::criteria::FilterCriteria;
use crate::error::{CarouselError, Result};
use crate::models::{BeatmapMetadata, BeatmapSet, Difficulty, SetId};
use crate::schema_validation::validate_library_document;
use crate::validation::validate_library;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// On-disk library layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryFile {
    pub sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: SetId,
    pub metadata: BeatmapMetadata,
    pub beatmaps: Vec<Difficulty>,
}

impl LibraryFile {
    /// Bind every record into a shared set
    pub fn into_sets(self) -> Vec<Arc<BeatmapSet>> {
        self.sets
            .into_iter()
            .map(|record| Arc::new(BeatmapSet::new(record.id, record.metadata, record.beatmaps)))
            .collect()
    }
}

/// Parse a library from JSON text: schema check, deserialize, then semantic checks
pub fn parse_library(contents: &str) -> Result<Vec<Arc<BeatmapSet>>> {
    let document: serde_json::Value = serde_json::from_str(contents)?;
    validate_library_document(&document).map_err(CarouselError::Schema)?;

    let library: LibraryFile = serde_json::from_value(document)?;
    validate_library(&library).map_err(CarouselError::Validation)?;

    Ok(library.into_sets())
}

/// Load a beatmap library from a JSON file
pub fn load_library<P: AsRef<Path>>(path: P) -> Result<Vec<Arc<BeatmapSet>>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| CarouselError::io(path, e))?;
    let sets = parse_library(&contents)?;
    tracing::info!(path = %path.display(), sets = sets.len(), "library loaded");
    Ok(sets)
}

/// Load saved filter criteria
pub fn load_criteria<P: AsRef<Path>>(path: P) -> Result<FilterCriteria> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| CarouselError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save filter criteria with pretty printing
pub fn save_criteria<P: AsRef<Path>>(criteria: &FilterCriteria, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(criteria)?;
    fs::write(path, json).map_err(|e| CarouselError::io(path, e))
}
