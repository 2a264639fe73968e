use anyhow::Result;
use carousel_core::SetId;
use std::path::Path;

use crate::operations::FileOperations;
use crate::state::AppState;

pub fn handle_add(state: &mut AppState, path: &Path) -> Result<String> {
    let count = FileOperations::new(state).add_library(path)?;
    Ok(format!("Added {} sets from {}", count, path.display()))
}

pub fn handle_remove(state: &mut AppState, ids: &[SetId]) -> String {
    let removed = state.store.remove_sets(ids);
    if removed.is_empty() {
        "No matching sets".to_string()
    } else {
        format!("Removed {} sets", removed.len())
    }
}

pub fn handle_reset(state: &mut AppState) -> String {
    state.store.reset();
    state.library_files.clear();
    "Collection cleared".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::{BeatmapMetadata, BeatmapSet, CarouselConfig};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn empty_set(id: u64) -> Arc<BeatmapSet> {
        Arc::new(BeatmapSet::new(
            SetId(id),
            BeatmapMetadata::default(),
            Vec::new(),
        ))
    }

    #[test]
    fn test_remove_and_reset_flow_to_carousel() {
        let mut state = AppState::new(CarouselConfig::default().with_debounce_ms(0));
        state.add_library(vec![empty_set(1), empty_set(2)], PathBuf::from("x.json"));

        assert_eq!(handle_remove(&mut state, &[SetId(1)]), "Removed 1 sets");
        assert_eq!(handle_remove(&mut state, &[SetId(9)]), "No matching sets");
        assert_eq!(state.store.sets().len(), 1);

        assert_eq!(handle_reset(&mut state), "Collection cleared");
        state.settle().unwrap();
        assert!(state.store.sets().is_empty());
        assert_eq!(state.carousel.beatmap_count(), 0);
    }

    #[test]
    fn test_add_missing_file() {
        let mut state = AppState::new(CarouselConfig::default());
        assert!(handle_add(&mut state, Path::new("/definitely/not/here.json")).is_err());
    }
}
