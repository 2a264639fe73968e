use anyhow::{Context, Result};
use carousel_core::*;
use std::path::PathBuf;
use std::time::Duration;

/// Longest we wait for a filter pass before showing stale results
pub const FILTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state management - Domain state only
#[derive(Debug)]
pub struct AppState {
    /// The carousel, bound to `store`
    pub carousel: BeatmapCarousel,
    /// Source collection the carousel follows
    pub store: BeatmapStore,
    /// Library files loaded so far, in load order
    pub library_files: Vec<PathBuf>,
}

impl AppState {
    pub fn new(config: CarouselConfig) -> Self {
        let mut store = BeatmapStore::new();
        let mut carousel = BeatmapCarousel::new(config);
        carousel.bind(&mut store);

        Self {
            carousel,
            store,
            library_files: Vec::new(),
        }
    }

    /// Push freshly loaded sets into the store and remember where they came from
    pub fn add_library(&mut self, sets: Vec<std::sync::Arc<BeatmapSet>>, path: PathBuf) -> usize {
        let count = sets.len();
        self.store.add_sets(sets);
        self.library_files.push(path);
        count
    }

    /// Edit the requested criteria in place and schedule a pass
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) {
        let mut criteria = self.carousel.criteria().clone();
        edit(&mut criteria);
        self.carousel.set_criteria(criteria);
    }

    /// Block until the latest request has been applied.
    /// Returns false if the pass was still running at the timeout.
    pub fn settle(&mut self) -> Result<bool> {
        let done = self
            .carousel
            .wait_for_filter(FILTER_TIMEOUT)
            .context("Failed to reconcile collection changes")?;

        if !done {
            tracing::warn!(timeout = ?FILTER_TIMEOUT, "filter pass still running");
        }
        Ok(done)
    }
}
