use crate::error::{CarouselError, Result};
use crate::models::{Beatmap, BeatmapId, BeatmapSet, SetId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A change notification from the source collection of sets
#[derive(Debug, Clone)]
pub enum CollectionChange {
    Add(Vec<Arc<BeatmapSet>>),
    Remove(Vec<Arc<BeatmapSet>>),
    Move {
        set: Arc<BeatmapSet>,
        from: usize,
        to: usize,
    },
    Replace {
        old: Vec<Arc<BeatmapSet>>,
        new: Vec<Arc<BeatmapSet>>,
    },
    Reset,
}

impl CollectionChange {
    pub fn action(&self) -> &'static str {
        match self {
            CollectionChange::Add(_) => "add",
            CollectionChange::Remove(_) => "remove",
            CollectionChange::Move { .. } => "move",
            CollectionChange::Replace { .. } => "replace",
            CollectionChange::Reset => "reset",
        }
    }
}

/// One tracked beatmap and the order it arrived in
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub serial: u64,
    pub beatmap: Arc<Beatmap>,
}

/// Immutable view handed to a filter run. Cloning is two `Arc` bumps.
#[derive(Debug, Clone, Default)]
pub struct EntrySnapshot {
    pub entries: Arc<Vec<SourceEntry>>,
    pub sets: Arc<HashMap<SetId, Arc<BeatmapSet>>>,
}

/// Flat beatmap list kept in step with the source collection.
///
/// Edits are applied in place (copy-on-write if a filter run still holds the
/// previous snapshot) rather than rebuilding the list from scratch.
#[derive(Debug, Default)]
pub struct CollectionSync {
    entries: Arc<Vec<SourceEntry>>,
    sets: Arc<HashMap<SetId, Arc<BeatmapSet>>>,
    next_serial: u64,
}

impl CollectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one change. Returns whether the entry list changed.
    ///
    /// Move and Replace are rejected before anything is touched.
    pub fn apply(&mut self, change: &CollectionChange) -> Result<bool> {
        match change {
            CollectionChange::Add(new_sets) => {
                if new_sets.is_empty() {
                    return Ok(false);
                }

                // A set that is already tracked is re-added with its new contents
                let readded: HashSet<SetId> = new_sets
                    .iter()
                    .map(|s| s.id)
                    .filter(|id| self.sets.contains_key(id))
                    .collect();
                if !readded.is_empty() {
                    tracing::debug!(count = readded.len(), "re-adding known sets");
                    Arc::make_mut(&mut self.entries)
                        .retain(|e| !readded.contains(&e.beatmap.set_id));
                }

                let entries = Arc::make_mut(&mut self.entries);
                let sets = Arc::make_mut(&mut self.sets);
                for set in new_sets {
                    for beatmap in &set.beatmaps {
                        entries.push(SourceEntry {
                            serial: self.next_serial,
                            beatmap: beatmap.clone(),
                        });
                        self.next_serial += 1;
                    }
                    sets.insert(set.id, set.clone());
                }
                Ok(true)
            }

            CollectionChange::Remove(old_sets) => {
                let removed: HashSet<BeatmapId> = old_sets
                    .iter()
                    .flat_map(|s| s.beatmaps.iter().map(|b| b.id))
                    .collect();

                let before = self.entries.len();
                if !removed.is_empty() {
                    Arc::make_mut(&mut self.entries).retain(|e| !removed.contains(&e.beatmap.id));
                }

                let mut sets_changed = false;
                for set in old_sets {
                    if self.sets.contains_key(&set.id) {
                        Arc::make_mut(&mut self.sets).remove(&set.id);
                        sets_changed = true;
                    }
                }

                Ok(sets_changed || self.entries.len() != before)
            }

            CollectionChange::Move { .. } | CollectionChange::Replace { .. } => {
                tracing::warn!(action = change.action(), "source collection emitted unsupported change");
                Err(CarouselError::UnsupportedChange {
                    action: change.action(),
                })
            }

            CollectionChange::Reset => {
                let changed = !self.entries.is_empty() || !self.sets.is_empty();
                self.entries = Arc::new(Vec::new());
                self.sets = Arc::new(HashMap::new());
                Ok(changed)
            }
        }
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            entries: self.entries.clone(),
            sets: self.sets.clone(),
        }
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set(&self, id: SetId) -> Option<&Arc<BeatmapSet>> {
        self.sets.get(&id)
    }

    pub fn contains_beatmap(&self, id: BeatmapId) -> bool {
        self.entries.iter().any(|e| e.beatmap.id == id)
    }

    pub fn find_beatmap(&self, id: BeatmapId) -> Option<&Arc<Beatmap>> {
        self.entries
            .iter()
            .find(|e| e.beatmap.id == id)
            .map(|e| &e.beatmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::set;

    fn ids(sync: &CollectionSync) -> Vec<u64> {
        sync.entries().iter().map(|e| e.beatmap.id.0).collect()
    }

    #[test]
    fn test_add_then_remove_returns_to_empty() {
        let x = set(1, "X", "A", &[1.0, 2.0]);
        let mut sync = CollectionSync::new();

        assert!(sync.apply(&CollectionChange::Add(vec![x.clone()])).unwrap());
        assert_eq!(ids(&sync), vec![101, 102]);

        assert!(sync.apply(&CollectionChange::Remove(vec![x])).unwrap());
        assert!(sync.is_empty());
        assert!(sync.set(SetId(1)).is_none());
    }

    #[test]
    fn test_remove_only_touches_matching_beatmaps() {
        let a = set(1, "A", "A", &[1.0]);
        let b = set(2, "B", "B", &[1.0, 2.0]);
        let mut sync = CollectionSync::new();
        sync.apply(&CollectionChange::Add(vec![a.clone(), b])).unwrap();

        sync.apply(&CollectionChange::Remove(vec![a])).unwrap();
        assert_eq!(ids(&sync), vec![201, 202]);
    }

    #[test]
    fn test_serials_keep_increasing() {
        let mut sync = CollectionSync::new();
        sync.apply(&CollectionChange::Add(vec![set(1, "A", "A", &[1.0])]))
            .unwrap();
        sync.apply(&CollectionChange::Reset).unwrap();
        sync.apply(&CollectionChange::Add(vec![set(2, "B", "B", &[1.0])]))
            .unwrap();

        assert_eq!(sync.entries()[0].serial, 1);
    }

    #[test]
    fn test_readding_a_set_replaces_its_beatmaps() {
        let mut sync = CollectionSync::new();
        sync.apply(&CollectionChange::Add(vec![set(1, "A", "A", &[1.0, 2.0])]))
            .unwrap();
        sync.apply(&CollectionChange::Add(vec![set(1, "A v2", "A", &[3.0])]))
            .unwrap();

        assert_eq!(ids(&sync), vec![101]);
        assert_eq!(sync.set(SetId(1)).map(|s| s.metadata.title.as_str()), Some("A v2"));
    }

    #[test]
    fn test_move_and_replace_are_rejected_without_side_effects() {
        let a = set(1, "A", "A", &[1.0]);
        let mut sync = CollectionSync::new();
        sync.apply(&CollectionChange::Add(vec![a.clone()])).unwrap();

        let moved = sync.apply(&CollectionChange::Move {
            set: a.clone(),
            from: 0,
            to: 1,
        });
        assert!(matches!(
            moved,
            Err(CarouselError::UnsupportedChange { action: "move" })
        ));

        let replaced = sync.apply(&CollectionChange::Replace {
            old: vec![a.clone()],
            new: vec![],
        });
        assert!(matches!(
            replaced,
            Err(CarouselError::UnsupportedChange { action: "replace" })
        ));
        assert_eq!(ids(&sync), vec![101]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let a = set(1, "A", "A", &[1.0]);
        let mut sync = CollectionSync::new();
        sync.apply(&CollectionChange::Add(vec![a.clone()])).unwrap();

        let snapshot = sync.snapshot();
        sync.apply(&CollectionChange::Remove(vec![a])).unwrap();

        assert_eq!(snapshot.entries.len(), 1);
        assert!(snapshot.sets.contains_key(&SetId(1)));
        assert!(sync.is_empty());
    }
}
