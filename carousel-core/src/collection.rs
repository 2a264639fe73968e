use crate::models::{BeatmapSet, SetId};
use crate::sync::CollectionChange;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;

/// In-memory observable collection of beatmap sets.
///
/// Subscribers receive every change over a channel. A new subscriber is sent
/// the current contents as one `Add` straight away.
#[derive(Debug, Default)]
pub struct BeatmapStore {
    sets: Vec<Arc<BeatmapSet>>,
    subscribers: Vec<Sender<CollectionChange>>,
}

impl BeatmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sets(sets: Vec<Arc<BeatmapSet>>) -> Self {
        Self {
            sets,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<CollectionChange> {
        let (tx, rx) = unbounded();
        if !self.sets.is_empty() {
            // A fresh receiver is connected, so this send cannot fail
            let _ = tx.send(CollectionChange::Add(self.sets.clone()));
        }
        self.subscribers.push(tx);
        rx
    }

    /// Snapshot of the current sets
    pub fn sets(&self) -> &[Arc<BeatmapSet>] {
        &self.sets
    }

    pub fn get(&self, id: SetId) -> Option<&Arc<BeatmapSet>> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// Add sets; a set whose id is already present replaces the old one
    pub fn add_sets(&mut self, sets: Vec<Arc<BeatmapSet>>) {
        if sets.is_empty() {
            return;
        }
        self.sets
            .retain(|existing| !sets.iter().any(|s| s.id == existing.id));
        self.sets.extend(sets.iter().cloned());
        self.broadcast(CollectionChange::Add(sets));
    }

    /// Remove sets by id, returning the ones that were present
    pub fn remove_sets(&mut self, ids: &[SetId]) -> Vec<Arc<BeatmapSet>> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.sets.drain(..).partition(|s| ids.contains(&s.id));
        self.sets = kept;

        if !removed.is_empty() {
            self.broadcast(CollectionChange::Remove(removed.clone()));
        }
        removed
    }

    pub fn reset(&mut self) {
        self.sets.clear();
        self.broadcast(CollectionChange::Reset);
    }

    fn broadcast(&mut self, change: CollectionChange) {
        // Drop subscribers whose receiving end has gone away
        self.subscribers
            .retain(|tx| tx.send(change.clone()).is_ok());
        tracing::debug!(
            action = change.action(),
            subscribers = self.subscribers.len(),
            "collection changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::set;

    #[test]
    fn test_subscriber_gets_current_contents_first() {
        let mut store = BeatmapStore::with_sets(vec![set(1, "A", "A", &[1.0])]);
        let rx = store.subscribe();

        match rx.try_recv() {
            Ok(CollectionChange::Add(sets)) => assert_eq!(sets.len(), 1),
            other => panic!("expected initial add, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_changes_are_broadcast() {
        let mut store = BeatmapStore::new();
        let rx = store.subscribe();

        store.add_sets(vec![set(1, "A", "A", &[1.0]), set(2, "B", "B", &[1.0])]);
        let removed = store.remove_sets(&[SetId(1), SetId(42)]);
        store.reset();

        assert_eq!(removed.len(), 1);
        let actions: Vec<_> = rx.try_iter().map(|c| c.action()).collect();
        assert_eq!(actions, vec!["add", "remove", "reset"]);
        assert!(store.sets().is_empty());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut store = BeatmapStore::new();
        drop(store.subscribe());
        store.add_sets(vec![set(1, "A", "A", &[1.0])]);
        assert!(store.subscribers.is_empty());
        assert!(store.get(SetId(1)).is_some());
    }

    #[test]
    fn test_re_adding_a_set_replaces_it() {
        let mut store = BeatmapStore::with_sets(vec![set(1, "Old", "A", &[1.0])]);
        store.add_sets(vec![set(1, "New", "A", &[1.0, 2.0])]);

        assert_eq!(store.sets().len(), 1);
        assert_eq!(store.sets()[0].metadata.title, "New");
    }
}
