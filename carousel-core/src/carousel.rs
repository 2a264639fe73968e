use crate::cancellation::Cancelled;
use crate::collection::BeatmapStore;
use crate::config::CarouselConfig;
use crate::criteria::FilterCriteria;
use crate::display::PanelFactory;
use crate::error::Result;
use crate::grouping::GroupedItems;
use crate::models::{Beatmap, CarouselItem, GroupDefinition, Model, ModelRef, SetId};
use crate::pipeline::run_filter;
use crate::scheduler::FilterScheduler;
use crate::selection::{SelectionOutcome, SelectionState};
use crate::sync::{CollectionChange, CollectionSync};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a filter run travelling back to the owner thread
#[derive(Debug)]
pub struct FilterOutcome {
    pub generation: u64,
    pub criteria: FilterCriteria,
    pub result: std::result::Result<GroupedItems, Cancelled>,
}

/// What happened to a delivered filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request exists; the result was dropped untouched
    Stale,
    Cancelled,
}

/// Beatmap carousel state: the synced beatmap list, the last applied filter
/// pass and the selection on top of it.
///
/// All mutation happens on the thread that owns this value. Filter passes
/// run on worker threads against a snapshot and are only swapped in by
/// [`BeatmapCarousel::update`] if they are still the latest request.
#[derive(Debug)]
pub struct BeatmapCarousel {
    sync: CollectionSync,
    source: Option<Receiver<CollectionChange>>,
    criteria: FilterCriteria,
    applied_criteria: FilterCriteria,
    applied_generation: u64,
    scheduler: FilterScheduler,
    results_tx: Sender<FilterOutcome>,
    results_rx: Receiver<FilterOutcome>,
    display: GroupedItems,
    selection: SelectionState,
}

impl Default for BeatmapCarousel {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}

impl BeatmapCarousel {
    pub fn new(config: CarouselConfig) -> Self {
        let (results_tx, results_rx) = unbounded();

        Self {
            sync: CollectionSync::new(),
            source: None,
            criteria: FilterCriteria::default(),
            applied_criteria: FilterCriteria::default(),
            applied_generation: 0,
            scheduler: FilterScheduler::new(config.debounce()),
            results_tx,
            results_rx,
            display: GroupedItems::default(),
            selection: SelectionState::new(),
        }
    }

    /// Follow a store; its current sets arrive with the next `update`
    pub fn bind(&mut self, store: &mut BeatmapStore) {
        self.attach(store.subscribe());
    }

    /// Follow any producer of collection changes
    pub fn attach(&mut self, changes: Receiver<CollectionChange>) {
        self.source = Some(changes);
    }

    /// Replace the criteria. Non-blocking; the new pass runs after the debounce.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        tracing::debug!(?criteria, "criteria changed");
        self.criteria = criteria;
        self.scheduler.request(Instant::now());
    }

    /// Reconcile one collection change directly
    pub fn handle_change(&mut self, change: &CollectionChange) -> Result<()> {
        if self.sync.apply(change)? {
            self.scheduler.request(Instant::now());
        }
        Ok(())
    }

    pub fn update(&mut self) -> Result<bool> {
        self.update_at(Instant::now())
    }

    /// Owner-thread pump: reconcile source changes, dispatch a due run and
    /// apply finished ones. Returns whether a new pass was applied.
    pub fn update_at(&mut self, now: Instant) -> Result<bool> {
        // One at a time: a rejected change leaves everything behind it queued
        while let Some(change) = self.source.as_ref().and_then(|rx| rx.try_recv().ok()) {
            if self.sync.apply(&change)? {
                self.scheduler.request(now);
            }
        }

        if self.scheduler.is_due(now) {
            self.dispatch();
        }

        let mut applied = false;
        while let Ok(outcome) = self.results_rx.try_recv() {
            applied |= self.apply_outcome(outcome) == ApplyOutcome::Applied;
        }
        Ok(applied)
    }

    /// Pump until no run is pending or in flight, or the timeout elapses.
    /// Returns false on timeout.
    pub fn wait_for_filter(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            self.update()?;
            if !self.is_filtering() {
                return Ok(true);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }

            let wait = self
                .scheduler
                .time_until_due(now)
                .unwrap_or(Duration::from_millis(5))
                .max(Duration::from_millis(1))
                .min(deadline - now);
            if let Ok(outcome) = self.results_rx.recv_timeout(wait) {
                self.apply_outcome(outcome);
            }
        }
    }

    fn dispatch(&mut self) {
        let ticket = self.scheduler.begin();
        let snapshot = self.sync.snapshot();
        let criteria = self.criteria.clone();
        let tx = self.results_tx.clone();

        tracing::debug!(
            generation = ticket.generation,
            entries = snapshot.entries.len(),
            "dispatching filter run"
        );

        let job = move || {
            let result = run_filter(&snapshot, &criteria, &ticket.token);
            // The owner may be gone already; nothing to deliver to then
            let _ = tx.send(FilterOutcome {
                generation: ticket.generation,
                criteria,
                result,
            });
        };

        let spawned = thread::Builder::new()
            .name("carousel-filter".to_string())
            .spawn(job);

        if let Err(err) = spawned {
            tracing::error!(%err, "could not start filter worker");
            self.scheduler.cancel_all();
        }
    }

    /// Swap in a finished pass if it is still the latest one
    pub fn apply_outcome(&mut self, outcome: FilterOutcome) -> ApplyOutcome {
        if !self.scheduler.accept(outcome.generation) {
            tracing::debug!(generation = outcome.generation, "discarding stale filter result");
            return ApplyOutcome::Stale;
        }

        let grouped = match outcome.result {
            Ok(grouped) => grouped,
            Err(Cancelled) => return ApplyOutcome::Cancelled,
        };

        self.display = grouped;
        self.applied_criteria = outcome.criteria;
        self.applied_generation = outcome.generation;
        self.selection.invalidate_visibility();

        // Reopen whatever the current pick lives in
        if let Some(current) = self.selection.current().cloned() {
            if self.sync.contains_beatmap(current.id) {
                let reselect = self.selection.select(
                    &Model::Beatmap(current),
                    &mut self.display,
                    &self.applied_criteria,
                );
                if let Err(err) = reselect {
                    tracing::warn!(%err, "could not restore selection after filtering");
                }
            } else {
                self.selection.clear_current();
            }
        }

        tracing::debug!(
            generation = outcome.generation,
            items = self.display.items.len(),
            "filter pass applied"
        );
        ApplyOutcome::Applied
    }

    /// Select a model. Returns whether it is a valid final pick.
    pub fn select(&mut self, model: &Model) -> Result<bool> {
        Ok(self.select_with_outcome(model)?.is_final())
    }

    pub fn select_with_outcome(&mut self, model: &Model) -> Result<SelectionOutcome> {
        self.selection
            .select(model, &mut self.display, &self.applied_criteria)
    }

    /// Resolve a textual reference against the tracked collection
    pub fn resolve(&self, reference: &ModelRef) -> Option<Model> {
        match reference {
            ModelRef::Group(group) => Some(Model::Group(group.clone())),
            ModelRef::Set(id) => self.sync.set(*id).cloned().map(Model::Set),
            ModelRef::Beatmap(id) => self.sync.find_beatmap(*id).cloned().map(Model::Beatmap),
        }
    }

    /// Ask the factory for one panel per visible item, in display order
    pub fn realize_panels<F: PanelFactory>(&self, factory: &mut F) -> Vec<F::Panel> {
        self.visible_items().map(|item| factory.panel_for(item)).collect()
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.display.items
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &CarouselItem> {
        self.display.items.iter().filter(|item| item.is_visible)
    }

    pub fn groups(&self) -> &[GroupDefinition] {
        &self.display.groups
    }

    pub fn group_items<'a>(
        &'a self,
        group: &GroupDefinition,
    ) -> impl Iterator<Item = &'a CarouselItem> + 'a {
        self.positions(self.display.group_items.get(group))
    }

    pub fn set_items(&self, set: SetId) -> impl Iterator<Item = &CarouselItem> {
        self.positions(self.display.set_items.get(&set))
    }

    fn positions<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a CarouselItem> + 'a {
        positions
            .into_iter()
            .flatten()
            .map(move |&p| &self.display.items[p])
    }

    pub fn current_selection(&self) -> Option<&Arc<Beatmap>> {
        self.selection.current()
    }

    pub fn open_group(&self) -> Option<&GroupDefinition> {
        self.selection.open_group()
    }

    pub fn open_set(&self) -> Option<SetId> {
        self.selection.open_set()
    }

    /// Criteria most recently requested
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Criteria the displayed items were built with
    pub fn applied_criteria(&self) -> &FilterCriteria {
        &self.applied_criteria
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    /// Whether a run is waiting on the debounce or still computing
    pub fn is_filtering(&self) -> bool {
        self.scheduler.is_pending() || self.scheduler.is_in_flight()
    }

    pub fn beatmap_count(&self) -> usize {
        self.sync.len()
    }
}

impl Drop for BeatmapCarousel {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
