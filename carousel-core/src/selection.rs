use crate::criteria::FilterCriteria;
use crate::error::{CarouselError, Result};
use crate::grouping::GroupedItems;
use crate::models::{Beatmap, BeatmapId, CarouselItem, GroupDefinition, Model, SetId};
use std::sync::Arc;

/// What a selection request ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// A group was expanded; the group itself is not a pick
    GroupOpened(GroupDefinition),
    /// The already open group was selected again and collapsed
    GroupCollapsed(GroupDefinition),
    /// The group is not part of the applied pass; nothing changed
    GroupUnavailable(GroupDefinition),
    /// A set was selected and the selection moved to its first beatmap
    Redirected { set: SetId, beatmap: BeatmapId },
    /// A beatmap was picked
    Selected(BeatmapId),
}

impl SelectionOutcome {
    /// Whether the caller should treat the selected model as the active pick
    pub fn is_final(&self) -> bool {
        matches!(self, SelectionOutcome::Selected(_))
    }
}

/// Whether an item may anchor group selection under the given criteria.
///
/// Sets always can, beatmaps only when difficulties are split out, group
/// headers never.
pub fn is_valid_for_group_selection(model: &Model, criteria: &FilterCriteria) -> bool {
    match model {
        Model::Set(_) => true,
        Model::Beatmap(_) => criteria.split_out_difficulties,
        Model::Group(_) => false,
    }
}

/// Open group / open set / current pick, and the visibility flips between them.
///
/// At most one group and one set are open at a time; opening another of the
/// same kind hides the previous one first.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    open_group: Option<GroupDefinition>,
    open_set: Option<SetId>,
    current: Option<Arc<Beatmap>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_group(&self) -> Option<&GroupDefinition> {
        self.open_group.as_ref()
    }

    pub fn open_set(&self) -> Option<SetId> {
        self.open_set
    }

    pub fn current(&self) -> Option<&Arc<Beatmap>> {
        self.current.as_ref()
    }

    /// React to a model being selected, toggling visibility in `display`
    pub fn select(
        &mut self,
        model: &Model,
        display: &mut GroupedItems,
        criteria: &FilterCriteria,
    ) -> Result<SelectionOutcome> {
        match model {
            Model::Group(group) => {
                if self.open_group.as_ref() == Some(group) {
                    set_group_visibility(display, group, false);
                    self.open_group = None;
                    return Ok(SelectionOutcome::GroupCollapsed(group.clone()));
                }

                if !display.group_items.contains_key(group) {
                    return Ok(SelectionOutcome::GroupUnavailable(group.clone()));
                }

                self.show_group(display, group.clone());
                Ok(SelectionOutcome::GroupOpened(group.clone()))
            }

            Model::Set(set) => {
                let first = first_displayed_beatmap(display, set.id)
                    .or_else(|| set.first_beatmap().cloned())
                    .ok_or(CarouselError::EmptySet(set.id))?;

                self.select(&Model::Beatmap(first.clone()), display, criteria)?;
                Ok(SelectionOutcome::Redirected {
                    set: set.id,
                    beatmap: first.id,
                })
            }

            Model::Beatmap(beatmap) => {
                if criteria.split_out_difficulties {
                    // Group count is small, a linear scan is fine
                    let containing = display
                        .groups
                        .iter()
                        .find(|g| {
                            display.group_items.get(*g).is_some_and(|positions| {
                                positions
                                    .iter()
                                    .any(|&p| holds_beatmap(&display.items[p], beatmap.id))
                            })
                        })
                        .cloned();

                    if let Some(group) = containing {
                        self.show_group(display, group);
                    }
                } else {
                    self.show_set(display, beatmap.set_id);
                }

                self.current = Some(beatmap.clone());
                Ok(SelectionOutcome::Selected(beatmap.id))
            }
        }
    }

    /// Forget open group/set after a new pass replaced the items they referred to.
    /// The current pick survives.
    pub fn invalidate_visibility(&mut self) {
        self.open_group = None;
        self.open_set = None;
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    fn show_group(&mut self, display: &mut GroupedItems, group: GroupDefinition) {
        if let Some(previous) = self.open_group.take() {
            set_group_visibility(display, &previous, false);
        }
        set_group_visibility(display, &group, true);
        self.open_group = Some(group);
    }

    fn show_set(&mut self, display: &mut GroupedItems, set_id: SetId) {
        if let Some(previous) = self.open_set.take() {
            set_set_visibility(display, previous, false);
        }
        set_set_visibility(display, set_id, true);
        self.open_set = Some(set_id);
    }
}

fn holds_beatmap(item: &CarouselItem, id: BeatmapId) -> bool {
    item.model.as_beatmap().is_some_and(|b| b.id == id)
}

fn first_displayed_beatmap(display: &GroupedItems, set_id: SetId) -> Option<Arc<Beatmap>> {
    let first = *display.set_items.get(&set_id)?.first()?;
    display.items[first].model.as_beatmap().cloned()
}

fn set_group_visibility(display: &mut GroupedItems, group: &GroupDefinition, visible: bool) {
    if let Some(positions) = display.group_items.get(group) {
        tracing::trace!(group = %group, visible, count = positions.len(), "group visibility");
        for &p in positions {
            display.items[p].is_visible = visible;
        }
    }
}

fn set_set_visibility(display: &mut GroupedItems, set_id: SetId, visible: bool) {
    if let Some(positions) = display.set_items.get(&set_id) {
        tracing::trace!(set = %set_id, visible, count = positions.len(), "set visibility");
        for &p in positions {
            display.items[p].is_visible = visible;
        }
    }
}
