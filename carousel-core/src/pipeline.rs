use crate::cancellation::{CancellationToken, Cancelled};
use crate::criteria::FilterCriteria;
use crate::filtering::Matcher;
use crate::grouping::{group_items, GroupedItems};
use crate::models::{CarouselItem, Model};
use crate::sorting::sort_items;
use crate::sync::EntrySnapshot;

/// Run one filter pass over a snapshot: match, sort, then group.
///
/// Pure with respect to its inputs. Never touches carousel state; the owner
/// decides whether the result is still wanted.
pub fn run_filter(
    snapshot: &EntrySnapshot,
    criteria: &FilterCriteria,
    cancel: &CancellationToken,
) -> Result<GroupedItems, Cancelled> {
    let matcher = Matcher::new(criteria);

    let mut items: Vec<CarouselItem> = Vec::with_capacity(snapshot.entries.len());
    for (i, entry) in snapshot.entries.iter().enumerate() {
        if i % 1024 == 0 {
            cancel.check()?;
        }
        if matcher.matches(&entry.beatmap) {
            items.push(CarouselItem::new(
                entry.serial,
                Model::Beatmap(entry.beatmap.clone()),
            ));
        }
    }

    cancel.check()?;
    sort_items(&mut items, criteria);

    cancel.check()?;
    group_items(items, criteria, &snapshot.sets, cancel)
}
