use crate::cancellation::{CancellationToken, Cancelled};
use crate::criteria::{FilterCriteria, GroupMode};
use crate::models::{Beatmap, BeatmapSet, CarouselItem, GroupDefinition, Model, SetId};
use crate::selection::is_valid_for_group_selection;
use crate::sorting::normalize_for_sorting;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Final display sequence of one filter pass plus its reverse lookups.
///
/// Index values are positions into `items`, members only (never headers),
/// in display order.
#[derive(Debug, Clone, Default)]
pub struct GroupedItems {
    pub items: Vec<CarouselItem>,
    pub group_items: HashMap<GroupDefinition, Vec<usize>>,
    pub set_items: HashMap<SetId, Vec<usize>>,
    /// Groups in display order
    pub groups: Vec<GroupDefinition>,
}

/// Partition sorted beatmap items into display buckets.
///
/// With difficulties split out, beatmaps are bucketed by a derived
/// `GroupDefinition`; otherwise by owning set. Buckets appear in first-seen
/// order and keep the sort order inside, so a key reappearing later in the
/// sequence joins its existing bucket instead of opening a second one.
pub fn group_items(
    sorted: Vec<CarouselItem>,
    criteria: &FilterCriteria,
    sets: &HashMap<SetId, Arc<BeatmapSet>>,
    cancel: &CancellationToken,
) -> Result<GroupedItems, Cancelled> {
    let mut grouped = GroupedItems::default();

    if criteria.grouping_enabled() {
        let buckets = bucket_by(sorted, |b| group_key(b, criteria.group_by), cancel)?;

        for (group, members) in buckets {
            let header_serial = members.first().map(|m| m.serial).unwrap_or_default();
            push_header(&mut grouped, header_serial, Model::Group(group.clone()), criteria);

            let mut positions = Vec::with_capacity(members.len());
            for member in members {
                positions.push(push_member(&mut grouped, member, criteria));
            }
            grouped.groups.push(group.clone());
            grouped.group_items.insert(group, positions);
        }
    } else {
        let buckets = bucket_by(sorted, |b| b.set_id, cancel)?;

        for (set_id, members) in buckets {
            match sets.get(&set_id) {
                Some(set) => {
                    let header_serial = members.first().map(|m| m.serial).unwrap_or_default();
                    push_header(&mut grouped, header_serial, Model::Set(set.clone()), criteria);
                }
                None => tracing::warn!(set = %set_id, "beatmaps reference an unknown set"),
            }

            for member in members {
                push_member(&mut grouped, member, criteria);
            }
        }
    }

    tracing::debug!(
        items = grouped.items.len(),
        groups = grouped.group_items.len(),
        sets = grouped.set_items.len(),
        "grouping complete"
    );

    Ok(grouped)
}

/// Bucket key of a beatmap under the given grouping mode
pub fn group_key(beatmap: &Beatmap, mode: GroupMode) -> GroupDefinition {
    match mode {
        GroupMode::Difficulty => {
            let stars = beatmap.star_rating.max(0.0).floor() as u32;
            GroupDefinition::new(format!("★ {}", stars))
        }
        GroupMode::Artist => initial_group(&beatmap.metadata.artist),
        GroupMode::Title => initial_group(&beatmap.metadata.title),
    }
}

fn initial_group(text: &str) -> GroupDefinition {
    let initial = normalize_for_sorting(text)
        .chars()
        .next()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "#".to_string());
    GroupDefinition::new(initial)
}

fn bucket_by<K, F>(
    sorted: Vec<CarouselItem>,
    key_of: F,
    cancel: &CancellationToken,
) -> Result<Vec<(K, Vec<CarouselItem>)>, Cancelled>
where
    K: Eq + Hash + Clone,
    F: Fn(&Beatmap) -> K,
{
    let mut buckets: Vec<(K, Vec<CarouselItem>)> = Vec::new();
    let mut lookup: HashMap<K, usize> = HashMap::new();

    for (i, item) in sorted.into_iter().enumerate() {
        if i % 1024 == 0 {
            cancel.check()?;
        }

        let Model::Beatmap(beatmap) = &item.model else {
            continue;
        };
        let key = key_of(beatmap);

        match lookup.get(&key) {
            Some(&index) => buckets[index].1.push(item),
            None => {
                lookup.insert(key.clone(), buckets.len());
                buckets.push((key, vec![item]));
            }
        }
    }

    Ok(buckets)
}

fn push_header(grouped: &mut GroupedItems, serial: u64, model: Model, criteria: &FilterCriteria) {
    let mut header = CarouselItem::new(serial, model);
    header.is_group_selection_target = is_valid_for_group_selection(&header.model, criteria);
    grouped.items.push(header);
}

fn push_member(grouped: &mut GroupedItems, mut member: CarouselItem, criteria: &FilterCriteria) -> usize {
    let position = grouped.items.len();
    member.is_visible = false;
    member.is_group_selection_target = is_valid_for_group_selection(&member.model, criteria);

    if let Model::Beatmap(beatmap) = &member.model {
        grouped
            .set_items
            .entry(beatmap.set_id)
            .or_default()
            .push(position);
    }

    grouped.items.push(member);
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SortMode;
    use crate::models::fixtures::set;
    use crate::sorting::sort_items;

    fn prepare(sets: &[Arc<BeatmapSet>], criteria: &FilterCriteria) -> GroupedItems {
        let mut serial = 0;
        let mut items = Vec::new();
        let mut by_id = HashMap::new();
        for s in sets {
            by_id.insert(s.id, s.clone());
            for b in &s.beatmaps {
                items.push(CarouselItem::new(serial, Model::Beatmap(b.clone())));
                serial += 1;
            }
        }
        sort_items(&mut items, criteria);
        group_items(items, criteria, &by_id, &CancellationToken::new()).unwrap()
    }

    fn labels(grouped: &GroupedItems) -> Vec<String> {
        grouped.items.iter().map(|i| i.model.to_string()).collect()
    }

    #[test]
    fn test_sets_get_headers_without_splitting() {
        let sets = [set(1, "Alpha", "A", &[1.0, 2.0]), set(2, "Beta", "B", &[3.0])];
        let grouped = prepare(&sets, &FilterCriteria::default());

        assert_eq!(
            labels(&grouped),
            vec!["set:1", "beatmap:101", "beatmap:102", "set:2", "beatmap:201"]
        );
        assert!(grouped.group_items.is_empty());
        assert_eq!(grouped.set_items[&SetId(1)], vec![1, 2]);
        assert_eq!(grouped.set_items[&SetId(2)], vec![4]);

        let header = &grouped.items[0];
        assert!(header.is_visible && header.is_group_selection_target);
        let member = &grouped.items[1];
        assert!(!member.is_visible && !member.is_group_selection_target);
    }

    #[test]
    fn test_split_groups_by_star_rating() {
        let sets = [set(1, "Alpha", "A", &[1.5, 4.2]), set(2, "Beta", "B", &[1.9])];
        let criteria = FilterCriteria::default()
            .with_split(true)
            .with_sort(SortMode::Difficulty);
        let grouped = prepare(&sets, &criteria);

        assert_eq!(
            labels(&grouped),
            vec!["group:★ 1", "beatmap:101", "beatmap:201", "group:★ 4", "beatmap:102"]
        );
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.group_items[&GroupDefinition::new("★ 1")], vec![1, 2]);
        assert_eq!(grouped.set_items[&SetId(1)], vec![1, 4]);

        let header = &grouped.items[0];
        assert!(header.is_visible && !header.is_group_selection_target);
        assert!(grouped.items[1].is_group_selection_target);
    }

    #[test]
    fn test_reappearing_key_merges_into_first_bucket() {
        // Title order is Apple(★2), Banana(★5), Cherry(★2)
        let sets = [
            set(1, "Cherry", "A", &[2.5]),
            set(2, "Apple", "A", &[2.1]),
            set(3, "Banana", "A", &[5.0]),
        ];
        let criteria = FilterCriteria::default().with_split(true);
        let grouped = prepare(&sets, &criteria);

        assert_eq!(
            labels(&grouped),
            vec!["group:★ 2", "beatmap:201", "beatmap:101", "group:★ 5", "beatmap:301"]
        );
    }

    #[test]
    fn test_every_beatmap_lands_in_exactly_one_bucket() {
        let sets = [
            set(1, "One", "Zed", &[1.0, 2.0, 3.0]),
            set(2, "Two", "Amy", &[2.2, 7.1]),
            set(3, "Three", "Bob", &[0.4]),
        ];
        for criteria in [
            FilterCriteria::default(),
            FilterCriteria::default().with_split(true),
            FilterCriteria::default()
                .with_split(true)
                .with_group_by(GroupMode::Artist),
        ] {
            let grouped = prepare(&sets, &criteria);
            let beatmaps = grouped.items.iter().filter(|i| !i.is_header()).count();
            assert_eq!(beatmaps, 6);

            let in_sets: usize = grouped.set_items.values().map(Vec::len).sum();
            assert_eq!(in_sets, 6);

            if criteria.grouping_enabled() {
                let in_groups: usize = grouped.group_items.values().map(Vec::len).sum();
                assert_eq!(in_groups, 6);
            }
        }
    }

    #[test]
    fn test_identical_inputs_group_identically() {
        let sets = [set(1, "One", "Zed", &[1.0, 2.0]), set(2, "Two", "Amy", &[2.2])];
        let criteria = FilterCriteria::default().with_split(true);
        let first = prepare(&sets, &criteria);
        let second = prepare(&sets, &criteria);

        assert_eq!(labels(&first), labels(&second));
        assert_eq!(first.group_items, second.group_items);
        assert_eq!(first.set_items, second.set_items);
    }

    #[test]
    fn test_initial_groups() {
        let s = set(1, "The Zoo", "123", &[1.0]);
        let beatmap = &s.beatmaps[0];
        assert_eq!(group_key(beatmap, GroupMode::Title), GroupDefinition::new("Z"));
        assert_eq!(group_key(beatmap, GroupMode::Artist), GroupDefinition::new("#"));
    }

    #[test]
    fn test_cancelled_run_stops() {
        let sets = [set(1, "One", "A", &[1.0])];
        let token = CancellationToken::new();
        token.cancel();
        let items = vec![CarouselItem::new(0, Model::Beatmap(sets[0].beatmaps[0].clone()))];
        let by_id = HashMap::from([(SetId(1), sets[0].clone())]);
        let result = group_items(items, &FilterCriteria::default(), &by_id, &token);
        assert!(result.is_err());
    }
}
