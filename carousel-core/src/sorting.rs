use crate::criteria::{FilterCriteria, SortMode};
use crate::models::{Beatmap, CarouselItem, Model, SetId};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Sort beatmap items by the criteria's sort key.
///
/// The result is a total order: ties on the primary key fall back to set
/// arrival order and star rating (when sets are shown whole) and finally to
/// the item's insertion serial, so identical inputs always produce identical
/// output.
pub fn sort_items(items: &mut Vec<CarouselItem>, criteria: &FilterCriteria) {
    let split = criteria.split_out_difficulties;

    // Whole sets must stay contiguous, so per-difficulty keys are lifted to the set
    let set_keys = if !split && criteria.sort.is_per_difficulty() {
        set_minimums(items, criteria.sort)
    } else {
        HashMap::new()
    };
    let set_arrival = if split {
        HashMap::new()
    } else {
        first_serials(items)
    };

    let mut keyed: Vec<(Option<SortKey>, CarouselItem)> = items
        .drain(..)
        .map(|item| {
            let key = beatmap_of(&item).map(|b| match set_keys.get(&b.set_id) {
                Some(lifted) => SortKey::Number(*lifted),
                None => primary_key(b, criteria.sort),
            });
            (key, item)
        })
        .collect();

    keyed.sort_by(|(a_key, a), (b_key, b)| {
        let primary = match (a_key, b_key) {
            (Some(a_key), Some(b_key)) => a_key.compare(b_key),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        primary
            .then_with(|| {
                if split {
                    return Ordering::Equal;
                }
                match (beatmap_of(a), beatmap_of(b)) {
                    (Some(a), Some(b)) => set_arrival
                        .get(&a.set_id)
                        .cmp(&set_arrival.get(&b.set_id))
                        .then_with(|| a.star_rating.total_cmp(&b.star_rating)),
                    _ => Ordering::Equal,
                }
            })
            .then_with(|| a.serial.cmp(&b.serial))
    });

    items.extend(keyed.into_iter().map(|(_, item)| item));
}

fn beatmap_of(item: &CarouselItem) -> Option<&Beatmap> {
    match &item.model {
        Model::Beatmap(b) => Some(b),
        _ => None,
    }
}

fn primary_key(beatmap: &Beatmap, sort: SortMode) -> SortKey {
    match sort {
        SortMode::Title => SortKey::Text(normalize_for_sorting(&beatmap.metadata.title)),
        SortMode::Artist => SortKey::Text(normalize_for_sorting(&beatmap.metadata.artist)),
        SortMode::Creator => SortKey::Text(normalize_for_sorting(&beatmap.metadata.creator)),
        SortMode::Difficulty => SortKey::Number(beatmap.star_rating),
        SortMode::Length => SortKey::Number(beatmap.length_ms as f64),
        SortMode::Bpm => SortKey::Number(beatmap.bpm),
    }
}

/// Serial of the earliest item of every set present in `items`
fn first_serials(items: &[CarouselItem]) -> HashMap<SetId, u64> {
    let mut firsts: HashMap<SetId, u64> = HashMap::new();

    for item in items {
        if let Some(beatmap) = beatmap_of(item) {
            firsts
                .entry(beatmap.set_id)
                .and_modify(|first| *first = (*first).min(item.serial))
                .or_insert(item.serial);
        }
    }

    firsts
}

/// Lowest per-difficulty key of every set present in `items`
fn set_minimums(items: &[CarouselItem], sort: SortMode) -> HashMap<SetId, f64> {
    let mut minimums: HashMap<SetId, f64> = HashMap::new();

    for beatmap in items.iter().filter_map(beatmap_of) {
        let value = match primary_key(beatmap, sort) {
            SortKey::Number(n) => n,
            SortKey::Text(_) => continue,
        };
        minimums
            .entry(beatmap.set_id)
            .and_modify(|current| {
                if value < *current {
                    *current = value;
                }
            })
            .or_insert(value);
    }

    minimums
}

/// Normalize string for library science sorting
/// - Strip leading articles (a, an, the)
/// - Normalize unicode (NFD then lowercase)
/// - Collapse whitespace
pub fn normalize_for_sorting(s: &str) -> String {
    let without_articles = strip_leading_articles(s);
    fold_for_matching(&without_articles)
}

/// NFD decomposition, lowercase and collapsed whitespace, without article stripping
pub fn fold_for_matching(s: &str) -> String {
    let normalized: String = s.nfd().collect::<String>().to_lowercase();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading articles following library science conventions
/// Supports: a, an, the (English) and common articles in other languages
pub fn strip_leading_articles(s: &str) -> String {
    static ARTICLES: OnceLock<Regex> = OnceLock::new();
    let re = ARTICLES.get_or_init(|| {
        Regex::new(r"^(?i)(the|a|an|der|die|das|le|la|les|el|los|las|il|lo|i|gli|un|une|een)\s+")
            .expect("article pattern is valid")
    });
    re.replace(s.trim_start(), "").to_string()
}
