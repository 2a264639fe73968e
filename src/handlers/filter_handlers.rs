use anyhow::Result;
use carousel_core::{GroupMode, SortMode, StarRange};
use std::path::Path;

use crate::operations::FileOperations;
use crate::state::AppState;

pub fn handle_sort(state: &mut AppState, sort: SortMode) -> String {
    state.update_criteria(|c| c.sort = sort);
    format!("Sorting by {}", sort)
}

pub fn handle_group(state: &mut AppState, group_by: GroupMode) -> String {
    state.update_criteria(|c| c.group_by = group_by);
    if state.carousel.criteria().split_out_difficulties {
        format!("Grouping difficulties by {}", group_by)
    } else {
        format!(
            "Grouping set to {} (takes effect with 'split on')",
            group_by
        )
    }
}

pub fn handle_split(state: &mut AppState, split: bool) -> String {
    state.update_criteria(|c| c.split_out_difficulties = split);
    if split {
        "Difficulties split out into groups".to_string()
    } else {
        "Difficulties grouped under their sets".to_string()
    }
}

pub fn handle_search(state: &mut AppState, text: String) -> String {
    let message = if text.is_empty() {
        "Search cleared".to_string()
    } else {
        format!("Searching for \"{}\"", text)
    };
    state.update_criteria(|c| c.search_text = text);
    message
}

pub fn handle_stars(state: &mut AppState, range: Option<StarRange>) -> String {
    state.update_criteria(|c| c.star_range = range);
    match range {
        Some(range) => format!("Showing {:.1}★ to {:.1}★", range.min, range.max),
        None => "Star range cleared".to_string(),
    }
}

pub fn handle_save_criteria(state: &mut AppState, path: &Path) -> Result<String> {
    FileOperations::new(state).save_criteria(path)?;
    Ok(format!("Criteria saved to {}", path.display()))
}
