use anyhow::{anyhow, Context, Result};
use carousel_core::{ModelRef, SelectionOutcome};

use crate::state::AppState;

/// Select a group, set or beatmap by textual reference
pub fn handle_select(state: &mut AppState, reference: &str) -> Result<String> {
    let model_ref: ModelRef = reference.parse()?;
    let model = state
        .carousel
        .resolve(&model_ref)
        .ok_or_else(|| anyhow!("Nothing matches '{}'", reference))?;

    let outcome = state
        .carousel
        .select_with_outcome(&model)
        .with_context(|| format!("Failed to select {}", model))?;

    let message = match outcome {
        SelectionOutcome::GroupOpened(group) => format!("Opened {}", group),
        SelectionOutcome::GroupCollapsed(group) => format!("Collapsed {}", group),
        SelectionOutcome::GroupUnavailable(group) => {
            format!("No group {} in the current view (try 'split on')", group)
        }
        SelectionOutcome::Redirected { set, beatmap } => {
            format!("Set {} selected, moved to beatmap {}", set, beatmap)
        }
        SelectionOutcome::Selected(beatmap) => format!("Selected beatmap {}", beatmap),
    };
    Ok(message)
}
