pub mod file_handlers;
pub mod filter_handlers;
pub mod item_handlers;

pub use file_handlers::{handle_add, handle_remove, handle_reset};
pub use filter_handlers::{
    handle_group, handle_save_criteria, handle_search, handle_sort, handle_split, handle_stars,
};
pub use item_handlers::handle_select;

use anyhow::Result;

use crate::operations::Command;
use crate::state::AppState;
use crate::ui::{set_status, update_ui_from_state, StatusLevel};

pub const HELP: &str = "\
Commands:
  show                          print the carousel
  sort <mode>                   title, artist, creator, difficulty, length, bpm
  group <mode>                  difficulty, artist, title (used with 'split on')
  split on|off                  split difficulties out of their sets
  search <text>                 free text plus conditions like stars>=4 bpm<200
  stars <min> <max> | stars off restrict the star rating range
  select <model>                group:<title>, set:<id> or beatmap:<id>
  add <library.json>            load more sets
  remove <set id>...            remove sets from the collection
  reset                         clear the collection
  save-criteria <file>          write the current criteria as JSON
  help                          show this text
  quit                          leave";

/// Whether the input loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against the state and report what happened
pub fn dispatch(state: &mut AppState, command: Command) -> Result<Flow> {
    let changes_view = command.changes_view();

    let message = match command {
        Command::Show => None,
        Command::Sort(sort) => Some(handle_sort(state, sort)),
        Command::Group(group_by) => Some(handle_group(state, group_by)),
        Command::Split(split) => Some(handle_split(state, split)),
        Command::Search(text) => Some(handle_search(state, text)),
        Command::Stars(range) => Some(handle_stars(state, range)),
        Command::Select(reference) => {
            // Selection works on the applied pass, so let pending work land first
            state.settle()?;
            Some(handle_select(state, &reference)?)
        }
        Command::Add(path) => Some(handle_add(state, &path)?),
        Command::Remove(ids) => Some(handle_remove(state, &ids)),
        Command::Reset => Some(handle_reset(state)),
        Command::SaveCriteria(path) => Some(handle_save_criteria(state, &path)?),
        Command::Help => {
            set_status(HELP, StatusLevel::Info);
            return Ok(Flow::Continue);
        }
        Command::Quit => return Ok(Flow::Quit),
    };

    if let Some(message) = &message {
        set_status(message, StatusLevel::Success);
    }

    if changes_view || message.is_none() {
        if !state.settle()? {
            set_status(
                "Filtering is taking a while, showing the last finished pass",
                StatusLevel::Warning,
            );
        }
        update_ui_from_state(&state.carousel);
    }

    Ok(Flow::Continue)
}
