mod errors;
mod handlers;
mod operations;
mod state;
mod ui;

use anyhow::{Context, Result};
use carousel_core::{CarouselConfig, FilterCriteria, GroupMode, SortMode, DEFAULT_DEBOUNCE_MS};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use errors::map_command_error;
use handlers::{dispatch, Flow};
use operations::{parse_command, FileOperations};
use state::AppState;
use ui::{show_error, update_ui_from_state};

/// Beatmap Carousel - Browse a beatmap library as a filtered, grouped carousel
///
/// Examples:
///   # Browse a library interactively
///   carousel library.json
///
///   # Split difficulties out and group them by star rating
///   carousel library.json --split --group-by difficulty
///
///   # Start with a search and a sort order
///   carousel library.json --search "artist=xi stars>=5" --sort bpm
///
///   # Replay a command script
///   carousel library.json --script session.txt
#[derive(Parser, Debug)]
#[command(name = "carousel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Search Syntax:\n  \
    - Free words match title, artist, creator, source, tags and difficulty name\n  \
    - key<op>value conditions: stars, length (seconds), bpm, artist, creator, title, diff\n  \
    - Operators: = == : < <= > >=\n\n\
Logging:\n  \
    - Set RUST_LOG (e.g. RUST_LOG=carousel_core=debug) for diagnostics on stderr")]
struct Cli {
    /// Beatmap library JSON file
    #[arg(value_name = "LIBRARY")]
    library: Option<PathBuf>,

    /// Milliseconds to coalesce filter requests before a pass starts
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Sort order: title, artist, creator, difficulty, length, bpm
    #[arg(short, long, value_name = "MODE")]
    sort: Option<SortMode>,

    /// Group split-out difficulties by: difficulty, artist, title
    #[arg(short = 'G', long = "group-by", value_name = "MODE")]
    group_by: Option<GroupMode>,

    /// Split difficulties out of their sets
    #[arg(long)]
    split: bool,

    /// Initial search text
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Start from criteria saved with 'save-criteria'
    #[arg(long, value_name = "FILE")]
    criteria: Option<PathBuf>,

    /// Run commands from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        let (title, message, details) = map_command_error(&err);
        show_error(&title, &message, &details);
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = CarouselConfig::default().with_debounce_ms(cli.debounce_ms);
    let mut state = AppState::new(config);

    let criteria = initial_criteria(&cli)?;
    state.carousel.set_criteria(criteria);

    if let Some(path) = &cli.library {
        FileOperations::new(&mut state).add_library(path)?;
    }
    state.settle()?;

    match &cli.script {
        Some(script) => run_script(&mut state, script),
        None => run_interactive(&mut state),
    }
}

/// Criteria file first, then command line flags on top
fn initial_criteria(cli: &Cli) -> Result<FilterCriteria> {
    let mut criteria = match &cli.criteria {
        Some(path) => FileOperations::read_criteria(path)?,
        None => FilterCriteria::default(),
    };

    if let Some(sort) = cli.sort {
        criteria.sort = sort;
    }
    if let Some(group_by) = cli.group_by {
        criteria.group_by = group_by;
    }
    if cli.split {
        criteria.split_out_difficulties = true;
    }
    if let Some(search) = &cli.search {
        criteria.search_text = search.clone();
    }

    Ok(criteria)
}

/// Script mode stops at the first failing line
fn run_script(state: &mut AppState, script: &Path) -> Result<()> {
    let contents = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script '{}'", script.display()))?;

    for (number, line) in contents.lines().enumerate() {
        let Some(command) = parse_command(line)? else {
            continue;
        };
        let flow = dispatch(state, command)
            .with_context(|| format!("{}:{}: {}", script.display(), number + 1, line.trim()))?;
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Interactive mode reports errors and keeps reading
fn run_interactive(state: &mut AppState) -> Result<()> {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();

    update_ui_from_state(&state.carousel);
    if prompt {
        println!("Type 'help' for commands.");
    }

    let mut lines = stdin.lock().lines();
    loop {
        if prompt {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        let result = parse_command(&line)
            .map_err(anyhow::Error::from)
            .and_then(|command| match command {
                Some(command) => dispatch(state, command),
                None => Ok(Flow::Continue),
            });

        match result {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => {
                let (title, message, details) = map_command_error(&err);
                show_error(&title, &message, &details);
            }
        }
    }
    Ok(())
}
