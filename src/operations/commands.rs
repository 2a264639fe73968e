use carousel_core::{GroupMode, SetId, SortMode, StarRange};
use std::path::PathBuf;

/// Validation error with field and message
#[derive(Debug, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// One line of input, parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Sort(SortMode),
    Group(GroupMode),
    Split(bool),
    Search(String),
    Stars(Option<StarRange>),
    /// Raw model reference; resolved against the carousel when handled
    Select(String),
    Add(PathBuf),
    Remove(Vec<SetId>),
    Reset,
    SaveCriteria(PathBuf),
    Help,
    Quit,
}

impl Command {
    /// Whether the command changes what the carousel shows
    pub fn changes_view(&self) -> bool {
        !matches!(
            self,
            Command::Show | Command::SaveCriteria(_) | Command::Help | Command::Quit
        )
    }
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ValidationError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "show" | "ls" => Command::Show,
        "sort" => Command::Sort(
            required("sort", rest)?
                .parse::<SortMode>()
                .map_err(|e: String| ValidationError::new("sort", e))?,
        ),
        "group" => Command::Group(
            required("group", rest)?
                .parse::<GroupMode>()
                .map_err(|e: String| ValidationError::new("group", e))?,
        ),
        "split" => Command::Split(parse_toggle(rest)?),
        "search" => Command::Search(rest.to_string()),
        "stars" => Command::Stars(parse_star_range(rest)?),
        "select" => Command::Select(required("select", rest)?.to_string()),
        "add" => Command::Add(PathBuf::from(required("add", rest)?)),
        "remove" => Command::Remove(parse_set_ids(rest)?),
        "reset" => Command::Reset,
        "save-criteria" => Command::SaveCriteria(PathBuf::from(required("save-criteria", rest)?)),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(ValidationError::new(
                "command",
                format!("Unknown command '{}', try 'help'", other),
            ))
        }
    };

    Ok(Some(command))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::new(field, "Missing argument"))
    } else {
        Ok(value)
    }
}

fn parse_toggle(value: &str) -> Result<bool, ValidationError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(ValidationError::new("split", "Expected 'on' or 'off'")),
    }
}

/// `min max` or `off`
pub fn parse_star_range(value: &str) -> Result<Option<StarRange>, ValidationError> {
    if value.eq_ignore_ascii_case("off") {
        return Ok(None);
    }

    let bounds: Vec<f64> = value
        .split_whitespace()
        .map(|part| part.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ValidationError::new("stars", "Bounds must be numbers"))?;

    match bounds.as_slice() {
        [min, max] if min <= max => Ok(Some(StarRange {
            min: *min,
            max: *max,
        })),
        [_, _] => Err(ValidationError::new("stars", "Minimum is above maximum")),
        _ => Err(ValidationError::new("stars", "Expected '<min> <max>' or 'off'")),
    }
}

fn parse_set_ids(value: &str) -> Result<Vec<SetId>, ValidationError> {
    let ids: Vec<SetId> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map(SetId))
        .collect::<Result<_, _>>()
        .map_err(|_| ValidationError::new("remove", "Set ids must be whole numbers"))?;

    if ids.is_empty() {
        return Err(ValidationError::new("remove", "Missing argument"));
    }
    Ok(ids)
}
