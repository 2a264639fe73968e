use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort key selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Title,
    Artist,
    Creator,
    Difficulty,
    Length,
    Bpm,
}

impl SortMode {
    /// Keys that differ between difficulties of the same set
    pub fn is_per_difficulty(self) -> bool {
        matches!(self, SortMode::Difficulty | SortMode::Length | SortMode::Bpm)
    }
}

/// Bucket key used when difficulties are split out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    #[default]
    Difficulty,
    Artist,
    Title,
}

/// Inclusive star rating bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarRange {
    pub min: f64,
    pub max: f64,
}

impl StarRange {
    pub fn contains(&self, stars: f64) -> bool {
        stars >= self.min && stars <= self.max
    }
}

/// Snapshot of what the user asked the carousel to show.
///
/// Replacing the criteria starts a new filter pass; a pass never observes a
/// criteria value changing under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub sort: SortMode,
    pub group_by: GroupMode,
    pub split_out_difficulties: bool,
    pub search_text: String,
    pub star_range: Option<StarRange>,
}

impl FilterCriteria {
    /// Grouping into virtual buckets only happens when difficulties are split out
    pub fn grouping_enabled(&self) -> bool {
        self.split_out_difficulties
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split_out_difficulties = split;
        self
    }

    pub fn with_group_by(mut self, group_by: GroupMode) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortMode::Title),
            "artist" => Ok(SortMode::Artist),
            "creator" | "author" | "mapper" => Ok(SortMode::Creator),
            "difficulty" | "stars" => Ok(SortMode::Difficulty),
            "length" => Ok(SortMode::Length),
            "bpm" => Ok(SortMode::Bpm),
            other => Err(format!("Unknown sort mode '{}'", other)),
        }
    }
}

impl FromStr for GroupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "difficulty" | "stars" => Ok(GroupMode::Difficulty),
            "artist" => Ok(GroupMode::Artist),
            "title" => Ok(GroupMode::Title),
            other => Err(format!("Unknown group mode '{}'", other)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Title => "title",
            SortMode::Artist => "artist",
            SortMode::Creator => "creator",
            SortMode::Difficulty => "difficulty",
            SortMode::Length => "length",
            SortMode::Bpm => "bpm",
        };
        f.write_str(name)
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupMode::Difficulty => "difficulty",
            GroupMode::Artist => "artist",
            GroupMode::Title => "title",
        };
        f.write_str(name)
    }
}
