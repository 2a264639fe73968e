use crate::error::CarouselError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatmapId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub u64);

impl fmt::Display for BeatmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata shared by a beatmap set and every difficulty inside it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapMetadata {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One playable difficulty. Owned by the data source; the carousel only
/// holds `Arc` handles to it.
#[derive(Debug, Clone)]
pub struct Beatmap {
    pub id: BeatmapId,
    pub set_id: SetId,
    pub difficulty_name: String,
    pub star_rating: f64,
    pub length_ms: u64,
    pub bpm: f64,
    pub metadata: Arc<BeatmapMetadata>,
}

/// A set of difficulties sharing one song.
#[derive(Debug, Clone)]
pub struct BeatmapSet {
    pub id: SetId,
    pub metadata: Arc<BeatmapMetadata>,
    pub beatmaps: Vec<Arc<Beatmap>>,
}

impl BeatmapSet {
    /// Build a set, stamping the set id and shared metadata onto each difficulty
    pub fn new(id: SetId, metadata: BeatmapMetadata, difficulties: Vec<Difficulty>) -> Self {
        let metadata = Arc::new(metadata);
        let beatmaps = difficulties
            .into_iter()
            .map(|d| {
                Arc::new(Beatmap {
                    id: d.id,
                    set_id: id,
                    difficulty_name: d.difficulty_name,
                    star_rating: d.star_rating,
                    length_ms: d.length_ms,
                    bpm: d.bpm,
                    metadata: metadata.clone(),
                })
            })
            .collect();

        Self {
            id,
            metadata,
            beatmaps,
        }
    }

    pub fn first_beatmap(&self) -> Option<&Arc<Beatmap>> {
        self.beatmaps.first()
    }
}

/// Per-difficulty fields as stored in a library file, before they are bound to a set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    pub id: BeatmapId,
    pub difficulty_name: String,
    pub star_rating: f64,
    #[serde(default)]
    pub length_ms: u64,
    #[serde(default)]
    pub bpm: f64,
}

/// Virtual bucket key. Equal titles mean the same group, across passes too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub title: String,
}

impl GroupDefinition {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl fmt::Display for GroupDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Everything a carousel item can wrap
#[derive(Debug, Clone)]
pub enum Model {
    Group(GroupDefinition),
    Set(Arc<BeatmapSet>),
    Beatmap(Arc<Beatmap>),
}

impl Model {
    pub fn as_beatmap(&self) -> Option<&Arc<Beatmap>> {
        match self {
            Model::Beatmap(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Group(g) => write!(f, "group:{}", g.title),
            Model::Set(s) => write!(f, "set:{}", s.id),
            Model::Beatmap(b) => write!(f, "beatmap:{}", b.id),
        }
    }
}

/// Textual reference to a model, e.g. `set:12`, `beatmap:1204`, `group:★ 3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    Group(GroupDefinition),
    Set(SetId),
    Beatmap(BeatmapId),
}

impl std::str::FromStr for ModelRef {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| CarouselError::UnsupportedModel(s.to_string()))?;
        let value = value.trim();
        let id = || {
            value
                .parse::<u64>()
                .map_err(|_| CarouselError::UnsupportedModel(s.to_string()))
        };

        match kind.trim().to_lowercase().as_str() {
            "group" => Ok(ModelRef::Group(GroupDefinition::new(value))),
            "set" => Ok(ModelRef::Set(SetId(id()?))),
            "beatmap" | "diff" => Ok(ModelRef::Beatmap(BeatmapId(id()?))),
            other => Err(CarouselError::UnsupportedModel(other.to_string())),
        }
    }
}

/// Display wrapper around one model plus the flags the selection logic flips
#[derive(Debug, Clone)]
pub struct CarouselItem {
    /// Insertion order of the underlying beatmap; headers reuse their first member's
    pub serial: u64,
    pub model: Model,
    pub is_visible: bool,
    pub is_group_selection_target: bool,
}

impl CarouselItem {
    pub fn new(serial: u64, model: Model) -> Self {
        Self {
            serial,
            model,
            is_visible: true,
            is_group_selection_target: false,
        }
    }

    /// Whether this item is a group or set header rather than a beatmap row
    pub fn is_header(&self) -> bool {
        !matches!(self.model, Model::Beatmap(_))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::set;
    use super::*;

    #[test]
    fn test_set_binds_difficulties() {
        let s = set(7, "Song", "Artist", &[1.5, 4.2]);
        assert_eq!(s.beatmaps.len(), 2);
        assert!(s.beatmaps.iter().all(|b| b.set_id == SetId(7)));
        assert!(Arc::ptr_eq(&s.beatmaps[0].metadata, &s.metadata));
        assert_eq!(s.first_beatmap().map(|b| b.id), Some(BeatmapId(701)));
    }

    #[test]
    fn test_group_definition_equality_is_by_value() {
        assert_eq!(GroupDefinition::new("★ 3"), GroupDefinition::new("★ 3"));
        assert_ne!(GroupDefinition::new("★ 3"), GroupDefinition::new("★ 4"));
    }

    #[test]
    fn test_model_display() {
        let a = set(1, "A", "X", &[2.0]);
        assert_eq!(Model::Set(a.clone()).to_string(), "set:1");
        assert_eq!(Model::Beatmap(a.beatmaps[0].clone()).to_string(), "beatmap:101");
        assert_eq!(Model::Group(GroupDefinition::new("★ 2")).to_string(), "group:★ 2");
    }

    #[test]
    fn test_parse_model_refs() {
        assert_eq!("set:12".parse::<ModelRef>().unwrap(), ModelRef::Set(SetId(12)));
        assert_eq!(
            "Beatmap: 1204".parse::<ModelRef>().unwrap(),
            ModelRef::Beatmap(BeatmapId(1204))
        );
        assert_eq!(
            "group:★ 3".parse::<ModelRef>().unwrap(),
            ModelRef::Group(GroupDefinition::new("★ 3"))
        );

        let err = "skin:4".parse::<ModelRef>().unwrap_err();
        assert!(matches!(err, CarouselError::UnsupportedModel(kind) if kind == "skin"));
        assert!("set:abc".parse::<ModelRef>().is_err());
        assert!("nothing".parse::<ModelRef>().is_err());
    }
}
