use carousel_core::{
    BeatmapCarousel, BeatmapId, CarouselItem, FilterCriteria, GroupDefinition, Model,
    PanelFactory, SetId,
};
use colored::Colorize;

/// Format a duration in milliseconds as `m:ss`
pub fn format_length(length_ms: u64) -> String {
    let seconds = length_ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One-line summary of the criteria a pass was built with
pub fn format_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = vec![format!("sort: {}", criteria.sort)];

    if criteria.split_out_difficulties {
        parts.push(format!("grouped by {}", criteria.group_by));
    }
    if !criteria.search_text.trim().is_empty() {
        parts.push(format!("search: \"{}\"", criteria.search_text.trim()));
    }
    if let Some(range) = criteria.star_range {
        parts.push(format!("stars {:.1}-{:.1}", range.min, range.max));
    }

    parts.join(" • ")
}

/// Text panels for a terminal: one line per visible item
#[derive(Debug, Default)]
pub struct TextPanels {
    open_group: Option<GroupDefinition>,
    open_set: Option<SetId>,
    current: Option<BeatmapId>,
}

impl TextPanels {
    /// Panels that mark whatever is open or picked in `carousel`
    pub fn for_carousel(carousel: &BeatmapCarousel) -> Self {
        Self {
            open_group: carousel.open_group().cloned(),
            open_set: carousel.open_set(),
            current: carousel.current_selection().map(|b| b.id),
        }
    }
}

impl PanelFactory for TextPanels {
    type Panel = String;

    fn panel_for(&mut self, item: &CarouselItem) -> String {
        match &item.model {
            Model::Group(group) => {
                let marker = if self.open_group.as_ref() == Some(group) {
                    "▾"
                } else {
                    "▸"
                };
                format!("{} {}", marker, group.title.bold().magenta())
            }
            Model::Set(set) => {
                let marker = if self.open_set == Some(set.id) { "▾" } else { "▸" };
                let title = format!("{} - {}", set.metadata.artist, set.metadata.title);
                format!(
                    "{} {} {}",
                    marker,
                    title.bold().cyan(),
                    format!("[set {}]", set.id).dimmed()
                )
            }
            Model::Beatmap(beatmap) => {
                let line = format!(
                    "{} ★{:.2} {} {:.0}bpm",
                    beatmap.difficulty_name,
                    beatmap.star_rating,
                    format_length(beatmap.length_ms),
                    beatmap.bpm
                );
                let id = format!("[beatmap {}]", beatmap.id).dimmed();

                if self.current == Some(beatmap.id) {
                    format!("  {} {} {}", ">".green().bold(), line.green().bold(), id)
                } else {
                    format!("    {} {}", line, id)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::{BeatmapMetadata, BeatmapSet, Difficulty, SortMode, StarRange};
    use std::sync::Arc;

    fn sample_set() -> Arc<BeatmapSet> {
        let metadata = BeatmapMetadata {
            title: "Blue Zenith".to_string(),
            artist: "xi".to_string(),
            ..Default::default()
        };
        Arc::new(BeatmapSet::new(
            SetId(1),
            metadata,
            vec![Difficulty {
                id: BeatmapId(11),
                difficulty_name: "Insane".to_string(),
                star_rating: 5.234,
                length_ms: 251_000,
                bpm: 200.0,
            }],
        ))
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(0), "0:00");
        assert_eq!(format_length(251_999), "4:11");
        assert_eq!(format_length(3_600_000), "60:00");
    }

    #[test]
    fn test_format_criteria() {
        let mut criteria = FilterCriteria::default().with_sort(SortMode::Bpm);
        assert_eq!(format_criteria(&criteria), "sort: bpm");

        criteria.split_out_difficulties = true;
        criteria.search_text = " xi ".to_string();
        criteria.star_range = Some(StarRange { min: 2.0, max: 5.0 });
        assert_eq!(
            format_criteria(&criteria),
            "sort: bpm • grouped by difficulty • search: \"xi\" • stars 2.0-5.0"
        );
    }

    #[test]
    fn test_panels_mark_current_pick() {
        colored::control::set_override(false);
        let set = sample_set();
        let beatmap = set.beatmaps[0].clone();

        let mut panels = TextPanels {
            open_set: Some(SetId(1)),
            current: Some(BeatmapId(11)),
            ..Default::default()
        };

        let header = panels.panel_for(&CarouselItem::new(0, Model::Set(set)));
        assert_eq!(header, "▾ xi - Blue Zenith [set 1]");

        let row = panels.panel_for(&CarouselItem::new(0, Model::Beatmap(beatmap)));
        assert_eq!(row, "  > Insane ★5.23 4:11 200bpm [beatmap 11]");

        let group = panels.panel_for(&CarouselItem::new(
            0,
            Model::Group(GroupDefinition::new("★ 5")),
        ));
        assert_eq!(group, "▸ ★ 5");
    }
}
