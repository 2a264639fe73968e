use carousel_core::{has_filters, BeatmapCarousel};
use colored::Colorize;

use super::formatting::{format_criteria, TextPanels};

/// Status message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
}

/// Print a status line
pub fn set_status(message: &str, level: StatusLevel) {
    match level {
        StatusLevel::Info => println!("{}", message),
        StatusLevel::Success => println!("{}", message.green()),
        StatusLevel::Warning => println!("{}", message.yellow()),
    }
}

/// Show an error with title, message and details on stderr
pub fn show_error(title: &str, message: &str, details: &str) {
    eprintln!("{} {}", format!("{}:", title).red().bold(), message);
    if !details.is_empty() && details != message {
        for line in details.lines() {
            eprintln!("  {}", line.dimmed());
        }
    }
}

/// Render the visible part of the carousel, one panel per line
pub fn render_carousel(carousel: &BeatmapCarousel) -> String {
    let mut lines = vec![format!(
        "{} ({} beatmaps, {})",
        "Carousel".bold(),
        carousel.beatmap_count(),
        format_criteria(carousel.applied_criteria())
    )];

    let mut panels = TextPanels::for_carousel(carousel);
    let rendered = carousel.realize_panels(&mut panels);

    if rendered.is_empty() {
        let note = if has_filters(carousel.applied_criteria()) {
            "No beatmaps match the current filters."
        } else {
            "The collection is empty."
        };
        lines.push(note.italic().to_string());
    } else {
        lines.extend(rendered);
    }

    if let Some(current) = carousel.current_selection() {
        lines.push(format!(
            "Selected: {} - {} [{}]",
            current.metadata.artist, current.metadata.title, current.difficulty_name
        ));
    }

    lines.join("\n")
}

/// Print the carousel
pub fn update_ui_from_state(carousel: &BeatmapCarousel) {
    println!("{}", render_carousel(carousel));
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::{
        BeatmapId, BeatmapMetadata, BeatmapSet, CarouselConfig, CollectionChange, Difficulty,
        Model, SetId,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn carousel() -> BeatmapCarousel {
        let metadata = BeatmapMetadata {
            title: "Airman".to_string(),
            artist: "Team Nekokan".to_string(),
            ..Default::default()
        };
        let set = Arc::new(BeatmapSet::new(
            SetId(2),
            metadata,
            vec![
                Difficulty {
                    id: BeatmapId(21),
                    difficulty_name: "Hard".to_string(),
                    star_rating: 3.5,
                    length_ms: 180_000,
                    bpm: 150.0,
                },
                Difficulty {
                    id: BeatmapId(22),
                    difficulty_name: "Insane".to_string(),
                    star_rating: 4.5,
                    length_ms: 180_000,
                    bpm: 150.0,
                },
            ],
        ));

        let mut carousel = BeatmapCarousel::new(CarouselConfig::default().with_debounce_ms(0));
        carousel
            .handle_change(&CollectionChange::Add(vec![set]))
            .unwrap();
        assert!(carousel.wait_for_filter(Duration::from_secs(5)).unwrap());
        carousel
    }

    #[test]
    fn test_render_shows_only_visible_items() {
        colored::control::set_override(false);
        let carousel = carousel();

        let text = render_carousel(&carousel);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Carousel (2 beatmaps, sort: title)");
        assert_eq!(lines[1], "▸ Team Nekokan - Airman [set 2]");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_render_after_selecting_set() {
        colored::control::set_override(false);
        let mut carousel = carousel();
        let set = carousel.resolve(&"set:2".parse().unwrap()).unwrap();
        assert!(matches!(set, Model::Set(_)));
        carousel.select(&set).unwrap();

        let text = render_carousel(&carousel);
        assert!(text.contains("▾ Team Nekokan - Airman"));
        assert!(text.contains("> Hard"));
        assert!(text.contains("    Insane"));
        assert!(text.ends_with("Selected: Team Nekokan - Airman [Hard]"));
    }

    #[test]
    fn test_render_filtered_out() {
        colored::control::set_override(false);
        let mut carousel = carousel();
        carousel.set_criteria(carousel_core::FilterCriteria::default().with_search("stars>9"));
        assert!(carousel.wait_for_filter(Duration::from_secs(5)).unwrap());
        assert!(render_carousel(&carousel).contains("No beatmaps match the current filters."));
    }

    #[test]
    fn test_render_empty_carousel() {
        colored::control::set_override(false);
        let carousel = BeatmapCarousel::new(CarouselConfig::default());
        assert!(render_carousel(&carousel).contains("The collection is empty."));
    }
}
