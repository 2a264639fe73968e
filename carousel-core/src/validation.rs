use crate::io::LibraryFile;
use std::collections::HashSet;

/// Validate a deserialized library
/// Returns Ok(()) if valid, or Err(Vec<String>) with every problem found
pub fn validate_library(library: &LibraryFile) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut set_ids = HashSet::new();
    let mut beatmap_ids = HashSet::new();

    for (idx, set) in library.sets.iter().enumerate() {
        let set_ref = format!("Set #{} (id {})", idx + 1, set.id);

        if !set_ids.insert(set.id) {
            errors.push(format!("{}: duplicate set id", set_ref));
        }

        if set.metadata.title.trim().is_empty() {
            errors.push(format!("{}: title cannot be empty", set_ref));
        }

        if set.beatmaps.is_empty() {
            errors.push(format!("{}: must contain at least one beatmap", set_ref));
        }

        for beatmap in &set.beatmaps {
            let beatmap_ref = format!("{} beatmap {}", set_ref, beatmap.id);

            if !beatmap_ids.insert(beatmap.id) {
                errors.push(format!("{}: duplicate beatmap id", beatmap_ref));
            }

            if !beatmap.star_rating.is_finite() || beatmap.star_rating < 0.0 {
                errors.push(format!(
                    "{}: star rating must be a non-negative number, found {}",
                    beatmap_ref, beatmap.star_rating
                ));
            }

            if !beatmap.bpm.is_finite() || beatmap.bpm < 0.0 {
                errors.push(format!(
                    "{}: bpm must be a non-negative number, found {}",
                    beatmap_ref, beatmap.bpm
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library(value: serde_json::Value) -> LibraryFile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_library() {
        let lib = library(json!({"sets": [
            {"id": 1, "metadata": {"title": "A", "artist": "B"}, "beatmaps": [
                {"id": 1, "difficulty_name": "N", "star_rating": 1.0}
            ]}
        ]}));
        assert!(validate_library(&lib).is_ok());
    }

    #[test]
    fn test_collects_all_problems() {
        let lib = library(json!({"sets": [
            {"id": 1, "metadata": {"title": " ", "artist": "B"}, "beatmaps": []},
            {"id": 2, "metadata": {"title": "C", "artist": "D"}, "beatmaps": [
                {"id": 3, "difficulty_name": "N", "star_rating": -1.0, "bpm": -5.0}
            ]}
        ]}));

        let errors = validate_library(&lib).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("title cannot be empty"));
        assert!(errors[1].contains("at least one beatmap"));
        assert!(errors[2].contains("star rating"));
        assert!(errors[3].contains("bpm"));
    }

    #[test]
    fn test_empty_library_is_valid() {
        assert!(validate_library(&LibraryFile::default()).is_ok());
    }
}
