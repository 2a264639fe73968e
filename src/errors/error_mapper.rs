use carousel_core::CarouselError;
use std::path::Path;

use crate::operations::ValidationError;

/// Map a failed command to user-friendly messages
/// Returns (title, message, details)
pub fn map_command_error(error: &anyhow::Error) -> (String, String, String) {
    let details = format!("{:#}", error);

    if let Some(invalid) = error.downcast_ref::<ValidationError>() {
        return (
            "Invalid Command".to_string(),
            invalid.message.clone(),
            format!("Argument: {}\n\nType 'help' to list commands.", invalid.field),
        );
    }

    match error.chain().find_map(|e| e.downcast_ref::<CarouselError>()) {
        Some(CarouselError::UnsupportedModel(kind)) => (
            "Unsupported Model".to_string(),
            format!("'{}' cannot be selected.", kind),
            "Selectable models are group:<title>, set:<id> and beatmap:<id>.".to_string(),
        ),
        Some(CarouselError::UnsupportedChange { action }) => (
            "Unsupported Change".to_string(),
            format!("The collection sent a '{}' change the carousel cannot apply.", action),
            details,
        ),
        Some(CarouselError::EmptySet(id)) => (
            "Empty Set".to_string(),
            format!("Set {} has no beatmaps to select.", id),
            details,
        ),
        Some(CarouselError::Io { path, .. }) => map_file_error(&details, path),
        Some(CarouselError::Schema(_)) | Some(CarouselError::Validation(_)) => (
            "Validation Error".to_string(),
            "The library file has validation errors.".to_string(),
            details,
        ),
        Some(CarouselError::Json(_)) => (
            "Invalid JSON".to_string(),
            "The file is not valid JSON.".to_string(),
            details,
        ),
        None => ("Error".to_string(), error.to_string(), details),
    }
}

/// Map file access errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_file_error(error_string: &str, path: &Path) -> (String, String, String) {
    if error_string.contains("No such file") {
        (
            "File Not Found".to_string(),
            "The file could not be found.".to_string(),
            format!(
                "Path: {}\n\nPlease verify the file exists and you have permission to read it.",
                path.display()
            ),
        )
    } else if error_string.contains("Permission denied") {
        (
            "Permission Denied".to_string(),
            "Permission denied.".to_string(),
            format!("You don't have permission to access this file:\n{}", path.display()),
        )
    } else if error_string.contains("No space left") {
        (
            "Disk Full".to_string(),
            "Disk full.".to_string(),
            "There is no space left on the device to save the file.".to_string(),
        )
    } else {
        (
            "File Error".to_string(),
            format!("Failed to access {}.", path.display()),
            error_string.to_string(),
        )
    }
}
