use serde_json::Value;
use std::sync::OnceLock;

/// JSON Schema every library file must satisfy
pub const LIBRARY_SCHEMA: &str = include_str!("../schema/library.schema.json");

/// Validate data against JSON Schema
/// Returns Ok(()) if valid, Err with list of validation errors if invalid
pub fn validate_against_schema(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let compiled = jsonschema::validator_for(schema)
        .map_err(|e| vec![format!("Schema compilation error: {}", e)])?;

    let errors: Vec<String> = compiled
        .iter_errors(data)
        .map(|error| {
            let path_str = error.instance_path.to_string();
            let location = if path_str.is_empty() {
                "root".to_string()
            } else {
                path_str
            };
            format!("{} at {}", error, location)
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a parsed library document against the bundled library schema
pub fn validate_library_document(data: &Value) -> Result<(), Vec<String>> {
    static SCHEMA: OnceLock<Result<Value, String>> = OnceLock::new();
    let schema = SCHEMA
        .get_or_init(|| serde_json::from_str(LIBRARY_SCHEMA).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| vec![format!("Bundled library schema is invalid: {}", e)])?;

    validate_against_schema(schema, data)
}
