use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Debounce used when nothing else is configured
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Tunables for a carousel instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// How long filter requests are coalesced before a run starts
    pub debounce_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl CarouselConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: CarouselConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(100));

        let config: CarouselConfig = serde_json::from_value(json!({"debounce_ms": 0})).unwrap();
        assert_eq!(config.debounce(), Duration::ZERO);
    }
}
