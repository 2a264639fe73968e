// Public modules
pub mod cancellation;
pub mod carousel;
pub mod collection;
pub mod config;
pub mod criteria;
pub mod display;
pub mod error;
pub mod filtering;
pub mod grouping;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod schema_validation;
pub mod selection;
pub mod sorting;
pub mod sync;
pub mod validation;

// Re-export commonly used types for convenience
pub use cancellation::{CancellationToken, Cancelled};
pub use carousel::{ApplyOutcome, BeatmapCarousel, FilterOutcome};
pub use collection::BeatmapStore;
pub use config::{CarouselConfig, DEFAULT_DEBOUNCE_MS};
pub use criteria::{FilterCriteria, GroupMode, SortMode, StarRange};
pub use display::PanelFactory;
pub use error::{CarouselError, Result};
pub use filtering::{has_filters, Matcher, SearchQuery};
pub use grouping::{group_items, group_key, GroupedItems};
pub use io::{load_criteria, load_library, parse_library, save_criteria, LibraryFile, SetRecord};
pub use models::{
    Beatmap, BeatmapId, BeatmapMetadata, BeatmapSet, CarouselItem, Difficulty, GroupDefinition,
    Model, ModelRef, SetId,
};
pub use pipeline::run_filter;
pub use schema_validation::{validate_against_schema, validate_library_document};
pub use selection::{is_valid_for_group_selection, SelectionOutcome, SelectionState};
pub use sorting::{normalize_for_sorting, sort_items, strip_leading_articles};
pub use sync::{CollectionChange, CollectionSync};
pub use validation::validate_library;
