pub mod part;
pub mod supplier;

pub use part::*;
pub use supplier::*;

/// Note attached to every placeholder record.
pub const SAMPLE_NOTE: &str = "Sample data - real scraping in progress";
