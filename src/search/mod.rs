//! The search cascade: ordered strategies, normalization and the
//! placeholder fallback.

pub mod fallback;
pub mod normalize;
pub mod orchestrator;

pub use normalize::Normalizer;
pub use orchestrator::{Orchestrator, SearchOutcome};
