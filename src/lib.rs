//! Industrial part lookup across supplier catalogs.
//!
//! A search runs an ordered cascade of retrieval strategies (static fetch
//! with rotated fingerprints, a headless-browser render, alternate
//! suppliers) and falls back to placeholder records when none of them
//! produce anything.

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod parsers;
pub mod renderer;
pub mod scrapers;
pub mod search;
pub mod server;
pub mod utils;
