//! Turning catalog markup into part records.
//!
//! Every lookup goes through ordered locator lists so that a layout change on
//! a supplier's site degrades to a less specific selector instead of failing.

pub mod assembler;
pub mod document;
pub mod field;
pub mod locator;

pub use assembler::{FieldLocators, LocatorSpec, RecordAssembler};
pub use document::{DocumentParser, LayoutPolicy};
pub use field::extract_field;
pub use locator::{css_chain, currency_first_chain, CssLocator, CurrencyTextLocator, Locator, LocatorChain};
