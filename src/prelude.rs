//! Prelude module for bounded_date crate.
//!
//! Re-exports the chrono accessor traits and the derive_more macros used
//! across the crate.

#[allow(unused_imports)]
pub use chrono::{Datelike, Timelike};
#[allow(unused_imports)]
pub use derive_more::{Display, From, Into};
