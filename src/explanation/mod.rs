//! Explanation Builder
//!
//! Turns criterion results into short machine-generated reasons of the form
//! `"<reason_key>:<label text>"`, e.g. `"rainfall:below optimal"`.

pub mod builder;

pub use builder::{ExplanationBuilder, INSUFFICIENT_DATA};
