// src/specs/mod.rs
//! # Page specs
//!
//! One module per registry page family. Each spec encodes *which table holds
//! the ground truth* (by header tokens, never by position) and *how to read a
//! row of it* into the record types in [`crate::data`].
//!
//! ## What lives here
//! - Header-token sets for each table and the column-name candidates.
//! - Row → record shaping, including date canonicalization and status.
//! - Following links (firm → person) when the caller asks for it.
//!
//! ## What does **not** live here
//! - Fan-out, pacing, progress: see `scrape`.
//! - Normalization, validation, persistence: see `transform`, `validate`,
//!   `store`.
//!
//! ## Conventions
//! - Structural surprises degrade: a missing table yields an empty list, a
//!   missing optional column yields empty strings. Only a failed fetch turns
//!   into "no record".
//! - Every spec exposes a pure `parse_*` over page text so it can be tested
//!   offline against captured HTML.

pub mod firm;
pub mod list;
pub mod person;

pub use firm::FirmDetailParser;
pub use list::parse_list;
pub use person::PersonHistoryParser;
