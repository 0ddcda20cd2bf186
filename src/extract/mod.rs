//! Derivation of structured records from pipeline run logs.
//!
//! Both extractors are pure: they take the `log` lines of a run response and
//! return records, leaving all file writing to [`crate::saver`].

pub mod clean;
pub mod recipe;
pub mod store_items;
