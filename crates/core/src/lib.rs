//! Domain types and pure logic shared by every petitions crate.
//!
//! Nothing in here performs I/O: the query pipeline, milestone rules and
//! input validation are plain functions so they can be tested without a
//! database or the upstream API.

pub mod clock;
pub mod error;
pub mod milestone;
pub mod petition;
pub mod query;
pub mod tracking;
pub mod types;
