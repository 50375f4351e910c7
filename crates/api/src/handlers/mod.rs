//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the petition source or the tracking repository and
//! map errors via [`crate::error::AppError`].

pub mod petitions;
pub mod tracking;
