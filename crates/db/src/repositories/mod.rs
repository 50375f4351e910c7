//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every method issues a single
//! statement.

pub mod tracked_petition_repo;

pub use tracked_petition_repo::TrackedPetitionRepo;
