//! Read-through access to the UK Parliament petitions API.
//!
//! [`api::PetitionsApi`] performs the HTTP calls, [`cache::FetchCache`] keeps
//! recent payloads for a short TTL, and [`service::PetitionSource`] combines
//! the two with the query pipeline from `petitions_core`.

pub mod api;
pub mod cache;
pub mod service;

pub use api::{PetitionsApi, SourceError, UpstreamFetch};
pub use cache::{CacheConfig, FetchCache};
pub use service::PetitionSource;
