//! Validation rules for tracking requests.

use crate::error::CoreError;
use crate::types::PetitionId;

/// Maximum length of the petition title snapshot stored with a tracking record.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Validate the fields of a new tracking record before it reaches the
/// database.
pub fn validate_track_request(
    petition_id: PetitionId,
    petition_title: &str,
    current_signatures: i64,
) -> Result<(), CoreError> {
    if petition_id <= 0 {
        return Err(CoreError::Validation(format!(
            "Invalid petitionId {petition_id}. Must be a positive integer"
        )));
    }

    if petition_title.trim().is_empty() {
        return Err(CoreError::Validation(
            "petitionTitle must not be empty".to_string(),
        ));
    }

    if petition_title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "petitionTitle exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }

    if current_signatures < 0 {
        return Err(CoreError::Validation(format!(
            "Invalid currentSignatures {current_signatures}. Must not be negative"
        )));
    }

    Ok(())
}

/// Parse a petition id taken from a URL path.
///
/// Upstream ids are positive integers; anything else cannot name a petition.
pub fn parse_petition_id(raw: &str) -> Option<PetitionId> {
    raw.parse::<PetitionId>().ok().filter(|id| *id > 0)
}
