//! Filter, search and sort pipeline for petition list requests.
//!
//! The upstream API can filter by state and paginate, nothing more. Every
//! other option a client asks for is applied here to the page that comes
//! back, in a fixed order: search, signature range, then sort.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::milestone::{DEBATE_THRESHOLD, RESPONSE_THRESHOLD};
use crate::petition::{Petition, PetitionsEnvelope};

/* --------------------------------------------------------------------------
Option enums
-------------------------------------------------------------------------- */

/// Petition state filter. Everything but `All` is forwarded upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetitionStatus {
    #[default]
    All,
    Open,
    Closed,
    Rejected,
    AwaitingResponse,
}

impl PetitionStatus {
    pub const VALID: &'static [&'static str] =
        &["all", "open", "closed", "rejected", "awaiting_response"];

    pub fn as_str(self) -> &'static str {
        match self {
            PetitionStatus::All => "all",
            PetitionStatus::Open => "open",
            PetitionStatus::Closed => "closed",
            PetitionStatus::Rejected => "rejected",
            PetitionStatus::AwaitingResponse => "awaiting_response",
        }
    }

    /// Value of the upstream `state` parameter, if any.
    pub fn upstream_state(self) -> Option<&'static str> {
        match self {
            PetitionStatus::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for PetitionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PetitionStatus::All),
            "open" => Ok(PetitionStatus::Open),
            "closed" => Ok(PetitionStatus::Closed),
            "rejected" => Ok(PetitionStatus::Rejected),
            "awaiting_response" => Ok(PetitionStatus::AwaitingResponse),
            other => Err(invalid_option("status", other, Self::VALID)),
        }
    }
}

/// Sort order applied to the fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetitionSort {
    /// Most signatures first.
    #[default]
    SignatureCount,
    /// Most recently created first.
    CreatedAt,
    /// Earliest `closed_at` first; petitions without one go last.
    ClosingSoon,
}

impl PetitionSort {
    pub const VALID: &'static [&'static str] = &["signature_count", "created_at", "closing_soon"];

    pub fn as_str(self) -> &'static str {
        match self {
            PetitionSort::SignatureCount => "signature_count",
            PetitionSort::CreatedAt => "created_at",
            PetitionSort::ClosingSoon => "closing_soon",
        }
    }

    fn compare(self, a: &Petition, b: &Petition) -> Ordering {
        let (a, b) = (&a.attributes, &b.attributes);
        match self {
            PetitionSort::SignatureCount => b.signature_count.cmp(&a.signature_count),
            PetitionSort::CreatedAt => b.created_at.cmp(&a.created_at),
            PetitionSort::ClosingSoon => match (a.closed_at, b.closed_at) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl FromStr for PetitionSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signature_count" => Ok(PetitionSort::SignatureCount),
            "created_at" => Ok(PetitionSort::CreatedAt),
            "closing_soon" => Ok(PetitionSort::ClosingSoon),
            other => Err(invalid_option("sort", other, Self::VALID)),
        }
    }
}

/// Signature-count bucket. Buckets include their lower bound and exclude
/// their upper bound; `Over100k` has no upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureRange {
    #[default]
    All,
    Under10k,
    From10kTo100k,
    Over100k,
}

impl SignatureRange {
    pub const VALID: &'static [&'static str] = &["all", "under_10k", "10k_to_100k", "over_100k"];

    /// The three named buckets, which partition all signature counts.
    pub const BUCKETS: [SignatureRange; 3] = [
        SignatureRange::Under10k,
        SignatureRange::From10kTo100k,
        SignatureRange::Over100k,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignatureRange::All => "all",
            SignatureRange::Under10k => "under_10k",
            SignatureRange::From10kTo100k => "10k_to_100k",
            SignatureRange::Over100k => "over_100k",
        }
    }

    pub fn contains(self, signature_count: i64) -> bool {
        match self {
            SignatureRange::All => true,
            SignatureRange::Under10k => signature_count < RESPONSE_THRESHOLD,
            SignatureRange::From10kTo100k => {
                (RESPONSE_THRESHOLD..DEBATE_THRESHOLD).contains(&signature_count)
            }
            SignatureRange::Over100k => signature_count >= DEBATE_THRESHOLD,
        }
    }
}

impl FromStr for SignatureRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SignatureRange::All),
            "under_10k" => Ok(SignatureRange::Under10k),
            "10k_to_100k" => Ok(SignatureRange::From10kTo100k),
            "over_100k" => Ok(SignatureRange::Over100k),
            other => Err(invalid_option("signatureRange", other, Self::VALID)),
        }
    }
}

fn invalid_option(name: &str, value: &str, valid: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "Invalid {name} '{value}'. Must be one of: {}",
        valid.join(", ")
    ))
}

/* --------------------------------------------------------------------------
Query
-------------------------------------------------------------------------- */

/// A validated petition list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionQuery {
    pub status: PetitionStatus,
    pub sort: PetitionSort,
    pub signature_range: SignatureRange,
    pub search: String,
    pub page: u32,
}

impl Default for PetitionQuery {
    fn default() -> Self {
        Self {
            status: PetitionStatus::default(),
            sort: PetitionSort::default(),
            signature_range: SignatureRange::default(),
            search: String::new(),
            page: 1,
        }
    }
}

impl PetitionQuery {
    /// Build a query from raw query-string values, applying defaults for
    /// anything absent. Fails on the first invalid value.
    pub fn from_params(
        status: Option<&str>,
        sort: Option<&str>,
        signature_range: Option<&str>,
        search: Option<&str>,
        page: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            status: status
                .map(str::parse::<PetitionStatus>)
                .transpose()?
                .unwrap_or_default(),
            sort: sort
                .map(str::parse::<PetitionSort>)
                .transpose()?
                .unwrap_or_default(),
            signature_range: signature_range
                .map(str::parse::<SignatureRange>)
                .transpose()?
                .unwrap_or_default(),
            search: search.unwrap_or_default().to_string(),
            page: page.map(parse_page).transpose()?.unwrap_or(1),
        })
    }

    /// Upstream path for this query, e.g. `/petitions.json?state=open&page=2`.
    pub fn endpoint(&self) -> String {
        match self.status.upstream_state() {
            Some(state) => format!("/petitions.json?state={state}&page={}", self.page),
            None => format!("/petitions.json?page={}", self.page),
        }
    }

    /// Apply search, signature range and sort to a fetched page.
    ///
    /// `links` and `meta` are left as the upstream sent them.
    pub fn apply(&self, mut envelope: PetitionsEnvelope) -> PetitionsEnvelope {
        let petitions = filter_by_search(std::mem::take(&mut envelope.data), &self.search);
        let mut petitions = filter_by_signature_range(petitions, self.signature_range);
        sort_petitions(&mut petitions, self.sort);
        envelope.data = petitions;
        envelope
    }
}

impl fmt::Display for PetitionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status={} sort={} signatureRange={} page={}",
            self.status.as_str(),
            self.sort.as_str(),
            self.signature_range.as_str(),
            self.page
        )
    }
}

fn parse_page(raw: &str) -> Result<u32, CoreError> {
    match raw.trim().parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(CoreError::Validation(format!(
            "Invalid page '{raw}'. Must be a positive integer"
        ))),
    }
}

/* --------------------------------------------------------------------------
Pipeline steps
-------------------------------------------------------------------------- */

/// Case-insensitive substring match against action, background and
/// additional details.
pub fn matches_search(petition: &Petition, term_lower: &str) -> bool {
    let attrs = &petition.attributes;
    let hit = |text: &str| text.to_lowercase().contains(term_lower);

    hit(attrs.action.as_str())
        || attrs.background.as_deref().is_some_and(hit)
        || attrs.additional_details.as_deref().is_some_and(hit)
}

/// Keep petitions matching `term`. An empty term keeps everything.
pub fn filter_by_search(petitions: Vec<Petition>, term: &str) -> Vec<Petition> {
    if term.is_empty() {
        return petitions;
    }
    let term_lower = term.to_lowercase();
    petitions
        .into_iter()
        .filter(|p| matches_search(p, &term_lower))
        .collect()
}

pub fn filter_by_signature_range(petitions: Vec<Petition>, range: SignatureRange) -> Vec<Petition> {
    if range == SignatureRange::All {
        return petitions;
    }
    petitions
        .into_iter()
        .filter(|p| range.contains(p.attributes.signature_count))
        .collect()
}

/// Stable sort; ties keep their upstream order.
pub fn sort_petitions(petitions: &mut [Petition], sort: PetitionSort) {
    petitions.sort_by(|a, b| sort.compare(a, b));
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
