pub mod ballot;
pub mod candidate;

pub use ballot::{validate, Ballot, BallotRegistry};
pub use candidate::{normalize_name, Candidate, CandidateRegistry, CandidateStatus};

use serde::{Deserialize, Serialize};

/// Stable handle for a registered candidate. Indexes into the registry in
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub usize);

/// Stable handle for an accepted ballot, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallotId(pub usize);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BallotError {
    #[error("ballot is empty")]
    Empty,
    #[error("ballot is malformed: {0}")]
    Malformed(String),
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElectionError {
    #[error("Duplicate candidate: {0}")]
    DuplicateCandidate(String),
    #[error("Candidate names cannot be empty")]
    EmptyCandidateName,
    #[error("Candidate name {0:?} cannot contain ',' or start with '#'")]
    UnusableCandidateName(String),
    #[error("Invalid ballot #{index}: {source}")]
    InvalidBallot { index: usize, source: BallotError },
    #[error("An election needs at least one seat")]
    NoSeats,
}

pub type Result<T> = std::result::Result<T, ElectionError>;
