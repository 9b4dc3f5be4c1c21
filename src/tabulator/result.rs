use crate::model::CandidateStatus;
use serde::{Deserialize, Serialize};

/// One line of a round's standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub candidate: String,
    pub tally: f64,
    #[serde(rename = "displayTally")]
    pub display_tally: f64,
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elected {
    pub candidate: String,
    pub tally: f64,
    pub surplus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eliminated {
    pub candidate: String,
    pub tally: f64,
}

/// Everything that happened in one round of counting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    /// Seats already filled when the round started.
    #[serde(rename = "electedBefore")]
    pub elected_before: usize,
    /// Candidates neither elected nor eliminated when the round started.
    #[serde(rename = "remainingBefore")]
    pub remaining_before: usize,
    /// Active candidates after the recount, highest tally first. Statuses are
    /// as of the start of the round.
    pub standings: Vec<Standing>,
    pub elected: Option<Elected>,
    pub eliminated: Vec<Eliminated>,
    #[serde(rename = "exhaustedBallots")]
    pub exhausted_ballots: usize,
    #[serde(rename = "exhaustedWeight")]
    pub exhausted_weight: f64,
    /// Weight carried by ballots that still have a holder.
    #[serde(rename = "continuingWeight")]
    pub continuing_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnfilledReason {
    /// More seats than registered candidates.
    InsufficientCandidates,
    /// Every candidate was resolved before enough of them reached the quota.
    CandidatesExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    Complete,
    Unfilled {
        seats: usize,
        filled: usize,
        reason: UnfilledReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    pub status: CandidateStatus,
    pub tally: f64,
    #[serde(rename = "displayTally")]
    pub display_tally: f64,
    /// Round in which the candidate was elected or eliminated.
    pub round: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub seats: usize,
    #[serde(rename = "ballotCount")]
    pub ballot_count: usize,
    pub quota: f64,
    pub rounds: Vec<RoundRecord>,
    /// All candidates, highest final tally first.
    pub candidates: Vec<CandidateResult>,
    /// Winners in the order they were elected.
    pub elected: Vec<String>,
    pub outcome: Outcome,
}

impl ElectionResult {
    pub fn candidate(&self, name: &str) -> Option<&CandidateResult> {
        let key = crate::model::normalize_name(name);
        self.candidates
            .iter()
            .find(|c| crate::model::normalize_name(&c.name) == key)
    }
}
