use super::{CandidateId, ElectionError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical lookup key for a candidate name: trimmed, lowercased, with inner
/// whitespace runs collapsed to a single space.
pub fn normalize_name(name: &str) -> String {
    lazy_static! {
        static ref WHITESPACE_RX: Regex = Regex::new(r"\s+").unwrap();
    }

    WHITESPACE_RX
        .replace_all(name.trim(), " ")
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Hopeful,
    Elected,
    Eliminated,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    name: String,
    key: String,
    tally: f64,
    display_tally: f64,
    elected: bool,
    eliminated: bool,
}

impl Candidate {
    fn new(name: &str) -> Candidate {
        Candidate {
            name: name.trim().to_string(),
            key: normalize_name(name),
            tally: 0.0,
            display_tally: 0.0,
            elected: false,
            eliminated: false,
        }
    }

    /// Name as registered (trimmed, original case).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tally(&self) -> f64 {
        self.tally
    }

    /// Tally shown in reports. Pinned to the quota once the candidate is
    /// elected.
    pub fn display_tally(&self) -> f64 {
        self.display_tally
    }

    pub fn is_elected(&self) -> bool {
        self.elected
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Neither elected nor eliminated.
    pub fn is_hopeful(&self) -> bool {
        !self.elected && !self.eliminated
    }

    pub fn status(&self) -> CandidateStatus {
        if self.elected {
            CandidateStatus::Elected
        } else if self.eliminated {
            CandidateStatus::Eliminated
        } else {
            CandidateStatus::Hopeful
        }
    }
}

/// All candidates of one election plus the active pool used for ballot
/// routing and last-place detection.
///
/// `active` holds every candidate that has not been eliminated (elected
/// candidates stay in it) and is kept in standing order: it is re-sorted in
/// place each round, so ties keep the order of the previous round.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    candidates: Vec<Candidate>,
    index: HashMap<String, CandidateId>,
    active: Vec<CandidateId>,
}

impl CandidateRegistry {
    pub fn new() -> CandidateRegistry {
        CandidateRegistry::default()
    }

    pub fn register(&mut self, name: &str) -> Result<CandidateId> {
        let candidate = Candidate::new(name);
        if candidate.key.is_empty() {
            return Err(ElectionError::EmptyCandidateName);
        }
        // Ballot files separate names with ',' and skip '#' lines.
        if candidate.name.contains(',') || candidate.name.starts_with('#') {
            return Err(ElectionError::UnusableCandidateName(candidate.name));
        }
        if self.index.contains_key(&candidate.key) {
            return Err(ElectionError::DuplicateCandidate(candidate.name));
        }

        let id = CandidateId(self.candidates.len());
        self.index.insert(candidate.key.clone(), id);
        self.candidates.push(candidate);
        self.active.push(id);

        Ok(id)
    }

    /// Case-insensitive lookup among all registered candidates, eliminated
    /// ones included. This is the pool ballots are validated against.
    pub fn find(&self, name: &str) -> Option<CandidateId> {
        self.index.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// All candidates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &Candidate)> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (CandidateId(i), c))
    }

    /// Non-eliminated candidates in current standing order.
    pub fn active(&self) -> &[CandidateId] {
        &self.active
    }

    /// Active candidates that are not yet elected, in standing order.
    pub fn hopefuls(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.active
            .iter()
            .copied()
            .filter(move |id| !self[*id].elected)
    }

    pub fn elected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.elected).count()
    }

    /// Zero the tally of every candidate still in the running. Elected
    /// candidates keep theirs for surplus computation; eliminated candidates
    /// keep the tally they were eliminated with.
    pub fn reset_round_tallies(&mut self) {
        for candidate in self.candidates.iter_mut().filter(|c| c.is_hopeful()) {
            candidate.tally = 0.0;
            candidate.display_tally = 0.0;
        }
    }

    pub(crate) fn credit(&mut self, id: CandidateId, weight: f64) {
        let candidate = &mut self.candidates[id.0];
        candidate.tally += weight;
        if !candidate.elected {
            candidate.display_tally = candidate.tally;
        }
    }

    /// Stable sort of the active pool by tally, highest first.
    pub fn sort_by_tally_descending(&mut self) {
        let candidates = &self.candidates;
        self.active
            .sort_by(|a, b| candidates[b.0].tally.total_cmp(&candidates[a.0].tally));
    }

    /// Every candidate sorted by tally, highest first; ties keep registration
    /// order.
    pub fn standings_all(&self) -> Vec<CandidateId> {
        let mut all: Vec<CandidateId> = (0..self.candidates.len()).map(CandidateId).collect();
        all.sort_by(|a, b| {
            self.candidates[b.0]
                .tally
                .total_cmp(&self.candidates[a.0].tally)
        });
        all
    }

    /// Returns false if the candidate was already elected.
    pub fn mark_elected(&mut self, id: CandidateId, quota: f64) -> bool {
        let candidate = &mut self.candidates[id.0];
        if candidate.elected || candidate.eliminated {
            return false;
        }
        candidate.elected = true;
        candidate.display_tally = quota;
        true
    }

    /// Returns false if the candidate was already eliminated. Elected
    /// candidates cannot be eliminated.
    pub fn mark_eliminated(&mut self, id: CandidateId) -> bool {
        let candidate = &mut self.candidates[id.0];
        if candidate.eliminated || candidate.elected {
            return false;
        }
        candidate.eliminated = true;
        self.active.retain(|active| *active != id);
        true
    }
}

impl std::ops::Index<CandidateId> for CandidateRegistry {
    type Output = Candidate;

    fn index(&self, id: CandidateId) -> &Candidate {
        &self.candidates[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> CandidateRegistry {
        let mut registry = CandidateRegistry::new();
        for name in names {
            registry.register(name).unwrap();
        }
        registry
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  John   Doe "), "john doe");
        assert_eq!(normalize_name("ALICE"), "alice");
        assert_eq!(normalize_name("\t"), "");
    }

    #[test]
    fn test_register_rejects_duplicates_case_insensitively() {
        let mut registry = registry(&["Alice"]);
        assert_eq!(
            registry.register(" alice "),
            Err(ElectionError::DuplicateCandidate("alice".to_string()))
        );
        assert_eq!(registry.register("  "), Err(ElectionError::EmptyCandidateName));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_names_ballot_files_cannot_hold() {
        let mut registry = registry(&["Alice"]);
        assert_eq!(
            registry.register("Doe, Jane"),
            Err(ElectionError::UnusableCandidateName("Doe, Jane".to_string()))
        );
        assert_eq!(
            registry.register(" #1 Fan"),
            Err(ElectionError::UnusableCandidateName("#1 Fan".to_string()))
        );
        assert!(registry.register("Fan #1").is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_find_pools() {
        let mut registry = registry(&["Alice", "Bob"]);
        let bob = registry.find("BOB").unwrap();
        assert_eq!(registry[bob].name(), "Bob");

        assert!(registry.mark_eliminated(bob));
        assert_eq!(registry.find("bob"), Some(bob));
        assert!(registry[bob].is_eliminated());
        assert_eq!(registry.active(), &[CandidateId(0)]);
        assert_eq!(registry.find("carol"), None);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut registry = registry(&["A", "B", "C", "D"]);
        registry.credit(CandidateId(1), 2.0);
        registry.credit(CandidateId(2), 1.0);
        registry.credit(CandidateId(3), 1.0);
        registry.sort_by_tally_descending();

        assert_eq!(
            registry.active(),
            &[CandidateId(1), CandidateId(2), CandidateId(3), CandidateId(0)]
        );
    }

    #[test]
    fn test_state_transitions_are_idempotent() {
        let mut registry = registry(&["A", "B"]);
        registry.credit(CandidateId(0), 4.0);

        assert!(registry.mark_elected(CandidateId(0), 2.5));
        assert!(!registry.mark_elected(CandidateId(0), 2.5));
        assert!(!registry.mark_eliminated(CandidateId(0)));
        assert_eq!(registry[CandidateId(0)].display_tally(), 2.5);
        assert_eq!(registry[CandidateId(0)].tally(), 4.0);

        assert!(registry.mark_eliminated(CandidateId(1)));
        assert!(!registry.mark_eliminated(CandidateId(1)));
        assert!(!registry.mark_elected(CandidateId(1), 2.5));
        assert_eq!(registry.elected_count(), 1);
    }

    #[test]
    fn test_reset_keeps_elected_and_eliminated_tallies() {
        let mut registry = registry(&["A", "B", "C"]);
        registry.credit(CandidateId(0), 3.0);
        registry.credit(CandidateId(1), 2.0);
        registry.credit(CandidateId(2), 1.0);
        registry.mark_elected(CandidateId(0), 2.0);
        registry.mark_eliminated(CandidateId(2));

        registry.reset_round_tallies();

        assert_eq!(registry[CandidateId(0)].tally(), 3.0);
        assert_eq!(registry[CandidateId(1)].tally(), 0.0);
        assert_eq!(registry[CandidateId(2)].tally(), 1.0);
        assert_eq!(registry.hopefuls().collect::<Vec<_>>(), vec![CandidateId(1)]);
    }
}
