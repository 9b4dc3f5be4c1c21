//! Single transferable vote tabulation.
//!
//! Each round recounts every ballot from scratch: hopeful candidates start
//! the round at zero, every ballot advances its cursor past eliminated and
//! elected candidates, and the first hopeful left on it is credited with the
//! ballot's weight. Passing an elected candidate scales the weight down to
//! that candidate's surplus fraction. At most one candidate is elected per
//! round; a round that elects nobody eliminates the last-placed hopeful.

pub mod result;

use crate::model::{Ballot, BallotRegistry, CandidateId, CandidateRegistry, ElectionError, Result};
use itertools::Itertools;
use log::debug;
use result::{
    CandidateResult, Elected, Eliminated, ElectionResult, Outcome, RoundRecord, Standing,
    UnfilledReason,
};

/// Droop quota as a real number: `ballots / (seats + 1)`. A candidate must
/// strictly exceed it to be elected.
pub fn quota(ballot_count: usize, seats: usize) -> f64 {
    ballot_count as f64 / (seats + 1) as f64
}

/// Share of an elected candidate's tally that passes on to later
/// preferences. Never negative; zero for a zero tally.
pub fn surplus_fraction(tally: f64, quota: f64) -> f64 {
    if tally <= 0.0 {
        return 0.0;
    }
    (tally - quota).max(0.0) / tally
}

/// Move the ballot's cursor to its first hopeful preference and return it,
/// or `None` once the ranking is used up.
fn advance(
    ballot: &mut Ballot,
    candidates: &CandidateRegistry,
    quota: f64,
) -> Option<CandidateId> {
    while let Some(&id) = ballot.ranking.get(ballot.cursor) {
        let candidate = &candidates[id];
        if candidate.is_eliminated() {
            ballot.cursor += 1;
        } else if candidate.is_elected() {
            ballot.weight = ballot
                .weight
                .min(surplus_fraction(candidate.tally(), quota));
            ballot.cursor += 1;
        } else {
            return Some(id);
        }
    }
    None
}

struct Recount {
    exhausted_ballots: usize,
    exhausted_weight: f64,
    continuing_weight: f64,
}

/// Owns both registries for the duration of an election and drives it one
/// round at a time.
#[derive(Debug, Clone)]
pub struct Tabulator {
    candidates: CandidateRegistry,
    ballots: BallotRegistry,
    seats: usize,
    quota: f64,
    rounds: Vec<RoundRecord>,
    resolved_in: Vec<Option<usize>>,
    elected_order: Vec<CandidateId>,
}

impl Tabulator {
    /// The quota is fixed here from the ballots already accepted.
    pub fn new(
        candidates: CandidateRegistry,
        ballots: BallotRegistry,
        seats: usize,
    ) -> Result<Tabulator> {
        if seats == 0 {
            return Err(ElectionError::NoSeats);
        }

        let quota = quota(ballots.len(), seats);
        debug!(
            "Tabulating {} ballots for {} seats among {} candidates (quota {:.4})",
            ballots.len(),
            seats,
            candidates.len(),
            quota
        );

        Ok(Tabulator {
            resolved_in: vec![None; candidates.len()],
            candidates,
            ballots,
            seats,
            quota,
            rounds: Vec::new(),
            elected_order: Vec::new(),
        })
    }

    pub fn quota(&self) -> f64 {
        self.quota
    }

    pub fn seats(&self) -> usize {
        self.seats
    }

    pub fn candidates(&self) -> &CandidateRegistry {
        &self.candidates
    }

    pub fn ballots(&self) -> &BallotRegistry {
        &self.ballots
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// All seats are filled or nobody is left to decide on.
    pub fn is_done(&self) -> bool {
        self.candidates.elected_count() >= self.seats
            || self.candidates.hopefuls().next().is_none()
    }

    /// Run a single round. Returns `None` once the election is over.
    pub fn step(&mut self) -> Option<&RoundRecord> {
        if self.is_done() {
            return None;
        }

        let round = self.rounds.len() + 1;
        let elected_before = self.candidates.elected_count();
        let remaining_before = self.candidates.hopefuls().count();

        let recount = self.recount();
        self.candidates.sort_by_tally_descending();

        let standings: Vec<Standing> = self
            .candidates
            .active()
            .iter()
            .map(|&id| {
                let candidate = &self.candidates[id];
                Standing {
                    candidate: candidate.name().to_string(),
                    tally: candidate.tally(),
                    display_tally: candidate.display_tally(),
                    status: candidate.status(),
                }
            })
            .collect();

        // Decide against the sorted snapshot, then apply.
        let to_elect = if elected_before < self.seats {
            self.candidates
                .hopefuls()
                .find(|&id| self.candidates[id].tally() > self.quota)
        } else {
            None
        };

        let to_eliminate: Vec<CandidateId> = match to_elect {
            Some(winner) if elected_before + 1 == self.seats => self
                .candidates
                .hopefuls()
                .filter(|&id| id != winner)
                .collect(),
            Some(_) => Vec::new(),
            None => self.candidates.hopefuls().last().into_iter().collect(),
        };

        let elected = to_elect.map(|id| {
            self.candidates.mark_elected(id, self.quota);
            self.resolved_in[id.0] = Some(round);
            self.elected_order.push(id);

            let candidate = &self.candidates[id];
            debug!(
                "Round {}: {} elected with {:.4} (surplus {:.4})",
                round,
                candidate.name(),
                candidate.tally(),
                candidate.tally() - self.quota
            );
            Elected {
                candidate: candidate.name().to_string(),
                tally: candidate.tally(),
                surplus: candidate.tally() - self.quota,
            }
        });

        let eliminated = to_eliminate
            .into_iter()
            .map(|id| {
                self.candidates.mark_eliminated(id);
                self.resolved_in[id.0] = Some(round);

                let candidate = &self.candidates[id];
                debug!(
                    "Round {}: {} eliminated with {:.4}",
                    round,
                    candidate.name(),
                    candidate.tally()
                );
                Eliminated {
                    candidate: candidate.name().to_string(),
                    tally: candidate.tally(),
                }
            })
            .collect();

        self.rounds.push(RoundRecord {
            round,
            elected_before,
            remaining_before,
            standings,
            elected,
            eliminated,
            exhausted_ballots: recount.exhausted_ballots,
            exhausted_weight: recount.exhausted_weight,
            continuing_weight: recount.continuing_weight,
        });

        self.rounds.last()
    }

    /// Run rounds until the election is over.
    pub fn run(mut self) -> ElectionResult {
        while self.step().is_some() {}
        self.into_result()
    }

    /// Snapshot of the election as it stands.
    pub fn into_result(self) -> ElectionResult {
        let candidates = self
            .candidates
            .standings_all()
            .into_iter()
            .map(|id| {
                let candidate = &self.candidates[id];
                CandidateResult {
                    name: candidate.name().to_string(),
                    status: candidate.status(),
                    tally: candidate.tally(),
                    display_tally: candidate.display_tally(),
                    round: self.resolved_in[id.0],
                }
            })
            .collect_vec();

        let filled = self.elected_order.len();
        let outcome = if filled >= self.seats {
            Outcome::Complete
        } else if self.seats > self.candidates.len() {
            Outcome::Unfilled {
                seats: self.seats,
                filled,
                reason: UnfilledReason::InsufficientCandidates,
            }
        } else {
            Outcome::Unfilled {
                seats: self.seats,
                filled,
                reason: UnfilledReason::CandidatesExhausted,
            }
        };

        let elected = self
            .elected_order
            .iter()
            .map(|&id| self.candidates[id].name().to_string())
            .collect_vec();

        ElectionResult {
            seats: self.seats,
            ballot_count: self.ballots.len(),
            quota: self.quota,
            rounds: self.rounds,
            elected,
            candidates,
            outcome,
        }
    }

    fn recount(&mut self) -> Recount {
        self.candidates.reset_round_tallies();

        let mut recount = Recount {
            exhausted_ballots: 0,
            exhausted_weight: 0.0,
            continuing_weight: 0.0,
        };

        for ballot in self.ballots.all_mut() {
            let holder = advance(ballot, &self.candidates, self.quota);
            ballot.holder = holder;
            match holder {
                Some(id) => {
                    self.candidates.credit(id, ballot.weight);
                    recount.continuing_weight += ballot.weight;
                }
                None => {
                    recount.exhausted_ballots += 1;
                    recount.exhausted_weight += ballot.weight;
                }
            }
        }

        recount
    }
}

/// Register candidates, validate and accept every ballot, and run the
/// election to completion.
///
/// Fails on the first duplicate candidate or invalid ballot; nothing is
/// tabulated in that case.
pub fn run_election<C, B, T>(
    candidate_names: &[C],
    seats: usize,
    ballots: &[B],
) -> Result<ElectionResult>
where
    C: AsRef<str>,
    B: AsRef<[T]>,
    T: AsRef<str>,
{
    let mut candidates = CandidateRegistry::new();
    for name in candidate_names {
        candidates.register(name.as_ref())?;
    }

    let mut registry = BallotRegistry::new();
    for (index, ranking) in ballots.iter().enumerate() {
        let ranking: &[T] = ranking.as_ref();
        registry
            .submit(ranking, &candidates)
            .map_err(|source| ElectionError::InvalidBallot { index, source })?;
    }

    Ok(Tabulator::new(candidates, registry, seats)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota() {
        assert_eq!(quota(5, 1), 2.5);
        assert!((quota(10, 2) - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(quota(0, 3), 0.0);
    }

    #[test]
    fn test_surplus_fraction() {
        assert_eq!(surplus_fraction(4.0, 3.0), 0.25);
        assert_eq!(surplus_fraction(2.0, 3.0), 0.0);
        assert_eq!(surplus_fraction(0.0, 3.0), 0.0);
        assert_eq!(surplus_fraction(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_zero_seats_rejected() {
        let result = Tabulator::new(CandidateRegistry::new(), BallotRegistry::new(), 0);
        assert_eq!(result.unwrap_err(), ElectionError::NoSeats);
    }

    #[test]
    fn test_advance_skips_resolved_candidates() {
        let mut candidates = CandidateRegistry::new();
        let a = candidates.register("A").unwrap();
        let b = candidates.register("B").unwrap();
        let c = candidates.register("C").unwrap();
        candidates.credit(a, 4.0);
        candidates.mark_elected(a, 3.0);
        candidates.mark_eliminated(b);

        let mut ballots = BallotRegistry::new();
        ballots.accept(vec![a, b, c]);
        ballots.accept(vec![b]);

        let ballots = ballots.all_mut();
        assert_eq!(advance(&mut ballots[0], &candidates, 3.0), Some(c));
        assert_eq!(ballots[0].cursor(), 2);
        assert_eq!(ballots[0].weight(), 0.25);

        assert_eq!(advance(&mut ballots[1], &candidates, 3.0), None);
        assert!(ballots[1].is_exhausted());
        assert_eq!(ballots[1].weight(), 1.0);
    }

    #[test]
    fn test_weight_never_increases() {
        let mut candidates = CandidateRegistry::new();
        let a = candidates.register("A").unwrap();
        let b = candidates.register("B").unwrap();
        let c = candidates.register("C").unwrap();
        candidates.credit(a, 4.0);
        candidates.mark_elected(a, 3.0);
        candidates.credit(b, 6.0);
        candidates.mark_elected(b, 3.0);

        let mut ballots = BallotRegistry::new();
        ballots.accept(vec![a, b, c]);

        let ballot = &mut ballots.all_mut()[0];
        assert_eq!(advance(ballot, &candidates, 3.0), Some(c));
        assert_eq!(ballot.weight(), 0.25);
    }

    #[test]
    fn test_step_stops_when_done() {
        let mut candidates = CandidateRegistry::new();
        let a = candidates.register("A").unwrap();
        let mut ballots = BallotRegistry::new();
        ballots.accept(vec![a]);

        let mut tabulator = Tabulator::new(candidates, ballots, 1).unwrap();
        let first = tabulator.step().cloned().unwrap();
        assert_eq!(first.round, 1);
        assert_eq!(first.elected.unwrap().candidate, "A");
        assert!(tabulator.is_done());
        assert!(tabulator.step().is_none());
        assert_eq!(tabulator.rounds().len(), 1);
    }
}
