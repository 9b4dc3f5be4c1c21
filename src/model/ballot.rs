use super::{BallotError, BallotId, CandidateId, CandidateRegistry};

/// A ranked ballot together with its tabulation cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    pub(crate) ranking: Vec<CandidateId>,
    pub(crate) cursor: usize,
    pub(crate) holder: Option<CandidateId>,
    pub(crate) weight: f64,
}

impl Ballot {
    fn new(ranking: Vec<CandidateId>) -> Ballot {
        Ballot {
            ranking,
            cursor: 0,
            holder: None,
            weight: 1.0,
        }
    }

    /// Preferences, most preferred first.
    pub fn ranking(&self) -> &[CandidateId] {
        &self.ranking
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Candidate currently credited with this ballot.
    pub fn holder(&self) -> Option<CandidateId> {
        self.holder
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Every preference has been consumed; the ballot no longer counts.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.ranking.len()
    }
}

/// Check that every entry of a ranking names a registered candidate.
///
/// Lookup is against the full candidate pool, so a ballot naming an
/// eliminated candidate is still valid.
pub fn validate<S: AsRef<str>>(
    raw_ranking: &[S],
    candidates: &CandidateRegistry,
) -> Result<Vec<CandidateId>, BallotError> {
    if raw_ranking.is_empty() {
        return Err(BallotError::Empty);
    }

    raw_ranking
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(BallotError::Malformed(format!(
                    "preference {} is blank",
                    position + 1
                )));
            }
            candidates
                .find(name)
                .ok_or_else(|| BallotError::UnknownCandidate(name.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct BallotRegistry {
    ballots: Vec<Ballot>,
}

impl BallotRegistry {
    pub fn new() -> BallotRegistry {
        BallotRegistry::default()
    }

    /// Append an already validated ranking.
    pub fn accept(&mut self, ranking: Vec<CandidateId>) -> BallotId {
        let id = BallotId(self.ballots.len());
        self.ballots.push(Ballot::new(ranking));
        id
    }

    /// Validate then accept. Rejected rankings leave the registry untouched.
    pub fn submit<S: AsRef<str>>(
        &mut self,
        raw_ranking: &[S],
        candidates: &CandidateRegistry,
    ) -> Result<BallotId, BallotError> {
        let ranking = validate(raw_ranking, candidates)?;
        Ok(self.accept(ranking))
    }

    /// Ballots in insertion order.
    pub fn all(&self) -> &[Ballot] {
        &self.ballots
    }

    pub(crate) fn all_mut(&mut self) -> &mut [Ballot] {
        &mut self.ballots
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }
}

impl std::ops::Index<BallotId> for BallotRegistry {
    type Output = Ballot;

    fn index(&self, id: BallotId) -> &Ballot {
        &self.ballots[id.0]
    }
}
