//! Plain-text ballot files: one ballot per line, candidate names separated by
//! commas, most preferred first.
//!
//! ```text
//! # student council
//! alice, bob
//! Carol, Alice, Bob
//! ```

use crate::model::{BallotError, BallotRegistry, CandidateRegistry};
use nom::bytes::complete::take_till;
use nom::character::complete::char;
use nom::combinator::{all_consuming, map};
use nom::multi::separated_list1;
use nom::IResult;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {source}")]
    Ballot { line: usize, source: BallotError },
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// A non-blank, non-comment line of a ballot file.
#[derive(Debug, Clone, PartialEq)]
pub struct BallotLine {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedBallot {
    pub line: usize,
    pub text: String,
    pub error: BallotError,
}

/// Ballots accepted from a file, plus the lines that failed validation.
#[derive(Debug)]
pub struct LoadedBallots {
    pub ballots: BallotRegistry,
    pub rejected: Vec<RejectedBallot>,
}

fn preference(input: &str) -> IResult<&str, &str> {
    map(take_till(|c: char| c == ','), str::trim)(input)
}

fn ranking(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char(','), preference))(input)
}

/// Split a ballot line into trimmed candidate names. Blank entries are kept
/// so that validation can reject them.
pub fn parse_ranking(line: &str) -> std::result::Result<Vec<String>, BallotError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(BallotError::Empty);
    }

    match ranking(line) {
        Ok((_, names)) => Ok(names.into_iter().map(str::to_string).collect()),
        Err(e) => Err(BallotError::Malformed(e.to_string())),
    }
}

/// Inverse of [`parse_ranking`].
pub fn format_ranking<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| name.as_ref().trim())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn read_ballot_lines(path: &Path) -> Result<Vec<BallotLine>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(BallotLine {
            line: i + 1,
            text: trimmed.to_string(),
        });
    }

    Ok(lines)
}

/// Parse and validate every line, accepting the valid ones in file order.
pub fn load_ballots(lines: &[BallotLine], candidates: &CandidateRegistry) -> LoadedBallots {
    let mut ballots = BallotRegistry::new();
    let mut rejected = Vec::new();

    for line in lines {
        let result = parse_ranking(&line.text)
            .and_then(|ranking| ballots.submit(&ranking, candidates).map(|_| ()));

        if let Err(error) = result {
            log::warn!("Rejected ballot on line {}: {}", line.line, error);
            rejected.push(RejectedBallot {
                line: line.line,
                text: line.text.clone(),
                error,
            });
        }
    }

    log::info!(
        "Loaded {} ballots ({} rejected)",
        ballots.len(),
        rejected.len()
    );

    LoadedBallots { ballots, rejected }
}

/// Read a ballot file, failing on the first invalid line.
pub fn read_ballots(path: &Path, candidates: &CandidateRegistry) -> Result<BallotRegistry> {
    let lines = read_ballot_lines(path)?;
    let loaded = load_ballots(&lines, candidates);

    match loaded.rejected.into_iter().next() {
        Some(rejected) => Err(FormatError::Ballot {
            line: rejected.line,
            source: rejected.error,
        }),
        None => Ok(loaded.ballots),
    }
}

/// Append one ballot to a ballot file, creating it if needed.
pub fn append_ballot<S: AsRef<str>>(path: &Path, ranking: &[S]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", format_ranking(ranking))?;
    Ok(())
}
