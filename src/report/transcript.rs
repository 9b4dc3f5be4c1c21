use crate::model::CandidateStatus;
use crate::tabulator::result::{ElectionResult, Outcome, RoundRecord, UnfilledReason};
use colored::*;

/// One line of the human-readable election transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptLine {
    Title(String),
    Heading(String),
    Text(String),
    Standing {
        position: usize,
        name: String,
        tally: f64,
        status: CandidateStatus,
    },
    Elected(String),
    Eliminated(String),
    Summary(String),
    Blank,
}

impl TranscriptLine {
    pub fn plain(&self) -> String {
        match self {
            TranscriptLine::Title(s)
            | TranscriptLine::Heading(s)
            | TranscriptLine::Text(s)
            | TranscriptLine::Elected(s)
            | TranscriptLine::Eliminated(s)
            | TranscriptLine::Summary(s) => s.clone(),
            TranscriptLine::Standing {
                position,
                name,
                tally,
                status,
            } => format!("{}. {}: {:.6}{}", position, name, tally, marker(*status)),
            TranscriptLine::Blank => String::new(),
        }
    }

    pub fn colored(&self) -> String {
        match self {
            TranscriptLine::Title(s) => format!("🗳️  {}", s.bright_cyan().bold()),
            TranscriptLine::Heading(s) => s.bright_yellow().bold().to_string(),
            TranscriptLine::Text(s) => s.clone(),
            TranscriptLine::Standing {
                position,
                name,
                tally,
                status,
            } => {
                let line = format!(
                    "{}. {}: {}",
                    position,
                    name,
                    format!("{:.6}", tally).bright_white()
                );
                match status {
                    CandidateStatus::Elected => format!("{}{}", line, marker(*status).green()),
                    CandidateStatus::Eliminated => format!("{}{}", line, marker(*status).red()),
                    CandidateStatus::Hopeful => line,
                }
            }
            TranscriptLine::Elected(s) => format!("✅ {}", s.bright_green()),
            TranscriptLine::Eliminated(s) => format!("❌ {}", s.red()),
            TranscriptLine::Summary(s) => s.bright_green().bold().to_string(),
            TranscriptLine::Blank => String::new(),
        }
    }
}

fn marker(status: CandidateStatus) -> &'static str {
    match status {
        CandidateStatus::Elected => "\t ELECTED",
        CandidateStatus::Eliminated => "\t ELIMINATED",
        CandidateStatus::Hopeful => "",
    }
}

/// "a", "a and b", "a, b and c".
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

pub fn header_lines(
    name: &str,
    quota: f64,
    ballot_count: usize,
    seats: usize,
) -> Vec<TranscriptLine> {
    vec![
        TranscriptLine::Title(name.to_string()),
        TranscriptLine::Text(format!(
            "In order to be elected, a candidate must receive more than {:.6} votes. {} ballots have been cast for {} seats.",
            quota, ballot_count, seats
        )),
        TranscriptLine::Blank,
    ]
}

pub fn round_lines(round: &RoundRecord) -> Vec<TranscriptLine> {
    let mut lines = vec![
        TranscriptLine::Heading(format!("ROUND {} VOTES:", round.round)),
        TranscriptLine::Text(format!(
            "{} candidates have been elected. There are {} candidates remaining.",
            round.elected_before, round.remaining_before
        )),
    ];

    lines.extend(
        round
            .standings
            .iter()
            .enumerate()
            .map(|(i, standing)| TranscriptLine::Standing {
                position: i + 1,
                name: standing.candidate.clone(),
                tally: standing.display_tally,
                status: standing.status,
            }),
    );

    if round.exhausted_ballots > 0 {
        lines.push(TranscriptLine::Text(format!(
            "{} ballots are exhausted ({:.6} votes).",
            round.exhausted_ballots, round.exhausted_weight
        )));
    }

    if let Some(elected) = &round.elected {
        lines.push(TranscriptLine::Elected(format!(
            "{} has been elected with {:.6} votes. Their {:.6} surplus votes will be redistributed to other candidates in later rounds.",
            elected.candidate, elected.tally, elected.surplus
        )));
    }
    for eliminated in &round.eliminated {
        lines.push(TranscriptLine::Eliminated(format!(
            "{} has been eliminated. Their {:.6} votes will be redistributed to other candidates in later rounds.",
            eliminated.candidate, eliminated.tally
        )));
    }

    lines.push(TranscriptLine::Blank);
    lines
}

pub fn summary_lines(result: &ElectionResult) -> Vec<TranscriptLine> {
    let mut lines = vec![TranscriptLine::Heading(
        "The final tally of the election is:".to_string(),
    )];

    lines.extend(
        result
            .candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| TranscriptLine::Standing {
                position: i + 1,
                name: candidate.name.clone(),
                tally: candidate.display_tally,
                status: candidate.status,
            }),
    );
    lines.push(TranscriptLine::Blank);

    let summary = match result.elected.len() {
        0 => "No candidates have been elected.".to_string(),
        1 => format!("Candidate {} has been elected.", result.elected[0]),
        _ => format!(
            "Candidates {} have been elected.",
            join_names(&result.elected)
        ),
    };
    lines.push(TranscriptLine::Summary(summary));

    if let Outcome::Unfilled {
        seats,
        filled,
        reason,
    } = result.outcome
    {
        let why = match reason {
            UnfilledReason::InsufficientCandidates => "there are fewer candidates than seats",
            UnfilledReason::CandidatesExhausted => {
                "no remaining candidate could exceed the quota"
            }
        };
        lines.push(TranscriptLine::Text(format!(
            "Only {} of {} seats have been filled: {}.",
            filled, seats, why
        )));
    }

    lines
}

/// The full transcript: header, every round, and the final tally.
pub fn transcript(name: &str, result: &ElectionResult) -> Vec<TranscriptLine> {
    let mut lines = header_lines(name, result.quota, result.ballot_count, result.seats);
    for round in &result.rounds {
        lines.extend(round_lines(round));
    }
    lines.extend(summary_lines(result));
    lines
}

pub fn plain_text(lines: &[TranscriptLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.plain());
        text.push('\n');
    }
    text
}
