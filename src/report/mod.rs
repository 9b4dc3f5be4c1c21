use crate::formats::RejectedBallot;
use crate::metadata::ElectionMetadata;
use crate::tabulator::result::{CandidateResult, ElectionResult, Outcome, RoundRecord};
use crate::util::write_serialized;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod transcript;

pub use transcript::TranscriptLine;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Full election report, serialized next to the plain transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionReport {
    pub info: ElectionInfo,
    #[serde(rename = "ballotCount")]
    pub ballot_count: usize,
    pub rejected: Vec<RejectedInfo>,
    pub quota: f64,
    pub results: Vec<RoundRecord>,
    pub summary: ResultSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionInfo {
    pub name: String,
    pub seats: usize,
    pub candidates: Vec<String>,
    #[serde(rename = "ballotsFile")]
    pub ballots_file: String,
    #[serde(rename = "ballotsHash")]
    pub ballots_hash: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedInfo {
    pub line: usize,
    pub text: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub elected: Vec<String>,
    pub candidates: Vec<CandidateResult>,
    pub outcome: Outcome,
    #[serde(rename = "totalRounds")]
    pub total_rounds: usize,
}

impl ElectionReport {
    pub fn new(
        metadata: &ElectionMetadata,
        ballots_file: &Path,
        ballots_hash: String,
        rejected: &[RejectedBallot],
        result: ElectionResult,
    ) -> ElectionReport {
        ElectionReport {
            info: ElectionInfo {
                name: metadata.name.clone(),
                seats: metadata.seats,
                candidates: metadata.candidates.clone(),
                ballots_file: ballots_file.display().to_string(),
                ballots_hash,
                generated_at: Utc::now(),
            },
            ballot_count: result.ballot_count,
            rejected: rejected
                .iter()
                .map(|r| RejectedInfo {
                    line: r.line,
                    text: r.text.clone(),
                    error: r.error.to_string(),
                })
                .collect(),
            quota: result.quota,
            summary: ResultSummary {
                elected: result.elected,
                candidates: result.candidates,
                outcome: result.outcome,
                total_rounds: result.rounds.len(),
            },
            results: result.rounds,
        }
    }
}

/// Write `<slug>.txt` and `<slug>.json` (or `.json.gz`) into `report_dir`.
/// Returns the paths written.
pub fn write_report(
    report_dir: &Path,
    slug: &str,
    lines: &[TranscriptLine],
    report: &ElectionReport,
    compress: bool,
) -> ReportResult<Vec<PathBuf>> {
    let text_path = report_dir.join(format!("{}.txt", slug));
    let json_path = report_dir.join(if compress {
        format!("{}.json.gz", slug)
    } else {
        format!("{}.json", slug)
    });

    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ReportError::Write { path, source }
    };

    std::fs::create_dir_all(report_dir).map_err(write_err(report_dir))?;
    std::fs::write(&text_path, transcript::plain_text(lines)).map_err(write_err(&text_path))?;
    write_serialized(&json_path, report).map_err(write_err(&json_path))?;

    Ok(vec![text_path, json_path])
}
