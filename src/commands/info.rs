use super::Result;
use crate::formats::{load_ballots, read_ballot_lines};
use crate::metadata::ElectionMetadata;
use crate::tabulator::quota;
use crate::util::file_hash;
use colored::*;
use std::path::Path;

/// Summary printed by the `info` command.
#[derive(Debug)]
pub struct ElectionSummary {
    pub metadata: ElectionMetadata,
    pub ballot_count: usize,
    pub rejected: usize,
    pub quota: f64,
    pub ballots_hash: Option<String>,
}

/// Validate an election definition and its ballot file and dump what they
/// contain. A missing ballot file counts as no ballots.
pub fn info(meta_path: &Path) -> Result<ElectionSummary> {
    let metadata = ElectionMetadata::read(meta_path)?;
    let candidates = metadata.candidate_registry()?;
    let ballots_path = metadata.ballots_path(meta_path);

    println!("🗳️  {}", metadata.name.bright_cyan().bold());
    println!("Seats: {}", metadata.seats.to_string().bright_yellow());
    println!("Candidates:");
    for (id, candidate) in candidates.iter() {
        println!("  {}. {}", id.0 + 1, candidate.name());
    }

    let (ballot_count, rejected, ballots_hash) = if ballots_path.exists() {
        let lines = read_ballot_lines(&ballots_path)?;
        let loaded = load_ballots(&lines, &candidates);
        for rejected in &loaded.rejected {
            eprintln!(
                "{}",
                format!("❌ Line {}: {} ({})", rejected.line, rejected.text, rejected.error).red()
            );
        }
        (
            loaded.ballots.len(),
            loaded.rejected.len(),
            Some(file_hash(&ballots_path)?),
        )
    } else {
        eprintln!(
            "⚠️  No ballot file at {}",
            ballots_path.display().to_string().yellow()
        );
        (0, 0, None)
    };

    let quota = quota(ballot_count, metadata.seats);

    println!(
        "Ballots: {} valid, {} rejected ({})",
        ballot_count.to_string().bright_green(),
        rejected.to_string().bright_red(),
        ballots_path.display()
    );
    if let Some(hash) = &ballots_hash {
        println!("SHA-1: {}", hash);
    }
    println!("Quota: {:.6}", quota);

    Ok(ElectionSummary {
        metadata,
        ballot_count,
        rejected,
        quota,
        ballots_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_counts_ballots() {
        let dir = tempfile::tempdir().unwrap();
        let meta_path = dir.path().join("club.json");
        let metadata = ElectionMetadata {
            name: "Club".to_string(),
            seats: 2,
            candidates: vec!["Alice".to_string(), "Bob".to_string()],
            ballots: None,
        };
        metadata.write(&meta_path).unwrap();

        let summary = info(&meta_path).unwrap();
        assert_eq!(summary.ballot_count, 0);
        assert_eq!(summary.ballots_hash, None);

        std::fs::write(
            dir.path().join("club.csv"),
            "alice, bob\nbob\ncarol\n",
        )
        .unwrap();

        let summary = info(&meta_path).unwrap();
        assert_eq!(summary.ballot_count, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.quota, 2.0 / 3.0);
        assert!(summary.ballots_hash.is_some());
    }
}
