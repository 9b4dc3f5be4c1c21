use super::{CommandError, Result};
use crate::metadata::ElectionMetadata;
use colored::*;
use std::fs::OpenOptions;
use std::path::Path;

pub fn new_election(
    meta_path: &Path,
    name: &str,
    seats: usize,
    candidates: &[String],
    ballots: Option<String>,
    force: bool,
) -> Result<ElectionMetadata> {
    if meta_path.exists() && !force {
        return Err(CommandError::AlreadyExists(meta_path.to_path_buf()));
    }

    let metadata = ElectionMetadata {
        name: name.trim().to_string(),
        seats,
        candidates: candidates.iter().map(|c| c.trim().to_string()).collect(),
        ballots,
    };
    metadata.check()?;
    metadata.write(meta_path)?;

    // Existing ballots are kept.
    let ballots_path = metadata.ballots_path(meta_path);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&ballots_path)?;

    println!(
        "✅ Created election {} with {} candidates for {} seats: {}",
        metadata.name.bright_cyan(),
        metadata.candidates.len().to_string().bright_yellow(),
        metadata.seats.to_string().bright_yellow(),
        meta_path.display().to_string().bright_green()
    );
    println!("🗳️  Ballots will be read from {}", ballots_path.display());

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{tabulate, TabulateOptions};
    use crate::metadata::MetadataError;
    use crate::model::ElectionError;

    #[test]
    fn test_new_election_writes_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("club.json");
        let candidates = vec![" Alice ".to_string(), "Bob".to_string()];

        let created = new_election(&path, "Club", 1, &candidates, None, false).unwrap();
        assert_eq!(created.candidates, vec!["Alice", "Bob"]);
        assert_eq!(ElectionMetadata::read(&path).unwrap(), created);

        assert!(matches!(
            new_election(&path, "Club", 1, &candidates, None, false),
            Err(CommandError::AlreadyExists(_))
        ));
        assert!(new_election(&path, "Club", 2, &candidates, None, true).is_ok());
    }

    #[test]
    fn test_new_election_creates_ballot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("club.json");
        let candidates = vec!["Alice".to_string(), "Bob".to_string()];

        let created = new_election(&path, "Club", 1, &candidates, None, false).unwrap();
        let ballots_path = created.ballots_path(&path);
        assert_eq!(std::fs::read_to_string(&ballots_path).unwrap(), "");

        let options = TabulateOptions {
            quiet: true,
            ..TabulateOptions::default()
        };
        let result = tabulate(&path, &options).unwrap();
        assert_eq!(result.ballot_count, 0);
        assert!(result.elected.is_empty());

        std::fs::write(&ballots_path, "alice\n").unwrap();
        new_election(&path, "Club", 1, &candidates, None, true).unwrap();
        assert_eq!(std::fs::read_to_string(&ballots_path).unwrap(), "alice\n");
    }

    #[test]
    fn test_new_election_rejects_unusable_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("club.json");
        let candidates = vec!["Doe, Jane".to_string(), "Bob".to_string()];

        assert!(matches!(
            new_election(&path, "Club", 1, &candidates, None, false),
            Err(CommandError::Metadata(MetadataError::Election(
                ElectionError::UnusableCandidateName(_)
            )))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_new_election_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("club.json");
        let candidates = vec!["Alice".to_string()];

        assert!(matches!(
            new_election(&path, "Club", 0, &candidates, None, false),
            Err(CommandError::Metadata(MetadataError::InvalidSeats(_)))
        ));
        assert!(!path.exists());
    }
}
