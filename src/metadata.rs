use crate::model::{CandidateRegistry, ElectionError};
use crate::util::write_serialized;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid election file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Election {0:?} must have at least one seat")]
    InvalidSeats(String),
    #[error(transparent)]
    Election(#[from] ElectionError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Election definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionMetadata {
    pub name: String,
    pub seats: usize,
    pub candidates: Vec<String>,
    /// Ballot file, relative to the metadata file. Defaults to
    /// `<slug>.csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballots: Option<String>,
}

/// File-name friendly form of an election name.
pub fn slug(name: &str) -> String {
    crate::model::normalize_name(name).replace(' ', "-")
}

impl ElectionMetadata {
    pub fn read(path: &Path) -> Result<ElectionMetadata> {
        let file = File::open(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata: ElectionMetadata = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| MetadataError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        metadata.check()?;
        Ok(metadata)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_serialized(path, self).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Seats are positive and candidate names are unique.
    pub fn check(&self) -> Result<()> {
        if self.seats == 0 {
            return Err(MetadataError::InvalidSeats(self.name.clone()));
        }
        self.candidate_registry()?;
        Ok(())
    }

    pub fn candidate_registry(&self) -> std::result::Result<CandidateRegistry, ElectionError> {
        let mut registry = CandidateRegistry::new();
        for name in &self.candidates {
            registry.register(name)?;
        }
        Ok(registry)
    }

    pub fn slug(&self) -> String {
        slug(&self.name)
    }

    /// Location of the ballot file for a metadata file at `meta_path`.
    pub fn ballots_path(&self, meta_path: &Path) -> PathBuf {
        let file_name = self
            .ballots
            .clone()
            .unwrap_or_else(|| format!("{}.csv", self.slug()));
        meta_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ElectionMetadata {
        ElectionMetadata {
            name: "Student  Council 2022".to_string(),
            seats: 2,
            candidates: vec!["Alice".to_string(), "Bob".to_string()],
            ballots: None,
        }
    }

    #[test]
    fn test_ballots_path_defaults_to_slug() {
        let meta = metadata();
        assert_eq!(meta.slug(), "student-council-2022");
        assert_eq!(
            meta.ballots_path(Path::new("elections/council.json")),
            PathBuf::from("elections/student-council-2022.csv")
        );

        let meta = ElectionMetadata {
            ballots: Some("votes.txt".to_string()),
            ..metadata()
        };
        assert_eq!(
            meta.ballots_path(Path::new("elections/council.json")),
            PathBuf::from("elections/votes.txt")
        );
    }

    #[test]
    fn test_check() {
        assert!(metadata().check().is_ok());

        let no_seats = ElectionMetadata {
            seats: 0,
            ..metadata()
        };
        assert!(matches!(no_seats.check(), Err(MetadataError::InvalidSeats(_))));

        let duplicate = ElectionMetadata {
            candidates: vec!["Alice".to_string(), "ALICE".to_string()],
            ..metadata()
        };
        assert!(matches!(
            duplicate.check(),
            Err(MetadataError::Election(ElectionError::DuplicateCandidate(_)))
        ));
    }

    #[test]
    fn test_read_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("council.json");
        metadata().write(&path).unwrap();

        assert_eq!(ElectionMetadata::read(&path).unwrap(), metadata());

        std::fs::write(&path, r#"{"name": "x", "seats": 1}"#).unwrap();
        assert!(matches!(
            ElectionMetadata::read(&path),
            Err(MetadataError::Json { .. })
        ));
    }
}
