mod enter;
mod info;
mod new;
mod tabulate;

pub use enter::enter;
pub use info::info;
pub use new::new_election;
pub use tabulate::{tabulate, TabulateOptions};

use crate::formats::FormatError;
use crate::metadata::MetadataError;
use crate::model::ElectionError;
use crate::report::ReportError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Election(#[from] ElectionError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{count} invalid ballots in {} (use --skip-invalid to ignore them)", path.display())]
    RejectedBallots { count: usize, path: PathBuf },
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, CommandError>;
