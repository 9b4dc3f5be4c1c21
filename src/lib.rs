//! Single transferable vote tabulation for ranked ballots.
//!
//! ```
//! use stv_tally::tabulator::run_election;
//!
//! let ballots = vec![
//!     vec!["a", "b"],
//!     vec!["a", "b"],
//!     vec!["b", "c"],
//!     vec!["b", "c"],
//!     vec!["c", "a"],
//! ];
//! let result = run_election(&["a", "b", "c"], 1, &ballots).unwrap();
//! assert_eq!(result.elected, vec!["a".to_string()]);
//! ```

pub mod commands;
pub mod formats;
pub mod metadata;
pub mod model;
pub mod report;
pub mod tabulator;
pub mod util;

pub use model::{BallotError, ElectionError};
pub use tabulator::result::ElectionResult;
pub use tabulator::{run_election, Tabulator};
