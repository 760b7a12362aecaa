//! Error types for running solvers and submitting answers

use aoc_examples::ExampleError;
use aoc_http_client::{AnswerHint, AocError};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a solver for one part
#[derive(Debug, Error)]
pub enum SolveError {
    /// The requested part is not written yet
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// An error occurred while solving the part
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from the on-disk cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Nothing stored under the key
    #[error("`{0}` is not cached")]
    NotCached(String),

    /// Key is empty or escapes the cache directory
    #[error("Invalid cache key `{0}`")]
    InvalidKey(String),

    #[error("Cache IO failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored JSON no longer matches its format
    #[error("Corrupt cache entry `{key}`: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to obtain a page from the site or the cache
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Http(#[from] AocError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Why an answer counts as incorrect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncorrectReason {
    /// The same answer was already rejected
    Duplicate { submitted_at: DateTime<Utc> },
    /// A rejected answer at or above this one was too low
    BelowBound { bound: i64 },
    /// A rejected answer at or below this one was too high
    AboveBound { bound: i64 },
    /// The site rejected the answer
    Rejected {
        hint: Option<AnswerHint>,
        cooldown: Option<String>,
        message: String,
    },
}

impl fmt::Display for IncorrectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncorrectReason::Duplicate { submitted_at } => {
                write!(f, "already submitted at {}", submitted_at.to_rfc3339())
            }
            IncorrectReason::BelowBound { bound } => {
                write!(f, "too low, {} was already too low", bound)
            }
            IncorrectReason::AboveBound { bound } => {
                write!(f, "too high, {} was already too high", bound)
            }
            IncorrectReason::Rejected { hint, cooldown, message } => {
                match hint {
                    Some(AnswerHint::TooLow) => write!(f, "too low")?,
                    Some(AnswerHint::TooHigh) => write!(f, "too high")?,
                    None => write!(f, "{}", message)?,
                }
                if let Some(wait) = cooldown {
                    write!(f, " (wait {} before trying again)", wait)?;
                }
                Ok(())
            }
        }
    }
}

/// Errors from [`crate::Submitter::submit_answer`]
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The part already has a correct answer; submitting again is a bug
    #[error("{year} day {day} part {part} is already solved")]
    AlreadySolved { year: u16, day: u8, part: u8 },

    #[error("That's not the right answer: {answer} ({reason})")]
    Incorrect { answer: String, reason: IncorrectReason },

    /// The site says this part is not the current level
    #[error("{0}")]
    WrongLevel(String),

    /// Still throttled after waiting once
    #[error("Answer submitted too recently, even after waiting; try again later")]
    RateLimited,

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),
}

impl SubmitError {
    /// Errors the run can report and carry on from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SubmitError::Incorrect { .. } | SubmitError::WrongLevel(_) | SubmitError::RateLimited
        )
    }
}

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Examples(#[from] ExampleError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Solver failed on {year} day {day} part {part}: {source}")]
    Solver {
        year: u16,
        day: u8,
        part: u8,
        #[source]
        source: SolveError,
    },

    #[error("No solver registered for {0} day {1}")]
    NoSolver(u16, u8),
}
