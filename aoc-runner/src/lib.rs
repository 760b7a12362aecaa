//! Run Advent of Code solvers and submit their answers
//!
//! A [`Runner`] fetches the puzzle page and input through a [`PuzzleSite`]
//! (cached in a [`FileCache`]), checks the solver on the examples found by
//! [`aoc_examples`], re-checks parts already solved, and hands the next
//! answer to a [`Submitter`], which refuses answers the attempt log already
//! proves wrong and waits out any cooldown the site asked for.
//!
//! Solvers register themselves with [`inventory`]:
//!
//! ```no_run
//! use aoc_runner::{AdditionalInfo, SolveError, SolverPlugin};
//!
//! fn solve(inputs: &[String], part: u8, _test: bool, _info: Option<&AdditionalInfo>) -> Result<String, SolveError> {
//!     match part {
//!         1 => Ok(inputs.iter().map(|l| l.len()).sum::<usize>().to_string()),
//!         _ => Err(SolveError::PartNotImplemented(part)),
//!     }
//! }
//!
//! inventory::submit! {
//!     SolverPlugin { year: 2015, day: 8, solver: &solve, tags: &[] }
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod site;
pub mod solver;
pub mod stats;
pub mod submission;

pub use aoc_examples::AdditionalInfo;
pub use cache::FileCache;
pub use clock::{Clock, SystemClock, countdown};
pub use config::{Config, ConfigError, RunOptions};
pub use error::{CacheError, IncorrectReason, RunError, SiteError, SolveError, SubmitError};
pub use report::{RunReport, SubmissionReport, SubmissionStatus};
pub use runner::Runner;
pub use site::PuzzleSite;
pub use solver::{Solver, SolverPlugin, find_solver, registered};
pub use stats::{DayStats, StatsBook};
pub use submission::{Confirm, SubmitOutcome, Submitter, TerminalPrompt};
