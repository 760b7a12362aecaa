//! Example extraction for Advent of Code puzzle pages
//!
//! Puzzle descriptions embed small worked examples. This crate finds them,
//! either through a per-puzzle override record ([`database`]) or through the
//! search heuristics in [`heuristic`], and normalizes them into [`Example`]s.
//!
//! ```no_run
//! use aoc_examples::{ExampleDatabase, ExampleExtractor, Markup};
//!
//! let extractor = ExampleExtractor::new(ExampleDatabase::builtin()?);
//! let page = Markup::parse("<article><p>For example:</p><pre><code>1\n2\n</code></pre></article>");
//! let examples = extractor.get_examples(2015, 1, false, &page, &[], &[])?;
//! # Ok::<(), aoc_examples::ExampleError>(())
//! ```

pub mod database;
pub mod error;
pub mod example;
pub mod heuristic;
pub mod markup;
pub mod transform;

pub use database::{ExampleDatabase, ExampleRecord};
pub use error::{ExampleError, Slot, TransformError};
pub use example::{AdditionalInfo, Example, ExampleExtractor, trim_trailing_blank};
pub use heuristic::accepted_answers;
pub use markup::Markup;
