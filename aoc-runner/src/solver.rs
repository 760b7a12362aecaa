//! Solver callback and plugin registration

use crate::error::SolveError;
use aoc_examples::AdditionalInfo;

/// A puzzle solver for both parts of one day
///
/// `inputs` holds the input lines, `test` is true while running examples and
/// `info` carries any additional parameters the puzzle text states.
pub trait Solver: Sync {
    fn solve(
        &self,
        inputs: &[String],
        part: u8,
        test: bool,
        info: Option<&AdditionalInfo>,
    ) -> Result<String, SolveError>;
}

impl<F> Solver for F
where
    F: Fn(&[String], u8, bool, Option<&AdditionalInfo>) -> Result<String, SolveError> + Sync,
{
    fn solve(
        &self,
        inputs: &[String],
        part: u8,
        test: bool,
        info: Option<&AdditionalInfo>,
    ) -> Result<String, SolveError> {
        self(inputs, part, test, info)
    }
}

/// Plugin entry collected at link time
///
/// # Example
///
/// ```
/// use aoc_runner::{AdditionalInfo, SolveError, SolverPlugin};
///
/// fn day1(
///     inputs: &[String],
///     part: u8,
///     _test: bool,
///     _info: Option<&AdditionalInfo>,
/// ) -> Result<String, SolveError> {
///     match part {
///         1 => Ok(inputs.len().to_string()),
///         _ => Err(SolveError::PartNotImplemented(part)),
///     }
/// }
///
/// inventory::submit! {
///     SolverPlugin { year: 2015, day: 1, solver: &day1, tags: &["easy"] }
/// }
/// ```
pub struct SolverPlugin {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    pub solver: &'static dyn Solver,
    /// Optional tags for filtering
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

/// The registered solver for a day, if any
pub fn find_solver(year: u16, day: u8) -> Option<&'static SolverPlugin> {
    inventory::iter::<SolverPlugin>().find(|plugin| plugin.year == year && plugin.day == day)
}

/// Every registered plugin ordered by year and day
pub fn registered() -> Vec<&'static SolverPlugin> {
    let mut plugins: Vec<_> = inventory::iter::<SolverPlugin>().collect();
    plugins.sort_by_key(|plugin| (plugin.year, plugin.day));
    plugins
}
