//! Result lines printed while running a day

use chrono::TimeDelta;
use std::fmt;

/// Format a duration for display
pub fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Time taken to solve a part, to the second
fn format_solve_time(d: TimeDelta) -> String {
    match TimeDelta::seconds(d.num_seconds()).to_std() {
        Ok(rounded) => humantime::format_duration(rounded).to_string(),
        Err(_) => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Example,
    /// Real input against an answer the site already accepted
    Regression,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Example => write!(f, "example"),
            CheckKind::Regression => write!(f, "regression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed { actual: String },
    NotImplemented,
}

/// One solver run compared with a known answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub kind: CheckKind,
    pub expected: String,
    pub outcome: CheckOutcome,
    pub elapsed: TimeDelta,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Passed
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, day, part) = (self.year, self.day, self.part);
        match &self.outcome {
            CheckOutcome::Passed => write!(
                f,
                "That's the right answer! {} ({} day {} part {}) ({}) ({})",
                self.expected,
                year,
                day,
                part,
                self.kind,
                format_duration(self.elapsed)
            ),
            CheckOutcome::Failed { actual } => write!(
                f,
                "That's not the right answer. Expected: {} actual: {} ({} day {} part {}) ({}) ({})",
                self.expected,
                actual,
                year,
                day,
                part,
                self.kind,
                format_duration(self.elapsed)
            ),
            CheckOutcome::NotImplemented => write!(
                f,
                "Part {} is not implemented ({} day {}) ({})",
                part, year, day, self.kind
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Accepted { solved_in: Option<TimeDelta> },
    /// Recoverable rejection, e.g. a wrong answer
    Rejected(String),
    Cancelled,
    /// Still throttled after the one retry; nothing was recorded
    RateLimited,
    NotImplemented,
}

/// What happened to the one answer a run may submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Option<String>,
    pub elapsed: TimeDelta,
    pub status: SubmissionStatus,
}

impl fmt::Display for SubmissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, day, part) = (self.year, self.day, self.part);
        let answer = self.answer.as_deref().unwrap_or_default();
        match &self.status {
            SubmissionStatus::Accepted { solved_in } => {
                write!(
                    f,
                    "That's the right answer! {} ({} day {} part {}) (new submission) ({})",
                    answer,
                    year,
                    day,
                    part,
                    format_duration(self.elapsed)
                )?;
                if let Some(solved_in) = solved_in {
                    write!(f, " (solved in {})", format_solve_time(*solved_in))?;
                }
                Ok(())
            }
            SubmissionStatus::Rejected(reason) => write!(
                f,
                "{} ({} day {} part {}) ({})",
                reason,
                year,
                day,
                part,
                format_duration(self.elapsed)
            ),
            SubmissionStatus::Cancelled => {
                write!(f, "Submission of {} cancelled ({} day {} part {})", answer, year, day, part)
            }
            SubmissionStatus::RateLimited => write!(
                f,
                "Answer {} not accepted yet, the site is still rate limiting ({} day {} part {}); try again later",
                answer, year, day, part
            ),
            SubmissionStatus::NotImplemented => {
                write!(f, "Part {} is not implemented ({} day {})", part, year, day)
            }
        }
    }
}

/// Everything one run checked and submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub year: u16,
    pub day: u8,
    pub checks: Vec<CheckResult>,
    pub submission: Option<SubmissionReport>,
}

impl RunReport {
    pub fn new(year: u16, day: u8) -> Self {
        Self {
            year,
            day,
            checks: Vec::new(),
            submission: None,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(CheckResult::passed)
    }
}

/// Print a check; failures also show the example they ran on
pub fn print_check(check: &CheckResult, inputs: &[String]) {
    println!("{}", check);
    if matches!(check.outcome, CheckOutcome::Failed { .. }) && check.kind == CheckKind::Example {
        println!("Example input:");
        for line in inputs {
            println!("{}", line);
        }
        println!("Expected answer: {}", check.expected);
    }
}
