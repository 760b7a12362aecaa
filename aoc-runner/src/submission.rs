//! Answer submission with local duplicate and bound checks
//!
//! Every attempt for a day is logged in `submissions/{year}/{day}.json` and
//! the latest attempt across all puzzles in `submissions/last.json`. A part
//! with a correct record is never submitted again, a rejected answer is
//! never resent, and numeric answers outside the range left by earlier
//! "too low"/"too high" replies are refused without asking the site.

use crate::cache::FileCache;
use crate::clock::{Clock, SystemClock, countdown};
use crate::error::{IncorrectReason, SubmitError};
use crate::site::PuzzleSite;
use crate::stats::{DayStats, StatsBook};
use aoc_http_client::{AnswerHint, SubmissionResult, parse_wait_duration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const LAST_SUBMISSION_KEY: &str = "submissions/last.json";

/// Wait used when a throttled reply does not say how long
const DEFAULT_THROTTLE_WAIT: Duration = Duration::from_secs(60);

pub fn submissions_key(year: u16, day: u8) -> String {
    format!("submissions/{}/{}.json", year, day)
}

/// What the site said was wrong with an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Problem {
    #[serde(rename = "too low")]
    TooLow,
    #[serde(rename = "too high")]
    TooHigh,
    #[serde(untagged)]
    Other(String),
}

/// One attempt at a part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub part: u8,
    pub answer: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<Problem>,
    /// Cooldown as the site phrased it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<String>,
}

/// Most recent attempt across every puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSubmission {
    pub year: u16,
    pub day: u8,
    #[serde(flatten)]
    pub record: SubmissionRecord,
}

impl LastSubmission {
    /// When the site accepts the next answer, if this attempt imposed a wait
    pub fn ready_at(&self) -> Option<DateTime<Utc>> {
        if self.record.correct {
            return None;
        }
        let wait = parse_wait_duration(self.record.wait.as_deref()?)?;
        let wait = chrono::Duration::from_std(wait).ok()?;
        self.record.timestamp.checked_add_signed(wait)
    }
}

/// Outcome of a submission that raised no error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user declined; nothing was sent or stored
    Cancelled,
    Accepted { message: String, stats: DayStats },
}

/// Interactive yes/no question
pub trait Confirm {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Asks on stdout and reads the reply from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        print!("{} [y/N] ", question);
        io::stdout().flush()?;
        let mut reply = String::new();
        io::stdin().lock().read_line(&mut reply)?;
        Ok(matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Submits answers through a [`PuzzleSite`], keeping the attempt log
pub struct Submitter<'a, C = SystemClock, P = TerminalPrompt> {
    site: &'a PuzzleSite<'a>,
    clock: C,
    prompt: P,
}

impl<'a> Submitter<'a> {
    pub fn new(site: &'a PuzzleSite<'a>) -> Self {
        Self {
            site,
            clock: SystemClock,
            prompt: TerminalPrompt,
        }
    }
}

impl<'a, C: Clock, P: Confirm> Submitter<'a, C, P> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Submitter<'a, C2, P> {
        Submitter {
            site: self.site,
            clock,
            prompt: self.prompt,
        }
    }

    pub fn with_prompt<P2: Confirm>(self, prompt: P2) -> Submitter<'a, C, P2> {
        Submitter {
            site: self.site,
            clock: self.clock,
            prompt,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn cache(&self) -> &'a FileCache {
        self.site.cache()
    }

    /// Submit `answer` for one part
    ///
    /// Local checks run first and never reach the network: a solved part is
    /// an [`SubmitError::AlreadySolved`] error, a repeated or out-of-bounds
    /// answer is [`SubmitError::Incorrect`]. Unless `auto_confirm` is set the
    /// user is asked first. The log, the last-submission marker and the
    /// statistics are written before returning.
    pub fn submit_answer(
        &self,
        year: u16,
        day: u8,
        part: u8,
        answer: &str,
        auto_confirm: bool,
    ) -> Result<SubmitOutcome, SubmitError> {
        let cache = self.cache();
        let stats = StatsBook::new(cache);
        let log_key = submissions_key(year, day);
        let mut log: Vec<SubmissionRecord> = cache.read_json(&log_key)?.unwrap_or_default();

        if log.iter().any(|record| record.part == part && record.correct) {
            return Err(SubmitError::AlreadySolved { year, day, part });
        }
        if let Err(reason) = check_history(&log, part, answer) {
            info!(year, day, part, answer, %reason, "Submission avoided");
            stats.avoided_attempt(year, day, part)?;
            return Err(SubmitError::Incorrect {
                answer: answer.to_string(),
                reason,
            });
        }

        if !auto_confirm {
            let question = format!("Submit {} for {} day {} part {}?", answer, year, day, part);
            if !self.prompt.confirm(&question).map_err(SubmitError::Prompt)? {
                debug!(year, day, part, "Submission cancelled");
                return Ok(SubmitOutcome::Cancelled);
            }
        }

        self.wait_for_cooldown()?;
        let result = self.post_with_retry(year, day, part, answer)?;
        let now = self.clock.now();

        match result {
            SubmissionResult::Correct { message } => {
                let record = SubmissionRecord {
                    part,
                    answer: answer.to_string(),
                    correct: true,
                    timestamp: now,
                    problem: None,
                    wait: None,
                };
                self.persist(year, day, &mut log, record)?;
                let day_stats = stats.finish(year, day, part, now)?;
                self.refresh_puzzle(year, day);
                info!(year, day, part, answer, "Answer accepted");
                Ok(SubmitOutcome::Accepted {
                    message,
                    stats: day_stats,
                })
            }
            SubmissionResult::WrongLevel { message } => {
                self.refresh_puzzle(year, day);
                stats.solved_elsewhere(year, day, part, now)?;
                Err(SubmitError::WrongLevel(message))
            }
            SubmissionResult::Incorrect {
                hint,
                cooldown,
                message,
            } => {
                let problem = match hint {
                    Some(AnswerHint::TooLow) => Problem::TooLow,
                    Some(AnswerHint::TooHigh) => Problem::TooHigh,
                    None => Problem::Other(message.clone()),
                };
                let record = SubmissionRecord {
                    part,
                    answer: answer.to_string(),
                    correct: false,
                    timestamp: now,
                    problem: Some(problem),
                    wait: cooldown.clone(),
                };
                self.persist(year, day, &mut log, record)?;
                stats.incorrect_attempt(year, day, part)?;
                Err(SubmitError::Incorrect {
                    answer: answer.to_string(),
                    reason: IncorrectReason::Rejected {
                        hint,
                        cooldown,
                        message,
                    },
                })
            }
            SubmissionResult::Throttled { .. } => Err(SubmitError::RateLimited),
        }
    }

    /// Honour the cooldown the previous rejection asked for
    fn wait_for_cooldown(&self) -> Result<(), SubmitError> {
        let last: Option<LastSubmission> = self.cache().read_json(LAST_SUBMISSION_KEY)?;
        let Some(ready_at) = last.as_ref().and_then(LastSubmission::ready_at) else {
            return Ok(());
        };
        if let Ok(wait) = (ready_at - self.clock.now()).to_std()
            && !wait.is_zero()
        {
            info!(wait = %humantime::format_duration(wait), "Waiting for previous cooldown");
            countdown(&self.clock, wait);
        }
        Ok(())
    }

    /// Post once more after an "answer too recently" reply
    fn post_with_retry(
        &self,
        year: u16,
        day: u8,
        part: u8,
        answer: &str,
    ) -> Result<SubmissionResult, SubmitError> {
        let result = self.site.post_answer(year, day, part, answer)?;
        let SubmissionResult::Throttled { wait_time } = result else {
            return Ok(result);
        };
        let wait = wait_time.unwrap_or(DEFAULT_THROTTLE_WAIT);
        warn!(year, day, part, wait = %humantime::format_duration(wait), "Answer submitted too recently");
        countdown(&self.clock, wait);
        Ok(self.site.post_answer(year, day, part, answer)?)
    }

    fn persist(
        &self,
        year: u16,
        day: u8,
        log: &mut Vec<SubmissionRecord>,
        record: SubmissionRecord,
    ) -> Result<(), SubmitError> {
        let cache = self.cache();
        log.push(record.clone());
        cache.write_json(&submissions_key(year, day), log)?;
        cache.write_json(LAST_SUBMISSION_KEY, &LastSubmission { year, day, record })?;
        Ok(())
    }

    fn refresh_puzzle(&self, year: u16, day: u8) {
        if let Err(e) = self.site.get_puzzle(year, day, true) {
            warn!(year, day, error = %e, "Failed to refresh puzzle page");
        }
    }
}

/// Refuse answers the log already proves wrong
fn check_history(log: &[SubmissionRecord], part: u8, answer: &str) -> Result<(), IncorrectReason> {
    let attempts = || log.iter().filter(|record| record.part == part && !record.correct);

    if let Some(prior) = attempts().find(|record| record.answer == answer) {
        return Err(IncorrectReason::Duplicate {
            submitted_at: prior.timestamp,
        });
    }

    let Ok(candidate) = answer.trim().parse::<i64>() else {
        return Ok(());
    };
    let bound = |problem: Problem| {
        attempts()
            .filter(move |record| record.problem.as_ref() == Some(&problem))
            .filter_map(|record| record.answer.trim().parse::<i64>().ok())
    };
    if let Some(low) = bound(Problem::TooLow).max()
        && candidate <= low
    {
        return Err(IncorrectReason::BelowBound { bound: low });
    }
    if let Some(high) = bound(Problem::TooHigh).min()
        && candidate >= high
    {
        return Err(IncorrectReason::AboveBound { bound: high });
    }
    Ok(())
}
