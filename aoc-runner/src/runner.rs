//! Runs a solver on examples, checks solved parts and submits the next one

use crate::clock::{Clock, SystemClock};
use crate::config::RunOptions;
use crate::error::{RunError, SolveError, SubmitError};
use crate::report::{
    CheckKind, CheckOutcome, CheckResult, RunReport, SubmissionReport, SubmissionStatus,
    print_check,
};
use crate::site::PuzzleSite;
use crate::solver::Solver;
use crate::stats::StatsBook;
use crate::submission::{Confirm, SubmitOutcome, Submitter, TerminalPrompt};
use aoc_examples::{
    AdditionalInfo, Example, ExampleExtractor, ExampleRecord, Markup, accepted_answers,
};
use chrono::TimeDelta;
use std::time::Instant;
use tracing::{debug, info};

pub struct Runner<'a, C = SystemClock, P = TerminalPrompt> {
    site: &'a PuzzleSite<'a>,
    extractor: &'a ExampleExtractor,
    submitter: Submitter<'a, C, P>,
    overrides: Vec<ExampleRecord>,
    extra_tests: Vec<Example>,
}

impl<'a> Runner<'a> {
    pub fn new(site: &'a PuzzleSite<'a>, extractor: &'a ExampleExtractor) -> Self {
        Self {
            site,
            extractor,
            submitter: Submitter::new(site),
            overrides: Vec::new(),
            extra_tests: Vec::new(),
        }
    }
}

impl<'a, C: Clock, P: Confirm> Runner<'a, C, P> {
    pub fn with_submitter<C2: Clock, P2: Confirm>(
        self,
        submitter: Submitter<'a, C2, P2>,
    ) -> Runner<'a, C2, P2> {
        Runner {
            site: self.site,
            extractor: self.extractor,
            submitter,
            overrides: self.overrides,
            extra_tests: self.extra_tests,
        }
    }

    /// Records that win over the built-in example database
    pub fn with_overrides(mut self, records: Vec<ExampleRecord>) -> Self {
        self.overrides = records;
        self
    }

    /// Hand-written examples appended to the extracted ones
    pub fn with_extra_tests(mut self, tests: Vec<Example>) -> Self {
        self.extra_tests = tests;
        self
    }

    /// Run `solver` for one day
    ///
    /// Parts the site already accepted are re-solved and compared with the
    /// accepted answer. The first unsolved part is solved on the examples and,
    /// when they all pass, on the real input and submitted. At most one answer
    /// is submitted per run.
    pub fn run(
        &self,
        year: u16,
        day: u8,
        solver: &dyn Solver,
        options: &RunOptions,
    ) -> Result<RunReport, RunError> {
        let puzzle = self.site.get_puzzle(year, day, options.force_refresh)?;
        let markup = Markup::parse(&puzzle);
        let accepted = accepted_answers(&markup);
        debug!(year, day, accepted = accepted.len(), "Accepted answers on page");
        let stats = StatsBook::new(self.site.cache());
        let now = self.submitter.clock().now();
        match accepted.len() {
            0 => {
                stats.start_part1(year, day, now)?;
            }
            1 if day != 25 => {
                stats.start_part2(year, day, now)?;
            }
            _ => {}
        }

        let examples = self.extractor.get_examples(
            year,
            day,
            accepted.is_empty(),
            &markup,
            &self.overrides,
            &self.extra_tests,
        )?;
        let mut report = RunReport::new(year, day);

        if options.tests_only {
            for part in [1u8, 2] {
                if options.wants(part) && (part == 1 || !accepted.is_empty()) {
                    self.check_examples(&mut report, part, &examples, solver)?;
                }
            }
            return Ok(report);
        }

        let inputs = self.site.get_input(year, day, false)?;
        for part in [1u8, 2] {
            if part == 2 && day == 25 {
                break;
            }
            let info = self
                .extractor
                .database()
                .input_additional_info(year, day, part, &markup)?;

            if let Some(expected) = accepted.get(usize::from(part - 1)) {
                if !options.wants(part) {
                    continue;
                }
                let passed = self.check(
                    &mut report,
                    part,
                    CheckKind::Regression,
                    &inputs,
                    expected,
                    info.as_ref(),
                    solver,
                )?;
                if !passed {
                    self.check_examples(&mut report, part, &examples, solver)?;
                    break;
                }
                continue;
            }

            if options.wants(part)
                && (options.skip_tests || self.check_examples(&mut report, part, &examples, solver)?)
            {
                let submission = self.solve_and_submit(year, day, part, &inputs, info.as_ref(), solver, options)?;
                println!("{}", submission);
                report.submission = Some(submission);
            }
            break;
        }
        Ok(report)
    }

    /// Run every example of a part; no examples counts as passing
    fn check_examples(
        &self,
        report: &mut RunReport,
        part: u8,
        examples: &[Example],
        solver: &dyn Solver,
    ) -> Result<bool, RunError> {
        let selected: Vec<&Example> = examples.iter().filter(|e| e.part == part).collect();
        if selected.is_empty() {
            println!(
                "Sorry, no examples found for {} day {} part {}",
                report.year, report.day, part
            );
            return Ok(true);
        }

        let mut all_passed = true;
        for example in selected {
            all_passed &= self.check(
                report,
                part,
                CheckKind::Example,
                &example.inputs,
                &example.answer,
                example.additional_info.as_ref(),
                solver,
            )?;
        }
        Ok(all_passed)
    }

    #[allow(clippy::too_many_arguments)]
    fn check(
        &self,
        report: &mut RunReport,
        part: u8,
        kind: CheckKind,
        inputs: &[String],
        expected: &str,
        info: Option<&AdditionalInfo>,
        solver: &dyn Solver,
    ) -> Result<bool, RunError> {
        let (year, day) = (report.year, report.day);
        let (answer, elapsed) = timed(|| solver.solve(inputs, part, kind == CheckKind::Example, info));
        let outcome = match answer {
            Ok(actual) if actual == expected => CheckOutcome::Passed,
            Ok(actual) => CheckOutcome::Failed { actual },
            Err(SolveError::PartNotImplemented(_)) => CheckOutcome::NotImplemented,
            Err(source) => {
                if kind == CheckKind::Example {
                    println!("Example input:");
                    for line in inputs {
                        println!("{}", line);
                    }
                    println!("Expected answer: {}", expected);
                }
                return Err(RunError::Solver {
                    year,
                    day,
                    part,
                    source,
                });
            }
        };

        let check = CheckResult {
            year,
            day,
            part,
            kind,
            expected: expected.to_string(),
            outcome,
            elapsed,
        };
        print_check(&check, inputs);
        let passed = check.passed();
        report.checks.push(check);
        Ok(passed)
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_and_submit(
        &self,
        year: u16,
        day: u8,
        part: u8,
        inputs: &[String],
        info: Option<&AdditionalInfo>,
        solver: &dyn Solver,
        options: &RunOptions,
    ) -> Result<SubmissionReport, RunError> {
        let (answer, elapsed) = timed(|| solver.solve(inputs, part, false, info));
        let answer = match answer {
            Ok(answer) => answer,
            Err(SolveError::PartNotImplemented(_)) => {
                return Ok(SubmissionReport {
                    year,
                    day,
                    part,
                    answer: None,
                    elapsed,
                    status: SubmissionStatus::NotImplemented,
                });
            }
            Err(source) => {
                return Err(RunError::Solver {
                    year,
                    day,
                    part,
                    source,
                });
            }
        };

        info!(year, day, part, answer, "Solved real input");
        let status = match self
            .submitter
            .submit_answer(year, day, part, &answer, options.force_submit)
        {
            Ok(SubmitOutcome::Accepted { stats, .. }) => SubmissionStatus::Accepted {
                solved_in: stats.elapsed(part),
            },
            Ok(SubmitOutcome::Cancelled) => SubmissionStatus::Cancelled,
            Err(SubmitError::RateLimited) => SubmissionStatus::RateLimited,
            Err(e) if e.is_recoverable() => SubmissionStatus::Rejected(e.to_string()),
            Err(e) => return Err(e.into()),
        };
        Ok(SubmissionReport {
            year,
            day,
            part,
            answer: Some(answer),
            elapsed,
            status,
        })
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, TimeDelta) {
    let start = Instant::now();
    let value = f();
    let elapsed = TimeDelta::from_std(start.elapsed()).unwrap_or_else(|_| TimeDelta::zero());
    (value, elapsed)
}
