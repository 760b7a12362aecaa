//! Assembles normalized examples from override records or heuristics

use crate::database::{AnswerRef, ExampleDatabase, ExampleRecord};
use crate::error::{ExampleError, Slot, TransformError};
use crate::heuristic::extract_defaults;
use crate::markup::{Markup, Node};
use crate::transform::{self, Transform, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Named extra parameters a solver may need besides the input lines
pub type AdditionalInfo = BTreeMap<String, String>;

/// One test case for a puzzle part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub part: u8,
    pub inputs: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
}

impl Example {
    pub fn new(part: u8, inputs: Vec<String>, answer: impl Into<String>) -> Self {
        Self {
            part,
            inputs,
            answer: answer.into(),
            additional_info: None,
        }
    }
}

/// Drop trailing empty lines, keeping at least one line
pub fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
}

pub struct ExampleExtractor {
    db: ExampleDatabase,
}

impl ExampleExtractor {
    pub fn new(db: ExampleDatabase) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &ExampleDatabase {
        &self.db
    }

    /// Examples for a puzzle: part 1 entries, then part 2, then `extra_tests`
    pub fn get_examples(
        &self,
        year: u16,
        day: u8,
        part1_only: bool,
        markup: &Markup,
        overrides: &[ExampleRecord],
        extra_tests: &[Example],
    ) -> Result<Vec<Example>, ExampleError> {
        let mut examples = match self.db.lookup(year, day, overrides)? {
            Some(record) => from_record(record, part1_only, markup)?,
            None => self.from_heuristics(year, day, part1_only, markup),
        };

        examples.extend(
            extra_tests
                .iter()
                .filter(|test| !part1_only || test.part == 1)
                .cloned(),
        );
        for example in &mut examples {
            trim_trailing_blank(&mut example.inputs);
        }
        debug!(year, day, count = examples.len(), "Assembled examples");
        Ok(examples)
    }

    fn from_heuristics(&self, year: u16, day: u8, part1_only: bool, markup: &Markup) -> Vec<Example> {
        let parts: Vec<u8> = [1u8, 2]
            .into_iter()
            .filter(|&part| part == 1 || (day != 25 && !part1_only))
            .filter(|&part| !self.db.is_suppressed(year, day, part))
            .collect();
        if parts.is_empty() {
            debug!(year, day, "Examples suppressed for every part");
            return Vec::new();
        }

        let found = extract_defaults(markup);
        let Some(input) = found.input else {
            warn!(year, day, "No example input block found");
            return Vec::new();
        };
        let inputs: Vec<String> = input.split('\n').map(str::to_string).collect();

        parts
            .into_iter()
            .map(|part| {
                let answer = if part == 1 { &found.answer1 } else { &found.answer2 };
                Example::new(part, inputs.clone(), answer.as_str())
            })
            .collect()
    }
}

fn from_record(
    record: &ExampleRecord,
    part1_only: bool,
    markup: &Markup,
) -> Result<Vec<Example>, ExampleError> {
    let (year, day) = (record.year, record.day);
    let inputs = markup.select(&record.inputs.selector)?;
    let answers = markup.select(&record.answers.selector)?;
    let infos = match &record.additional_infos {
        Some(source) => Some((source, markup.select(&source.selector)?)),
        None => None,
    };

    let transform_error = move |slot: Slot, entry: usize| {
        move |source: TransformError| ExampleError::Transform {
            year,
            day,
            slot,
            entry,
            source,
        }
    };

    let mut examples = Vec::with_capacity(record.len());
    for entry in 0..record.len() {
        let part = record.part_of(entry);
        if part == 2 && (part1_only || day == 25) {
            continue;
        }

        let mut raw_input = String::new();
        for &index in record.inputs.indexes[entry].indexes() {
            if !raw_input.is_empty() && !raw_input.ends_with('\n') {
                raw_input.push('\n');
            }
            let node = nth_element(&inputs, record, &record.inputs.selector, index)?;
            raw_input.push_str(&node.text());
        }
        let input_ops = pipeline_for(&record.inputs.transforms, entry);
        let lines = if input_ops.is_empty() {
            raw_input.split('\n').map(str::to_string).collect()
        } else {
            transform::interpolate_lines(Value::Str(raw_input), &input_ops)
                .map_err(transform_error(Slot::Input, entry))?
        };

        let raw_answer = match &record.answers.indexes_or_literals[entry] {
            AnswerRef::Literal(answer) => answer.clone(),
            AnswerRef::Index(index) => {
                let node = nth_element(&answers, record, &record.answers.selector, *index)?;
                strip_blank_sub_lines(&node.text())
            }
        };
        let answer = apply_scalar(raw_answer, &pipeline_for(&record.answers.transforms, entry))
            .map_err(transform_error(Slot::Answer, entry))?;

        let additional_info = match &infos {
            Some((source, nodes)) => {
                let node = nth_element(nodes, record, &source.selector, source.indexes[entry])?;
                let raw = node.text();
                let value = apply_scalar(raw, &pipeline_for(&source.transforms, entry))
                    .map_err(transform_error(Slot::AdditionalInfo, entry))?;
                Some(AdditionalInfo::from([(source.key.clone(), value)]))
            }
            None => None,
        };

        examples.push(Example {
            part,
            inputs: lines,
            answer,
            additional_info,
        });
    }
    Ok(examples)
}

fn nth_element<'a>(
    nodes: &[Node<'a>],
    record: &ExampleRecord,
    selector: &str,
    index: usize,
) -> Result<Node<'a>, ExampleError> {
    nodes
        .get(index)
        .copied()
        .ok_or_else(|| ExampleError::MissingElement {
            year: record.year,
            day: record.day,
            selector: selector.to_string(),
            index,
        })
}

/// Every transform that applies to `entry`, chained in declaration order
fn pipeline_for(transforms: &[Transform], entry: usize) -> Vec<transform::Operation> {
    transforms
        .iter()
        .filter(|t| t.applies_to.contains(&entry))
        .flat_map(|t| t.functions.iter().cloned())
        .collect()
}

fn apply_scalar(raw: String, ops: &[transform::Operation]) -> Result<String, TransformError> {
    if ops.is_empty() {
        Ok(raw)
    } else {
        transform::interpolate(Value::Str(raw), ops)
    }
}

/// Multi-line answers lose their trailing blank lines
fn strip_blank_sub_lines(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_blank_sub_lines() {
        assert_eq!(strip_blank_sub_lines("#.#\n.#.\n\n"), "#.#\n.#.");
        assert_eq!(strip_blank_sub_lines("42"), "42");
    }

    #[test]
    fn test_trim_keeps_one_line() {
        let mut lines = vec![String::new(), String::new()];
        trim_trailing_blank(&mut lines);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_pipeline_for_chains_matching_transforms() {
        let transforms: Vec<Transform> = serde_json::from_str(
            r#"[
                { "functions": [{ "fx": "trim" }], "appliesTo": [0, 1] },
                { "functions": [{ "fx": "toUpperCase" }], "appliesTo": [1] }
            ]"#,
        )
        .unwrap();
        assert_eq!(pipeline_for(&transforms, 0).len(), 1);
        assert_eq!(pipeline_for(&transforms, 1).len(), 2);
        assert!(pipeline_for(&transforms, 2).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_trailing_blank_lines_trimmed(
            body in prop::collection::vec("[a-z0-9]{1,5}", 0..6),
            blanks in 0usize..5,
        ) {
            let mut lines = body.clone();
            lines.extend(std::iter::repeat_n(String::new(), blanks));
            trim_trailing_blank(&mut lines);

            prop_assert!(!lines.is_empty() || body.is_empty() && blanks == 0);
            if body.is_empty() {
                prop_assert!(lines.len() <= 1);
            } else {
                prop_assert_eq!(lines, body);
            }
        }
    }
}
