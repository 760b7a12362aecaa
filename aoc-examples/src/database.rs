//! Per-puzzle override records and the suppression / additional-info tables

use crate::error::ExampleError;
use crate::example::AdditionalInfo;
use crate::markup::Markup;
use crate::transform::Transform;
use serde::{Deserialize, Serialize};
use tracing::debug;

const BUILTIN_RECORDS: &str = include_str!("../data/egdb.json");
const BUILTIN_NO_EXAMPLES: &str = include_str!("../data/no_examples.json");
const BUILTIN_INPUT_INFOS: &str = include_str!("../data/aidb.json");

/// Element index, or several indexes whose texts are concatenated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexRef {
    Single(usize),
    Concat(Vec<usize>),
}

impl IndexRef {
    pub fn indexes(&self) -> &[usize] {
        match self {
            IndexRef::Single(index) => std::slice::from_ref(index),
            IndexRef::Concat(indexes) => indexes,
        }
    }
}

/// Element index, or the answer spelled out literally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerRef {
    Index(usize),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSource {
    pub selector: String,
    pub indexes: Vec<IndexRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSource {
    pub selector: String,
    #[serde(alias = "indexes")]
    pub indexes_or_literals: Vec<AnswerRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoSource {
    pub key: String,
    pub selector: String,
    pub indexes: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
}

/// Declares exactly which elements of a puzzle page hold its examples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleRecord {
    pub year: u16,
    pub day: u8,
    /// Leading entries that belong to part 1; the rest are part 2
    #[serde(alias = "part1length")]
    pub part1_length: usize,
    pub inputs: InputSource,
    pub answers: AnswerSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_infos: Option<InfoSource>,
}

impl ExampleRecord {
    pub fn len(&self) -> usize {
        self.inputs.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.indexes.is_empty()
    }

    pub fn part_of(&self, entry: usize) -> u8 {
        if entry < self.part1_length { 1 } else { 2 }
    }

    /// Check the parallel-list invariants
    pub fn validate(&self) -> Result<(), ExampleError> {
        let inconsistent = |reason: String| ExampleError::Inconsistent {
            year: self.year,
            day: self.day,
            reason,
        };

        let entries = self.len();
        if self.answers.indexes_or_literals.len() != entries {
            return Err(inconsistent(format!(
                "{entries} inputs but {} answers",
                self.answers.indexes_or_literals.len()
            )));
        }
        if let Some(infos) = &self.additional_infos {
            if infos.indexes.len() != entries {
                return Err(inconsistent(format!(
                    "{entries} inputs but {} additional infos",
                    infos.indexes.len()
                )));
            }
        }
        if self.part1_length > entries {
            return Err(inconsistent(format!(
                "part1Length {} exceeds {entries} entries",
                self.part1_length
            )));
        }

        let transforms = self
            .inputs
            .transforms
            .iter()
            .chain(&self.answers.transforms)
            .chain(self.additional_infos.iter().flat_map(|i| &i.transforms));
        for transform in transforms {
            if let Some(entry) = transform.applies_to.iter().find(|&&e| e >= entries) {
                return Err(inconsistent(format!(
                    "transform applies to entry {entry} but there are only {entries}"
                )));
            }
        }
        Ok(())
    }
}

/// Parts of a puzzle that have no usable example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoExampleRecord {
    pub year: u16,
    pub day: u8,
    pub parts: Vec<u8>,
}

/// Extra solver parameter shown in the puzzle text for the real input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfoRecord {
    pub year: u16,
    pub day: u8,
    pub key: String,
    pub selector: String,
    /// Element index for part 1 and part 2
    pub indexes: [usize; 2],
}

#[derive(Debug, Clone, Default)]
pub struct ExampleDatabase {
    records: Vec<ExampleRecord>,
    no_examples: Vec<NoExampleRecord>,
    input_infos: Vec<InputInfoRecord>,
}

impl ExampleDatabase {
    /// Tables shipped with the crate
    pub fn builtin() -> Result<Self, ExampleError> {
        Self::from_json(BUILTIN_RECORDS, BUILTIN_NO_EXAMPLES, BUILTIN_INPUT_INFOS)
    }

    pub fn from_json(
        records: &str,
        no_examples: &str,
        input_infos: &str,
    ) -> Result<Self, ExampleError> {
        Ok(Self {
            records: serde_json::from_str(records)
                .map_err(|source| ExampleError::Database { name: "egdb", source })?,
            no_examples: serde_json::from_str(no_examples).map_err(|source| {
                ExampleError::Database {
                    name: "no_examples",
                    source,
                }
            })?,
            input_infos: serde_json::from_str(input_infos)
                .map_err(|source| ExampleError::Database { name: "aidb", source })?,
        })
    }

    pub fn records(&self) -> &[ExampleRecord] {
        &self.records
    }

    /// Find the override for a puzzle; caller-supplied records win over stored ones.
    ///
    /// `Ok(None)` means no record exists. A record that exists but breaks its
    /// invariants is an error, never a silent miss.
    pub fn lookup<'a>(
        &'a self,
        year: u16,
        day: u8,
        overrides: &'a [ExampleRecord],
    ) -> Result<Option<&'a ExampleRecord>, ExampleError> {
        let from_override = overrides.iter().find(|r| r.year == year && r.day == day);
        let record = from_override
            .or_else(|| self.records.iter().find(|r| r.year == year && r.day == day));

        match record {
            Some(record) => {
                debug!(
                    year,
                    day,
                    caller_supplied = from_override.is_some(),
                    "Using example override"
                );
                record.validate()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub fn is_suppressed(&self, year: u16, day: u8, part: u8) -> bool {
        self.no_examples
            .iter()
            .any(|r| r.year == year && r.day == day && r.parts.contains(&part))
    }

    /// Additional info for the real input of a part, if the puzzle needs one
    pub fn input_additional_info(
        &self,
        year: u16,
        day: u8,
        part: u8,
        markup: &Markup,
    ) -> Result<Option<AdditionalInfo>, ExampleError> {
        let Some(record) = self
            .input_infos
            .iter()
            .find(|r| r.year == year && r.day == day)
        else {
            return Ok(None);
        };

        let index = record.indexes[usize::from(part.clamp(1, 2) - 1)];
        let value = markup
            .select(&record.selector)?
            .get(index)
            .map(|node| node.text())
            .ok_or_else(|| ExampleError::MissingElement {
                year,
                day,
                selector: record.selector.clone(),
                index,
            })?;
        Ok(Some(AdditionalInfo::from([(record.key.clone(), value)])))
    }
}
