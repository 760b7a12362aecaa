//! Declarative transform pipelines applied to extracted text
//!
//! A pipeline is an ordered list of [`Operation`]s. Each operation receives the
//! value produced by the previous one. Database files spell operations as JSON
//! objects tagged by `fx`:
//!
//! ```json
//! [
//!   { "fx": "split", "separator": "\n" },
//!   { "fx": "slice", "start": 2, "end": 5 },
//!   { "fx": "map", "operations": [{ "fx": "parseInt" }] },
//!   { "fx": "reduce", "operations": [{ "fx": "multiply" }] },
//!   { "fx": "toString" }
//! ]
//! ```
//!
//! Arithmetic operands are either integer literals or nested pipelines. A
//! nested pipeline is evaluated against the value the enclosing operation
//! received, so `multiply` can combine two positions of the same sequence.

use crate::error::TransformError;
use itertools::Itertools;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// A value flowing through a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Undefined,
    Str(String),
    Num(i64),
    List(Vec<Value>),
}

impl Value {
    /// Short description used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Str(_) => "a string",
            Value::Num(_) => "a number",
            Value::List(_) => "a sequence",
        }
    }

    fn as_number(&self, operation: &'static str) -> Result<i64, TransformError> {
        match self {
            Value::Num(n) => Ok(*n),
            Value::Str(s) => parse_int(s),
            other => Err(mismatch(operation, "a number", other)),
        }
    }

    fn display(&self) -> String {
        match self {
            Value::Undefined => String::new(),
            Value::Str(s) => s.clone(),
            Value::Num(n) => n.to_string(),
            Value::List(items) => items.iter().map(Value::display).join(","),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Num(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Argument of `add` / `multiply`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Literal(i64),
    Pipeline(Vec<Operation>),
}

impl Operand {
    fn resolve(&self, data: &Value, operation: &'static str) -> Result<i64, TransformError> {
        match self {
            Operand::Literal(n) => Ok(*n),
            Operand::Pipeline(operations) => {
                evaluate(data.clone(), operations)?.as_number(operation)
            }
        }
    }
}

/// One step of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fx", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Element (or character) at `index`; negative indexes count from the end
    At { index: i64 },
    Length,
    /// Regex match; `flags` may contain `g`, `i`, `m`, `s`
    Match {
        pattern: String,
        #[serde(default)]
        flags: String,
    },
    Slice {
        start: i64,
        #[serde(default)]
        end: Option<i64>,
    },
    Substring {
        start: i64,
        #[serde(default)]
        end: Option<i64>,
    },
    Split { separator: String },
    Join { separator: String },
    ReplaceAll { old_value: String, new_value: String },
    ToUpperCase,
    ToLowerCase,
    Trim,
    ParseInt,
    #[serde(rename = "toString")]
    Stringify,
    #[serde(alias = "sum")]
    Add {
        #[serde(default)]
        operands: Vec<Operand>,
    },
    #[serde(alias = "product")]
    Multiply {
        #[serde(default)]
        operands: Vec<Operand>,
    },
    Map { operations: Vec<Operation> },
    Reduce { operations: Vec<Operation> },
}

impl Operation {
    /// Name as written in database files
    pub fn name(&self) -> &'static str {
        match self {
            Operation::At { .. } => "at",
            Operation::Length => "length",
            Operation::Match { .. } => "match",
            Operation::Slice { .. } => "slice",
            Operation::Substring { .. } => "substring",
            Operation::Split { .. } => "split",
            Operation::Join { .. } => "join",
            Operation::ReplaceAll { .. } => "replaceAll",
            Operation::ToUpperCase => "toUpperCase",
            Operation::ToLowerCase => "toLowerCase",
            Operation::Trim => "trim",
            Operation::ParseInt => "parseInt",
            Operation::Stringify => "toString",
            Operation::Add { .. } => "add",
            Operation::Multiply { .. } => "multiply",
            Operation::Map { .. } => "map",
            Operation::Reduce { .. } => "reduce",
        }
    }

    fn apply(&self, data: Value) -> Result<Value, TransformError> {
        let name = self.name();
        match self {
            Operation::At { index } => match data {
                Value::List(items) => Ok(resolve_index(items.len(), *index)
                    .and_then(|i| items.into_iter().nth(i))
                    .unwrap_or(Value::Undefined)),
                Value::Str(s) => {
                    let chars: Vec<char> = s.chars().collect();
                    Ok(resolve_index(chars.len(), *index)
                        .map(|i| Value::Str(chars[i].to_string()))
                        .unwrap_or(Value::Undefined))
                }
                other => Err(mismatch(name, "a string or sequence", &other)),
            },
            Operation::Length => match data {
                Value::Str(s) => Ok(Value::Num(s.chars().count() as i64)),
                Value::List(items) => Ok(Value::Num(items.len() as i64)),
                other => Err(mismatch(name, "a string or sequence", &other)),
            },
            Operation::Match { pattern, flags } => {
                let input = expect_str(name, data)?;
                match_pattern(&input, pattern, flags)
            }
            Operation::Slice { start, end } => match data {
                Value::List(items) => {
                    let (from, to) = js_range(items.len(), *start, *end);
                    Ok(Value::List(
                        items.into_iter().skip(from).take(to - from).collect(),
                    ))
                }
                Value::Str(s) => {
                    let chars: Vec<char> = s.chars().collect();
                    let (from, to) = js_range(chars.len(), *start, *end);
                    Ok(Value::Str(chars[from..to].iter().collect()))
                }
                other => Err(mismatch(name, "a string or sequence", &other)),
            },
            Operation::Substring { start, end } => {
                let chars: Vec<char> = expect_str(name, data)?.chars().collect();
                let len = chars.len();
                let clamp = |v: i64| v.clamp(0, len as i64) as usize;
                let (a, b) = (clamp(*start), end.map_or(len, clamp));
                let (from, to) = if a > b { (b, a) } else { (a, b) };
                Ok(Value::Str(chars[from..to].iter().collect()))
            }
            Operation::Split { separator } => {
                let input = expect_str(name, data)?;
                let parts: Vec<Value> = if separator.is_empty() {
                    input.chars().map(|c| Value::Str(c.to_string())).collect()
                } else {
                    input.split(separator.as_str()).map(Value::from).collect()
                };
                Ok(Value::List(parts))
            }
            Operation::Join { separator } => {
                let items = expect_list(name, data)?;
                Ok(Value::Str(items.iter().map(Value::display).join(separator)))
            }
            Operation::ReplaceAll {
                old_value,
                new_value,
            } => Ok(Value::Str(
                expect_str(name, data)?.replace(old_value.as_str(), new_value),
            )),
            Operation::ToUpperCase => Ok(Value::Str(expect_str(name, data)?.to_uppercase())),
            Operation::ToLowerCase => Ok(Value::Str(expect_str(name, data)?.to_lowercase())),
            Operation::Trim => Ok(Value::Str(expect_str(name, data)?.trim().to_string())),
            Operation::ParseInt => match data {
                Value::Num(n) => Ok(Value::Num(n)),
                Value::Str(s) => parse_int(&s).map(Value::Num),
                other => Err(mismatch(name, "a string", &other)),
            },
            Operation::Stringify => match data {
                Value::Undefined => Err(mismatch(name, "a defined value", &Value::Undefined)),
                other => Ok(Value::Str(other.display())),
            },
            Operation::Add { operands } => arithmetic(Arith::Add, operands, data),
            Operation::Multiply { operands } => arithmetic(Arith::Multiply, operands, data),
            Operation::Map { operations } => expect_list(name, data)?
                .into_iter()
                .map(|item| evaluate(item, operations))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Operation::Reduce { operations } => reduce(operations, data),
        }
    }
}

/// A pipeline attached to some entries of an override record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub functions: Vec<Operation>,
    /// Entry positions (not element indexes) this pipeline applies to
    pub applies_to: Vec<usize>,
}

/// Run `operations` left to right and return whatever they produce
pub fn evaluate(data: Value, operations: &[Operation]) -> Result<Value, TransformError> {
    operations.iter().try_fold(data, |data, operation| operation.apply(data))
}

/// Run a pipeline that must end on a scalar; numbers are rendered as strings
pub fn interpolate(data: Value, operations: &[Operation]) -> Result<String, TransformError> {
    match evaluate(data, operations)? {
        Value::Str(s) => Ok(s),
        Value::Num(n) => Ok(n.to_string()),
        Value::List(_) => Err(TransformError::NonScalarResult),
        Value::Undefined => Err(TransformError::UndefinedResult),
    }
}

/// Run a pipeline that must end on a sequence of strings (input lines)
pub fn interpolate_lines(
    data: Value,
    operations: &[Operation],
) -> Result<Vec<String>, TransformError> {
    match evaluate(data, operations)? {
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Str(s) => Ok(s),
                other => Err(TransformError::NotLines(other.kind())),
            })
            .collect(),
        other => Err(TransformError::NotLines(other.kind())),
    }
}

#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Multiply,
}

impl Arith {
    fn name(self) -> &'static str {
        match self {
            Arith::Add => "add",
            Arith::Multiply => "multiply",
        }
    }

    fn identity(self) -> i64 {
        match self {
            Arith::Add => 0,
            Arith::Multiply => 1,
        }
    }

    fn combine(self, a: i64, b: i64) -> Result<i64, TransformError> {
        match self {
            Arith::Add => a.checked_add(b),
            Arith::Multiply => a.checked_mul(b),
        }
        .ok_or(TransformError::Overflow(self.name()))
    }

    fn fold(self, values: impl IntoIterator<Item = i64>) -> Result<i64, TransformError> {
        values
            .into_iter()
            .try_fold(self.identity(), |acc, v| self.combine(acc, v))
    }
}

/// No operands: fold a sequence or pass a scalar through.
/// One operand: combine it with the current value.
/// Several operands: combine the operands only.
fn arithmetic(arith: Arith, operands: &[Operand], data: Value) -> Result<Value, TransformError> {
    let name = arith.name();
    let resolved = operands
        .iter()
        .map(|operand| operand.resolve(&data, name))
        .collect::<Result<Vec<_>, _>>()?;
    let total = match (resolved.as_slice(), data) {
        ([], Value::List(items)) => arith.fold(
            items
                .iter()
                .map(|item| item.as_number(name))
                .collect::<Result<Vec<_>, _>>()?,
        )?,
        ([], scalar) => scalar.as_number(name)?,
        ([single], current) => arith.combine(current.as_number(name)?, *single)?,
        (many, _) => arith.fold(many.iter().copied())?,
    };
    Ok(Value::Num(total))
}

fn reduce(operations: &[Operation], data: Value) -> Result<Value, TransformError> {
    let arith = match operations {
        [Operation::Add { operands }] if operands.is_empty() => Arith::Add,
        [Operation::Multiply { operands }] if operands.is_empty() => Arith::Multiply,
        _ => return Err(TransformError::InvalidReducer),
    };
    let items = expect_list("reduce", data)?;
    let mut values = items.iter().map(|item| item.as_number(arith.name()));
    let first = values.next().ok_or(TransformError::EmptySequence)??;
    values
        .try_fold(first, |acc, value| arith.combine(acc, value?))
        .map(Value::Num)
}

fn match_pattern(input: &str, pattern: &str, flags: &str) -> Result<Value, TransformError> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|e| TransformError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

    let matches: Vec<Value> = if flags.contains('g') {
        regex.find_iter(input).map(|m| Value::from(m.as_str())).collect()
    } else {
        regex
            .captures(input)
            .map(|caps| {
                caps.iter()
                    .map(|group| group.map_or(Value::Undefined, |m| Value::from(m.as_str())))
                    .collect()
            })
            .unwrap_or_default()
    };

    // No match leaves the input intact so `at(0)` still yields it
    if matches.is_empty() {
        Ok(Value::List(vec![Value::from(input)]))
    } else {
        Ok(Value::List(matches))
    }
}

/// Leading-integer parse: surrounding text after the digits is ignored
fn parse_int(text: &str) -> Result<i64, TransformError> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end]
        .parse::<i64>()
        .map(|n| if negative { -n } else { n })
        .map_err(|_| TransformError::NotANumber(text.to_string()))
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let i = if index < 0 { len + index } else { index };
    (0..len).contains(&i).then_some(i as usize)
}

fn js_range(len: usize, start: i64, end: Option<i64>) -> (usize, usize) {
    let signed_len = len as i64;
    let bound = |v: i64| -> usize {
        if v < 0 {
            (signed_len + v).max(0) as usize
        } else {
            v.min(signed_len) as usize
        }
    };
    let from = bound(start);
    let to = end.map_or(len, bound);
    (from, to.max(from))
}

fn expect_str(operation: &'static str, value: Value) -> Result<String, TransformError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(mismatch(operation, "a string", &other)),
    }
}

fn expect_list(operation: &'static str, value: Value) -> Result<Vec<Value>, TransformError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(operation, "a sequence", &other)),
    }
}

fn mismatch(operation: &'static str, expected: &'static str, found: &Value) -> TransformError {
    TransformError::TypeMismatch {
        operation,
        expected,
        found: found.kind(),
    }
}
