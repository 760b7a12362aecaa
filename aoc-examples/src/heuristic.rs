//! Best-effort example search used when a puzzle has no override record

use crate::markup::{Markup, Node};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::debug;

static PRE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").unwrap());
static PRE_CODE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre code").unwrap());
static P_OR_PRE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, pre").unwrap());
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());
static ANSWER_WRAPPERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p code, p em").unwrap());
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());

const LEAD_INS: [&str; 2] = ["larger example:", "complex example:"];

/// Raw text found by the heuristics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultExtract {
    /// Text of the example input block, if any block was found
    pub input: Option<String>,
    pub answer1: String,
    pub answer2: String,
}

/// Locate the example input block and each part's answer
pub fn extract_defaults(markup: &Markup) -> DefaultExtract {
    let input = find_input_block(markup).map(|block| block.text_with_breaks());
    let articles = markup.find(&ARTICLE);
    let first = articles.first().copied().unwrap_or_else(|| markup.root());
    let last = articles.last().copied().unwrap_or_else(|| markup.root());

    DefaultExtract {
        input,
        answer1: find_answer(first),
        answer2: find_answer(last),
    }
}

/// Answers the site already accepted, in part order
pub fn accepted_answers(markup: &Markup) -> Vec<String> {
    markup
        .find(&P)
        .into_iter()
        .filter(|p| p.text().contains("Your puzzle answer"))
        .flat_map(|p| {
            p.child_elements()
                .filter(|child| child.name() == "code")
                .map(|code| code.text())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn find_input_block(markup: &Markup) -> Option<Node<'_>> {
    let introduced = markup.find(&PRE).into_iter().find(|pre| {
        pre.has_child("code")
            && pre.prev_element().is_some_and(|prev| {
                let text = prev.text();
                let text = text.trim_end();
                prev.name() == "p" && LEAD_INS.iter().any(|lead_in| text.ends_with(lead_in))
            })
    });
    if let Some(pre) = introduced {
        debug!("Example input follows a larger/complex example lead-in");
        return code_child(pre);
    }

    let mut armed = false;
    for node in markup.find(&P_OR_PRE) {
        match node.name() {
            "p" if mentions_example(&node.text()) => armed = true,
            "pre" if armed && node.has_child("code") => {
                debug!("Example input follows an example paragraph");
                return code_child(node);
            }
            _ => {}
        }
    }

    let first = markup.find(&PRE_CODE).into_iter().next();
    if first.is_some() {
        debug!("Example input is the first code block");
    }
    first
}

fn code_child(pre: Node<'_>) -> Option<Node<'_>> {
    pre.child_elements().find(|child| child.name() == "code")
}

/// "example" with a colon somewhere after it
fn mentions_example(text: &str) -> bool {
    text.find("example")
        .is_some_and(|at| text[at..].contains(':'))
}

fn find_answer(region: Node<'_>) -> String {
    let candidates = answer_candidates(region);
    let scores: Vec<u32> = candidates.iter().map(score).collect();
    best_index(&scores)
        .map(|i| candidates[i].text())
        .unwrap_or_default()
}

/// Emphasis/code children of paragraph emphasis/code, in document order
fn answer_candidates(region: Node<'_>) -> Vec<Node<'_>> {
    let mut candidates: Vec<Node<'_>> = Vec::new();
    for wrapper in region.find(&ANSWER_WRAPPERS) {
        for child in wrapper.child_elements() {
            if matches!(child.name(), "em" | "code") && !candidates.contains(&child) {
                candidates.push(child);
            }
        }
    }
    candidates
}

/// One point for a purely numeric text, one for leading its parent
pub fn score(candidate: &Node<'_>) -> u32 {
    u32::from(NUMERIC.is_match(candidate.text().trim()))
        + u32::from(!candidate.has_preceding_sibling())
}

/// Highest score wins; ties go to the later candidate
pub fn best_index(scores: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if best.is_none_or(|(_, top)| s >= top) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}
