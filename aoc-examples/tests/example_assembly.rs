//! Example assembly against a realistic two-part puzzle page

use aoc_examples::{
    Example, ExampleDatabase, ExampleError, ExampleExtractor, ExampleRecord, Markup, Slot,
    TransformError, accepted_answers,
};

const PAGE: &str = include_str!("fixtures/two_parts.html");

fn extractor() -> ExampleExtractor {
    ExampleExtractor::new(ExampleDatabase::default())
}

fn record(json: &str) -> ExampleRecord {
    serde_json::from_str(json).unwrap()
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

mod heuristics {
    use super::*;

    #[test]
    fn finds_input_and_both_answers() {
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[], &[])
            .unwrap();

        assert_eq!(
            examples,
            vec![
                Example::new(1, lines(&["3,4,3,1,2"]), "77"),
                Example::new(2, lines(&["3,4,3,1,2"]), "26984457539"),
            ]
        );
    }

    #[test]
    fn day_25_has_no_part_two() {
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 25, false, &markup, &[], &[])
            .unwrap();
        assert_eq!(examples.len(), 1);
        assert!(examples.iter().all(|e| e.part == 1));
    }

    #[test]
    fn part1_only_drops_part_two() {
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, true, &markup, &[], &[])
            .unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].part, 1);
    }

    #[test]
    fn suppressed_part_is_omitted() {
        let db = ExampleDatabase::from_json("[]", r#"[{"year":2021,"day":6,"parts":[2]}]"#, "[]")
            .unwrap();
        let markup = Markup::parse(PAGE);
        let examples = ExampleExtractor::new(db)
            .get_examples(2021, 6, false, &markup, &[], &[])
            .unwrap();
        assert_eq!(examples.iter().map(|e| e.part).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn page_without_blocks_yields_nothing() {
        let markup = Markup::parse("<article><p>No code at all.</p></article>");
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[], &[])
            .unwrap();
        assert!(examples.is_empty());
    }

    #[test]
    fn accepted_answer_is_detected() {
        assert_eq!(accepted_answers(&Markup::parse(PAGE)), vec!["386536"]);
    }
}

mod overrides {
    use super::*;

    const SPLIT_PARTS: &str = r#"{
        "year": 2021, "day": 6, "part1Length": 1,
        "inputs": { "selector": "pre code", "indexes": [0, 1] },
        "answers": { "selector": "code em", "indexesOrLiterals": [0, 2] }
    }"#;

    #[test]
    fn part1_length_orders_entries() {
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[record(SPLIT_PARTS)], &[])
            .unwrap();

        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].part, 1);
        assert_eq!(examples[0].inputs, lines(&["3,4,3,1,2"]));
        assert_eq!(examples[0].answer, "5934");
        assert_eq!(examples[1].part, 2);
        assert_eq!(examples[1].inputs, lines(&["1,1,2", "2,2,1"]));
        assert_eq!(examples[1].answer, "26984457539");
    }

    #[test]
    fn day_25_override_has_no_part_two() {
        let mut day25 = record(SPLIT_PARTS);
        day25.day = 25;
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 25, false, &markup, &[day25], &[])
            .unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].part, 1);
    }

    #[test]
    fn concatenated_inputs_and_literal_answers() {
        let concat = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": { "selector": "pre code", "indexes": [[0, 1]] },
                "answers": { "selector": "code em", "indexesOrLiterals": ["literal"] }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[concat], &[])
            .unwrap();
        assert_eq!(examples[0].inputs, lines(&["3,4,3,1,2", "1,1,2", "2,2,1"]));
        assert_eq!(examples[0].answer, "literal");
    }

    #[test]
    fn transforms_and_additional_info() {
        let transformed = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": {
                    "selector": "pre code", "indexes": [0],
                    "transforms": [{ "functions": [{ "fx": "trim" }, { "fx": "split", "separator": "," }], "appliesTo": [0] }]
                },
                "answers": {
                    "selector": "code em", "indexesOrLiterals": [0],
                    "transforms": [{ "functions": [{ "fx": "add", "operands": [1] }], "appliesTo": [0] }]
                },
                "additionalInfos": {
                    "key": "days", "selector": "article p", "indexes": [2],
                    "transforms": [{ "functions": [{ "fx": "match", "pattern": "after (\\d+) days" }, { "fx": "at", "index": 1 }], "appliesTo": [0] }]
                }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[transformed], &[])
            .unwrap();

        assert_eq!(examples[0].inputs, lines(&["3", "4", "3", "1", "2"]));
        assert_eq!(examples[0].answer, "5935");
        let info = examples[0].additional_info.as_ref().unwrap();
        assert_eq!(info.get("days").map(String::as_str), Some("18"));
    }

    #[test]
    fn answer_transform_ending_in_sequence_is_fatal() {
        let bad = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": { "selector": "pre code", "indexes": [0] },
                "answers": {
                    "selector": "code em", "indexesOrLiterals": [0],
                    "transforms": [{ "functions": [{ "fx": "split", "separator": "" }], "appliesTo": [0] }]
                }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let result = extractor().get_examples(2021, 6, false, &markup, &[bad], &[]);
        assert!(matches!(
            result,
            Err(ExampleError::Transform {
                slot: Slot::Answer,
                entry: 0,
                source: TransformError::NonScalarResult,
                ..
            })
        ));
    }

    #[test]
    fn input_transform_must_yield_lines() {
        let bad = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": {
                    "selector": "pre code", "indexes": [0],
                    "transforms": [{ "functions": [{ "fx": "trim" }], "appliesTo": [0] }]
                },
                "answers": { "selector": "code em", "indexesOrLiterals": [0] }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let result = extractor().get_examples(2021, 6, false, &markup, &[bad], &[]);
        assert!(matches!(
            result,
            Err(ExampleError::Transform { slot: Slot::Input, .. })
        ));
    }

    #[test]
    fn missing_element_is_fatal() {
        let bad = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": { "selector": "pre code", "indexes": [9] },
                "answers": { "selector": "code em", "indexesOrLiterals": [0] }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let result = extractor().get_examples(2021, 6, false, &markup, &[bad], &[]);
        assert!(matches!(
            result,
            Err(ExampleError::MissingElement { index: 9, .. })
        ));
    }

    #[test]
    fn inconsistent_record_does_not_fall_back() {
        let bad = record(
            r#"{
                "year": 2021, "day": 6, "part1Length": 1,
                "inputs": { "selector": "pre code", "indexes": [0, 1] },
                "answers": { "selector": "code em", "indexesOrLiterals": [0] }
            }"#,
        );
        let markup = Markup::parse(PAGE);
        let result = extractor().get_examples(2021, 6, false, &markup, &[bad], &[]);
        assert!(matches!(result, Err(ExampleError::Inconsistent { .. })));
    }
}

mod extra_tests {
    use super::*;

    #[test]
    fn appended_last_and_trimmed() {
        let extra = vec![
            Example::new(2, lines(&["x", "", ""]), "9"),
            Example::new(1, lines(&["y"]), "8"),
        ];
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, false, &markup, &[], &extra)
            .unwrap();

        assert_eq!(examples.len(), 4);
        assert_eq!(examples[2], Example::new(2, lines(&["x"]), "9"));
        assert_eq!(examples[3], Example::new(1, lines(&["y"]), "8"));
    }

    #[test]
    fn part1_only_filters_extras() {
        let extra = vec![Example::new(2, lines(&["x"]), "9")];
        let markup = Markup::parse(PAGE);
        let examples = extractor()
            .get_examples(2021, 6, true, &markup, &[], &extra)
            .unwrap();
        assert!(examples.iter().all(|e| e.part == 1));
    }
}

mod builtin_records {
    use super::*;

    const BLUEPRINTS: &str = include_str!("fixtures/blueprints.html");

    fn blueprints() -> Vec<String> {
        BLUEPRINTS
            .lines()
            .filter(|line| line.starts_with("Blueprint"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn part_one_answer_survives_part_two_unlock() {
        let extractor = ExampleExtractor::new(ExampleDatabase::builtin().unwrap());
        let markup = Markup::parse(BLUEPRINTS);
        let examples = extractor
            .get_examples(2022, 19, false, &markup, &[], &[])
            .unwrap();

        assert_eq!(
            examples,
            vec![
                Example::new(1, blueprints(), "33"),
                Example::new(2, blueprints(), "3472"),
            ]
        );
    }

    #[test]
    fn part_one_only_page() {
        let part_one: String = BLUEPRINTS
            .split("<p>Your puzzle answer was")
            .next()
            .unwrap()
            .to_string();
        let extractor = ExampleExtractor::new(ExampleDatabase::builtin().unwrap());
        let markup = Markup::parse(&part_one);
        let examples = extractor
            .get_examples(2022, 19, true, &markup, &[], &[])
            .unwrap();

        assert_eq!(examples, vec![Example::new(1, blueprints(), "33")]);
    }
}
