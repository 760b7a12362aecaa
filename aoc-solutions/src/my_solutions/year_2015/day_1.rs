use anyhow::anyhow;
use aoc_runner::{AdditionalInfo, SolveError, SolverPlugin};

inventory::submit! {
    SolverPlugin { year: 2015, day: 1, solver: &solve, tags: &["easy"] }
}

fn solve(
    inputs: &[String],
    part: u8,
    _test: bool,
    _info: Option<&AdditionalInfo>,
) -> Result<String, SolveError> {
    let moves = parse(&inputs.concat()).map_err(|e| SolveError::SolveFailed(e.into()))?;
    match part {
        1 => Ok(moves.iter().sum::<i64>().to_string()),
        2 => moves
            .iter()
            .scan(0i64, |floor, step| {
                *floor += step;
                Some(*floor)
            })
            .position(|floor| floor < 0)
            .map(|index| (index + 1).to_string())
            .ok_or_else(|| SolveError::SolveFailed(anyhow!("never entered the basement").into())),
        _ => Err(SolveError::PartNotImplemented(part)),
    }
}

fn parse(text: &str) -> anyhow::Result<Vec<i64>> {
    text.trim()
        .chars()
        .map(|c| match c {
            '(' => Ok(1),
            ')' => Ok(-1),
            other => Err(anyhow!("unexpected character {:?}", other)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(text: &str, part: u8) -> String {
        solve(&[text.to_string()], part, true, None).unwrap()
    }

    #[test]
    fn test_examples() {
        assert_eq!(run("(())", 1), "0");
        assert_eq!(run("(((", 1), "3");
        assert_eq!(run(")())())", 1), "-3");
        assert_eq!(run(")", 2), "1");
        assert_eq!(run("()())", 2), "5");
    }

    #[test]
    fn test_never_in_basement() {
        assert!(solve(&["(()".to_string()], 2, true, None).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_floor_is_balance(text in "[()]{0,40}") {
            let opens = text.chars().filter(|&c| c == '(').count() as i64;
            let closes = text.len() as i64 - opens;
            prop_assert_eq!(run(&text, 1), (opens - closes).to_string());
        }
    }
}
