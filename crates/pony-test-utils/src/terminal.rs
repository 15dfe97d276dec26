use anyhow::Result;
use similar::{ChangeTag, TextDiff};

/// Compares rendered screen lines and reports a line diff on mismatch
#[derive(Debug, Default)]
pub struct LineComparator;

impl LineComparator {
    pub fn new() -> Self {
        Self
    }

    pub fn compare_lines<S: AsRef<str>>(&self, expected: &[&str], actual: &[S]) -> Result<()> {
        let expected_text = expected.join("\n");
        let actual_text = actual
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n");

        if expected_text == actual_text {
            return Ok(());
        }

        // Generate diff for debugging
        let diff = TextDiff::from_lines(&expected_text, &actual_text);
        let mut diff_output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            diff_output.push_str(&format!("{sign}{change}"));
            if change.missing_newline() {
                diff_output.push('\n');
            }
        }

        anyhow::bail!(
            "Screen mismatch:\n\nExpected:\n{}\n\nActual:\n{}\n\nDiff:\n{}",
            expected_text,
            actual_text,
            diff_output
        )
    }

    pub fn assert_contains<S: AsRef<str>>(&self, lines: &[S], needle: &str) -> Result<()> {
        if lines.iter().any(|line| line.as_ref().contains(needle)) {
            return Ok(());
        }

        anyhow::bail!(
            "Screen does not contain expected text:\nExpected to find:\n{}\n\nIn screen:\n{}",
            needle,
            lines
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join("\n")
        )
    }
}

/// Panic with a readable diff unless `actual` matches `expected`
pub fn assert_lines<S: AsRef<str>>(expected: &[&str], actual: &[S]) {
    if let Err(err) = LineComparator::new().compare_lines(expected, actual) {
        panic!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_lines() {
        let actual = vec!["a".to_string(), "b".to_string()];
        assert!(LineComparator::new().compare_lines(&["a", "b"], &actual).is_ok());
    }

    #[test]
    fn test_mismatch_reports_diff() {
        let actual = vec!["a".to_string(), "c".to_string()];
        let err = LineComparator::new()
            .compare_lines(&["a", "b"], &actual)
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("-b"));
        assert!(message.contains("+c"));
    }

    #[test]
    fn test_assert_contains() {
        let comparator = LineComparator::new();
        let lines = ["first", "second line"];

        assert!(comparator.assert_contains(&lines, "cond").is_ok());
        assert!(comparator.assert_contains(&lines, "third").is_err());
    }
}
