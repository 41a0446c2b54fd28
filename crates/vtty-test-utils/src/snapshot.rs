use anyhow::Result;
use similar::{ChangeTag, TextDiff};

/// Compares terminal snapshots and reports line diffs on mismatch
pub struct SnapshotComparator {
    trim: bool,
}

impl Default for SnapshotComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotComparator {
    /// Exact comparison, trailing blanks included
    pub fn new() -> Self {
        Self { trim: false }
    }

    /// Ignore trailing blanks on each line and trailing empty lines
    pub fn trimmed() -> Self {
        Self { trim: true }
    }

    pub fn compare(&self, expected: &str, actual: &str) -> Result<()> {
        let expected_clean = self.normalize(expected);
        let actual_clean = self.normalize(actual);

        if expected_clean == actual_clean {
            return Ok(());
        }

        let diff = TextDiff::from_lines(&expected_clean, &actual_clean);
        let mut diff_output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            // Make trailing blanks visible
            let line = change.value().trim_end_matches('\n');
            diff_output.push_str(&format!("{sign}|{line}|\n"));
        }

        anyhow::bail!(
            "Snapshot mismatch:\n\nExpected:\n{}\n\nActual:\n{}\n\nDiff:\n{}",
            expected_clean,
            actual_clean,
            diff_output
        )
    }

    /// Compare against expected rows given one per element
    pub fn compare_rows(&self, expected: &[&str], actual: &str) -> Result<()> {
        self.compare(&expected.join("\n"), actual)
    }

    pub fn assert_contains(&self, haystack: &str, needle: &str) -> Result<()> {
        if !haystack.contains(needle) {
            anyhow::bail!(
                "Snapshot does not contain expected text:\nExpected to find:\n{}\n\nIn snapshot:\n{}",
                needle,
                haystack
            );
        }

        Ok(())
    }

    fn normalize(&self, snapshot: &str) -> String {
        if !self.trim {
            return snapshot.to_string();
        }

        snapshot
            .lines()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }
}
