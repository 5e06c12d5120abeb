//! Test cases the prompt is run against.

use evaluator_client::TestCasePayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub input: String,
    pub expected_output: Option<String>,
}

impl TestCase {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: String::new(),
            expected_output: None,
        }
    }

    /// Input is non-empty after trimming.
    pub fn is_filled(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Trimmed wire form; a blank expected output is omitted.
    pub fn to_payload(&self) -> TestCasePayload {
        TestCasePayload {
            id: self.id.clone(),
            input: self.input.trim().to_string(),
            expected_output: self
                .expected_output
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_input_is_not_filled() {
        let mut tc = TestCase::blank("1");
        assert!(!tc.is_filled());
        tc.input = "  \n\t".to_string();
        assert!(!tc.is_filled());
        tc.input = " x ".to_string();
        assert!(tc.is_filled());
    }

    #[test]
    fn test_payload_trims_and_omits_blank_expected() {
        let tc = TestCase {
            id: "7".to_string(),
            input: "  sort [3,1,2] ".to_string(),
            expected_output: Some("   ".to_string()),
        };
        let payload = tc.to_payload();
        assert_eq!(payload.input, "sort [3,1,2]");
        assert_eq!(payload.expected_output, None);

        let tc = TestCase {
            expected_output: Some(" [1,2,3] ".to_string()),
            ..tc
        };
        assert_eq!(tc.to_payload().expected_output.as_deref(), Some("[1,2,3]"));
    }
}
