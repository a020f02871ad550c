//! Standard validation stages

use std::collections::HashSet;

use regex::bytes::{Regex, RegexBuilder};

use super::stage::{StageOutcome, ValidationStage};

/// Rejects the empty payload
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyStage;

impl ValidationStage for NonEmptyStage {
    fn name(&self) -> &'static str {
        "non_empty"
    }

    fn validate(&self, payload: &str) -> StageOutcome {
        tracing::debug!(stage = self.name(), "Checking if empty");

        if payload.is_empty() {
            return StageOutcome::Reject("Please enter a value".to_string());
        }
        StageOutcome::Pass
    }
}

/// Rejects payloads shorter than `min_length` bytes
#[derive(Debug, Clone, Copy)]
pub struct MinLengthStage {
    min_length: usize,
}

impl MinLengthStage {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl ValidationStage for MinLengthStage {
    fn name(&self) -> &'static str {
        "min_length"
    }

    fn validate(&self, payload: &str) -> StageOutcome {
        tracing::debug!(stage = self.name(), min_length = self.min_length, "Checking string length");

        if payload.len() < self.min_length {
            return StageOutcome::Reject(format!(
                "Please enter a value longer than {}",
                self.min_length
            ));
        }
        StageOutcome::Pass
    }
}

/// Rejects payloads that do not match a pattern in full.
///
/// Character classes such as `\w` and `\d` are ASCII-only, so `é` is not a word character.
#[derive(Debug, Clone)]
pub struct PatternStage {
    pattern_name: String,
    regex: Regex,
}

impl PatternStage {
    /// `pattern` must match the whole payload; anchors are added here.
    pub fn new(pattern_name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .unicode(false)
            .build()?;
        Ok(Self {
            pattern_name: pattern_name.into(),
            regex,
        })
    }

    pub fn pattern_name(&self) -> &str {
        &self.pattern_name
    }
}

impl ValidationStage for PatternStage {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn validate(&self, payload: &str) -> StageOutcome {
        tracing::debug!(stage = self.name(), pattern = %self.pattern_name, "Checking regex match");

        if !self.regex.is_match(payload.as_bytes()) {
            return StageOutcome::Reject(format!(
                "The value entered does not match the proper format for a {}",
                self.pattern_name
            ));
        }
        StageOutcome::Pass
    }
}

/// Rejects payloads found in a fixed list of previously used values
#[derive(Debug, Clone, Default)]
pub struct HistoryStage {
    history: HashSet<String>,
}

impl HistoryStage {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            history: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl ValidationStage for HistoryStage {
    fn name(&self) -> &'static str {
        "history"
    }

    fn validate(&self, payload: &str) -> StageOutcome {
        tracing::debug!(stage = self.name(), "Checking if string has been used before");

        if self.history.contains(payload) {
            return StageOutcome::Reject(
                "Please enter a value that you haven't entered before".to_string(),
            );
        }
        StageOutcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = r"\w+([-+.']\w+)*@\w+([-.]\w+)*\.\w+([-.]\w+)*";

    #[test]
    fn test_non_empty() {
        assert_eq!(
            NonEmptyStage.validate(""),
            StageOutcome::Reject("Please enter a value".to_string())
        );
        assert_eq!(NonEmptyStage.validate(" "), StageOutcome::Pass);
    }

    #[test]
    fn test_min_length_boundaries() {
        let stage = MinLengthStage::new(2);
        assert_eq!(
            stage.validate("H"),
            StageOutcome::Reject("Please enter a value longer than 2".to_string())
        );
        assert_eq!(stage.validate("Hi"), StageOutcome::Pass);
        assert_eq!(stage.validate("Hello"), StageOutcome::Pass);
    }

    #[test]
    fn test_min_length_zero_accepts_everything() {
        assert_eq!(MinLengthStage::new(0).validate(""), StageOutcome::Pass);
    }

    #[test]
    fn test_pattern_requires_full_match() {
        let stage = PatternStage::new("email address", EMAIL).unwrap();
        assert_eq!(stage.validate("shaun@test.com"), StageOutcome::Pass);
        assert_eq!(
            stage.validate("shaun"),
            StageOutcome::Reject(
                "The value entered does not match the proper format for a email address"
                    .to_string()
            )
        );
        // A match inside a longer payload is not enough
        assert!(matches!(
            stage.validate("mail shaun@test.com now"),
            StageOutcome::Reject(_)
        ));
    }

    #[test]
    fn test_pattern_word_class_is_ascii() {
        let stage = PatternStage::new("email address", EMAIL).unwrap();
        assert!(matches!(stage.validate("é@test.com"), StageOutcome::Reject(_)));
        assert!(matches!(
            stage.validate("café@тест.com"),
            StageOutcome::Reject(_)
        ));
        assert_eq!(stage.validate("cafe_1@test.com"), StageOutcome::Pass);
    }

    #[test]
    fn test_pattern_literal_non_ascii() {
        let stage = PatternStage::new("greeting", "héllo.*").unwrap();
        assert_eq!(stage.validate("héllo there"), StageOutcome::Pass);
        assert!(matches!(stage.validate("hello"), StageOutcome::Reject(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternStage::new("broken", "(unclosed").is_err());
    }

    #[test]
    fn test_history() {
        let stage = HistoryStage::new(["password1", "hunter2"]);
        assert_eq!(stage.len(), 2);
        assert_eq!(
            stage.validate("hunter2"),
            StageOutcome::Reject("Please enter a value that you haven't entered before".to_string())
        );
        assert_eq!(stage.validate("fresh"), StageOutcome::Pass);
        // Validating never records the payload
        assert_eq!(stage.validate("fresh"), StageOutcome::Pass);
    }
}
