//! Message classifier
//!
//! Maps a free-text chat message to exactly one canned reply by scanning an
//! ordered rule table. The first rule whose pattern occurs anywhere in the
//! normalized message wins; if none does, the fallback reply is returned.

mod rules;

pub use rules::{RuleDef, DEFAULT_RULES, FALLBACK_REPLY};

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a rule table
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid pattern for rule #{index} '{pattern}': {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result of classifying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Reply to send back
    pub reply: &'a str,
    /// Index of the matching rule, `None` for the fallback
    pub rule: Option<usize>,
}

#[cfg(test)]
impl Classification<'_> {
    pub const fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

struct CompiledRule {
    pattern: Regex,
    reply: &'static str,
}

/// Ordered, immutable rule table
pub struct Classifier {
    rules: Vec<CompiledRule>,
    fallback: &'static str,
}

impl Classifier {
    /// Compile rules in the given order
    pub fn new(rules: &[RuleDef]) -> Result<Self, ClassifierError> {
        let compiled = rules
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let pattern =
                    Regex::new(def.pattern).map_err(|source| ClassifierError::InvalidPattern {
                        index,
                        pattern: def.pattern.to_string(),
                        source,
                    })?;
                Ok(CompiledRule {
                    pattern,
                    reply: def.reply,
                })
            })
            .collect::<Result<Vec<_>, ClassifierError>>()?;

        Ok(Self {
            rules: compiled,
            fallback: FALLBACK_REPLY,
        })
    }

    /// Classifier over the built-in support-desk table
    pub fn with_default_rules() -> Result<Self, ClassifierError> {
        Self::new(DEFAULT_RULES)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify a raw message
    pub fn classify(&self, raw: &str) -> Classification<'_> {
        let message = normalize(raw);

        self.rules
            .iter()
            .position(|rule| rule.pattern.is_match(&message))
            .map_or(
                Classification {
                    reply: self.fallback,
                    rule: None,
                },
                |index| Classification {
                    reply: self.rules[index].reply,
                    rule: Some(index),
                },
            )
    }

    /// Reply for a raw message
    #[cfg(test)]
    pub fn reply(&self, raw: &str) -> &str {
        self.classify(raw).reply
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("rules", &self.rules.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Lowercase and trim. No other folding is applied.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = "Hello! How can I assist you today?";
    const HOURS: &str = "Our support team is available 9 AM to 9 PM, Monday to Saturday.";

    fn classifier() -> Classifier {
        Classifier::with_default_rules().unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello World \n"), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("Hi, THERE!?"), "hi, there!?");
    }

    #[test]
    fn test_greetings() {
        let c = classifier();
        assert_eq!(c.reply("Hello there!"), GREETING);
        for msg in ["hello", "hi", "hey", "HEY you", "oh hi", "say Hello"] {
            assert_eq!(c.reply(msg), GREETING, "message: {msg}");
        }
    }

    #[test]
    fn test_business_hours() {
        let c = classifier();
        assert_eq!(c.reply("What are your business hours?"), HOURS);
    }

    #[test]
    fn test_fallback() {
        let c = classifier();
        let result = c.classify("");
        assert_eq!(result.reply, FALLBACK_REPLY);
        assert!(result.is_fallback());

        assert_eq!(c.reply("purple elephant"), FALLBACK_REPLY);
        assert_eq!(c.reply("   "), FALLBACK_REPLY);
    }

    #[test]
    fn test_idempotent() {
        let c = classifier();
        for msg in ["Hello there!", "purple elephant", "where is my order"] {
            assert_eq!(c.classify(msg), c.classify(msg));
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let c = classifier();
        let expected = c.classify("hello");
        assert_eq!(c.classify("HELLO"), expected);
        assert_eq!(c.classify(" Hello  "), expected);
        assert_eq!(expected.rule, Some(0));
    }

    #[test]
    fn test_first_match_wins() {
        let c = classifier();
        // "contact" (rule 4) and "down" (rule 11) both match
        let result = c.classify("My internet is down, contact me");
        assert_eq!(result.rule, Some(3));
        assert_eq!(
            result.reply,
            "You can reach us at support@netservesolutions.com or call +91-9876543210."
        );

        // greeting precedes order tracking
        let result = c.classify("hey, where is my order");
        assert_eq!(result.rule, Some(0));
        assert_eq!(result.reply, GREETING);
    }

    #[test]
    fn test_order_of_custom_table() {
        let rules = [RuleDef::new("apple", "first"), RuleDef::new("pie", "second")];
        let c = Classifier::new(&rules).unwrap();
        assert_eq!(c.reply("apple pie"), "first");

        let reversed = [RuleDef::new("pie", "second"), RuleDef::new("apple", "first")];
        let c = Classifier::new(&reversed).unwrap();
        assert_eq!(c.reply("apple pie"), "second");
    }

    #[test]
    fn test_substring_semantics() {
        let c = classifier();
        // "hi" occurs inside "this"
        assert_eq!(c.reply("is this thing on"), GREETING);
        assert_eq!(c.classify("can you track my order").rule, Some(1));
    }

    #[test]
    fn test_no_punctuation_stripping() {
        let rules = [RuleDef::new("^ok$", "anchored")];
        let c = Classifier::new(&rules).unwrap();
        assert_eq!(c.reply("  OK "), "anchored");
        assert_eq!(c.reply("ok!"), FALLBACK_REPLY);
    }

    #[test]
    fn test_invalid_pattern() {
        let rules = [RuleDef::new("fine", "a"), RuleDef::new("(unclosed", "b")];
        let err = Classifier::new(&rules).unwrap_err();
        let ClassifierError::InvalidPattern { index, pattern, .. } = &err;
        assert_eq!(*index, 1);
        assert_eq!(pattern, "(unclosed");
        assert!(err.to_string().contains("rule #1"));
    }

    #[test]
    fn test_empty_table() {
        let c = Classifier::new(&[]).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.reply("hello"), FALLBACK_REPLY);
    }

    #[test]
    fn test_default_table_loaded() {
        assert_eq!(classifier().len(), DEFAULT_RULES.len());
    }
}
