//! Safety filter
//!
//! Case-insensitive blocked-content patterns applied to both queries and
//! generated answers. Every pattern is tested; all matches are reported.

use drishti_common::errors::{AppError, Result};
use regex_lite::{Regex, RegexBuilder};

/// Built-in blocked patterns: attack tooling, violence, secrets
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &[
    r"\b(malware|virus|ddos|exploit|exploit-kit|ransomware)\b",
    r"\b(kill|assassin|attack|terrorist)\b",
    r"\b(passwords?|private key|secret)\b",
];

/// Result of a safety check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyVerdict {
    /// True iff no pattern matched
    pub is_safe: bool,

    /// Matched pattern strings, in pattern order
    pub matches: Vec<String>,
}

/// Compiled blocked-content patterns
#[derive(Debug, Clone)]
pub struct SafetyFilter {
    patterns: Vec<(String, Regex)>,
}

impl SafetyFilter {
    /// Built-in patterns followed by `extra_patterns`
    pub fn new(extra_patterns: &[String]) -> Result<Self> {
        let patterns = DEFAULT_BLOCKED_PATTERNS
            .iter()
            .copied()
            .chain(extra_patterns.iter().map(String::as_str))
            .map(compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Test `text` against every pattern
    pub fn check(&self, text: &str) -> SafetyVerdict {
        verdict(self.patterns.iter().filter(|(_, re)| re.is_match(text)))
    }

    /// Like [`check`](Self::check) with additional patterns for this call only
    pub fn check_with(&self, text: &str, extra_patterns: &[String]) -> Result<SafetyVerdict> {
        let extra = extra_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(verdict(
            self.patterns
                .iter()
                .chain(extra.iter())
                .filter(|(_, re)| re.is_match(text)),
        ))
    }

    /// Pattern strings in test order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(p, _)| p.as_str())
    }
}

fn compile(pattern: &str) -> Result<(String, Regex)> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| (pattern.to_string(), re))
        .map_err(|e| AppError::Configuration {
            message: format!("invalid safety pattern {:?}: {}", pattern, e),
        })
}

fn verdict<'a>(hits: impl Iterator<Item = &'a (String, Regex)>) -> SafetyVerdict {
    let matches: Vec<String> = hits.map(|(p, _)| p.clone()).collect();
    SafetyVerdict {
        is_safe: matches.is_empty(),
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn filter() -> SafetyFilter {
        SafetyFilter::new(&[]).unwrap()
    }

    #[test]
    fn test_clean_text_is_safe() {
        let verdict = filter().check("How do I harden an nginx configuration?");
        assert!(verdict.is_safe);
        assert!(verdict.matches.is_empty());
    }

    #[test]
    fn test_collects_every_match() {
        let verdict = filter().check("An EXPLOIT that leaks the Secret token");
        assert!(!verdict.is_safe);
        assert_eq!(
            verdict.matches,
            vec![DEFAULT_BLOCKED_PATTERNS[0].to_string(), DEFAULT_BLOCKED_PATTERNS[2].to_string()]
        );
    }

    #[test]
    fn test_word_boundaries() {
        // "skill" must not trip the "kill" pattern
        assert!(filter().check("Upskilling the blue team").is_safe);
        assert!(!filter().check("reset all passwords").is_safe);
        assert!(!filter().check("leaked private key").is_safe);
    }

    #[test]
    fn test_idempotent_and_order_independent() {
        let text = "ransomware attack with stolen password";
        let forward = filter();
        let first = forward.check(text);
        assert_eq!(first, forward.check(text));

        let mut reversed: Vec<String> = DEFAULT_BLOCKED_PATTERNS.iter().rev().map(|p| p.to_string()).collect();
        reversed.push("unused-marker".into());
        let reverse = SafetyFilter::new(&reversed).unwrap();
        let second = reverse.check(text);

        let a: BTreeSet<_> = first.matches.into_iter().collect();
        let b: BTreeSet<_> = second.matches.into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(first.is_safe, second.is_safe);
    }

    #[test]
    fn test_extra_patterns_are_appended() {
        let filter = SafetyFilter::new(&[r"\bzero[- ]day\b".to_string()]).unwrap();
        assert_eq!(filter.patterns().count(), DEFAULT_BLOCKED_PATTERNS.len() + 1);

        let verdict = filter.check("Zero-day in the wild");
        assert_eq!(verdict.matches, vec![r"\bzero[- ]day\b".to_string()]);

        let verdict = filter.check("malware sample");
        assert_eq!(verdict.matches, vec![DEFAULT_BLOCKED_PATTERNS[0].to_string()]);
    }

    #[test]
    fn test_check_with_per_call_patterns() {
        let filter = filter();
        let verdict = filter.check_with("credential stuffing", &["stuffing".to_string()]).unwrap();
        assert_eq!(verdict.matches, vec!["stuffing".to_string()]);
        assert!(filter.check("credential stuffing").is_safe);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = SafetyFilter::new(&["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }
}
