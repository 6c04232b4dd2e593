use std::fmt;

use regex::Regex;

use crate::common::labels::Labels;
use crate::error::{ProxyError, ProxyResult};

/// Comparison operator of a matcher, PromQL `{label op "value"}` style.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchOp {
    Equal,
    NotEqual,
    RegexEqual,
    RegexNotEqual,
}

impl MatchOp {
    pub fn is_regex(&self) -> bool {
        matches!(self, MatchOp::RegexEqual | MatchOp::RegexNotEqual)
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOp::Equal => write!(f, "="),
            MatchOp::NotEqual => write!(f, "!="),
            MatchOp::RegexEqual => write!(f, "=~"),
            MatchOp::RegexNotEqual => write!(f, "!~"),
        }
    }
}

/// Matcher is a predicate over label sets. The proxy never evaluates
/// matchers against series data (stores do); it only uses them to prune
/// stores that advertise the label sets they serve.
#[derive(Clone, Debug)]
pub struct Matcher {
    pub name: String,
    pub op: MatchOp,
    pub value: String,

    // compiled regexp for `=~` and `!~` ops, anchored at both ends
    re: Option<Regex>,
}

impl Matcher {
    pub fn equal<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            op: MatchOp::Equal,
            value: value.into(),
            re: None,
        }
    }

    pub fn not_equal<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            op: MatchOp::NotEqual,
            value: value.into(),
            re: None,
        }
    }

    pub fn regex_equal<N: Into<String>>(name: N, pattern: &str) -> ProxyResult<Self> {
        Ok(Self {
            name: name.into(),
            op: MatchOp::RegexEqual,
            value: pattern.to_string(),
            re: Some(compile_anchored(pattern)?),
        })
    }

    pub fn regex_not_equal<N: Into<String>>(name: N, pattern: &str) -> ProxyResult<Self> {
        Ok(Self {
            name: name.into(),
            op: MatchOp::RegexNotEqual,
            value: pattern.to_string(),
            re: Some(compile_anchored(pattern)?),
        })
    }

    /// Evaluates the matcher against a single label value.
    pub fn matches_value(&self, value: &str) -> bool {
        match self.op {
            MatchOp::Equal => value == self.value,
            MatchOp::NotEqual => value != self.value,
            MatchOp::RegexEqual => self.match_regexp(value),
            MatchOp::RegexNotEqual => !self.match_regexp(value),
        }
    }

    /// Evaluates the matcher against a label set. A label absent from the
    /// set matches as the empty string, so `{missing=""}` and
    /// `{missing=~".*"}` match sets without the label.
    pub fn matches(&self, labels: &Labels) -> bool {
        self.matches_value(labels.get(&self.name).unwrap_or(""))
    }

    fn match_regexp(&self, value: &str) -> bool {
        match &self.re {
            Some(re) => re.is_match(value),
            // non-regex ops never populate `re`; a regex matcher always does
            None => false,
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.op == other.op && self.value == other.value
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.op, self.value)
    }
}

fn compile_anchored(pattern: &str) -> ProxyResult<Regex> {
    // Matchers are fully anchored, as in PromQL.
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| ProxyError::InvalidMatcher(e.to_string()))
}

/// Returns true if the matchers could be satisfied by at least one of the
/// advertised label sets. An empty advertisement means the store has not
/// declared what it serves and must be treated as a potential match.
///
/// This is a best-effort pruning aid: it may report true for a store that
/// turns out to hold no matching data, but never false for one that does.
pub fn matches_label_sets(matchers: &[Matcher], label_sets: &[Labels]) -> bool {
    if label_sets.is_empty() {
        return true;
    }
    label_sets
        .iter()
        .any(|ls| matchers.iter().all(|m| m.matches(ls)))
}
