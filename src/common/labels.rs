use std::cmp::Ordering;
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Label is a key/value pair of strings.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

/// Labels is a canonical label set: labels sorted by name, immutable once
/// built. Names are expected to be unique within one set.
///
/// The total order compares entry-by-entry on (name, value); if one set is a
/// prefix of the other, the set with fewer labels compares lower. Series
/// merging keys on this order.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Labels(Vec<Label>);

impl Labels {
    /// Returns a sorted label set from the given labels.
    /// The caller has to guarantee that all label names are unique.
    pub fn new(mut labels: Vec<Label>) -> Self {
        labels.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        Self(labels)
    }

    /// Creates a label set from pairs of strings.
    pub fn from_strings(ss: &[&str]) -> Self {
        if ss.len() % 2 != 0 {
            panic!("invalid number of strings");
        }
        let labels = ss
            .chunks_exact(2)
            .map(|pair| Label::new(pair[0], pair[1]))
            .collect();
        Self::new(labels)
    }

    /// Returns a sorted label set from the given map.
    pub fn from_map(m: AHashMap<String, String>) -> Self {
        let labels = m
            .into_iter()
            .map(|(name, value)| Label { name, value })
            .collect();
        Self::new(labels)
    }

    /// Returns the value for the label with the given name, or None if the
    /// label doesn't exist.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .binary_search_by(|l| l.name.as_str().cmp(name))
            .ok()
            .map(|i| self.0[i].value.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.0
    }
}

impl Ord for Labels {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let ord = a.name.cmp(&b.name).then_with(|| a.value.cmp(&b.value));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        // One set was a prefix of the other; the set with fewer labels
        // compares lower.
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for Labels {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}")?;
        }
        write!(f, "}}")
    }
}

impl From<Vec<Label>> for Labels {
    fn from(labels: Vec<Label>) -> Self {
        Labels::new(labels)
    }
}
