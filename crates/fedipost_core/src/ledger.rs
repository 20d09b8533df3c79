use std::collections::{BTreeSet, HashSet};

use crate::Item;

/// Identifiers of items already announced.
///
/// Identifiers are only ever added. Iteration and rendering are in ascending
/// order, which is also the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ledger {
    ids: BTreeSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the newline-delimited form; blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// One identifier per line, sorted, each line newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for id in &self.ids {
            out.push_str(id);
            out.push('\n');
        }
        out
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if `id` was not present before.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Candidates not yet announced, in input order.
    ///
    /// A candidate id repeated within `candidates` is returned once.
    pub fn unannounced(&self, candidates: &[Item]) -> Vec<Item> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .filter(|item| !self.contains(&item.id))
            .filter(|item| seen.insert(item.id.as_str()))
            .cloned()
            .collect()
    }

    /// `self ∪ ids`, leaving `self` untouched.
    pub fn merged<I, S>(&self, ids: I) -> Ledger
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.extend(ids);
        next
    }
}

impl<S: Into<String>> Extend<S> for Ledger {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for Ledger {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut ledger = Ledger::new();
        ledger.extend(iter);
        ledger
    }
}
