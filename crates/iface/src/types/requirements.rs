// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Library requirements collected from type descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered, de-duplicated set of library names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirements {
    libraries: BTreeSet<String>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements holding a single library.
    pub fn library(name: impl Into<String>) -> Self {
        let mut reqs = Self::new();
        reqs.add(name);
        reqs
    }

    pub fn add(&mut self, name: impl Into<String>) {
        self.libraries.insert(name.into());
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: Requirements) {
        self.libraries.extend(other.libraries);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(String::as_str)
    }
}

impl FromIterator<Requirements> for Requirements {
    fn from_iter<I: IntoIterator<Item = Requirements>>(iter: I) -> Self {
        let mut all = Self::new();
        for reqs in iter {
            all.extend(reqs);
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let reqs: Requirements = [
            Requirements::library("ndarray"),
            Requirements::library("chrono"),
            Requirements::library("ndarray"),
        ]
        .into_iter()
        .collect();

        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs.iter().collect::<Vec<_>>(), vec!["chrono", "ndarray"]);
    }

    #[test]
    fn serializes_as_list() {
        let reqs = Requirements::library("ndarray");
        assert_eq!(serde_json::to_string(&reqs).unwrap(), r#"["ndarray"]"#);
    }
}
