#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State geography types for the bird strike dashboard.
//!
//! [`StateCodeLookup`] maps the full state names used in the incident
//! export to the two-letter codes the choropleth is keyed by. It is loaded
//! once at startup and never modified afterwards.

pub mod states;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from full state name to two-letter state code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCodeLookup {
    codes: BTreeMap<String, String>,
}

impl StateCodeLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codes: BTreeMap::new(),
        }
    }

    /// Records `name -> code`, returning the previous code for `name` if
    /// there was one.
    pub fn insert(&mut self, name: impl Into<String>, code: impl Into<String>) -> Option<String> {
        self.codes.insert(name.into(), code.into())
    }

    /// Returns the code for a state name.
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    /// Number of state names in the lookup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for StateCodeLookup {
    fn from_iter<T: IntoIterator<Item = (N, C)>>(iter: T) -> Self {
        Self {
            codes: iter
                .into_iter()
                .map(|(name, code)| (name.into(), code.into()))
                .collect(),
        }
    }
}
