#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the bird strike incident export and the state code CSV into an
//! in-memory [`IncidentTable`].
//!
//! Both files are read once at startup. Any failure here is fatal: a
//! missing file, a malformed row, or an origin state that the state code
//! lookup does not cover.

pub mod incidents;
pub mod parsing;
pub mod state_codes;

use std::fs::File;
use std::path::{Path, PathBuf};

use bird_strike_incident_models::{IncidentColumn, IncidentRecord};
use chrono::Datelike as _;
use thiserror::Error;

pub use incidents::{load_incidents, read_incidents};
pub use state_codes::{load_state_codes, read_state_codes};

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header is not present.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Header text that was expected.
        column: String,
    },

    /// A field could not be parsed.
    #[error("Row {row}: invalid {column} value '{value}': {message}")]
    InvalidField {
        /// 1-based line number, counting the header.
        row: usize,
        /// Column the value came from.
        column: IncidentColumn,
        /// Raw cell contents.
        value: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A state code row has a name but no code.
    #[error("Row {row}: state '{state}' has no code")]
    InvalidStateCode {
        /// 1-based line number, counting the header.
        row: usize,
        /// State name on that row.
        state: String,
    },

    /// The same state name was given two different codes.
    #[error("State '{state}' is mapped to both '{first}' and '{second}'")]
    ConflictingStateCode {
        /// State name.
        state: String,
        /// Code seen first.
        first: String,
        /// Code seen later.
        second: String,
    },

    /// Origin states that have no entry in the state code lookup. A blank
    /// origin state is reported as `''`.
    #[error("No state code for origin state(s): {}", quoted(states))]
    UnmappedStates {
        /// Every unmapped origin state, sorted.
        states: Vec<String>,
    },
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The full set of incidents, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentTable {
    records: Vec<IncidentRecord>,
}

impl IncidentTable {
    #[must_use]
    pub const fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    /// All incident rows in file order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest flight year in the table.
    #[must_use]
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let years = self.records.iter().map(|r| r.flight_date.year());
        let min = years.clone().min()?;
        let max = years.max()?;
        Some((min, max))
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds the position of each `wanted` header, in the order given.
fn header_positions(
    headers: &csv::StringRecord,
    wanted: &[&str],
    case_insensitive: bool,
) -> Result<Vec<usize>, IngestError> {
    let normalize = |s: &str| {
        let s = s.trim();
        if case_insensitive {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };
    let found: Vec<String> = headers.iter().map(normalize).collect();

    wanted
        .iter()
        .map(|name| {
            let target = normalize(name);
            found
                .iter()
                .position(|h| *h == target)
                .ok_or_else(|| IngestError::MissingColumn {
                    column: (*name).to_string(),
                })
        })
        .collect()
}
