#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bird strike incident records and the filter/aggregate types built on
//! top of them.
//!
//! An [`IncidentRecord`] is one row of the FAA wildlife strike export with
//! the two-letter state code already derived. A [`FilterSelection`] is the
//! current state of the dashboard controls, and [`StateAggregate`] /
//! [`SpeciesAggregate`] are the per-state and per-species summaries that
//! the charts are drawn from.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// First year covered by the bird strike export.
pub const FIRST_YEAR: i32 = 2000;

/// Last year covered by the bird strike export.
pub const LAST_YEAR: i32 = 2011;

/// Source column headers of the incident export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, IntoStaticStr,
)]
pub enum IncidentColumn {
    /// Full name of the state the flight originated in.
    #[strum(serialize = "Origin State")]
    OriginState,
    /// Effect of the strike on the flight (e.g. "None", "Aborted Take-off").
    #[strum(serialize = "Effect: Impact to flight")]
    ImpactToFlight,
    /// Phase of flight when the strike happened.
    #[strum(serialize = "When: Phase of flight")]
    PhaseOfFlight,
    /// Date of the flight.
    #[strum(serialize = "FlightDate")]
    FlightDate,
    /// Total reported cost in dollars.
    #[strum(serialize = "Cost: Total $")]
    TotalCost,
    /// Species of wildlife struck.
    #[strum(serialize = "Wildlife: Species")]
    Species,
    /// Number of animals actually struck.
    #[strum(serialize = "Wildlife: Number Struck Actual")]
    NumberStruck,
}

impl IncidentColumn {
    /// Every column the loader requires, in export order.
    pub const ALL: &[Self] = &[
        Self::OriginState,
        Self::ImpactToFlight,
        Self::PhaseOfFlight,
        Self::FlightDate,
        Self::TotalCost,
        Self::Species,
        Self::NumberStruck,
    ];

    /// The header text as it appears in the export.
    #[must_use]
    pub fn header(self) -> &'static str {
        self.into()
    }
}

/// Categorical columns that the dashboard exposes as multi-selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryField {
    /// [`IncidentColumn::ImpactToFlight`].
    Impact,
    /// [`IncidentColumn::PhaseOfFlight`].
    Phase,
}

impl CategoryField {
    /// Returns the value of this field on a record.
    #[must_use]
    pub fn value_of(self, record: &IncidentRecord) -> &str {
        match self {
            Self::Impact => &record.impact,
            Self::Phase => &record.phase,
        }
    }
}

/// A single bird strike event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Origin state name as written in the export (e.g. "California").
    pub origin_state: String,
    /// Two-letter state code derived from [`Self::origin_state`].
    pub state_code: String,
    /// Impact-to-flight category.
    pub impact: String,
    /// Phase-of-flight category.
    pub phase: String,
    /// When the flight took place.
    pub flight_date: NaiveDateTime,
    /// Total cost in dollars, if reported.
    pub cost: Option<f64>,
    /// Wildlife species name.
    pub species: String,
    /// Number of animals struck, if reported.
    pub number_struck: Option<u32>,
}

impl IncidentRecord {
    /// Number struck, treating a missing value as zero.
    #[must_use]
    pub fn struck(&self) -> u64 {
        self.number_struck.map_or(0, u64::from)
    }
}

/// Inclusive year range selected on the slider.
///
/// `start > end` is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year of the range.
    pub start: i32,
    /// Last year of the range.
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(FIRST_YEAR, LAST_YEAR)
    }
}

impl YearRange {
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Midnight on January 1 of the start year.
    #[must_use]
    pub fn lower_bound(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.start, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Midnight on December 31 of the end year.
    #[must_use]
    pub fn upper_bound(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.end, 12, 31).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Whether `date` falls strictly between [`Self::lower_bound`] and
    /// [`Self::upper_bound`]. Both ends are exclusive.
    #[must_use]
    pub fn contains(self, date: NaiveDateTime) -> bool {
        match (self.lower_bound(), self.upper_bound()) {
            (Some(lower), Some(upper)) => date > lower && date < upper,
            _ => false,
        }
    }
}

/// Current dashboard control values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected impact-to-flight categories.
    pub impact: BTreeSet<String>,
    /// Selected phase-of-flight categories.
    pub phase: BTreeSet<String>,
    /// Selected year range.
    pub years: YearRange,
}

impl FilterSelection {
    /// Builds a selection from any iterables of category values.
    #[must_use]
    pub fn new<I, P, S, T>(impact: I, phase: P, years: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        P: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            impact: impact.into_iter().map(Into::into).collect(),
            phase: phase.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// Whether a record satisfies all three predicates.
    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        self.impact.contains(&record.impact)
            && self.phase.contains(&record.phase)
            && self.years.contains(record.flight_date)
    }
}

/// Count and cost for one state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTotals {
    /// Number of incidents.
    pub count: u64,
    /// Sum of reported costs.
    pub cost: f64,
}

/// Per-state totals keyed by two-letter state code.
pub type StateAggregate = BTreeMap<String, StateTotals>;

/// Per-species struck totals for one state, keyed by species name.
pub type SpeciesAggregate = BTreeMap<String, u64>;
