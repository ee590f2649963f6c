#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart data and dashboard view types.
//!
//! Figures serialize to the JSON shape plotly.js accepts directly
//! (`{"data": [...], "layout": {...}}`), so a front end can hand them to
//! `Plotly.react` without reshaping.

use bird_strike_incident_models::{SpeciesAggregate, StateAggregate, StateTotals};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which per-state value colors the choropleth.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapMetric {
    /// Number of incidents.
    #[default]
    Count,
    /// Sum of reported costs.
    Cost,
}

impl MapMetric {
    /// Colorbar title for this metric.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::Cost => "Cost",
        }
    }

    /// Extracts this metric from a state's totals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, totals: &StateTotals) -> f64 {
        match self {
            Self::Count => totals.count as f64,
            Self::Cost => totals.cost,
        }
    }
}

/// One entry of a multi-select dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Displayed text.
    pub label: String,
    /// Submitted value.
    pub value: String,
}

/// Plot title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

/// Colorbar settings of a choropleth trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: Title,
}

/// A choropleth trace over US states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    /// Always `"choropleth"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Two-letter state codes.
    pub locations: Vec<String>,
    /// Value per location.
    pub z: Vec<f64>,
    /// Hover text per location (full state names).
    pub text: Vec<String>,
    /// Always `"USA-states"`.
    pub locationmode: String,
    /// Named plotly colorscale.
    pub colorscale: String,
    pub colorbar: ColorBar,
}

/// Geographic scope of a map layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    pub scope: String,
}

/// Layout of the choropleth figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoroplethLayout {
    pub title: Title,
    pub geo: Geo,
}

/// The main map figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethFigure {
    pub data: Vec<ChoroplethTrace>,
    pub layout: ChoroplethLayout,
}

/// A bar trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarTrace {
    /// Always `"bar"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Bar lengths.
    pub x: Vec<u64>,
    /// Bar labels.
    pub y: Vec<String>,
    /// `"h"` for horizontal bars.
    pub orientation: String,
}

/// Plot margins in pixels. Unset sides use the plotly default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
}

/// Layout of the bar figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarLayout {
    pub margin: Margin,
}

/// The species drill-down figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarFigure {
    pub data: Vec<BarTrace>,
    pub layout: BarLayout,
}

/// Everything the dashboard page displays for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Choropleth of the filtered incidents.
    pub main_figure: ChoroplethFigure,
    /// Per-state totals behind [`Self::main_figure`].
    pub state_totals: StateAggregate,
    /// Number of incidents that passed the filter.
    pub filtered_count: usize,
    /// Label under the year slider.
    pub range_label: String,
    /// Label above the species chart.
    pub state_label: String,
    /// State currently drilled into, if any.
    pub selected_state: Option<String>,
    /// Per-species totals for [`Self::selected_state`].
    pub species_totals: Option<SpeciesAggregate>,
    /// Species chart, absent until a state is selected.
    pub bird_figure: Option<BarFigure>,
}
