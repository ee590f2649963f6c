#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the bird strike dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics types so the API contract can evolve on its own.

use std::collections::BTreeMap;

use bird_strike_analytics_models::{BarFigure, ChoroplethFigure, DropdownOption};
use bird_strike_incident_models::{IncidentRecord, SpeciesAggregate, StateAggregate};
use serde::{Deserialize, Serialize};

/// Query parameters shared by every dashboard endpoint.
///
/// `impact` and `phase` are comma-separated. An absent list selects every
/// value; a present but empty list selects none.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Comma-separated impact-to-flight categories.
    pub impact: Option<String>,
    /// Comma-separated phase-of-flight categories.
    pub phase: Option<String>,
    /// First year of the range.
    pub from: Option<i32>,
    /// Last year of the range.
    pub to: Option<i32>,
    /// Clicked state code.
    pub state: Option<String>,
    /// `count` or `cost`.
    pub metric: Option<String>,
    /// Maximum number of incidents returned by `/api/incidents`.
    pub limit: Option<u32>,
    /// Offset for incident pagination.
    pub offset: Option<u32>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of incidents loaded at startup.
    pub incident_count: usize,
}

/// Year slider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSlider {
    pub min: i32,
    pub max: i32,
    /// Tick labels keyed by year.
    pub marks: BTreeMap<i32, String>,
    /// Initial `[start, end]` handles.
    pub value: [i32; 2],
}

/// Everything a front end needs to build the controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Page heading.
    pub title: String,
    /// Page subheading.
    pub subtitle: String,
    /// Impact-to-flight dropdown options.
    pub impact: Vec<DropdownOption>,
    /// Phase-of-flight dropdown options.
    pub phase: Vec<DropdownOption>,
    pub years: ApiSlider,
    /// Initial year range label.
    pub range_label: String,
    /// Initial state label.
    pub state_label: String,
}

/// Response of `/api/map`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    pub figure: ChoroplethFigure,
    pub state_totals: StateAggregate,
    pub filtered_count: usize,
    pub range_label: String,
}

/// Response of `/api/species`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpecies {
    /// Normalized state code.
    pub state: String,
    pub state_label: String,
    pub species_totals: SpeciesAggregate,
    pub figure: BarFigure,
}

/// Response of `/api/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidents {
    /// Paginated filtered incidents.
    pub incidents: Vec<IncidentRecord>,
    /// Total number of incidents that passed the filter.
    pub total_count: usize,
    /// Whether more incidents are available beyond this page.
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_serializes_marks_by_year() {
        let slider = ApiSlider {
            min: 2000,
            max: 2001,
            marks: [(2000, "2000".to_string()), (2001, "2001".to_string())]
                .into_iter()
                .collect(),
            value: [2000, 2001],
        };
        let json = serde_json::to_value(&slider).unwrap();
        assert_eq!(json["marks"]["2000"], "2000");
        assert_eq!(json["value"], serde_json::json!([2000, 2001]));
    }

    #[test]
    fn query_params_default_to_unset() {
        let params = DashboardQueryParams::default();
        assert!(params.impact.is_none());
        assert!(params.state.is_none());
    }
}
