//! HTTP handler functions for the bird strike API.

use actix_web::{HttpResponse, web};
use bird_strike_analytics::figures::{bird_figure, main_figure};
use bird_strike_analytics::pipeline::{has_state, state_label};
use bird_strike_analytics::{
    Dashboard, DashboardInputs, FilterOutput, drilldown, filter, format_range_label,
    format_state_label,
};
use bird_strike_analytics_models::MapMetric;
use bird_strike_incident_models::FilterSelection;
use bird_strike_server_models::{
    ApiHealth, ApiIncidents, ApiMap, ApiOptions, ApiSpecies, DashboardQueryParams,
};
use thiserror::Error;

use crate::AppState;

const DEFAULT_INCIDENT_LIMIT: u32 = 100;

/// Query string problems reported as `400 Bad Request`.
#[derive(Debug, Error)]
enum QueryError {
    #[error("Invalid metric '{0}', expected 'count' or 'cost'")]
    InvalidMetric(String),

    #[error("Missing required query parameter 'state'")]
    MissingState,
}

impl QueryError {
    fn into_response(self) -> HttpResponse {
        log::warn!("Rejected query: {self}");
        HttpResponse::BadRequest().json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        incident_count: state.table.len(),
    })
}

/// `GET /api/options`
///
/// Returns the dropdown options, slider settings, and initial labels.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiOptions {
        title: state.dashboard.title.clone(),
        subtitle: state.dashboard.subtitle.clone(),
        impact: state.impact_options.clone(),
        phase: state.phase_options.clone(),
        years: state.dashboard.slider(),
        range_label: format_range_label(state.dashboard.year_range()),
        state_label: state_label(None),
    })
}

/// `GET /api/dashboard`
///
/// Evaluates every dashboard output for the given control state.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let inputs = match dashboard_inputs(&state, &params) {
        Ok(inputs) => inputs,
        Err(e) => return e.into_response(),
    };

    let dashboard = Dashboard::with_inputs(
        state.table.clone(),
        inputs,
        state.dashboard.figure_style(),
    );

    HttpResponse::Ok().json(dashboard.view())
}

/// `GET /api/map`
///
/// Returns the choropleth for the filter selection.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let metric = match parse_metric(params.metric.as_deref()) {
        Ok(metric) => metric,
        Err(e) => return e.into_response(),
    };
    let selection = selection(&state, &params);

    let FilterOutput { totals, subset } = filter(state.table.records(), &selection);
    let figure = main_figure(&totals, metric, &state.dashboard.figure_style());

    HttpResponse::Ok().json(ApiMap {
        figure,
        state_totals: totals,
        filtered_count: subset.len(),
        range_label: format_range_label(selection.years),
    })
}

/// `GET /api/species`
///
/// Returns the species breakdown for one state within the filter
/// selection. A state with no matching incidents has empty totals.
pub async fn species(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let Some(code) = clicked_state(&params) else {
        return QueryError::MissingState.into_response();
    };

    let FilterOutput { subset, .. } = filter(state.table.records(), &selection(&state, &params));
    if !has_state(&subset, &code) {
        log::debug!("No incidents for {code} in the current selection");
    }
    let species_totals = drilldown(&subset, &code);

    HttpResponse::Ok().json(ApiSpecies {
        state_label: format_state_label(&code),
        figure: bird_figure(&species_totals),
        species_totals,
        state: code,
    })
}

/// `GET /api/incidents`
///
/// Returns a page of the filtered incidents, optionally narrowed to one
/// state.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let FilterOutput { subset, .. } = filter(state.table.records(), &selection(&state, &params));

    let matching: Vec<_> = match clicked_state(&params) {
        Some(code) => subset.into_iter().filter(|r| r.state_code == code).collect(),
        None => subset,
    };

    let total_count = matching.len();
    let offset = params.offset.unwrap_or(0) as usize;
    let limit = params.limit.unwrap_or(DEFAULT_INCIDENT_LIMIT) as usize;
    let incidents: Vec<_> = matching.into_iter().skip(offset).take(limit).collect();
    let has_more = offset.saturating_add(incidents.len()) < total_count;

    HttpResponse::Ok().json(ApiIncidents {
        incidents,
        total_count,
        has_more,
    })
}

/// Every control value carried by `params`.
fn dashboard_inputs(
    state: &AppState,
    params: &DashboardQueryParams,
) -> Result<DashboardInputs, QueryError> {
    Ok(DashboardInputs {
        selection: selection(state, params),
        metric: parse_metric(params.metric.as_deref())?,
        clicked: clicked_state(params),
    })
}

fn selection(state: &AppState, params: &DashboardQueryParams) -> FilterSelection {
    state.selection(
        params.impact.as_deref(),
        params.phase.as_deref(),
        params.from,
        params.to,
    )
}

fn parse_metric(raw: Option<&str>) -> Result<MapMetric, QueryError> {
    raw.map_or(Ok(MapMetric::default()), |s| {
        s.trim()
            .parse()
            .map_err(|_| QueryError::InvalidMetric(s.to_string()))
    })
}

/// Upper-cased `state` parameter, or `None` when absent or blank.
fn clicked_state(params: &DashboardQueryParams) -> Option<String> {
    params
        .state
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use bird_strike_incident_models::IncidentRecord;
    use bird_strike_ingest::IncidentTable;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::config::DashboardConfig;
    use crate::routes;

    fn record(
        state: &str,
        impact: &str,
        phase: &str,
        (y, m, d): (i32, u32, u32),
        species: &str,
        struck: u32,
        cost: Option<f64>,
    ) -> IncidentRecord {
        IncidentRecord {
            origin_state: state.to_string(),
            state_code: match state {
                "California" => "CA",
                "Texas" => "TX",
                _ => "NY",
            }
            .to_string(),
            impact: impact.to_string(),
            phase: phase.to_string(),
            flight_date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            cost,
            species: species.to_string(),
            number_struck: Some(struck),
        }
    }

    fn app_state() -> AppState {
        let table = IncidentTable::new(vec![
            record("California", "None", "Takeoff", (2005, 6, 1), "Gull", 3, Some(1000.0)),
            record("California", "None", "Landing", (2010, 1, 1), "Hawk", 1, None),
            record("Texas", "Precautionary Landing", "Climb", (2003, 3, 15), "Dove", 2, Some(250.0)),
            record("California", "None", "Takeoff", (2007, 8, 9), "Gull", 2, Some(500.0)),
        ]);
        AppState::new(table, DashboardConfig::embedded().unwrap())
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(app_state()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_incident_count() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["incidentCount"], 4);
    }

    #[actix_web::test]
    async fn options_lists_values_in_first_seen_order() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/api/options").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "Dashboard");
        assert_eq!(body["impact"][0]["value"], "None");
        assert_eq!(body["impact"][1]["label"], "Precautionary Landing");
        assert_eq!(body["phase"].as_array().unwrap().len(), 3);
        assert_eq!(body["years"]["value"], serde_json::json!([2000, 2011]));
        assert_eq!(body["rangeLabel"], "From 2000 to 2011");
        assert_eq!(body["stateLabel"], "Birds Killed in: ");
    }

    #[actix_web::test]
    async fn dashboard_without_click_has_no_bar_chart() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["filteredCount"], 4);
        assert_eq!(body["stateTotals"]["CA"]["count"], 3);
        assert!(body["birdFigure"].is_null());
        assert!(body["selectedState"].is_null());
    }

    #[actix_web::test]
    async fn dashboard_with_click_drills_down() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/dashboard?impact=None&phase=Takeoff&state=ca")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["selectedState"], "CA");
        assert_eq!(body["stateLabel"], "Birds Killed in: CA");
        assert_eq!(body["speciesTotals"]["Gull"], 5);
        assert_eq!(body["birdFigure"]["data"][0]["orientation"], "h");
    }

    #[actix_web::test]
    async fn dashboard_clears_click_outside_subset() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/dashboard?phase=Climb&state=CA")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert!(body["selectedState"].is_null());
        assert_eq!(body["stateLabel"], "Birds Killed in: ");
    }

    #[actix_web::test]
    async fn map_respects_year_range_and_metric() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/map?from=2004&to=2008&metric=cost")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["filteredCount"], 2);
        assert_eq!(body["rangeLabel"], "From 2004 to 2008");
        assert_eq!(body["figure"]["data"][0]["locations"], serde_json::json!(["CA"]));
        assert_eq!(body["figure"]["data"][0]["z"], serde_json::json!([1500.0]));
    }

    #[actix_web::test]
    async fn empty_list_selects_nothing() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/api/map?impact=").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["filteredCount"], 0);
        assert_eq!(body["stateTotals"], serde_json::json!({}));
    }

    #[actix_web::test]
    async fn invalid_metric_is_bad_request() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/map?metric=weight")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("weight"));
    }

    #[actix_web::test]
    async fn species_requires_state() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/api/species").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn species_sums_struck_by_species() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/species?state=CA")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["state"], "CA");
        assert_eq!(body["stateLabel"], "Birds Killed in: CA");
        assert_eq!(body["speciesTotals"], serde_json::json!({"Gull": 5, "Hawk": 1}));
        assert_eq!(body["figure"]["data"][0]["y"], serde_json::json!(["Gull", "Hawk"]));
    }

    #[actix_web::test]
    async fn incidents_paginate_within_state() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/incidents?state=CA&limit=2&offset=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["incidents"].as_array().unwrap().len(), 2);
        assert_eq!(body["hasMore"], false);
        assert_eq!(body["incidents"][0]["stateCode"], "CA");
    }
}
