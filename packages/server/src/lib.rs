#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the bird strike dashboard.
//!
//! Loads the incident export and state-code table once at startup, then
//! serves the filter, map, and drill-down endpoints under `/api`. Requests
//! carry the full control state in their query string, so the server holds
//! nothing per session. A built front end is served at `/` when present.

pub mod config;
mod handlers;
pub mod interactive;

use std::collections::BTreeSet;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use bird_strike_analytics::pipeline::dropdown_options;
use bird_strike_analytics_models::DropdownOption;
use bird_strike_incident_models::{CategoryField, FilterSelection, YearRange};
use bird_strike_ingest::{IncidentTable, IngestError, load_incidents, load_state_codes};
use thiserror::Error;

use crate::config::{ConfigError, DashboardConfig, ServerConfig};

/// Errors that prevent the server from starting or keep it from running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Binding the listener or running the server failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Incident table loaded at startup.
    pub table: Arc<IncidentTable>,
    /// Presentation settings.
    pub dashboard: DashboardConfig,
    /// Every impact value in first-seen order.
    pub impact_values: Vec<String>,
    pub impact_options: Vec<DropdownOption>,
    /// Every phase value in first-seen order.
    pub phase_values: Vec<String>,
    pub phase_options: Vec<DropdownOption>,
}

impl AppState {
    /// Builds state around an already loaded table.
    #[must_use]
    pub fn new(table: IncidentTable, dashboard: DashboardConfig) -> Self {
        let (impact_values, impact_options) =
            dropdown_options(table.records(), CategoryField::Impact);
        let (phase_values, phase_options) = dropdown_options(table.records(), CategoryField::Phase);

        Self {
            table: Arc::new(table),
            dashboard,
            impact_values,
            impact_options,
            phase_values,
            phase_options,
        }
    }

    /// Loads the state-code table and the incident export named by
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Ingest`] if either file is missing or
    /// malformed, or if an origin state has no code.
    pub fn load(config: &ServerConfig) -> Result<Self, ServerError> {
        log::info!(
            "Loading state codes from {}...",
            config.state_codes_path.display()
        );
        let lookup = load_state_codes(&config.state_codes_path)?;

        log::info!("Loading incidents from {}...", config.incidents_path.display());
        let table = load_incidents(&config.incidents_path, &lookup)?;

        let years = config.dashboard.years;
        if let Some((first, last)) = table.year_bounds()
            && (first < years.min || last > years.max)
        {
            log::warn!(
                "Incidents span {first}-{last}, outside the slider range {}-{}",
                years.min,
                years.max
            );
        }

        Ok(Self::new(table, config.dashboard.clone()))
    }

    /// Filter selection from comma-separated category lists and optional
    /// years. An absent list selects every value, an empty one selects
    /// none, and absent years fall back to the slider bounds.
    #[must_use]
    pub fn selection(
        &self,
        impact: Option<&str>,
        phase: Option<&str>,
        from: Option<i32>,
        to: Option<i32>,
    ) -> FilterSelection {
        let defaults = self.dashboard.year_range();
        FilterSelection {
            impact: parse_list(impact, &self.impact_values),
            phase: parse_list(phase, &self.phase_values),
            years: YearRange::new(from.unwrap_or(defaults.start), to.unwrap_or(defaults.end)),
        }
    }
}

fn parse_list(raw: Option<&str>, all: &[String]) -> BTreeSet<String> {
    raw.map_or_else(
        || all.iter().cloned().collect(),
        |s| {
            s.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
                .collect()
        },
    )
}

/// Registers the `/api` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/map", web::get().to(handlers::map))
            .route("/species", web::get().to(handlers::species))
            .route("/incidents", web::get().to(handlers::incidents)),
    );
}

/// Starts the bird strike API server.
///
/// Reads [`ServerConfig`] from the environment, loads the input files,
/// and starts the Actix-Web HTTP server. The caller initializes logging
/// and provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if configuration is invalid, the input files
/// fail to load, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;
    let state = web::Data::new(AppState::load(&config)?);

    let static_dir = config.static_dir.is_dir().then(|| config.static_dir.clone());
    if static_dir.is_none() {
        log::warn!(
            "Static directory {} not found, serving the API only",
            config.static_dir.display()
        );
    }

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let mut app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes);

        // Serve frontend static files (production)
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bird_strike_incident_models::IncidentRecord;
    use chrono::NaiveDate;

    fn record(impact: &str, phase: &str) -> IncidentRecord {
        IncidentRecord {
            origin_state: "Ohio".to_string(),
            state_code: "OH".to_string(),
            impact: impact.to_string(),
            phase: phase.to_string(),
            flight_date: NaiveDate::from_ymd_opt(2004, 4, 4)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            cost: None,
            species: "Gull".to_string(),
            number_struck: Some(1),
        }
    }

    fn state() -> AppState {
        AppState::new(
            IncidentTable::new(vec![
                record("None", "Climb"),
                record("Other", "Approach"),
                record("None", "Approach"),
            ]),
            DashboardConfig::embedded().unwrap(),
        )
    }

    #[test]
    fn values_are_in_first_seen_order() {
        let state = state();
        assert_eq!(state.impact_values, vec!["None", "Other"]);
        assert_eq!(state.phase_values, vec!["Climb", "Approach"]);
        assert_eq!(state.phase_options[1].label, "Approach");
    }

    #[test]
    fn absent_lists_select_everything() {
        let selection = state().selection(None, None, None, None);
        assert_eq!(selection.impact.len(), 2);
        assert_eq!(selection.phase.len(), 2);
        assert_eq!(selection.years, YearRange::new(2000, 2011));
    }

    #[test]
    fn empty_list_selects_nothing() {
        let selection = state().selection(Some(""), Some("Climb, Taxi"), Some(2003), None);
        assert!(selection.impact.is_empty());
        assert_eq!(
            selection.phase,
            ["Climb", "Taxi"].into_iter().map(String::from).collect()
        );
        assert_eq!(selection.years, YearRange::new(2003, 2011));
    }

    #[test]
    fn load_fails_on_missing_files() {
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.state_codes_path = std::env::temp_dir().join("bird_strike_missing_codes.csv");
        assert!(matches!(
            AppState::load(&config),
            Err(ServerError::Ingest(_))
        ));
    }
}
