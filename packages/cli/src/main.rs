#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the bird strike dashboard.
//!
//! `serve` starts the HTTP server. `totals` and `species` run the same
//! filter and drill-down pipeline as the dashboard and print the result.
//! Without a subcommand, an interactive menu asks what to do.

use bird_strike_analytics::pipeline::state_label;
use bird_strike_analytics::{FilterOutput, drilldown, filter, format_range_label};
use bird_strike_analytics_models::MapMetric;
use bird_strike_incident_models::FilterSelection;
use bird_strike_server::AppState;
use bird_strike_server::config::ServerConfig;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Select};

#[derive(Parser)]
#[command(name = "bird_strike_cli", about = "US bird strike dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Comma-separated impact-to-flight categories (default: all)
    #[arg(long)]
    impact: Option<String>,
    /// Comma-separated phase-of-flight categories (default: all)
    #[arg(long)]
    phase: Option<String>,
    /// First year of the range
    #[arg(long)]
    from: Option<i32>,
    /// Last year of the range
    #[arg(long)]
    to: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard HTTP server
    Serve,
    /// Print per-state incident counts and costs
    Totals {
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort by `count` or `cost`
        #[arg(long, default_value = "count", value_parser = parse_metric)]
        metric: MapMetric,
    },
    /// Print the species struck in one state
    Species {
        /// Two-letter state code (e.g. "CA")
        #[arg(long)]
        state: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Top-level actions in the interactive menu.
enum Tool {
    Serve,
    Totals,
    Species,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Totals, Self::Species];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Totals => "Show state totals",
            Self::Species => "Show species for a state",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive().await;
    };

    match command {
        Commands::Serve => serve().await?,
        Commands::Totals { filters, metric } => {
            let state = load_state()?;
            print_totals(&state, &selection(&state, &filters), metric);
        }
        Commands::Species { state: code, filters } => {
            let state = load_state()?;
            print_species(&state, &selection(&state, &filters), &code);
        }
    }

    Ok(())
}

async fn interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("Bird Strike Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(bird_strike_server::interactive::run())
            })
            .await??;
        }
        Tool::Totals => {
            let state = load_state()?;
            let filters = prompt_years(&state)?;

            let metrics = [MapMetric::Count, MapMetric::Cost];
            let metric_labels: Vec<&str> = metrics.iter().map(|m| m.title()).collect();
            let metric_idx = Select::new()
                .with_prompt("Sort by")
                .items(&metric_labels)
                .default(0)
                .interact()?;

            print_totals(&state, &selection(&state, &filters), metrics[metric_idx]);
        }
        Tool::Species => {
            let state = load_state()?;
            let code: String = Input::new()
                .with_prompt("State code")
                .interact_text()?;
            let filters = prompt_years(&state)?;
            print_species(&state, &selection(&state, &filters), &code);
        }
    }

    Ok(())
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(bird_strike_server::run_server())
    })
    .await??;
    Ok(())
}

fn load_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    Ok(AppState::load(&config)?)
}

fn prompt_years(state: &AppState) -> Result<FilterArgs, dialoguer::Error> {
    let years = state.dashboard.years;
    let from: i32 = Input::new()
        .with_prompt("From year")
        .default(years.min)
        .interact_text()?;
    let to: i32 = Input::new()
        .with_prompt("To year")
        .default(years.max)
        .interact_text()?;

    Ok(FilterArgs {
        from: Some(from),
        to: Some(to),
        ..FilterArgs::default()
    })
}

fn selection(state: &AppState, filters: &FilterArgs) -> FilterSelection {
    state.selection(
        filters.impact.as_deref(),
        filters.phase.as_deref(),
        filters.from,
        filters.to,
    )
}

fn parse_metric(s: &str) -> Result<MapMetric, String> {
    s.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| format!("unknown metric '{s}', expected `count` or `cost`"))
}

fn print_totals(state: &AppState, selection: &FilterSelection, metric: MapMetric) {
    let FilterOutput { totals, subset } = filter(state.table.records(), selection);

    let mut rows: Vec<_> = totals.iter().collect();
    rows.sort_by(|a, b| metric.value(b.1).total_cmp(&metric.value(a.1)));

    println!("{}", format_range_label(selection.years));
    println!("{:<6} {:>8} {:>16}", "STATE", "COUNT", "COST");
    println!("{}", "-".repeat(32));
    for (code, t) in rows {
        println!("{code:<6} {:>8} {:>16.2}", t.count, t.cost);
    }
    println!();
    println!("{} incidents in {} states", subset.len(), totals.len());
}

fn print_species(state: &AppState, selection: &FilterSelection, code: &str) {
    let code = code.trim().to_uppercase();
    let FilterOutput { subset, .. } = filter(state.table.records(), selection);
    let species = drilldown(&subset, &code);

    if species.is_empty() {
        log::warn!("No incidents for {code} in the selected range");
    }

    println!("{}", state_label(Some(&code)));
    println!("{:<40} {:>8}", "SPECIES", "STRUCK");
    println!("{}", "-".repeat(49));
    for (name, struck) in &species {
        println!("{name:<40} {struck:>8}");
    }
}
