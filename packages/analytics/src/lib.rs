#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter-and-render pipeline for the bird strike dashboard.
//!
//! [`pipeline`] holds the pure filter, drill-down, and label functions,
//! [`figures`] turns aggregates into plotly-shaped chart data, and
//! [`graph`] wires both to the dashboard controls through an explicit
//! input/output dependency graph.

pub mod figures;
pub mod graph;
pub mod pipeline;

pub use figures::FigureStyle;
pub use graph::{Dashboard, DashboardInput, DashboardInputs, DashboardOutput, InputChange};
pub use pipeline::{FilterOutput, drilldown, filter, format_range_label, format_state_label};
