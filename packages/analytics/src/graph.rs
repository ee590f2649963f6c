//! Dependency graph between dashboard controls and dashboard outputs.
//!
//! Each control is a [`DashboardInput`] and each displayed value is a
//! [`DashboardOutput`]. [`Dashboard::apply`] changes one input and
//! re-evaluates only the outputs reachable from it, in dependency order.
//! The last clicked state is ordinary dashboard state, never inferred
//! from anywhere else.

use std::collections::BTreeSet;
use std::sync::Arc;

use bird_strike_analytics_models::{BarFigure, ChoroplethFigure, DashboardView, MapMetric};
use bird_strike_incident_models::{
    FilterSelection, IncidentRecord, SpeciesAggregate, StateAggregate, YearRange,
};
use bird_strike_ingest::IncidentTable;
use strum_macros::Display;

use crate::figures::{FigureStyle, bird_figure, main_figure};
use crate::pipeline::{
    FilterOutput, drilldown, filter, format_range_label, full_selection, has_state, state_label,
};

/// A dashboard control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DashboardInput {
    /// Impact-to-flight multi-select.
    ImpactSelection,
    /// Phase-of-flight multi-select.
    PhaseSelection,
    /// Year range slider.
    YearRange,
    /// Click on the map.
    MapClick,
    /// Choropleth metric toggle.
    Metric,
}

impl DashboardInput {
    /// Outputs that read this input directly.
    #[must_use]
    pub const fn feeds(self) -> &'static [DashboardOutput] {
        match self {
            Self::ImpactSelection | Self::PhaseSelection => &[DashboardOutput::FilteredSubset],
            Self::YearRange => &[DashboardOutput::FilteredSubset, DashboardOutput::RangeLabel],
            Self::MapClick => &[DashboardOutput::StateLabel, DashboardOutput::BirdPlot],
            Self::Metric => &[DashboardOutput::MainGraph],
        }
    }
}

/// A value displayed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DashboardOutput {
    /// Filtered rows and their per-state totals.
    FilteredSubset,
    /// Choropleth figure.
    MainGraph,
    /// Year range label.
    RangeLabel,
    /// Selected state label.
    StateLabel,
    /// Species bar chart.
    BirdPlot,
}

impl DashboardOutput {
    /// Outputs that read this output. A new subset can invalidate the
    /// clicked state, so it also feeds the state label.
    #[must_use]
    pub const fn feeds(self) -> &'static [Self] {
        match self {
            Self::FilteredSubset => &[Self::MainGraph, Self::StateLabel, Self::BirdPlot],
            Self::MainGraph | Self::RangeLabel | Self::StateLabel | Self::BirdPlot => &[],
        }
    }
}

/// Every output reachable from `input`, in evaluation order.
///
/// Variant order of [`DashboardOutput`] is a topological order of the
/// graph, so sorting is enough.
#[must_use]
pub fn affected_outputs(input: DashboardInput) -> Vec<DashboardOutput> {
    let mut seen = BTreeSet::new();
    let mut stack: Vec<DashboardOutput> = input.feeds().to_vec();
    while let Some(output) = stack.pop() {
        if seen.insert(output) {
            stack.extend_from_slice(output.feeds());
        }
    }
    seen.into_iter().collect()
}

/// A new value for one dashboard control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputChange {
    Impact(BTreeSet<String>),
    Phase(BTreeSet<String>),
    Years(YearRange),
    /// `None` clears the selection.
    Click(Option<String>),
    Metric(MapMetric),
}

impl InputChange {
    /// The control this change applies to.
    #[must_use]
    pub const fn input(&self) -> DashboardInput {
        match self {
            Self::Impact(_) => DashboardInput::ImpactSelection,
            Self::Phase(_) => DashboardInput::PhaseSelection,
            Self::Years(_) => DashboardInput::YearRange,
            Self::Click(_) => DashboardInput::MapClick,
            Self::Metric(_) => DashboardInput::Metric,
        }
    }
}

/// Values of every dashboard control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardInputs {
    pub selection: FilterSelection,
    pub metric: MapMetric,
    /// Clicked state code, if any.
    pub clicked: Option<String>,
}

/// Dashboard state: the shared incident table, the current inputs, and
/// the outputs last evaluated from them.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<IncidentTable>,
    style: FigureStyle,
    inputs: DashboardInputs,
    subset: Vec<IncidentRecord>,
    totals: StateAggregate,
    main_figure: ChoroplethFigure,
    range_label: String,
    state_label: String,
    species: Option<SpeciesAggregate>,
    bird_figure: Option<BarFigure>,
}

impl Dashboard {
    /// Dashboard with every category selected over `years`, which is how
    /// the page first loads.
    #[must_use]
    pub fn new(table: Arc<IncidentTable>, years: YearRange, style: FigureStyle) -> Self {
        let inputs = DashboardInputs {
            selection: full_selection(table.records(), years),
            ..DashboardInputs::default()
        };
        Self::with_inputs(table, inputs, style)
    }

    /// Dashboard evaluated from explicit inputs.
    #[must_use]
    pub fn with_inputs(
        table: Arc<IncidentTable>,
        mut inputs: DashboardInputs,
        style: FigureStyle,
    ) -> Self {
        inputs.clicked = inputs.clicked.map(|c| c.trim().to_uppercase());

        let FilterOutput { totals, subset } = filter(table.records(), &inputs.selection);
        let main_figure = main_figure(&totals, inputs.metric, &style);
        let range_label = format_range_label(inputs.selection.years);

        let mut dashboard = Self {
            table,
            style,
            inputs,
            subset,
            totals,
            main_figure,
            range_label,
            state_label: String::new(),
            species: None,
            bird_figure: None,
        };
        dashboard.reconcile_click();
        dashboard.evaluate(DashboardOutput::StateLabel);
        dashboard.evaluate(DashboardOutput::BirdPlot);
        dashboard
    }

    /// Applies one input change and returns the outputs that were
    /// re-evaluated, in evaluation order.
    pub fn apply(&mut self, change: InputChange) -> Vec<DashboardOutput> {
        let input = change.input();
        match change {
            InputChange::Impact(values) => self.inputs.selection.impact = values,
            InputChange::Phase(values) => self.inputs.selection.phase = values,
            InputChange::Years(years) => self.inputs.selection.years = years,
            InputChange::Click(code) => {
                self.inputs.clicked = code.map(|c| c.trim().to_uppercase());
                self.reconcile_click();
            }
            InputChange::Metric(metric) => self.inputs.metric = metric,
        }

        let outputs = affected_outputs(input);
        log::debug!("{input} changed, re-evaluating {outputs:?}");
        for output in &outputs {
            self.evaluate(*output);
        }
        outputs
    }

    fn evaluate(&mut self, output: DashboardOutput) {
        match output {
            DashboardOutput::FilteredSubset => {
                let out = filter(self.table.records(), &self.inputs.selection);
                self.subset = out.subset;
                self.totals = out.totals;
                self.reconcile_click();
            }
            DashboardOutput::MainGraph => {
                self.main_figure = main_figure(&self.totals, self.inputs.metric, &self.style);
            }
            DashboardOutput::RangeLabel => {
                self.range_label = format_range_label(self.inputs.selection.years);
            }
            DashboardOutput::StateLabel => {
                self.state_label = state_label(self.inputs.clicked.as_deref());
            }
            DashboardOutput::BirdPlot => {
                self.species = self
                    .inputs
                    .clicked
                    .as_deref()
                    .map(|code| drilldown(&self.subset, code));
                self.bird_figure = self.species.as_ref().map(bird_figure);
            }
        }
    }

    /// Drops a clicked state that has no rows in the current subset.
    fn reconcile_click(&mut self) {
        if let Some(code) = self.inputs.clicked.as_deref()
            && !has_state(&self.subset, code)
        {
            log::debug!("Clearing selection of {code}: no incidents match the current filter");
            self.inputs.clicked = None;
        }
    }

    /// Clicked state code, if any.
    #[must_use]
    pub fn selected_state(&self) -> Option<&str> {
        self.inputs.clicked.as_deref()
    }

    /// Rows that passed the current filter.
    #[must_use]
    pub fn subset(&self) -> &[IncidentRecord] {
        &self.subset
    }

    #[must_use]
    pub const fn totals(&self) -> &StateAggregate {
        &self.totals
    }

    #[must_use]
    pub const fn main_figure(&self) -> &ChoroplethFigure {
        &self.main_figure
    }

    #[must_use]
    pub fn range_label(&self) -> &str {
        &self.range_label
    }

    #[must_use]
    pub fn state_label(&self) -> &str {
        &self.state_label
    }

    /// Species totals for the clicked state, absent without a selection.
    #[must_use]
    pub const fn species(&self) -> Option<&SpeciesAggregate> {
        self.species.as_ref()
    }

    #[must_use]
    pub const fn bird_figure(&self) -> Option<&BarFigure> {
        self.bird_figure.as_ref()
    }

    /// Snapshot of every output.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView {
            main_figure: self.main_figure.clone(),
            state_totals: self.totals.clone(),
            filtered_count: self.subset.len(),
            range_label: self.range_label.clone(),
            state_label: self.state_label.clone(),
            selected_state: self.inputs.clicked.clone(),
            species_totals: self.species.clone(),
            bird_figure: self.bird_figure.clone(),
        }
    }
}
