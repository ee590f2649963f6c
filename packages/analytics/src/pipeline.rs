//! The filter, aggregate, and label functions behind every dashboard
//! output.
//!
//! Everything here is a pure function of its arguments. Callers own the
//! incident table and the current control values and pass them in on
//! every evaluation.

use bird_strike_analytics_models::DropdownOption;
use bird_strike_incident_models::{
    CategoryField, FilterSelection, IncidentRecord, SpeciesAggregate, StateAggregate, YearRange,
};

/// Prefix of the species chart label.
pub const STATE_LABEL_PREFIX: &str = "Birds Killed in: ";

/// Result of [`filter`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutput {
    /// Count and cost per state code over [`Self::subset`].
    pub totals: StateAggregate,
    /// Rows that passed the filter, unchanged and in table order.
    pub subset: Vec<IncidentRecord>,
}

/// Keeps the rows matching `selection` and aggregates them by state.
///
/// A row is kept only if its impact and phase are both selected and its
/// flight date is strictly inside the year range. Empty category sets and
/// inverted year ranges produce an empty result.
#[must_use]
pub fn filter(records: &[IncidentRecord], selection: &FilterSelection) -> FilterOutput {
    let subset: Vec<IncidentRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    let totals = aggregate_by_state(&subset);

    log::debug!(
        "Filter kept {}/{} incidents across {} states",
        subset.len(),
        records.len(),
        totals.len()
    );

    FilterOutput { totals, subset }
}

/// Incident count and cost sum per state code. Missing costs count as
/// zero toward the sum but the incident is still counted.
#[must_use]
pub fn aggregate_by_state(records: &[IncidentRecord]) -> StateAggregate {
    let mut totals = StateAggregate::new();
    for record in records {
        let entry = totals.entry(record.state_code.clone()).or_default();
        entry.count += 1;
        entry.cost += record.cost.unwrap_or(0.0);
    }
    totals
}

/// Number struck per species among the rows of `subset` in `state_code`.
///
/// Species are keyed alphabetically. Rows without a species name have no
/// bar and are left out. A state with no rows yields an empty aggregate.
#[must_use]
pub fn drilldown(subset: &[IncidentRecord], state_code: &str) -> SpeciesAggregate {
    let mut species = SpeciesAggregate::new();
    for record in subset
        .iter()
        .filter(|r| r.state_code == state_code && !r.species.is_empty())
    {
        *species.entry(record.species.clone()).or_default() += record.struck();
    }
    species
}

/// Whether any row of `subset` is in `state_code`.
#[must_use]
pub fn has_state(subset: &[IncidentRecord], state_code: &str) -> bool {
    subset.iter().any(|r| r.state_code == state_code)
}

/// `"From 2003 to 2009"`.
#[must_use]
pub fn format_range_label(years: YearRange) -> String {
    format!("From {} to {}", years.start, years.end)
}

/// `"Birds Killed in: CA"`.
#[must_use]
pub fn format_state_label(state_code: &str) -> String {
    format!("{STATE_LABEL_PREFIX}{state_code}")
}

/// State label for an optional selection. Without one the label is just
/// the prefix.
#[must_use]
pub fn state_label(selected: Option<&str>) -> String {
    format_state_label(selected.unwrap_or_default())
}

/// Distinct values of a categorical field in first-seen order, along with
/// the matching dropdown options.
#[must_use]
pub fn dropdown_options(
    records: &[IncidentRecord],
    field: CategoryField,
) -> (Vec<String>, Vec<DropdownOption>) {
    let mut values: Vec<String> = Vec::new();
    for record in records {
        let value = field.value_of(record);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    let options = values
        .iter()
        .map(|v| DropdownOption {
            label: v.clone(),
            value: v.clone(),
        })
        .collect();

    (values, options)
}

/// A selection with every impact and phase value present in `records`.
#[must_use]
pub fn full_selection(records: &[IncidentRecord], years: YearRange) -> FilterSelection {
    let (impact, _) = dropdown_options(records, CategoryField::Impact);
    let (phase, _) = dropdown_options(records, CategoryField::Phase);
    FilterSelection::new(impact, phase, years)
}
