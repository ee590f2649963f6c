//! Builds plotly-shaped figures from aggregates.

use bird_strike_analytics_models::{
    BarFigure, BarLayout, BarTrace, ChoroplethFigure, ChoroplethLayout, ChoroplethTrace,
    ColorBar, Geo, MapMetric, Margin, Title,
};
use bird_strike_geography_models::states::state_name;
use bird_strike_incident_models::{SpeciesAggregate, StateAggregate};

/// Presentation settings for the choropleth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureStyle {
    /// Map title.
    pub map_title: String,
    /// Named plotly colorscale.
    pub colorscale: String,
    /// Geo scope of the map layout.
    pub geo_scope: String,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            map_title: "US Bird Strikes".to_string(),
            colorscale: "Reds".to_string(),
            geo_scope: "usa".to_string(),
        }
    }
}

/// Choropleth of `totals`, colored by `metric`. No states gives a trace
/// with empty arrays, which plotly draws as a bare map.
#[must_use]
pub fn main_figure(
    totals: &StateAggregate,
    metric: MapMetric,
    style: &FigureStyle,
) -> ChoroplethFigure {
    let locations: Vec<String> = totals.keys().cloned().collect();
    let z = totals.values().map(|t| metric.value(t)).collect();
    let text = locations
        .iter()
        .map(|code| state_name(code).map_or_else(|| code.clone(), ToString::to_string))
        .collect();

    ChoroplethFigure {
        data: vec![ChoroplethTrace {
            kind: "choropleth".to_string(),
            locations,
            z,
            text,
            locationmode: "USA-states".to_string(),
            colorscale: style.colorscale.clone(),
            colorbar: ColorBar {
                title: Title {
                    text: metric.title().to_string(),
                },
            },
        }],
        layout: ChoroplethLayout {
            title: Title {
                text: style.map_title.clone(),
            },
            geo: Geo {
                scope: style.geo_scope.clone(),
            },
        },
    }
}

/// Horizontal bar chart with one bar per species, in aggregate order.
#[must_use]
pub fn bird_figure(species: &SpeciesAggregate) -> BarFigure {
    BarFigure {
        data: vec![BarTrace {
            kind: "bar".to_string(),
            x: species.values().copied().collect(),
            y: species.keys().cloned().collect(),
            orientation: "h".to_string(),
        }],
        layout: BarLayout {
            margin: Margin {
                t: Some(0),
                ..Margin::default()
            },
        },
    }
}
