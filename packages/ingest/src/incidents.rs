//! Loader for the bird strike incident export.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use bird_strike_geography_models::StateCodeLookup;
use bird_strike_incident_models::{IncidentColumn, IncidentRecord};

use crate::parsing::{parse_cost, parse_count, parse_flight_date};
use crate::{IncidentTable, IngestError, header_positions, open};

/// Loads the incident export and derives each row's state code.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, a required column
/// is missing, a field is malformed, or any origin state is absent from
/// `lookup`.
pub fn load_incidents(path: &Path, lookup: &StateCodeLookup) -> Result<IncidentTable, IngestError> {
    let table = read_incidents(open(path)?, lookup)?;
    log::info!(
        "Loaded {} incidents from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Reads the incident export from any CSV source.
///
/// # Errors
///
/// See [`load_incidents`].
pub fn read_incidents<R: Read>(
    source: R,
    lookup: &StateCodeLookup,
) -> Result<IncidentTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);

    let headers: Vec<&str> = IncidentColumn::ALL.iter().map(|c| c.header()).collect();
    let positions: HashMap<IncidentColumn, usize> = IncidentColumn::ALL
        .iter()
        .copied()
        .zip(header_positions(reader.headers()?, &headers, false)?)
        .collect();

    let mut records = Vec::new();
    let mut unmapped = BTreeSet::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = result?;
        let field = |column: IncidentColumn| record.get(positions[&column]).unwrap_or("").trim();

        let origin_state = field(IncidentColumn::OriginState);
        let Some(state_code) = lookup.code_for(origin_state) else {
            unmapped.insert(origin_state.to_string());
            continue;
        };

        let date_str = field(IncidentColumn::FlightDate);
        let flight_date =
            parse_flight_date(date_str).ok_or_else(|| IngestError::InvalidField {
                row,
                column: IncidentColumn::FlightDate,
                value: date_str.to_string(),
                message: "unrecognized date format".to_string(),
            })?;

        let cost_str = field(IncidentColumn::TotalCost);
        let cost = parse_cost(cost_str).map_err(|message| IngestError::InvalidField {
            row,
            column: IncidentColumn::TotalCost,
            value: cost_str.to_string(),
            message,
        })?;

        let struck_str = field(IncidentColumn::NumberStruck);
        let number_struck = parse_count(struck_str).map_err(|message| IngestError::InvalidField {
            row,
            column: IncidentColumn::NumberStruck,
            value: struck_str.to_string(),
            message,
        })?;

        records.push(IncidentRecord {
            origin_state: origin_state.to_string(),
            state_code: state_code.to_string(),
            impact: field(IncidentColumn::ImpactToFlight).to_string(),
            phase: field(IncidentColumn::PhaseOfFlight).to_string(),
            flight_date,
            cost,
            species: field(IncidentColumn::Species).to_string(),
            number_struck,
        });
    }

    if !unmapped.is_empty() {
        return Err(IngestError::UnmappedStates {
            states: unmapped.into_iter().collect(),
        });
    }

    let table = IncidentTable::new(records);
    if let Some((first, last)) = table.year_bounds() {
        log::debug!("Incident flight dates span {first}-{last}");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Origin State,Effect: Impact to flight,When: Phase of flight,FlightDate,Cost: Total $,Wildlife: Species,Wildlife: Number Struck Actual";

    fn lookup() -> StateCodeLookup {
        [("California", "CA"), ("Texas", "TX")].into_iter().collect()
    }

    #[test]
    fn reads_incidents_and_derives_codes() {
        let csv = format!(
            "{HEADER}\n\
             California,None,Takeoff,2005-06-01,\"$1,000\",Gull,3\n\
             Texas,Aborted Take-off,Take-off run,11/23/2000 0:00,,Hawk,\n"
        );
        let table = read_incidents(csv.as_bytes(), &lookup()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.state_code, "CA");
        assert_eq!(first.impact, "None");
        assert_eq!(first.cost, Some(1000.0));
        assert_eq!(first.number_struck, Some(3));

        let second = &table.records()[1];
        assert_eq!(second.state_code, "TX");
        assert_eq!(second.phase, "Take-off run");
        assert_eq!(second.cost, None);
        assert_eq!(second.number_struck, None);
        assert_eq!(table.year_bounds(), Some((2000, 2005)));
    }

    #[test]
    fn columns_may_appear_in_any_order_with_extras() {
        let csv = "Record ID,Wildlife: Species,Origin State,FlightDate,Effect: Impact to flight,When: Phase of flight,Cost: Total $,Wildlife: Number Struck Actual\n\
                   1,Gull,Texas,2003-02-02,None,Climb,0,1\n";
        let table = read_incidents(csv.as_bytes(), &lookup()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.species, "Gull");
        assert_eq!(record.state_code, "TX");
        assert_eq!(record.phase, "Climb");
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Origin State,FlightDate\nTexas,2003-02-02\n";
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        assert!(
            matches!(err, IngestError::MissingColumn { column } if column == "Effect: Impact to flight")
        );
    }

    #[test]
    fn unmapped_states_are_all_reported() {
        let csv = format!(
            "{HEADER}\n\
             Nevada,None,Climb,2003-02-02,,Gull,1\n\
             California,None,Climb,2003-02-02,,Gull,1\n\
             Alberta,None,Climb,2003-02-02,,Gull,1\n\
             Nevada,None,Climb,2003-02-02,,Gull,1\n"
        );
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        match err {
            IngestError::UnmappedStates { states } => {
                assert_eq!(states, vec!["Alberta".to_string(), "Nevada".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_origin_state_is_unmapped() {
        let csv = format!(
            "{HEADER}\n\
             ,None,Climb,2003-02-02,,Gull,1\n\
             Texas,None,Climb,2003-02-02,,Gull,1\n"
        );
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No state code for origin state(s): ''"
        );
        assert!(matches!(err, IngestError::UnmappedStates { states } if states == vec![String::new()]));
    }

    #[test]
    fn nan_cost_and_blank_species_load_as_missing() {
        let csv = format!(
            "{HEADER}\n\
             California,None,Climb,2003-02-02,NaN,,3\n\
             California,None,Climb,2003-02-03,100,Gull,1\n"
        );
        let table = read_incidents(csv.as_bytes(), &lookup()).unwrap();
        let first = &table.records()[0];
        assert_eq!(first.cost, None);
        assert!(first.species.is_empty());
        assert_eq!(table.records()[1].cost, Some(100.0));
    }

    #[test]
    fn infinite_cost_is_an_error() {
        let csv = format!("{HEADER}\nCalifornia,None,Climb,2003-02-02,inf,Gull,1\n");
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidField {
                row: 2,
                column: IncidentColumn::TotalCost,
                ..
            }
        ));
    }

    #[test]
    fn malformed_date_names_the_row() {
        let csv = format!("{HEADER}\nCalifornia,None,Climb,someday,,Gull,1\n");
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidField {
                row: 2,
                column: IncidentColumn::FlightDate,
                ..
            }
        ));
    }

    #[test]
    fn malformed_count_is_an_error() {
        let csv = format!("{HEADER}\nCalifornia,None,Climb,2003-02-02,,Gull,many\n");
        let err = read_incidents(csv.as_bytes(), &lookup()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidField {
                column: IncidentColumn::NumberStruck,
                ..
            }
        ));
    }
}
