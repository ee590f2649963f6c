//! Loader for the `state,code` CSV.

use std::io::Read;
use std::path::Path;

use bird_strike_geography_models::StateCodeLookup;
use bird_strike_geography_models::states::is_state_code;

use crate::{IngestError, header_positions, open};

const STATE_HEADER: &str = "state";
const CODE_HEADER: &str = "code";

/// Loads the state-name to state-code lookup from a CSV file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, a header is
/// missing, a code is blank, or the same state is given two different
/// codes.
pub fn load_state_codes(path: &Path) -> Result<StateCodeLookup, IngestError> {
    let lookup = read_state_codes(open(path)?)?;
    log::info!(
        "Loaded {} state codes from {}",
        lookup.len(),
        path.display()
    );
    Ok(lookup)
}

/// Reads the state-name to state-code lookup from any CSV source.
///
/// # Errors
///
/// See [`load_state_codes`].
pub fn read_state_codes<R: Read>(source: R) -> Result<StateCodeLookup, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);

    let positions = header_positions(reader.headers()?, &[STATE_HEADER, CODE_HEADER], true)?;
    let (state_idx, code_idx) = (positions[0], positions[1]);

    let mut lookup = StateCodeLookup::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 2;

        let state = record.get(state_idx).unwrap_or("").trim();
        let code = record.get(code_idx).unwrap_or("").trim().to_uppercase();

        if state.is_empty() && code.is_empty() {
            continue;
        }
        if code.is_empty() {
            return Err(IngestError::InvalidStateCode {
                row,
                state: state.to_string(),
            });
        }
        if !is_state_code(&code) {
            log::warn!("Row {row}: '{code}' for '{state}' is not a recognized state code");
        }

        if let Some(previous) = lookup.insert(state, code.clone())
            && previous != code
        {
            return Err(IngestError::ConflictingStateCode {
                state: state.to_string(),
                first: previous,
                second: code,
            });
        }
    }

    Ok(lookup)
}
