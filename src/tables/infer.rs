use crate::error::{CompileError, Result};

/// Frequency tokens in priority order, with their approximate sampling
/// interval in days.
pub const FREQUENCY_TOKENS: [(&str, f64); 5] = [
    ("mon", 30.0),
    ("day", 1.0),
    ("6hr", 0.25),
    ("3hr", 0.125),
    ("1hr", 0.017361),
];

/// Prefix shared by every table name in the data request.
pub const TABLE_FAMILY_PREFIX: &str = "prim";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency {
    pub code: &'static str,
    pub approx_interval: f64,
}

/// First token of [`FREQUENCY_TOKENS`] found anywhere in `table_name`,
/// ignoring case. Priority is the list order, not the position in the name.
pub fn infer_frequency(table_name: &str) -> Result<Frequency> {
    let lowered = table_name.to_lowercase();
    FREQUENCY_TOKENS
        .iter()
        .find(|(token, _)| lowered.contains(*token))
        .map(|&(code, approx_interval)| Frequency {
            code,
            approx_interval,
        })
        .ok_or_else(|| CompileError::FrequencyInference(table_name.to_string()))
}

/// Realm guessed from the table name alone.
pub fn infer_default_realm(table_name: &str) -> &'static str {
    let stem = table_name
        .strip_prefix(TABLE_FAMILY_PREFIX)
        .unwrap_or(table_name);
    if stem.starts_with('O') {
        "ocean"
    } else if stem.starts_with("SI") {
        "seaIce"
    } else {
        "atmos"
    }
}
