// src/tables/types.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table-wide metadata. Field order is the serialized key order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct HeaderRecord {
    pub data_specs_version: String,
    pub table_id: String,
    pub realm: String,
    pub frequency: String,
    pub cmor_version: String,
    pub table_date: String,
    pub missing_value: String,
    pub product: String,
    pub approx_interval: String,
    pub generic_levels: String,
    pub mip_era: String,
    #[serde(rename = "Conventions")]
    pub conventions: String,
}

/// Metadata for one output variable. Field order is the serialized key order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Default)]
pub struct VariableEntry {
    pub modeling_realm: String,
    pub standard_name: String,
    pub units: String,
    pub cell_methods: String,
    pub cell_measures: String,
    pub long_name: String,
    pub comment: String,
    pub dimensions: String,
    pub out_name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub positive: String,
    pub valid_min: String,
    pub valid_max: String,
    pub ok_min_mean_abs: String,
    pub ok_max_mean_abs: String,
}

/// One compiled MIP table: `{"Header": ..., "variable_entry": ...}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TableDescriptor {
    #[serde(rename = "Header")]
    pub header: HeaderRecord,
    pub variable_entry: IndexMap<String, VariableEntry>,
}
