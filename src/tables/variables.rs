use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{columns::resolve, types::VariableEntry, workbook::Cell};
use crate::error::Result;

/// Text of `field` in `row`. Unset cells and the literal `None` an unset
/// cell stringifies to both become the empty string.
fn field_text(row: &[Cell], field: &str) -> Result<String> {
    let text = resolve(row, field)?.to_string();
    Ok(if text == "None" { String::new() } else { text })
}

/// Build one entry per data row (row 0 is the heading row), keyed by output
/// name. Rows without a variable name are separators and are skipped.
pub fn build_variables(rows: &[Vec<Cell>]) -> Result<IndexMap<String, VariableEntry>> {
    let mut entries = IndexMap::new();

    for (idx, row) in rows.iter().enumerate().skip(1) {
        let var_name = field_text(row, "var_name")?;
        if var_name.is_empty() {
            continue;
        }
        let cmor_name = field_text(row, "cmor_name")?;
        let out_name = if cmor_name.is_empty() {
            var_name
        } else {
            cmor_name
        };

        let entry = VariableEntry {
            modeling_realm: field_text(row, "modeling_realm")?,
            standard_name: field_text(row, "standard_name")?,
            units: field_text(row, "units")?,
            cell_methods: field_text(row, "cell_methods")?,
            cell_measures: field_text(row, "cell_measures")?,
            long_name: field_text(row, "long_name")?,
            comment: field_text(row, "comment")?,
            dimensions: field_text(row, "dimensions")?,
            out_name: out_name.clone(),
            data_type: field_text(row, "type")?,
            positive: field_text(row, "positive")?,
            valid_min: String::new(),
            valid_max: String::new(),
            ok_min_mean_abs: String::new(),
            ok_max_mean_abs: String::new(),
        };

        debug!(row = idx + 1, out_name = %out_name, "variable");
        if entries.insert(out_name.clone(), entry).is_some() {
            warn!(row = idx + 1, out_name = %out_name, "duplicate output name replaces earlier row");
        }
    }

    Ok(entries)
}
