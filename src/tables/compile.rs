use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::{
    header::build_header,
    infer::infer_default_realm,
    types::{TableDescriptor, VariableEntry},
    variables::build_variables,
    workbook::DataRequest,
};
use crate::{
    error::{CompileError, Result},
    write::{write_json, JsonStyle},
};

/// `<output_dir>/CMIP6_<table_name>.json`
pub fn table_output_path(output_dir: &Path, table_name: &str) -> PathBuf {
    output_dir.join(format!("CMIP6_{}.json", table_name))
}

/// Distinct non-empty variable realms, first occurrence first, space-joined.
/// `None` when no variable names a realm.
pub fn aggregate_realms(variables: &IndexMap<String, VariableEntry>) -> Option<String> {
    let realms: IndexSet<&str> = variables
        .values()
        .map(|v| v.modeling_realm.as_str())
        .filter(|r| !r.is_empty())
        .collect();
    if realms.is_empty() {
        None
    } else {
        Some(realms.into_iter().collect::<Vec<_>>().join(" "))
    }
}

/// Build the descriptor for one table without touching the file system.
#[instrument(level = "debug", skip(data_request))]
pub fn compile_table<D: DataRequest + ?Sized>(
    data_request: &mut D,
    table_name: &str,
) -> Result<TableDescriptor> {
    let sheet = data_request
        .worksheet(table_name)?
        .ok_or_else(|| CompileError::UnknownTable(table_name.to_string()))?;

    let mut header = build_header(table_name)?;
    let variable_entry = build_variables(&sheet.rows)?;
    header.realm = aggregate_realms(&variable_entry)
        .unwrap_or_else(|| infer_default_realm(table_name).to_string());

    Ok(TableDescriptor {
        header,
        variable_entry,
    })
}

/// Compile and write every table in manifest order. Stops at the first
/// failure; tables written before it stay on disk.
pub fn compile_tables<D: DataRequest + ?Sized>(
    data_request: &mut D,
    tables: &[String],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len());
    for table_name in tables {
        let descriptor = compile_table(data_request, table_name)?;
        let path = table_output_path(output_dir, table_name);
        write_json(&path, &descriptor, JsonStyle::TABLE)?;
        info!(
            table = %table_name,
            variables = descriptor.variable_entry.len(),
            realm = %descriptor.header.realm,
            path = %path.display(),
            "wrote table"
        );
        written.push(path);
    }
    Ok(written)
}
