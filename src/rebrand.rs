//! Re-stamp compiled tables for another project era.

use chrono::Local;
use glob::glob;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    error::{CompileError, Result},
    write::{write_json, JsonStyle},
};

/// Era-stripped file names that are renamed but never rewritten.
pub const RENAME_ONLY: [&str; 4] = [
    "_CV.json",
    "_coordinate.json",
    "_formula_terms.json",
    "_input_example.json",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Today's date as table headers write it, e.g. `07 Mar 2024`.
pub fn table_date_today() -> String {
    Local::now().format("%d %b %Y").to_string()
}

fn restamp(path: &Path, to_era: &str, table_date: &str) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    let mut table: Value = serde_json::from_str(&text).map_err(|e| CompileError::json(path, e))?;
    let header = table
        .get_mut("Header")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CompileError::malformed(path, "no `Header` object"))?;
    header.insert("table_date".to_string(), Value::String(table_date.to_string()));
    header.insert("mip_era".to_string(), Value::String(to_era.to_string()));
    write_json(path, &table, JsonStyle::TABLE)
}

/// Rewrite `Header.table_date` and `Header.mip_era` of every table JSON in
/// `dir`, returning the `from_era` → `to_era` rename for each file found.
/// Files are not moved; the caller decides how to apply the renames.
pub fn rebrand_tables(dir: &Path, from_era: &str, to_era: &str, table_date: &str) -> Result<Vec<Rename>> {
    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| CompileError::malformed(dir, e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut renames = Vec::with_capacity(paths.len());
    for path in paths {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(f) => f.to_string(),
            None => continue,
        };
        if RENAME_ONLY.contains(&file_name.replace(from_era, "").as_str()) {
            debug!(file = %file_name, "rename only");
        } else {
            restamp(&path, to_era, table_date)?;
            info!(file = %file_name, era = to_era, "restamped header");
        }
        let to = path.with_file_name(file_name.replace(from_era, to_era));
        renames.push(Rename { from: path, to });
    }
    Ok(renames)
}
