//! Manifests the compilers run over. Built-in defaults cover the
//! PRIMAVERA data request and the CMIP6 CV repository; a YAML file can
//! replace either list.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{CompileError, Result};

const DEFAULT_TABLES: [&str; 10] = [
    "prim1hrpt",
    "prim3hr",
    "prim3hrpt",
    "prim6hr",
    "prim6hrpt",
    "primDay",
    "primMon",
    "primOday",
    "primOmon",
    "primSIday",
];

const DEFAULT_FRAGMENTS: [&str; 15] = [
    "CMIP6_required_global_attributes.json",
    "CMIP6_activity_id.json",
    "CMIP6_institution_id.json",
    "CMIP6_source_id.json",
    "CMIP6_source_type.json",
    "CMIP6_frequency.json",
    "CMIP6_grid_label.json",
    "CMIP6_nominal_resolution.json",
    "CMIP6_realm.json",
    "CMIP6_table_id.json",
    "CMIP6_license.json",
    "CMIP6_DRS.json",
    "mip_era.json",
    "CMIP6_sub_experiment_id.json",
    "CMIP6_experiment_id.json",
];

/// Worksheets to compile, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TableManifest {
    pub tables: Vec<String>,
}

impl Default for TableManifest {
    fn default() -> Self {
        Self {
            tables: DEFAULT_TABLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// CV fragment files to merge, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CvManifest {
    pub fragments: Vec<String>,
}

impl Default for CvManifest {
    fn default() -> Self {
        Self {
            fragments: DEFAULT_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub tables: TableManifest,
    #[serde(default)]
    pub cv: CvManifest,
}

impl Config {
    /// Built-in defaults, or the YAML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        serde_yaml::from_str(&text).map_err(|source| CompileError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
