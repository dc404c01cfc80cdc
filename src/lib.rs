//! Compilers for CMIP6-style MIP table descriptors and the merged
//! controlled-vocabulary document.
//!
//! - [`tables`] turns data request worksheets into `CMIP6_<table>.json` files.
//! - [`cv`] merges CV fragment files into `CMIP6_CV.json`.
//! - [`rebrand`] re-stamps compiled tables for another project era.

pub mod config;
pub mod cv;
pub mod error;
pub mod rebrand;
pub mod tables;
pub mod write;

pub use config::{Config, CvManifest, TableManifest};
pub use error::{ensure_directory, CompileError, Result};
