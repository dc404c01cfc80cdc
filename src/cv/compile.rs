use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use super::fragment::{merge_fragments, Fragment};
use crate::{
    error::{CompileError, Result},
    write::{write_json, JsonStyle},
};

pub const CV_FILE_NAME: &str = "CMIP6_CV.json";

const INDEX_PATTERN: &str = "^\\[\\{0,\\}[[:digit:]]\\{1,\\}\\]\\{0,\\}$";

/// Attribute validators added after the fragments, in insertion order.
pub const VALIDATORS: [(&str, &str); 11] = [
    ("mip_era", "CMIP6"),
    ("product", "model-output"),
    ("tracking_id", "hdl:21.14100/.*"),
    ("further_info_url", "https://furtherinfo.es-doc.org/.*"),
    ("realization_index", INDEX_PATTERN),
    (
        "variant_label",
        "r[[:digit:]]\\{1,\\}i[[:digit:]]\\{1,\\}p[[:digit:]]\\{1,\\}f[[:digit:]]\\{1,\\}$",
    ),
    (
        "data_specs_version",
        "^[[:digit:]]\\{2,2\\}\\.[[:digit:]]\\{2,2\\}\\.[[:digit:]]\\{2,2\\}$",
    ),
    ("Conventions", "^CF-1.7 CMIP-6.[0-2]\\( UGRID-1.0\\)\\{0,\\}$"),
    ("forcing_index", INDEX_PATTERN),
    ("initialization_index", INDEX_PATTERN),
    ("physics_index", INDEX_PATTERN),
];

pub fn inject_validators(cv: &mut Fragment) {
    for (key, pattern) in VALIDATORS {
        cv.insert(
            key.to_string(),
            Value::Array(vec![Value::String(pattern.to_string())]),
        );
    }
}

/// Collapse each experiment's `activity_id` list into one space-joined token.
/// A document without an `experiment_id` block is left alone.
pub fn collapse_activity_ids(cv: &mut Fragment, source: &Path) -> Result<()> {
    let experiments = match cv.get_mut("experiment_id") {
        Some(Value::Object(experiments)) => experiments,
        Some(_) => return Err(CompileError::malformed(source, "`experiment_id` is not an object")),
        None => return Ok(()),
    };
    for (experiment, entry) in experiments.iter_mut() {
        let ids = match entry.get("activity_id") {
            Some(Value::Array(ids)) => ids,
            _ => {
                return Err(CompileError::malformed(
                    source,
                    format!("experiment `{}` has no `activity_id` list", experiment),
                ))
            }
        };
        let joined = ids
            .iter()
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        debug!(experiment = %experiment, activity_id = %joined, "collapsed activity ids");
        entry["activity_id"] = Value::Array(vec![Value::String(joined)]);
    }
    Ok(())
}

/// Merge the fragments in `cv_dir` and wrap the result as `{"CV": ...}`.
#[instrument(level = "debug", skip(fragments), fields(cv_dir = %cv_dir.display()))]
pub fn build_cv(cv_dir: &Path, fragments: &[String]) -> Result<Value> {
    let mut cv = merge_fragments(cv_dir, fragments)?;
    inject_validators(&mut cv);
    collapse_activity_ids(&mut cv, cv_dir)?;

    let mut document = Map::new();
    document.insert("CV".to_string(), Value::Object(cv));
    Ok(Value::Object(document))
}

/// Build the CV document and write it to `<output_dir>/CMIP6_CV.json`.
pub fn compile_cv(cv_dir: &Path, output_dir: &Path, fragments: &[String]) -> Result<PathBuf> {
    let document = build_cv(cv_dir, fragments)?;
    let path = output_dir.join(CV_FILE_NAME);
    write_json(&path, &document, JsonStyle::CV)?;
    info!(
        fragments = fragments.len(),
        path = %path.display(),
        "wrote controlled vocabulary"
    );
    Ok(path)
}
