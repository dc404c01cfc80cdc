//! Loading and per-file rewriting of controlled-vocabulary fragments.

use serde_json::{Map, Value};
use std::{fs, path::Path};
use tracing::{debug, info, instrument};

use crate::error::{CompileError, Result};

pub type Fragment = Map<String, Value>;

pub const SOURCE_ID_FRAGMENT: &str = "CMIP6_source_id.json";
pub const EXPERIMENT_ID_FRAGMENT: &str = "CMIP6_experiment_id.json";

/// Accepted `license` attribute text, as one regular expression.
pub const LICENSE_PATTERN: &str = concat!(
    "^CMIP6 model data produced by .* is licensed under a Creative Commons .* License (https://creativecommons\\.org/.*)\\. ",
    "*Consult https://pcmdi\\.llnl\\.gov/CMIP6/TermsOfUse for terms of use governing CMIP6 output, including citation ",
    "requirements and proper acknowledgment\\. *Further information about this data, including some limitations, can be found via ",
    "the further_info_url (recorded as a global attribute in this file).*\\. *The data producers and data providers make no warranty, ",
    "either express or implied, including, but not limited to, warranties of merchantability and fitness for a particular purpose\\. *All ",
    "liabilities arising from the supply of the information (including any liability arising in negligence) are excluded to the fullest ",
    "extent permitted by law\\.$",
);

const SOURCE_DROPPED_FIELDS: [&str; 4] = ["label", "release_year", "label_extended", "model_component"];

const EXPERIMENT_DROPPED_FIELDS: [&str; 5] = [
    "tier",
    "start_year",
    "end_year",
    "description",
    "min_number_yrs_per_sim",
];

/// Text of a scalar JSON value; strings lose their quotes.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn load_fragment(path: &Path) -> Result<Fragment> {
    let text = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| CompileError::json(path, e))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CompileError::malformed(path, "top level is not an object")),
    }
}

/// Replace a source entry's structured label and components with one
/// free-text `source` summary.
pub fn synthesize_source(path: &Path, key: &str, mut entry: Fragment) -> Result<Fragment> {
    let field = |entry: &Fragment, name: &str| -> Result<String> {
        entry
            .get(name)
            .map(value_text)
            .ok_or_else(|| CompileError::malformed(path, format!("source_id `{}` has no `{}`", key, name)))
    };
    let label = field(&entry, "label")?;
    let release_year = field(&entry, "release_year")?;
    let components = entry
        .get("model_component")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            CompileError::malformed(path, format!("source_id `{}` has no `model_component` object", key))
        })?;

    let mut source = format!("{} ({}): \n", label, release_year);
    for (component, detail) in components {
        let description = detail.get("description").map(value_text).ok_or_else(|| {
            CompileError::malformed(
                path,
                format!("source_id `{}` component `{}` has no `description`", key, component),
            )
        })?;
        if description.contains("None") {
            continue;
        }
        source.push_str(component);
        source.push_str(": ");
        source.push_str(&description);
        source.push('\n');
    }
    let source = source.trim_end().to_string();

    entry.insert("source".to_string(), Value::String(source));
    for name in SOURCE_DROPPED_FIELDS {
        entry.shift_remove(name);
    }
    Ok(entry)
}

/// Drop the experiment attributes nothing downstream reads.
pub fn prune_experiment(mut entry: Fragment) -> Fragment {
    for name in EXPERIMENT_DROPPED_FIELDS {
        entry.shift_remove(name);
    }
    entry
}

/// Run `f` over every entry of the object stored under `block`.
fn rewrite_entries<F>(path: &Path, fragment: &mut Fragment, block: &str, mut f: F) -> Result<()>
where
    F: FnMut(&str, Fragment) -> Result<Fragment>,
{
    let entries = match fragment.get_mut(block) {
        Some(Value::Object(entries)) => entries,
        _ => {
            return Err(CompileError::malformed(
                path,
                format!("`{}` block missing or not an object", block),
            ))
        }
    };
    for (key, value) in entries.iter_mut() {
        let entry = match value.take() {
            Value::Object(entry) => entry,
            _ => {
                return Err(CompileError::malformed(
                    path,
                    format!("`{}` entry `{}` is not an object", block, key),
                ))
            }
        };
        *value = Value::Object(f(key.as_str(), entry)?);
    }
    Ok(())
}

/// Apply the rewrite selected by `file_name`, then stamp the license pattern.
pub fn transform_fragment(file_name: &str, path: &Path, mut fragment: Fragment) -> Result<Fragment> {
    match file_name {
        SOURCE_ID_FRAGMENT => {
            rewrite_entries(path, &mut fragment, "source_id", |key, entry| {
                synthesize_source(path, key, entry)
            })?;
        }
        EXPERIMENT_ID_FRAGMENT => {
            rewrite_entries(path, &mut fragment, "experiment_id", |_, entry| {
                Ok(prune_experiment(entry))
            })?;
        }
        _ => {}
    }
    fragment.insert(
        "license".to_string(),
        Value::Array(vec![Value::String(LICENSE_PATTERN.to_string())]),
    );
    Ok(fragment)
}

/// Load, transform and merge every fragment in manifest order. On a key
/// collision the later value wins and the first position is kept.
#[instrument(level = "debug", skip(fragments), fields(dir = %dir.display()))]
pub fn merge_fragments(dir: &Path, fragments: &[String]) -> Result<Fragment> {
    let mut merged = Fragment::new();
    for file_name in fragments {
        let path = dir.join(file_name);
        let fragment = transform_fragment(file_name, &path, load_fragment(&path)?)?;
        for (key, value) in fragment {
            if merged.contains_key(&key) && key != "license" {
                debug!(file = %file_name, key = %key, "fragment key overrides earlier value");
            }
            merged.insert(key, value);
        }
        info!(file = %file_name, "merged fragment");
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn object(value: Value) -> Fragment {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn source_summary_lists_real_components() {
        let entry = object(json!({
            "activity_participation": ["CMIP"],
            "label": "HadGEM3-GC31-LL",
            "label_extended": "HadGEM3-GC3.1-N96ORCA1",
            "model_component": {
                "aerosol": {"description": "UKCA-GLOMAP-mode", "nominal_resolution": "250 km"},
                "atmosChem": {"description": "None", "nominal_resolution": "none"},
                "ocean": {"description": "NEMO-HadGEM3-GO6.0 (eORCA1)", "nominal_resolution": "100 km"}
            },
            "release_year": "2016"
        }));
        let out = synthesize_source(Path::new("f.json"), "HadGEM3-GC31-LL", entry).unwrap();

        assert_eq!(
            out["source"],
            "HadGEM3-GC31-LL (2016): \naerosol: UKCA-GLOMAP-mode\nocean: NEMO-HadGEM3-GO6.0 (eORCA1)"
        );
        let keys: Vec<&String> = out.keys().collect();
        assert_eq!(keys, vec!["activity_participation", "source"]);
    }

    #[test]
    fn source_without_components_trims_trailing_space() {
        let entry = object(json!({
            "label": "X",
            "label_extended": "X",
            "model_component": {"land": {"description": "None"}},
            "release_year": 2019
        }));
        let out = synthesize_source(Path::new("f.json"), "X", entry).unwrap();
        assert_eq!(out["source"], "X (2019):");
    }

    #[test]
    fn source_missing_label_is_malformed() {
        let entry = object(json!({"release_year": "2016", "model_component": {}}));
        let err = synthesize_source(Path::new("f.json"), "X", entry).unwrap_err();
        assert!(matches!(err, CompileError::Malformed { .. }));
    }

    #[test]
    fn component_without_description_is_malformed() {
        let entry = object(json!({
            "label": "X",
            "model_component": {
                "atmos": {"description": "MetUM"},
                "ocean": {"nominal_resolution": "100 km"}
            },
            "release_year": "2019"
        }));
        let err = synthesize_source(Path::new("f.json"), "X", entry).unwrap_err();
        match err {
            CompileError::Malformed { message, .. } => assert!(message.contains("`ocean`")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn experiment_prune_keeps_other_fields_in_order() {
        let entry = object(json!({
            "activity_id": ["CMIP"],
            "description": "long text",
            "end_year": "",
            "experiment": "pre-industrial control",
            "min_number_yrs_per_sim": "500",
            "start_year": "",
            "tier": "1"
        }));
        let out = prune_experiment(entry);
        let keys: Vec<&String> = out.keys().collect();
        assert_eq!(keys, vec!["activity_id", "experiment"]);
    }

    #[test]
    fn every_fragment_gets_fixed_license() {
        let fragment = object(json!({"frequency": {"mon": "monthly"}, "license": "anything"}));
        let out = transform_fragment("CMIP6_frequency.json", Path::new("f.json"), fragment).unwrap();
        assert_eq!(out["license"], json!([LICENSE_PATTERN]));

        let fragment = object(json!({"realm": {"ocean": "Ocean"}}));
        let out = transform_fragment("CMIP6_realm.json", Path::new("f.json"), fragment).unwrap();
        assert_eq!(out["license"], json!([LICENSE_PATTERN]));
    }

    #[test]
    fn license_pattern_accepts_canonical_text() {
        // parentheses in the pattern group rather than match literally
        let re = regex::Regex::new(LICENSE_PATTERN).unwrap();
        let text = "CMIP6 model data produced by the Met Office Hadley Centre is licensed under a Creative Commons \
            Attribution ShareAlike 4.0 International License https://creativecommons.org/licenses. \
            Consult https://pcmdi.llnl.gov/CMIP6/TermsOfUse for terms of use governing CMIP6 output, including citation \
            requirements and proper acknowledgment. Further information about this data, including some limitations, \
            can be found via the further_info_url recorded as a global attribute in this file. The data producers and \
            data providers make no warranty, either express or implied, including, but not limited to, warranties of \
            merchantability and fitness for a particular purpose. All liabilities arising from the supply of the \
            information including any liability arising in negligence are excluded to the fullest extent permitted by law.";
        assert!(re.is_match(text));
    }

    #[test]
    fn merge_follows_manifest_order() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("b.json"), r#"{"realm": {"ocean": "Ocean"}}"#).unwrap();
        fs::write(tmp.path().join("a.json"), r#"{"frequency": {"mon": "monthly"}}"#).unwrap();

        let manifest = vec!["b.json".to_string(), "a.json".to_string()];
        let merged = merge_fragments(tmp.path(), &manifest).unwrap();
        let keys: Vec<&String> = merged.keys().collect();
        assert_eq!(keys, vec!["realm", "license", "frequency"]);
    }

    #[test]
    fn missing_fragment_is_io_error() {
        let tmp = tempdir().unwrap();
        let err = merge_fragments(tmp.path(), &["nope.json".to_string()]).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
