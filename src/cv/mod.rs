pub mod compile;
pub mod fragment;

pub use compile::{build_cv, collapse_activity_ids, compile_cv, inject_validators, CV_FILE_NAME, VALIDATORS};
pub use fragment::{
    load_fragment, merge_fragments, prune_experiment, synthesize_source, transform_fragment, Fragment,
    LICENSE_PATTERN,
};
