use super::{infer::infer_frequency, types::HeaderRecord};
use crate::error::Result;

pub const DATA_SPECS_VERSION: &str = "01.00.10";
pub const CMOR_VERSION: &str = "3.2";
pub const TABLE_DATE: &str = "10 May 2017";
pub const MISSING_VALUE: &str = "1e20";
pub const PRODUCT: &str = "model-output";
pub const GENERIC_LEVELS: &str = "";
pub const MIP_ERA: &str = "CMIP6";
pub const CONVENTIONS: &str = "CF-1.7 CMIP-6.0";

/// Header for `table_name` with a blank realm; the compiler fills the realm
/// in once the table's variables are known.
pub fn build_header(table_name: &str) -> Result<HeaderRecord> {
    let frequency = infer_frequency(table_name)?;
    Ok(HeaderRecord {
        data_specs_version: DATA_SPECS_VERSION.to_string(),
        table_id: format!("Table {}", table_name),
        realm: String::new(),
        frequency: frequency.code.to_string(),
        cmor_version: CMOR_VERSION.to_string(),
        table_date: TABLE_DATE.to_string(),
        missing_value: MISSING_VALUE.to_string(),
        product: PRODUCT.to_string(),
        // Debug keeps the fractional digit: 30.0, not 30
        approx_interval: format!("{:?}", frequency.approx_interval),
        generic_levels: GENERIC_LEVELS.to_string(),
        mip_era: MIP_ERA.to_string(),
        conventions: CONVENTIONS.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;

    #[test]
    fn header_carries_inferred_frequency() {
        let header = build_header("primOday").unwrap();
        assert_eq!(header.table_id, "Table primOday");
        assert_eq!(header.frequency, "day");
        assert_eq!(header.approx_interval, "1.0");
        assert_eq!(header.realm, "");
        assert_eq!(header.mip_era, "CMIP6");
    }

    #[test]
    fn interval_keeps_declared_digits() {
        assert_eq!(build_header("primMon").unwrap().approx_interval, "30.0");
        assert_eq!(build_header("prim3hr").unwrap().approx_interval, "0.125");
        assert_eq!(build_header("prim1hrpt").unwrap().approx_interval, "0.017361");
    }

    #[test]
    fn keys_serialize_in_canonical_order() {
        let value = serde_json::to_value(build_header("prim6hr").unwrap()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "data_specs_version",
                "table_id",
                "realm",
                "frequency",
                "cmor_version",
                "table_date",
                "missing_value",
                "product",
                "approx_interval",
                "generic_levels",
                "mip_era",
                "Conventions",
            ]
        );
    }

    #[test]
    fn unmatched_name_fails() {
        assert!(matches!(
            build_header("primFx"),
            Err(CompileError::FrequencyInference(_))
        ));
    }
}
