use super::workbook::Cell;
use crate::error::{CompileError, Result};

/// Logical data request field → zero-based column offset.
/// Column 0 holds the request priority and is not consumed.
pub const COLUMN_OFFSETS: [(&str, usize); 14] = [
    ("long_name", 1),
    ("units", 2),
    ("description", 3),
    ("comment", 4),
    ("var_name", 5),
    ("standard_name", 6),
    ("cell_methods", 7),
    ("positive", 8),
    ("type", 9),
    ("dimensions", 10),
    ("cmor_name", 11),
    ("modeling_realm", 12),
    ("frequency", 13),
    ("cell_measures", 14),
];

static EMPTY: Cell = Cell::Empty;

pub fn column_offset(field: &str) -> Result<usize> {
    COLUMN_OFFSETS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, offset)| *offset)
        .ok_or_else(|| CompileError::UnknownField(field.to_string()))
}

/// Cell holding `field` in `row`; short rows read as empty.
pub fn resolve<'a>(row: &'a [Cell], field: &str) -> Result<&'a Cell> {
    let offset = column_offset(field)?;
    Ok(row.get(offset).unwrap_or(&EMPTY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_fixed_offsets() {
        let row: Vec<Cell> = (0..15).map(|i| Cell::Int(i)).collect();
        assert_eq!(resolve(&row, "var_name").unwrap(), &Cell::Int(5));
        assert_eq!(resolve(&row, "cmor_name").unwrap(), &Cell::Int(11));
        assert_eq!(resolve(&row, "cell_measures").unwrap(), &Cell::Int(14));
    }

    #[test]
    fn short_row_reads_empty() {
        let row = vec![Cell::text("1"), Cell::text("Air Temperature")];
        assert_eq!(resolve(&row, "long_name").unwrap(), &Cell::text("Air Temperature"));
        assert_eq!(resolve(&row, "modeling_realm").unwrap(), &Cell::Empty);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = resolve(&[], "priority").unwrap_err();
        assert!(matches!(err, CompileError::UnknownField(f) if f == "priority"));
    }
}
