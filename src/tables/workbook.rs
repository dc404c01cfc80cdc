//! Access to the data request spreadsheet.
//!
//! The compilers only need "give me the rows of the worksheet called X", so
//! that is all [`DataRequest`] offers. [`XlsxDataRequest`] reads a workbook
//! from disk; [`MemoryDataRequest`] holds worksheets built in code.

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::error::{CompileError, Result};

/// One spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

/// Shortest round-trip float text, switching to `1e+20` / `1e-05` style
/// exponents outside `1e-4 <= |x| < 1e16`. Whole values print as integers.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }
    let sci = format!("{:e}", x);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if x != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if x.fract() == 0.0 {
        write!(f, "{}", x as i64)
    } else {
        write!(f, "{}", x)
    }
}

/// Renders the way the data request's authoring library stringifies cells:
/// an unset cell is `None`, whole floats lose their fraction.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => f.write_str("None"),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write_float(f, *x),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(x) => Cell::Float(*x),
            Data::Bool(b) => Cell::Bool(*b),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Rows of one worksheet; row 0 is the column heading row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    pub rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }
}

/// Source of per-table worksheets.
pub trait DataRequest {
    /// The worksheet named `name`, or `None` when the workbook has no such sheet.
    fn worksheet(&mut self, name: &str) -> Result<Option<Worksheet>>;
}

/// An `.xlsx`/`.xls`/`.ods` data request read with calamine.
pub struct XlsxDataRequest {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl XlsxDataRequest {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|source| CompileError::Spreadsheet {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, sheets })
    }
}

impl DataRequest for XlsxDataRequest {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn worksheet(&mut self, name: &str) -> Result<Option<Worksheet>> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Ok(None);
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| CompileError::Spreadsheet {
                path: self.path.clone(),
                source,
            })?;

        // calamine trims leading empty rows/columns; rebuild on absolute
        // positions so the fixed column offsets still line up.
        let mut rows = Vec::new();
        if let Some((last_row, last_col)) = range.end() {
            for r in 0..=last_row {
                let row = (0..=last_col)
                    .map(|c| range.get_value((r, c)).map(Cell::from).unwrap_or_default())
                    .collect();
                rows.push(row);
            }
        }
        debug!(sheet = name, rows = rows.len(), "loaded worksheet");
        Ok(Some(Worksheet { rows }))
    }
}

/// Worksheets held in memory, keyed by sheet name.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataRequest {
    sheets: HashMap<String, Worksheet>,
}

impl MemoryDataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, sheet: Worksheet) -> Self {
        self.sheets.insert(name.into(), sheet);
        self
    }
}

impl DataRequest for MemoryDataRequest {
    fn worksheet(&mut self, name: &str) -> Result<Option<Worksheet>> {
        Ok(self.sheets.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_follows_spreadsheet_stringification() {
        assert_eq!(Cell::Empty.to_string(), "None");
        assert_eq!(Cell::text("K").to_string(), "K");
        assert_eq!(Cell::Int(3).to_string(), "3");
        assert_eq!(Cell::Float(2.0).to_string(), "2");
        assert_eq!(Cell::Float(0.5).to_string(), "0.5");
        assert_eq!(Cell::Bool(true).to_string(), "True");
    }

    #[test]
    fn extreme_floats_use_exponent_notation() {
        assert_eq!(Cell::Float(1e20).to_string(), "1e+20");
        assert_eq!(Cell::Float(-2.5e16).to_string(), "-2.5e+16");
        assert_eq!(Cell::Float(1e-05).to_string(), "1e-05");
        assert_eq!(Cell::Float(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Cell::Float(1e-4).to_string(), "0.0001");
        assert_eq!(Cell::Float(1e15).to_string(), "1000000000000000");
        assert_eq!(Cell::Float(0.0).to_string(), "0");
        assert_eq!(Cell::Float(f64::NAN).to_string(), "nan");
    }

    #[test]
    fn converts_calamine_values() {
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from(&Data::String("up".into())), Cell::text("up"));
        assert_eq!(Cell::from(&Data::Float(1.5)), Cell::Float(1.5));
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Int(7));
    }

    #[test]
    fn memory_request_returns_none_for_unknown_sheet() {
        let mut req = MemoryDataRequest::new().with_sheet("primDay", Worksheet::default());
        assert!(req.worksheet("primDay").unwrap().is_some());
        assert!(req.worksheet("primMon").unwrap().is_none());
    }

    #[test]
    fn xlsx_rows_keep_absolute_column_positions() {
        use crate::tables::{columns::COLUMN_OFFSETS, compile_table, resolve};
        use rust_xlsxwriter::Workbook;
        use tempfile::tempdir;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("data_request.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("primDay").unwrap();
        // column A stays empty on every row
        for (field, offset) in COLUMN_OFFSETS {
            sheet.write_string(0, offset as u16, field).unwrap();
        }
        sheet.write_string(1, 1, "Air Temp").unwrap();
        sheet.write_number(1, 2, 1.0).unwrap();
        sheet.write_string(1, 5, "tas").unwrap();
        sheet.write_string(1, 12, "atmos").unwrap();
        workbook.save(&path).unwrap();

        let mut request = XlsxDataRequest::open(&path).unwrap();
        let worksheet = request.worksheet("primDay").unwrap().unwrap();
        assert_eq!(worksheet.rows.len(), 2);
        assert_eq!(worksheet.rows[1][0], Cell::Empty);
        assert_eq!(resolve(&worksheet.rows[1], "var_name").unwrap(), &Cell::text("tas"));
        assert_eq!(resolve(&worksheet.rows[1], "modeling_realm").unwrap(), &Cell::text("atmos"));
        assert_eq!(resolve(&worksheet.rows[1], "units").unwrap().to_string(), "1");

        assert!(request.worksheet("primMon").unwrap().is_none());

        let table = compile_table(&mut request, "primDay").unwrap();
        let tas = &table.variable_entry["tas"];
        assert_eq!(tas.long_name, "Air Temp");
        assert_eq!(tas.positive, "");
        assert_eq!(table.header.realm, "atmos");
    }
}
