pub mod columns;
pub mod compile;
pub mod header;
pub mod infer;
pub mod types;
pub mod variables;
pub mod workbook;

pub use columns::{column_offset, resolve};
pub use compile::{aggregate_realms, compile_table, compile_tables, table_output_path};
pub use header::build_header;
pub use infer::{infer_default_realm, infer_frequency, Frequency};
pub use types::{HeaderRecord, TableDescriptor, VariableEntry};
pub use variables::build_variables;
pub use workbook::{Cell, DataRequest, MemoryDataRequest, Worksheet, XlsxDataRequest};
