//! Reading scans from and writing peaks to delimited text tables.
pub mod peak_table;
pub mod scan_table;

pub use crate::io::peak_table::{default_label, PeakTableError, PeakTableStyle, PeakTableWriter};
pub use crate::io::scan_table::{ScanTableError, ScanTableReader};
