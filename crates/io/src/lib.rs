// File I/O operations

pub mod download;
pub mod inspect;

pub use download::save_download;
pub use inspect::{inspect, inspect_path, inspect_report, sheet_rows, InspectError, InspectReport, SheetRows};
