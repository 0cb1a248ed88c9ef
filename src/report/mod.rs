//! Outputs derived from a finished projection
//!
//! - CSV report in the downloadable "Investment Report" layout
//! - Chart-ready datasets (allocation pie, strategy bars, projection line)

mod charts;
mod csv_export;

pub use charts::{AllocationSlice, ChartData, PairBar, StrategyBar};
pub use csv_export::{render_report, report_file_name, write_report};
