pub mod decoder;
pub mod exporter;
pub mod intake;

pub use exporter::{ExportService, ExportTarget};
pub use intake::{BatchReport, IncomingFile, IntakeService};
