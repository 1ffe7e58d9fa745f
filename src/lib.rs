pub mod action;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod services;
pub mod transform;
pub mod workbench;

// Re-export commonly used types
pub use action::{Action, View};
pub use config::Config;
pub use core::{CellValue, ColumnSelection, FileKind, Header, Row, Table, TableId};
pub use error::{Result, WorkbenchError};
pub use services::{BatchReport, ExportService, ExportTarget, IncomingFile, IntakeService};
pub use workbench::{LoadOutcome, LoadTicket, Workbench};
