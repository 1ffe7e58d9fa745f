pub mod selection;
pub mod table;
pub mod types;

pub use selection::{ColumnRegistry, ColumnSelection};
pub use table::{Header, Row, Table};
pub use types::*;
