//! Pure transformations over decoded tables.

pub mod chart;
pub mod date;
pub mod filter;
pub mod intersect;
pub mod pagination;
pub mod pivot;

pub use chart::{ChartSeries, Dataset};
pub use date::DateDetection;
pub use filter::{FilterSet, filter_rows, filter_table};
pub use intersect::shared_columns;
pub use pagination::{DEFAULT_PAGE_SIZE, Paginator};
pub use pivot::combine;
