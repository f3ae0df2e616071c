//! Rate retrieval, ordering and aggregation engine

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod ordering;
pub mod present;
pub mod provider;
pub mod rate;
pub mod table;
pub mod window;

// Re-export main types for cleaner imports
pub use aggregate::{CurrencySeries, RangeAggregate, SeriesPoint};
pub use engine::{ChartSeries, fetch_chart_data, fetch_table_data};
pub use error::RateError;
pub use ordering::{filter_by_substring, order_by_priority};
pub use provider::RateProvider;
pub use rate::{DailySnapshot, RateRecord};
pub use window::RequestWindow;
