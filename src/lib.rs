// Library surface for the binary and integration tests.
// Everything here is a pure function of the session list passed in.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod ingest;
pub mod progression;
pub mod report;
pub mod rolling;
pub mod solve;
pub mod stats;
pub mod time_series;
pub mod trend;
pub mod util;

pub use error::IngestError;
pub use solve::{Session, Solve, TimeValue};
pub use stats::StatsRecord;
pub use time_series::ChartSeries;
