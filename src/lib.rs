pub mod error;
pub mod output;
pub mod period;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod workbook;

pub use error::ExtractError;
pub use period::{Period, PeriodResolver};
pub use pipeline::{build_dataset, Dataset, FileReport, RunOutput};
pub use schema::ReportProfile;
