pub mod builtin;
pub mod load;
pub mod types;

pub use load::{load_profile, resolve_profile};
pub use types::{HeaderStrategy, Layout, ReportProfile, RowWindow, TargetColumn};
