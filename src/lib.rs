pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod investigator;
pub mod narrative;
pub mod report;
pub mod target;

pub use config::Config;
pub use error::ReconError;
pub use export::{ExportFormat, Exporter};
pub use investigator::{Investigation, Investigator, StepOutcome};
pub use report::{assemble, Report};
pub use target::Target;

pub type Result<T> = anyhow::Result<T>;
