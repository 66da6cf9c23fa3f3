//! CLI command implementations

pub mod error;
pub mod plan;
pub mod upload;

pub use error::CliError;
pub use plan::PlanArgs;
pub use upload::{Cli, Commands, OutputFormat, UploadArgs};
