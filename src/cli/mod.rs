//! CLI command implementations

pub mod convert;
pub mod download;
pub mod error;
pub mod status;

pub use convert::ConvertCommand;
pub use download::{Cli, Commands, DownloadArgs, OutputFormat};
pub use error::CliError;
