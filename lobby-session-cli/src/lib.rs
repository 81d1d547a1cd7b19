pub mod infrastructure;
pub mod shell;

pub use infrastructure::{export_schemas, CliError, LogConfig, Result};
pub use shell::ShellCommand;
