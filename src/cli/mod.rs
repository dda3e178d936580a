// CLI module
// Public interface for the command-line interface

mod commands;
mod parser;

pub use commands::{run_ask, run_config_set, run_config_show, run_history};
pub use parser::{Cli, Commands, ConfigAction};
