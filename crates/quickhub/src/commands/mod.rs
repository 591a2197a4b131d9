//! Command handlers, one module per top-level subcommand.

pub mod apps;
pub mod config_cmd;
pub mod files;
