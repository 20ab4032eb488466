//! Command-line interface module.

mod args;
pub mod localize;
pub mod scan;
pub mod watch;

pub use args::{Cli, Commands, LocalizeArgs, ScanArgs, WatchArgs};
