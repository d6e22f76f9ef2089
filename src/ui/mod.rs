pub mod cli;
mod render;
pub mod repl;

pub use cli::{Cli, Command};
pub use render::{print_snapshot, print_stations};
pub use repl::run_repl;
