pub mod cli;
pub mod load_config;
pub mod render;
pub mod save;

pub use cli::{run, Cli, Commands};
