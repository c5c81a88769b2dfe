mod commands;
mod handlers;

pub use commands::{AppKind, Cli, Commands};
pub use handlers::{handle_config, handle_serve};
