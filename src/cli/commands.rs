use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "yasite")]
#[command(version, about = "News and notes web applications")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve one of the applications over HTTP
    Serve {
        /// Application to serve
        #[arg(value_enum)]
        app: AppKind,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,

        /// YAML settings file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Print the effective settings
    Config {
        /// YAML settings file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    /// Public news with comments
    News,
    /// Private notes with slugs
    Notes,
}
