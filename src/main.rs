use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use yasite::cli::{handle_config, handle_serve, Cli, Commands};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { app, addr, config } => handle_serve(app, addr, config),
        Commands::Config { config, json } => handle_config(config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
