mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use config::ExtractConfig;
use config::loader::load_config;
use output::print_error;

fn main() {
    // Load .env file if present; a missing file is not an error.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        output::print_warning(&format!("Failed to load .env file: {e}"));
    }

    let cli = Cli::parse();

    let cfg = match configure(&cli) {
        Ok(c) => c,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(2);
        }
    };

    let level = cli.log_level.as_deref().unwrap_or(&cfg.logging.level);
    observability::init_tracing_with_level(level);
    tracing::debug!(config = ?cli.config, "Configuration loaded");

    if let Err(e) = run(&cli, &cfg) {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Load file and environment settings, then apply command line overrides.
fn configure(cli: &Cli) -> Result<ExtractConfig, String> {
    let mut cfg = load_config(cli.config.as_deref())?;
    if let Commands::Extract(args) = &cli.command {
        commands::extract::apply_overrides(&mut cfg, args);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: &Cli, cfg: &ExtractConfig) -> Result<()> {
    match &cli.command {
        Commands::Extract(args) => commands::extract::run(cfg, args.dry_run)?,
        Commands::Tables(args) => {
            let options = cfg.extractor_config().options;
            commands::tables::list(args, &options)?;
        }
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => commands::config::show(cfg)?,
            ConfigCommands::Check => commands::config::check(cfg)?,
        },
    }

    Ok(())
}
