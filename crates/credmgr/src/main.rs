mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use credmgr_core::StoreRegistry;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "credmgr", &mut std::io::stdout());
            Ok(())
        }

        // Entity commands require a connected registry
        cmd => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(&cli.global, &cfg);
            let client_config = config::build_client_config(&cli.global, &cfg)?;

            let registry = StoreRegistry::connect(&client_config)
                .await
                .map_err(|e| match CliError::from(e) {
                    CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                        profile: profile_name.clone(),
                        message,
                    },
                    other => other,
                })?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let ctx = commands::Ctx {
                global: &cli.global,
                page_size: cfg.defaults.page_size,
            };
            commands::dispatch(cmd, &registry, &ctx).await
        }
    }
}
