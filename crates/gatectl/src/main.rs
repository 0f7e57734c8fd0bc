mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gatectl_core::{FileStore, SessionController};

use crate::cli::{Cli, Command};
use crate::commands::Ctx;
use crate::error::{CliError, exit_code};
use crate::output::Printer;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
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
    let cfg = config::load_config_or_default();
    let printer = Printer::new(
        config::output_format(&cli.global, &cfg),
        config::color_mode(&cli.global, &cfg),
        cli.global.quiet,
    );

    match cli.command {
        // Config commands don't need a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, printer),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gatectl", &mut std::io::stdout());
            Ok(())
        }

        // Session bookkeeping only touches the state file
        Command::Logout => {
            let mut session = open_session(&cli.global)?;
            commands::session::logout(&mut session, printer)
        }
        Command::Whoami => {
            let session = open_session(&cli.global)?;
            commands::session::whoami(&session, printer)
        }

        // All other commands talk to the device
        cmd => {
            let gateway = config::resolve_gateway_config(&cli.global, &cfg)?;
            let client = gateway.connect()?;
            let session = open_session(&cli.global)?;
            if let Some(token) = session.stored_token()? {
                client.set_token(token);
            }

            tracing::debug!(command = ?cmd, device = %gateway.url, "dispatching command");
            let mut ctx = Ctx {
                client: &client,
                session,
                global: &cli.global,
                config: &cfg,
                out: printer,
            };
            commands::dispatch(cmd, &mut ctx).await
        }
    }
}

fn open_session(global: &cli::GlobalOpts) -> Result<SessionController<FileStore>, CliError> {
    let store = FileStore::new(config::state_path(global));
    Ok(SessionController::restore(store)?)
}
