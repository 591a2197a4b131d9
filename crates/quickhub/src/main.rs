mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quickhub_api::transport::TlsMode;
use quickhub_api::{ConfigProvider, HubClient, StaticProvider, TransportConfig};
use quickhub_config::LiveSettings;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

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
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        // Config commands don't need a hub connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "quickhub", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the hub
        Command::Apps(args) => {
            let client = build_client(&cli.global)?;
            commands::apps::handle(args, &client, &cli.global).await
        }
        Command::Files(args) => {
            let client = build_client(&cli.global)?;
            commands::files::handle(args, &client, &cli.global).await
        }
    }
}

/// Build a `HubClient` from global flags, falling back to the layered
/// config sources when the connection flags aren't all present.
fn build_client(global: &GlobalOpts) -> Result<HubClient, CliError> {
    let provider: Arc<dyn ConfigProvider> =
        match (&global.host, &global.user, &global.password) {
            (Some(host), Some(user), Some(password)) => {
                let scheme = global.protocol.as_deref().unwrap_or("http");
                Arc::new(StaticProvider::from_parts(scheme, host, user, password))
            }
            // Re-resolved per request, so `apps watch` picks up rotation.
            _ => Arc::new(LiveSettings),
        };

    let transport = TransportConfig {
        tls: if global.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: std::time::Duration::from_secs(global.timeout),
    };

    HubClient::new(provider, &transport).map_err(CliError::from)
}
