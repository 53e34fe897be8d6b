mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use chrono::{FixedOffset, Utc};
use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use url::Url;

use fluxgate_api::PanelClient;
use fluxgate_core::{LabelContext, LabelLocale};

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
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = fluxgate_config::load_config_or_default(cli.global.config.as_deref())?;
    let client = build_client(&cli.global, &config)?;
    let labels = label_context(&cli.global, &config)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Usage(args) => {
            commands::usage::handle(
                &client,
                args.command,
                &cli.global,
                &labels,
                config.defaults.range,
            )
            .await
        }
        Command::Nodes(args) => match args.command {
            cli::NodesCommand::List => commands::entities::list_nodes(&client, &cli.global).await,
        },
        Command::Admins(args) => match args.command {
            cli::AdminsCommand::List => commands::entities::list_admins(&client, &cli.global).await,
        },
    }
}

/// Build a `PanelClient` from the config file, profile, and CLI overrides.
fn build_client(
    global: &cli::GlobalOpts,
    config: &fluxgate_config::Config,
) -> Result<PanelClient, CliError> {
    // Panel URL: flag > profile
    let (url, profile_token) = if let Some(ref panel) = global.panel {
        let url: Url = panel.parse().map_err(|_| CliError::Validation {
            field: "panel".into(),
            reason: format!("invalid URL: {panel}"),
        })?;
        (url, None)
    } else {
        let profile_name = global
            .profile
            .clone()
            .or_else(|| config.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        let profile = config.profile(&profile_name)?;
        let settings = profile.resolve(&profile_name)?;
        (settings.url, Some(settings.token))
    };

    // Token: flag (or FLUXGATE_TOKEN via clap env) > profile
    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or(profile_token)
        .ok_or_else(|| CliError::AuthFailed {
            message: "no API token provided".into(),
        })?;

    Ok(PanelClient::new(
        url,
        token,
        Duration::from_secs(global.timeout),
    )?)
}

/// Build the label context from flags and config defaults, capturing
/// `now` once for the whole invocation.
fn label_context(
    global: &cli::GlobalOpts,
    config: &fluxgate_config::Config,
) -> Result<LabelContext, CliError> {
    let locale = match &global.locale {
        Some(raw) => raw.parse::<LabelLocale>().map_err(|_| CliError::Validation {
            field: "locale".into(),
            reason: format!("unknown locale '{raw}' (expected latin or farsi)"),
        })?,
        None => config.defaults.locale.unwrap_or_default(),
    };

    let offset_minutes = global
        .utc_offset_minutes
        .or(config.defaults.utc_offset_minutes)
        .unwrap_or(0);
    let utc_offset =
        FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| CliError::Validation {
            field: "utc-offset-minutes".into(),
            reason: format!("offset {offset_minutes} is out of range"),
        })?;

    Ok(LabelContext::new(locale, utc_offset, Utc::now()))
}
