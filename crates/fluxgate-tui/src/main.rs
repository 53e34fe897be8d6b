mod app;
mod fetch;
mod screens;
mod theme;
mod widgets;

use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use fluxgate_api::PanelClient;
use fluxgate_core::LabelLocale;

use crate::app::App;
use crate::fetch::spawn_usage_fetch;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    // Configuration and panel connection
    let config = fluxgate_config::load_config_or_default(None)?;
    let profile_name = config
        .default_profile
        .clone()
        .unwrap_or_else(|| "default".into());
    let profile = config.profile(&profile_name)?;
    let settings = profile.resolve(&profile_name)?;
    let client = PanelClient::new(settings.url, settings.token, Duration::from_secs(30))?;

    let locale = config.defaults.locale.unwrap_or_default();
    let offset_minutes = config.defaults.utc_offset_minutes.unwrap_or(0);
    let utc_offset = chrono::FixedOffset::east_opt(offset_minutes * 60)
        .ok_or_else(|| eyre!("utc_offset_minutes {offset_minutes} is out of range"))?;

    // Async runtime for background fetches; the render loop stays sync.
    let runtime = tokio::runtime::Runtime::new()?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = App::new(config.defaults.range);

    let mut terminal = ratatui::init();
    let result = run(
        &mut terminal,
        &mut app,
        &runtime,
        &client,
        locale,
        utc_offset,
        &tx,
        &mut rx,
    );
    ratatui::restore();
    result
}

fn init_tracing() {
    // Logs go to stderr only when RUST_LOG asks for them; the terminal
    // belongs to the dashboard.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[allow(clippy::too_many_arguments)]
fn run(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    runtime: &tokio::runtime::Runtime,
    client: &PanelClient,
    locale: LabelLocale,
    utc_offset: chrono::FixedOffset,
    tx: &mpsc::UnboundedSender<fetch::FetchOutcome>,
    rx: &mut mpsc::UnboundedReceiver<fetch::FetchOutcome>,
) -> Result<()> {
    loop {
        // Kick off any requested fetch before drawing.
        if let Some((generation, scope, selection)) = app.take_fetch_request() {
            spawn_usage_fetch(
                runtime.handle(),
                client.clone(),
                scope,
                selection,
                locale,
                utc_offset,
                generation,
                tx.clone(),
            );
        }

        // Drain completed fetches (stale ones are discarded inside).
        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|frame| screens::usage::render(frame, app))?;

        if crossterm::event::poll(EVENT_POLL_INTERVAL)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
