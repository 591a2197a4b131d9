//! QuickApp command handlers: list, info, url, watch.

use std::sync::Arc;

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use tabled::Tabled;

use quickhub_api::HubClient;
use quickhub_core::{QuickApp, QuickAppManager, SortColumn, SortDirection};

use crate::cli::{AppsArgs, AppsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Child")]
    child: String,
}

impl From<&Arc<QuickApp>> for AppRow {
    fn from(app: &Arc<QuickApp>) -> Self {
        Self {
            id: app.id,
            name: app.name.clone().unwrap_or_else(|| "-".into()),
            kind: app.kind.clone().unwrap_or_else(|| "-".into()),
            modified: format_timestamp(app.modified),
            child: if app.is_child { "yes".into() } else { String::new() },
        }
    }
}

fn format_timestamp(modified: Option<i64>) -> String {
    modified
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || "-".into(),
            |dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        )
}

// ── Dispatch ────────────────────────────────────────────────────────

pub async fn handle(args: AppsArgs, client: &HubClient, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AppsCommand::List { sort, desc } => {
            list(client, global, sort, AppsCommand::direction(desc)).await
        }
        AppsCommand::Info { id } => info(client, global, id).await,
        AppsCommand::Url { id } => {
            let url = client.device_ui_url(id)?;
            output::print_output(url.as_str(), global.quiet);
            Ok(())
        }
        AppsCommand::Watch { sort } => watch(client, global, sort).await,
    }
}

async fn list(
    client: &HubClient,
    global: &GlobalOpts,
    sort: SortColumn,
    direction: SortDirection,
) -> Result<(), CliError> {
    let manager = QuickAppManager::new(client.clone());
    manager.load_all().await?;

    let apps = manager.apps_sorted(sort, direction);
    let rendered = output::render_list(&global.output, &apps, |app| AppRow::from(app));
    output::print_output(&rendered, global.quiet);
    Ok(())
}

async fn info(client: &HubClient, global: &GlobalOpts, id: u64) -> Result<(), CliError> {
    let device = client
        .get_device_raw(id)
        .await
        .map_err(|e| CliError::from_api_for(id, e))?;
    output::print_output(&output::render_json(&device), global.quiet);
    Ok(())
}

/// Run the sync engine and re-render the listing as it changes.
///
/// The poller keeps the local snapshot converged with the hub's event
/// stream; Ctrl-C stops the loop cooperatively.
async fn watch(client: &HubClient, global: &GlobalOpts, sort: SortColumn) -> Result<(), CliError> {
    let manager = QuickAppManager::new(client.clone());
    manager.connect().await?;

    let mut apps_rx = manager.apps();
    let mut conn_rx = manager.connection_state();

    print_status(conn_rx.borrow().is_connected(), global.quiet);
    render(&manager, global, sort);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = apps_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                apps_rx.borrow_and_update();
                render(&manager, global, sort);
            }
            changed = conn_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let connected = conn_rx.borrow_and_update().is_connected();
                print_status(connected, global.quiet);
            }
        }
    }

    manager.stop();
    Ok(())
}

fn render(manager: &QuickAppManager, global: &GlobalOpts, sort: SortColumn) {
    let apps = manager.apps_sorted(sort, SortDirection::Ascending);
    let rendered = output::render_list(&global.output, &apps, |app| AppRow::from(app));
    output::print_output(&rendered, global.quiet);
}

fn print_status(connected: bool, quiet: bool) {
    if quiet {
        return;
    }
    let line = if connected {
        if output::should_color() {
            format!("{}", "● connected".green())
        } else {
            "● connected".to_owned()
        }
    } else if output::should_color() {
        format!("{}", "● disconnected".red())
    } else {
        "● disconnected".to_owned()
    };
    println!("{line}");
}
