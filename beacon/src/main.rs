// Beacon demo host
//
// Runs the notification reconciler against a JSON status snapshot file and logs
// what a real UI would display. Lines typed on stdin stand in for user actions:
//
//   dismiss <id>   the user closed notification <id>
//   open           a listing view became visible
//   refresh        the listing was redrawn
//   now            force a cycle

mod host;

use anyhow::{Context, Result};
use beacon_core::utils::paths;
use beacon_core::{init_logging, init_minimal_logging, ConfigLoader};
use beacon_domain::notifications::{
    DismissalSink, HostEvent, KeyValueSeenSetStore, NotificationError, NotificationId, Reconciler,
    ReconcilerOptions, Scheduler, SchedulerHandle, SchedulerMode,
};
use beacon_domain::storage::FilesystemKeyValueStore;
use beacon_domain::DomainResult;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use host::{LoggingPresenter, SnapshotFileTransport};

const DEFAULT_SNAPSHOT_FILE: &str = "status.json";

#[derive(Debug, PartialEq, Eq)]
enum ConsoleCommand {
    Dismiss(String),
    Host(HostEvent),
    TriggerNow,
}

fn parse_console_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    match (words.next()?, words.next()) {
        ("dismiss", Some(id)) => Some(ConsoleCommand::Dismiss(id.to_string())),
        ("open", None) => Some(ConsoleCommand::Host(HostEvent::ViewActivated)),
        ("refresh", None) => Some(ConsoleCommand::Host(HostEvent::ListingRefreshed)),
        ("now", None) => Some(ConsoleCommand::TriggerNow),
        _ => None,
    }
}

fn parse_dismiss_id(raw: &str) -> DomainResult<NotificationId> {
    Ok(NotificationId::new(raw).map_err(NotificationError::from)?)
}

async fn handle_console_command(
    command: ConsoleCommand,
    scheduler: &SchedulerHandle,
    sink: &DismissalSink,
) -> DomainResult<()> {
    match command {
        ConsoleCommand::Dismiss(raw) => {
            let id = parse_dismiss_id(&raw)?;
            let outcome = sink.dismiss(&id).await?;
            info!("Dismissed '{}': {:?}", id, outcome);
        }
        ConsoleCommand::Host(event) => scheduler.notify(event)?,
        ConsoleCommand::TriggerNow => scheduler.trigger_now()?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            error!("Failed to load configuration: {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };
    init_logging(&config.logging, false).context("Failed to initialize logging")?;

    info!("Starting Beacon notification host...");

    let data_dir = paths::get_app_data_dir().context("Failed to resolve data directory")?;
    let snapshot_path = config
        .notifications
        .status_snapshot_path
        .clone()
        .unwrap_or_else(|| data_dir.join(DEFAULT_SNAPSHOT_FILE));
    let key_value_store = Arc::new(FilesystemKeyValueStore::new(data_dir));
    info!(
        "Seen-set stored under key '{}' in {:?}",
        config.notifications.seen_set_key,
        key_value_store.root_dir()
    );
    info!("Reading notifications from {:?}", snapshot_path);

    let seen_set_store = Arc::new(KeyValueSeenSetStore::new(
        key_value_store,
        config.notifications.seen_set_key.clone(),
    ));
    let reconciler = Arc::new(
        Reconciler::new(
            Arc::new(SnapshotFileTransport::new(snapshot_path)),
            Arc::new(LoggingPresenter::default()),
            seen_set_store,
            ReconcilerOptions {
                sync_external_dismissals: config.notifications.sync_external_dismissals,
            },
        )
        .await,
    );

    let sink = reconciler.dismissal_sink();
    let scheduler = Scheduler::spawn(reconciler, SchedulerMode::from_config(&config.notifications));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match parse_console_command(&line) {
                    Some(command) => {
                        if let Err(e) = handle_console_command(command, &scheduler, &sink).await {
                            warn!("Command '{}' failed: {}", line.trim(), e);
                        }
                    }
                    None => warn!(
                        "Unknown command '{}'. Expected: dismiss <id>, open, refresh, now",
                        line.trim()
                    ),
                },
                // Stdin closed; keep running until Ctrl-C.
                Ok(None) => {
                    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
                    break;
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
                    break;
                }
            },
        }
    }

    info!("Shutting down Beacon notification host.");
    scheduler.shutdown().await;
    Ok(())
}
