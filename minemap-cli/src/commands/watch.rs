//! Watch command - poll the API and keep the mounted layers in sync until
//! interrupted.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use minemap::sync::{SyncDaemon, SyncEvent};

use super::common::{printing_callbacks, LayerSelection};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Capacity of the daemon event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Arguments for the watch command.
#[derive(Debug, Clone, Default)]
pub struct WatchArgs {
    pub selection: LayerSelection,
    /// Poll interval override in seconds
    pub interval: Option<u64>,
    pub debug: bool,
}

/// Run the watch command.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("watch");
    let config = runner.config();

    let mut sync_config = args.selection.sync_config(config);
    if let Some(secs) = args.interval {
        if secs == 0 {
            return Err(CliError::Config(
                "--interval must be at least 1 second".to_string(),
            ));
        }
        sync_config = sync_config.with_poll_interval(std::time::Duration::from_secs(secs));
    }

    let catalog = runner.catalog()?;
    let engine = runner.engine(printing_callbacks())?;
    let runtime = runner.runtime()?;

    println!(
        "Watching {} every {}s (Ctrl+C to stop)",
        config.api.base_url,
        sync_config.poll_interval().as_secs()
    );

    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let (events_tx, mut events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let daemon = SyncDaemon::new(catalog, engine, events_tx, sync_config);
        let handle = daemon.start(cancel.clone());

        let ctrl_c_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping");
                ctrl_c_cancel.cancel();
            }
        });

        while let Some(event) = events_rx.recv().await {
            print_event(&event);
            if matches!(event, SyncEvent::Stopped) {
                break;
            }
        }

        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Sync daemon task failed");
        }
    });

    Ok(())
}

fn print_event(event: &SyncEvent) {
    let now = chrono::Local::now().format("%H:%M:%S");
    match event {
        SyncEvent::Refreshed {
            layers,
            visible,
            rejected,
        } => {
            print!("[{}] {} layer(s), {} visible", now, layers, visible);
            if *rejected > 0 {
                print!(", {} rejected", rejected);
            }
            println!();
        }
        SyncEvent::Reconciled(report) if report.is_noop() => {}
        SyncEvent::Reconciled(report) => println!("[{}] {}", now, report),
        SyncEvent::CatalogFailed {
            error,
            consecutive_errors,
        } => println!(
            "[{}] catalog unavailable ({} in a row): {}",
            now, consecutive_errors, error
        ),
        SyncEvent::Stopped => println!("[{}] stopped, all layers unmounted", now),
    }
}
