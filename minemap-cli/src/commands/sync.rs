//! Sync command - list layers once and mount every visible one.

use tokio::sync::mpsc;

use minemap::reconcile::PassReport;
use minemap::sync::{SyncDaemon, SyncEvent};

use super::common::{printing_callbacks, LayerSelection};
use crate::error::CliError;
use crate::runner::{CliRunner, Engine};

/// Arguments for the sync command.
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub selection: LayerSelection,
    pub debug: bool,
}

/// Run the sync command.
pub fn run(args: SyncArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("sync");
    let config = runner.config();

    let catalog = runner.catalog()?;
    let engine = runner.engine(printing_callbacks())?;
    let runtime = runner.runtime()?;

    println!("Listing layers from {}", config.api.base_url);

    // Only Refreshed is sent before sync_once returns; capacity 1 suffices.
    let (events_tx, mut events_rx) = mpsc::channel(1);
    let mut daemon = SyncDaemon::new(
        catalog,
        engine.clone(),
        events_tx,
        args.selection.sync_config(config),
    );

    let report = runtime.block_on(daemon.sync_once())?;

    if let Ok(SyncEvent::Refreshed {
        layers,
        visible,
        rejected,
    }) = events_rx.try_recv()
    {
        println!("{} layer(s), {} visible", layers, visible);
        if rejected > 0 {
            println!("{} record(s) rejected as invalid (see log)", rejected);
        }
    }

    print_summary(&engine, &report);

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::LayersFailed(report.failed_ids()))
    }
}

fn print_summary(engine: &Engine, report: &PassReport) {
    println!();
    println!("Pass: {}", report);

    match engine.fit_bounds() {
        Some(bounds) => {
            let center = bounds.center();
            println!(
                "Visible extent: S {:.5} W {:.5} N {:.5} E {:.5} (center {:.5}, {:.5})",
                bounds.south, bounds.west, bounds.north, bounds.east, center.0, center.1
            );
        }
        None => println!("Nothing mounted"),
    }
}
