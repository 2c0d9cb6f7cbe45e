mod cli;
mod logger;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tapscan_core::{CardReading, RawTag, ScanCapability, ScanError, TagTechnology};
use tapscan_hardware::AnyNfcDriver;
use tapscan_hardware::mock::{MockNfc, MockNfcConfig, MockNfcHandle};
use tapscan_session::{ScanScreen, SessionConfig, SessionManager};
use tapscan_storage::mock::{MemoryVault, ScriptedAuthenticator};
use tapscan_storage::{Database, SecureSlot};
use tracing::{info, warn};

use crate::cli::{Cli, Command, NotesAction, ScanArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match cli.command {
        Command::Scan(args) => scan(args).await,
        Command::Notes { db, action } => notes(&db, action).await,
        Command::Secure { text, deny } => secure(&text, deny).await,
    }
}

async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let Some(outcome) = run_scan(args, tokio::signal::ctrl_c()).await else {
        return Ok(());
    };

    match outcome {
        Ok(reading) => {
            println!("{}", serde_json::to_string_pretty(&reading)?);
            println!("System: {}", reading.label());
        }
        Err(e) if e.is_reportable() => println!("Scan failed ({}): {}", e.kind(), e.message()),
        Err(_) => println!("Scan cancelled"),
    }

    Ok(())
}

/// Mount a scan screen over the selected driver and run one scan.
///
/// Returns `None` when the reader is not ready. `interrupt` completing
/// unmounts the screen, which settles the scan as cancelled.
async fn run_scan<F>(args: ScanArgs, interrupt: F) -> Option<Result<CardReading, ScanError>>
where
    F: Future,
{
    // The handle owns the mock's event channel and must outlive the scan.
    let (driver, handle) = select_driver(&args);
    let config = SessionConfig::default().presentation_timeout(args.presentation_timeout());
    let manager = Arc::new(SessionManager::new(driver, config));
    let screen = ScanScreen::new(Arc::clone(&manager));

    if screen.mount().await != ScanCapability::Ready {
        if let Some(notice) = screen.state().error {
            println!("Scanning unavailable: {}", notice.message());
        }
        return None;
    }

    if let Ok(info) = manager.driver_info().await {
        info!(driver = %info.name, platform = ?info.platform, "Reader ready");
    }

    if let Some(handle) = &handle
        && !args.no_card
    {
        tokio::spawn(present_card(handle.clone(), args.clone()));
    }

    let scan = screen.start_scan();
    tokio::pin!(scan);
    let outcome = tokio::select! {
        outcome = &mut scan => outcome,
        _ = interrupt => {
            warn!("Interrupted, cancelling scan");
            screen.unmount();
            scan.await
        }
    };

    drop(handle);
    Some(outcome)
}

fn select_driver(args: &ScanArgs) -> (AnyNfcDriver, Option<MockNfcHandle>) {
    if args.no_driver {
        return (AnyNfcDriver::unavailable(), None);
    }

    let config = MockNfcConfig::default().supported(!args.unsupported);
    let (driver, handle) = MockNfc::with_config(config);
    (driver.into(), Some(handle))
}

async fn present_card(handle: MockNfcHandle, args: ScanArgs) {
    tokio::time::sleep(Duration::from_millis(args.present_after_ms)).await;

    let technology = TagTechnology::from(args.technology);
    let presented = if args.unreadable {
        handle.present_unreadable(technology).await
    } else {
        let tag = RawTag::new()
            .with_idm(args.idm)
            .with_system_code(args.system_code);
        handle.present_tag(technology, tag).await
    };

    if let Err(e) = presented {
        warn!(error = %e, "Could not present card");
    }
}

async fn notes(path: &str, action: NotesAction) -> anyhow::Result<()> {
    let db = Database::open(path)
        .await
        .with_context(|| format!("opening {}", path))?;
    let book = db.note_book();

    match action {
        NotesAction::List => {
            let notes = book.list().await?;
            println!("Saved: {}", notes.len());
            for note in notes {
                println!("{}  {}  {}", note.id, note.created_at.to_rfc3339(), note.text);
            }
        }
        NotesAction::Add { text } => {
            let note = book.add(&text).await?;
            println!("Added {}", note.id);
        }
        NotesAction::Delete { id } => {
            if book.delete(&id).await? {
                println!("Deleted {}", id);
            } else {
                println!("No note with id {}", id);
            }
        }
    }

    db.close().await;
    Ok(())
}

async fn secure(text: &str, deny: bool) -> anyhow::Result<()> {
    let authenticator = if deny {
        ScriptedAuthenticator::deny()
    } else {
        ScriptedAuthenticator::allow()
    };
    let mut slot = SecureSlot::new(MemoryVault::new(), authenticator);

    slot.unlock().await.context("unlocking secure note")?;
    let saved = slot.save(text).await?;
    println!("{}", saved);

    slot.lock();
    Ok(())
}
