use crate::app_state::AppEvent;
use crate::commands::app_command::USAGE;
use crate::commands::AppCommand;
use crate::config::AppConfig;
use crate::storage::import::read_json_file;
use crate::storage::repository::VillageRepository;
use crate::storage::VillageSource;
use crate::village::fixture::generate_villages;
use log::{error, info, warn};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One-shot fetch of the full record set. Safe to repeat: each call replaces
/// the set held by the UI.
pub async fn load_villages(source: &dyn VillageSource, tx: &mpsc::UnboundedSender<AppEvent>) {
    let _ = tx.send(AppEvent::Loading);
    match source.load().await {
        Ok(records) => {
            info!("loaded {} village records", records.len());
            let _ = tx.send(AppEvent::Villages(records));
        }
        Err(e) => {
            error!("loading villages failed: {}", e);
            let _ = tx.send(AppEvent::LoadFailed(e.to_string()));
        }
    }
}

pub async fn seed_if_empty(
    db: &DatabaseConnection,
    config: &AppConfig,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match VillageRepository::count(db).await {
        Ok(0) => seed(db, config.seed_count, config.seed, tx).await,
        Ok(n) => info!("villages table already holds {} rows", n),
        Err(e) => {
            let _ = tx.send(AppEvent::Error(format!("✗ count failed: {}", e)));
        }
    }
}

pub async fn seed(
    db: &DatabaseConnection,
    count: usize,
    seed: u64,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let records = generate_villages(count, seed);
    if records.len() < count {
        warn!("seed count {} capped at {}", count, records.len());
    }
    match VillageRepository::insert_missing(db, &records).await {
        Ok(inserted) => {
            let total = records.len();
            info!("seeded {} of {} demo villages (seed {})", inserted, total, seed);
            let _ = tx.send(AppEvent::Log(format!(
                "✓ demo data: {} new of {} (seed {})",
                inserted, total, seed
            )));
        }
        Err(e) => {
            error!("seeding failed: {}", e);
            let _ = tx.send(AppEvent::Error(format!("✗ seeding failed: {}", e)));
        }
    }
}

pub async fn import_file(
    db: &DatabaseConnection,
    path: &str,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let records = match read_json_file(path).await {
        Ok(r) => r,
        Err(e) => {
            warn!("import of {} rejected: {:#}", path, e);
            let _ = tx.send(AppEvent::Error(format!("✗ import failed: {:#}", e)));
            return;
        }
    };
    match VillageRepository::insert_missing(db, &records).await {
        Ok(inserted) => {
            let _ = tx.send(AppEvent::Log(format!(
                "✓ imported {} new of {} records from {}",
                inserted,
                records.len(),
                path
            )));
        }
        Err(e) => {
            let _ = tx.send(AppEvent::Error(format!("✗ import failed: {}", e)));
        }
    }
}

/// Background task: initial load, then serves data commands until the
/// channel closes or `quit` arrives.
pub async fn run_loader(
    db: Arc<DatabaseConnection>,
    config: AppConfig,
    source: Arc<dyn VillageSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<AppCommand>,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    if config.seed_on_empty {
        seed_if_empty(&db, &config, &evt_tx).await;
    }
    load_villages(source.as_ref(), &evt_tx).await;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            AppCommand::Reload => {
                let _ = evt_tx.send(AppEvent::Message("reloading village data...".to_string()));
                load_villages(source.as_ref(), &evt_tx).await;
            }
            AppCommand::Seed { count, seed: s } => {
                let count = count.unwrap_or(config.seed_count);
                let s = s.unwrap_or(config.seed);
                seed(&db, count, s, &evt_tx).await;
                load_villages(source.as_ref(), &evt_tx).await;
            }
            AppCommand::Import { path } => {
                import_file(&db, &path, &evt_tx).await;
                load_villages(source.as_ref(), &evt_tx).await;
            }
            AppCommand::Clear => {
                match VillageRepository::clear(&db).await {
                    Ok(n) => {
                        let _ = evt_tx.send(AppEvent::Log(format!("✓ removed {} records", n)));
                    }
                    Err(e) => {
                        let _ = evt_tx.send(AppEvent::Error(format!("✗ clear failed: {}", e)));
                    }
                }
                load_villages(source.as_ref(), &evt_tx).await;
            }
            AppCommand::Help => {
                let _ = evt_tx.send(AppEvent::Message(format!("commands: {}", USAGE)));
            }
            AppCommand::Quit => {
                let _ = evt_tx.send(AppEvent::Message("loader stopped".to_string()));
                break;
            }
            AppCommand::Unknown(msg) => {
                let _ = evt_tx.send(AppEvent::Error(msg));
            }
            other => {
                warn!("loader ignoring UI command {:?}", other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::source::SourceError;
    use crate::storage::{establish_connection, DatabaseSource};
    use crate::village::fixture::MAX_COUNT;
    use crate::village::VillageRecord;
    use async_trait::async_trait;

    struct FailingSource;

    #[async_trait]
    impl VillageSource for FailingSource {
        async fn load(&self) -> Result<Vec<VillageRecord>, SourceError> {
            Err(SourceError::Db(sea_orm::DbErr::Custom(
                "backend unavailable".to_string(),
            )))
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut out = Vec::new();
        while let Ok(e) = rx.try_recv() {
            out.push(e);
        }
        out
    }

    fn village_counts(events: &[AppEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Villages(v) => Some(v.len()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn failing_source_reports_load_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        load_villages(&FailingSource, &tx).await;
        let events = drain(&mut rx);
        assert!(matches!(events[0], AppEvent::Loading));
        assert!(
            matches!(&events[1], AppEvent::LoadFailed(msg) if msg.contains("backend unavailable"))
        );
    }

    #[tokio::test]
    async fn loader_seeds_empty_db_and_serves_commands() {
        let db = Arc::new(establish_connection("sqlite::memory:").await.unwrap());
        let config = AppConfig {
            seed_count: 30,
            ..AppConfig::default()
        };
        let source: Arc<dyn VillageSource> = Arc::new(DatabaseSource::new(db.clone()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, mut evt_rx) = mpsc::unbounded_channel();

        cmd_tx.send(AppCommand::Reload).unwrap();
        cmd_tx
            .send(AppCommand::Seed {
                count: Some(40),
                seed: None,
            })
            .unwrap();
        cmd_tx.send(AppCommand::Clear).unwrap();
        cmd_tx.send(AppCommand::Quit).unwrap();

        run_loader(db, config, source, cmd_rx, evt_tx).await;

        let events = drain(&mut evt_rx);
        // initial load, reload, after seed, after clear
        assert_eq!(village_counts(&events), vec![30, 30, 40, 0]);
    }

    #[tokio::test]
    async fn oversized_seed_keeps_the_loader_alive() {
        let db = Arc::new(establish_connection("sqlite::memory:").await.unwrap());
        let config = AppConfig {
            seed_on_empty: false,
            ..AppConfig::default()
        };
        let source: Arc<dyn VillageSource> = Arc::new(DatabaseSource::new(db.clone()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, mut evt_rx) = mpsc::unbounded_channel();

        cmd_tx
            .send(AppCommand::Seed {
                count: Some(usize::MAX),
                seed: Some(1),
            })
            .unwrap();
        cmd_tx.send(AppCommand::Reload).unwrap();
        cmd_tx.send(AppCommand::Quit).unwrap();

        run_loader(db, config, source, cmd_rx, evt_tx).await;

        let events = drain(&mut evt_rx);
        assert_eq!(
            village_counts(&events),
            vec![0, MAX_COUNT, MAX_COUNT]
        );
    }

    #[tokio::test]
    async fn seeding_respects_existing_rows() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        seed(&db, 12, 1, &tx).await;
        let config = AppConfig::default();
        seed_if_empty(&db, &config, &tx).await;
        assert_eq!(VillageRepository::count(&db).await.unwrap(), 12);
        assert_eq!(drain(&mut rx).len(), 1);
    }
}
