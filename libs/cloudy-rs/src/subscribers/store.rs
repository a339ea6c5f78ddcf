use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;

use crate::Cloudy;
use crate::model::errors::CloudErrKind;
use crate::model::file::{FileItem, FileLocation};
use crate::model::usage::UsageMetrics;
use crate::service::events::Event;

/// cloudy-rs may be used by multiple disconnected components which may not be
/// able to seamlessly share state among one another. This snapshot is what
/// they all read: the last known listings and stats, kept fresh by the event
/// loop below, so a consumer never has to fetch just to render.
#[derive(Default, Clone, Debug)]
pub struct Store {
    pub drive: Vec<FileItem>,
    pub bin: Vec<FileItem>,
    pub usage: Option<UsageMetrics>,

    /// some recent server interaction failed due to network conditions
    pub offline: bool,

    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
pub struct StoreHandle {
    state: Arc<RwLock<Store>>,
    started: Arc<AtomicBool>,
}

impl StoreHandle {
    pub(crate) async fn reset(&self) {
        *self.state.write().await = Store::default();
    }
}

impl Cloudy {
    pub async fn store(&self) -> Store {
        self.store.state.read().await.clone()
    }

    /// Installs the event listener that keeps the store fresh. Safe to call
    /// from every component that wants the store around: only the first call
    /// spawns anything.
    pub fn setup_store(&self) {
        if self.store.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut rx = self.subscribe();
        let bg = self.clone();

        tokio::spawn(async move {
            loop {
                let evt = match rx.recv().await {
                    Ok(evt) => evt,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("store fell {skipped} events behind");
                        continue;
                    }
                    Err(RecvError::Closed) => return,
                };
                bg.process_event(evt).await;
            }
        });
    }

    async fn process_event(&self, e: Event) {
        match e {
            Event::MetadataChanged(location) => self.refresh_files(location).await,
            Event::StorageChanged => self.refresh_usage().await,
            Event::SessionExpired => self.store.reset().await,
            Event::FileUploaded(_) | Event::FileDownloaded(_) | Event::StatusUpdated => {}
        }
    }

    /// Force-refetches one listing. Failure degrades silently: the last
    /// listing stays on display and the snapshot is flagged offline.
    async fn refresh_files(&self, location: FileLocation) {
        match self.list_files(location, true).await {
            Ok(files) => {
                let mut store = self.store.state.write().await;
                match location {
                    FileLocation::Drive => store.drive = files,
                    FileLocation::Bin => store.bin = files,
                }
                store.offline = false;
                store.refreshed_at = Some(Utc::now());
            }
            Err(err) => {
                warn!("could not refresh {location} listing: {err}");
                let mut store = self.store.state.write().await;
                store.offline = err.kind == CloudErrKind::ServerUnreachable;
            }
        }
        self.events.status_updated();
    }

    async fn refresh_usage(&self) {
        match self.get_usage(true).await {
            Ok(metrics) => {
                let mut store = self.store.state.write().await;
                store.usage = Some(metrics);
                store.offline = false;
            }
            Err(err) => {
                warn!("could not refresh usage: {err}");
                let mut store = self.store.state.write().await;
                store.offline = err.kind == CloudErrKind::ServerUnreachable;
            }
        }
        self.events.status_updated();
    }
}
