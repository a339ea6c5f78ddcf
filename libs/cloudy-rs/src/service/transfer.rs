use std::fs;
use std::path::{Path, PathBuf};

use futures::{StreamExt, stream};
use serde::Serialize;
use uuid::Uuid;

use crate::Cloudy;
use crate::model::errors::{CloudErrKind, CloudResult};
use crate::model::file::{FileItem, FileLocation};
use crate::model::filename::{FileKind, NameComponents};

/// Per-file upload cap, enforced before any request goes out.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
/// Per-batch cap. A selection over this aborts wholesale: zero uploads.
pub const MAX_BATCH_BYTES: u64 = 5 * 1024 * 1024 * 1024;
/// Transfers in flight at once, uploads and downloads alike.
pub const TRANSFER_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransferStatus {
    Pending,
    InProgress,
    Completed,
    Errored(String),
}

/// One entry in a transfer queue. Progress is coarse: it jumps to 100 on
/// completion and stays put on failure; nothing here tracks bytes on the
/// wire.
#[derive(Debug, Clone, Serialize)]
pub struct TransferItem {
    pub name: String,
    pub size_bytes: u64,
    pub progress: u8,
    pub status: TransferStatus,
    /// Disk source for uploads; lets a failed item be retried.
    pub source: Option<PathBuf>,
    /// Server id, once known.
    pub remote_id: Option<Uuid>,
}

impl TransferItem {
    fn pending(name: String, size_bytes: u64, source: Option<PathBuf>) -> Self {
        Self { name, size_bytes, progress: 0, status: TransferStatus::Pending, source, remote_id: None }
    }

    fn completed(mut self, remote_id: Uuid) -> Self {
        self.progress = 100;
        self.status = TransferStatus::Completed;
        self.remote_id = Some(remote_id);
        self
    }

    fn errored(mut self, message: String) -> Self {
        self.status = TransferStatus::Errored(message);
        self
    }
}

#[derive(Clone, Debug)]
pub enum TransferProgress {
    CalculatedTotal(usize),
    StartingItem(String),
    FinishedItem(String),
    FailedItem(String, String),
}

#[derive(Debug, Default, Clone)]
pub struct TransferReport {
    pub items: Vec<TransferItem>,
}

impl TransferReport {
    pub fn completed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == TransferStatus::Completed)
            .count()
    }

    pub fn failed(&self) -> Vec<&TransferItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.status, TransferStatus::Errored(_)))
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed().is_empty()
    }
}

pub fn file_within_limits(size: u64) -> CloudResult<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(CloudErrKind::FileTooLarge.into());
    }
    Ok(())
}

pub fn batch_within_limits(sizes: &[u64]) -> CloudResult<()> {
    let total: u64 = sizes.iter().sum();
    if total > MAX_BATCH_BYTES {
        return Err(CloudErrKind::BatchTooLarge.into());
    }
    Ok(())
}

impl Cloudy {
    /// Uploads a set of disk files into `dest` (the root for `None`).
    ///
    /// The batch cap is checked before anything moves; an oversized file is
    /// marked errored without a request ever going out; everything else runs
    /// through one bounded-concurrency driver. The returned report holds one
    /// entry per source in order.
    #[instrument(level = "debug", skip(self, update_status), err(Debug))]
    pub async fn upload_files<F: Fn(TransferProgress)>(
        &self, sources: &[PathBuf], dest: Option<Uuid>, update_status: &Option<F>,
    ) -> CloudResult<TransferReport> {
        let token = self.bearer().await?;

        let mut staged = Vec::with_capacity(sources.len());
        for source in sources {
            if !source.is_file() {
                return Err(CloudErrKind::DiskPathInvalid.into());
            }
            let name = source
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or(CloudErrKind::DiskPathInvalid)?
                .to_string();
            let size = fs::metadata(source)?.len();
            staged.push((source.clone(), name, size));
        }

        batch_within_limits(&staged.iter().map(|(_, _, size)| *size).collect::<Vec<_>>())?;

        if let Some(update_status) = update_status {
            update_status(TransferProgress::CalculatedTotal(staged.len()));
        }

        // a sibling already holding one of these names is worth a warning,
        // never a refusal
        if let Some(drive) = self.caches.drive.cached().await {
            for (_, name, _) in &staged {
                if drive.iter().any(|file| &file.name == name && file.parent_id == dest) {
                    warn!("a sibling named {name} already exists");
                }
            }
        }

        let results = stream::iter(staged.into_iter().enumerate().map(|(idx, (source, name, size))| {
            let client = self.client.clone();
            let token = token.clone();
            async move {
                let item = TransferItem::pending(name.clone(), size, Some(source.clone()));

                let outcome: CloudResult<FileItem> = async {
                    file_within_limits(size)?;

                    if let Some(update_status) = update_status {
                        update_status(TransferProgress::StartingItem(name.clone()));
                    }

                    let mime = FileKind::from_name(&name).fallback_mime();
                    let bytes = fs::read(&source)?;
                    Ok(client.upload(&token, dest, &name, mime, bytes).await?)
                }
                .await;

                match outcome {
                    Ok(file) => {
                        if let Some(update_status) = update_status {
                            update_status(TransferProgress::FinishedItem(name.clone()));
                        }
                        (idx, item.completed(file.id), Some(file))
                    }
                    Err(err) => {
                        let message = err.to_string();
                        if let Some(update_status) = update_status {
                            update_status(TransferProgress::FailedItem(name.clone(), message.clone()));
                        }
                        (idx, item.errored(message), None)
                    }
                }
            }
        }))
        .buffer_unordered(TRANSFER_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        let mut items: Vec<Option<TransferItem>> = vec![None; results.len()];
        let mut uploaded = Vec::new();
        for (idx, item, file) in results {
            if let Some(file) = file {
                uploaded.push(file);
            }
            items[idx] = Some(item);
        }

        if !uploaded.is_empty() {
            self.caches.drive.invalidate().await;
            self.caches.stats.invalidate().await;
            for file in &uploaded {
                self.events.file_uploaded(file.id);
            }
            self.events.meta_changed(FileLocation::Drive);
            self.events.storage_changed();
        }

        Ok(TransferReport { items: items.into_iter().flatten().collect() })
    }

    /// Re-attempts only the errored entries of an earlier upload report.
    #[instrument(level = "debug", skip(self, report, update_status), err(Debug))]
    pub async fn retry_failed<F: Fn(TransferProgress)>(
        &self, report: &TransferReport, dest: Option<Uuid>, update_status: &Option<F>,
    ) -> CloudResult<TransferReport> {
        let sources: Vec<PathBuf> = report
            .failed()
            .into_iter()
            .filter_map(|item| item.source.clone())
            .collect();

        if sources.is_empty() {
            return Ok(TransferReport::default());
        }

        self.upload_files(&sources, dest, update_status).await
    }

    /// Downloads documents into `dest_dir`, picking a `-1`, `-2`… variant
    /// name when the plain name is already taken on disk.
    #[instrument(level = "debug", skip(self, files, update_status), err(Debug))]
    pub async fn download_files<F: Fn(TransferProgress)>(
        &self, files: &[FileItem], dest_dir: &Path, update_status: &Option<F>,
    ) -> CloudResult<TransferReport> {
        let token = self.bearer().await?;

        if !dest_dir.exists() {
            fs::create_dir_all(dest_dir)?;
        }

        let mut taken: Vec<String> = fs::read_dir(dest_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();

        // target names are assigned up front so concurrent downloads in the
        // same batch cannot race each other into one path
        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            if !file.is_document() {
                staged.push((file.clone(), None));
                continue;
            }
            let target = NameComponents::from(&file.name).next_available(&taken).to_name();
            taken.push(target.clone());
            staged.push((file.clone(), Some(dest_dir.join(target))));
        }

        if let Some(update_status) = update_status {
            update_status(TransferProgress::CalculatedTotal(staged.len()));
        }

        let results = stream::iter(staged.into_iter().enumerate().map(|(idx, (file, target))| {
            let client = self.client.clone();
            let token = token.clone();
            async move {
                let item = TransferItem::pending(file.name.clone(), file.size.unwrap_or(0), None);

                let outcome: CloudResult<()> = async {
                    let target = target.ok_or(CloudErrKind::FileNotDocument)?;

                    if let Some(update_status) = update_status {
                        update_status(TransferProgress::StartingItem(file.name.clone()));
                    }

                    let bytes = client.download(&token, file.id).await?;
                    fs::write(&target, bytes)?;
                    Ok(())
                }
                .await;

                match outcome {
                    Ok(()) => {
                        if let Some(update_status) = update_status {
                            update_status(TransferProgress::FinishedItem(file.name.clone()));
                        }
                        (idx, item.completed(file.id))
                    }
                    Err(err) => {
                        let message = err.to_string();
                        if let Some(update_status) = update_status {
                            update_status(TransferProgress::FailedItem(file.name.clone(), message.clone()));
                        }
                        (idx, item.errored(message))
                    }
                }
            }
        }))
        .buffer_unordered(TRANSFER_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        let mut items: Vec<Option<TransferItem>> = vec![None; results.len()];
        for (idx, item) in results {
            if let (TransferStatus::Completed, Some(id)) = (&item.status, item.remote_id) {
                self.events.file_downloaded(id);
            }
            items[idx] = Some(item);
        }

        Ok(TransferReport { items: items.into_iter().flatten().collect() })
    }
}

#[cfg(test)]
mod unit_tests {
    use crate::model::errors::CloudErrKind;
    use crate::service::transfer::{
        MAX_BATCH_BYTES, MAX_UPLOAD_BYTES, TransferItem, TransferReport, TransferStatus,
        batch_within_limits, file_within_limits,
    };

    #[test]
    fn file_cap_is_exclusive() {
        assert!(file_within_limits(MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            file_within_limits(MAX_UPLOAD_BYTES + 1).unwrap_err().kind,
            CloudErrKind::FileTooLarge
        );
    }

    #[test]
    fn batch_cap_sums_the_selection() {
        // each file fits on its own, together they do not
        let sizes = vec![MAX_UPLOAD_BYTES; (MAX_BATCH_BYTES / MAX_UPLOAD_BYTES) as usize + 1];
        assert_eq!(
            batch_within_limits(&sizes).unwrap_err().kind,
            CloudErrKind::BatchTooLarge
        );
        assert!(batch_within_limits(&[MAX_BATCH_BYTES]).is_ok());
        assert!(batch_within_limits(&[]).is_ok());
    }

    #[test]
    fn report_accounting() {
        let report = TransferReport {
            items: vec![
                TransferItem::pending("a.txt".to_string(), 10, None)
                    .completed(uuid::Uuid::new_v4()),
                TransferItem::pending("b.txt".to_string(), 10, None)
                    .errored("boom".to_string()),
            ],
        };
        assert_eq!(report.completed(), 1);
        assert_eq!(report.failed().len(), 1);
        assert!(!report.all_succeeded());
        assert_eq!(report.items[0].progress, 100);
        assert_eq!(report.items[1].progress, 0);
        assert_eq!(report.items[1].status, TransferStatus::Errored("boom".to_string()));
    }
}
