use uuid::Uuid;

use crate::Cloudy;
use crate::model::api::{BinFileRequest, DeleteFileRequest, EmptyBinRequest, RestoreFileRequest};
use crate::model::errors::{CloudErrKind, CloudResult};
use crate::model::file::{FileItem, FileLocation};

impl Cloudy {
    /// Soft-deletes a file into the bin. Both listings change, space
    /// accounting does not: binned files still count against the cap.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn move_to_bin(&self, id: Uuid) -> CloudResult<FileItem> {
        let token = self.bearer().await?;
        let binned = self.client.request(Some(&token), BinFileRequest { id }).await?;

        self.caches.drive.invalidate().await;
        self.caches.bin.invalidate().await;
        self.events.meta_changed(FileLocation::Drive);
        self.events.meta_changed(FileLocation::Bin);

        info!("moved {id} to bin");
        Ok(binned)
    }

    /// Puts a binned file back where it came from.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn restore_file(&self, id: Uuid) -> CloudResult<FileItem> {
        let token = self.bearer().await?;
        let restored = self
            .client
            .request(Some(&token), RestoreFileRequest { id })
            .await?;

        self.caches.drive.invalidate().await;
        self.caches.bin.invalidate().await;
        self.events.meta_changed(FileLocation::Drive);
        self.events.meta_changed(FileLocation::Bin);

        info!("restored {id} from bin");
        Ok(restored)
    }

    /// Irreversibly deletes a file. Only binned files can be purged; the
    /// drive-side path is always through the bin first.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_permanent(&self, id: Uuid) -> CloudResult<()> {
        if let Some(file) = self.caches.find(id).await {
            if !file.is_bin {
                return Err(CloudErrKind::FileNotInBin.into());
            }
        }

        let token = self.bearer().await?;
        self.client
            .request(Some(&token), DeleteFileRequest { id, permanent: true })
            .await?;

        self.caches.bin.invalidate().await;
        self.caches.stats.invalidate().await;
        self.events.meta_changed(FileLocation::Bin);
        self.events.storage_changed();

        warn!("permanently deleted {id}");
        Ok(())
    }

    /// Purges everything in the bin in one server call.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn empty_bin(&self) -> CloudResult<()> {
        let token = self.bearer().await?;
        self.client.request(Some(&token), EmptyBinRequest {}).await?;

        self.caches.bin.invalidate().await;
        self.caches.stats.invalidate().await;
        self.events.meta_changed(FileLocation::Bin);
        self.events.storage_changed();

        warn!("emptied the bin");
        Ok(())
    }
}
