use uuid::Uuid;

use crate::Cloudy;
use crate::model::api::{
    DuplicateFileRequest, ListFilesRequest, MoveFileRequest, PathLookupRequest, RenameFileRequest,
};
use crate::model::errors::{CloudErr, CloudErrKind, CloudResult};
use crate::model::file::{FileItem, FileLocation};
use crate::model::filename::validate_name;

impl Cloudy {
    /// The listing for a location, served through the cache guard: concurrent
    /// callers share one network call and repeat callers inside the freshness
    /// window get the cached listing back.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn list_files(
        &self, location: FileLocation, force: bool,
    ) -> CloudResult<Vec<FileItem>> {
        let token = self.bearer().await?;
        let client = self.client.clone();

        self.caches
            .files(location)
            .get_or_fetch(force, move || async move {
                let files = client
                    .request(
                        Some(&token),
                        ListFilesRequest { parent_id: None, is_bin: location.is_bin() },
                    )
                    .await?;
                Ok(files)
            })
            .await
    }

    /// The children of a folder (or of the root for `None`), filtered from
    /// the cached listing.
    pub async fn children_of(
        &self, parent: Option<Uuid>, location: FileLocation,
    ) -> CloudResult<Vec<FileItem>> {
        let files = self.list_files(location, false).await?;
        Ok(files
            .into_iter()
            .filter(|file| file.parent_id == parent)
            .collect())
    }

    /// Resolves a server-side path like `docs/report.pdf` to a file.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn resolve_path(&self, path: &str, location: FileLocation) -> CloudResult<FileItem> {
        let token = self.bearer().await?;
        let path = path.trim_matches('/');

        self.client
            .request(
                Some(&token),
                PathLookupRequest { path: path.to_string(), location },
            )
            .await
            .map_err(|err| match CloudErrKind::from(err) {
                CloudErrKind::FileNonexistent => CloudErrKind::PathNonexistent,
                kind => kind,
            })
            .map_err(CloudErr::from)
    }

    /// Renames a file. Submitting the name the file already has is a no-op:
    /// no request goes out and no event fires.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn rename_file(&self, id: Uuid, new_name: &str) -> CloudResult<FileItem> {
        validate_name(new_name)?;

        if let Some(current) = self.caches.find(id).await {
            if current.name == new_name {
                debug!("rename to unchanged name, skipping");
                return Ok(current);
            }
        }

        let token = self.bearer().await?;
        let renamed = self
            .client
            .request(
                Some(&token),
                RenameFileRequest { id, name: new_name.to_string() },
            )
            .await?;

        self.caches.files(renamed.location()).invalidate().await;
        self.events.meta_changed(renamed.location());

        Ok(renamed)
    }

    /// Server-side copy of a file; the server picks the copy's name.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn duplicate_file(&self, id: Uuid) -> CloudResult<FileItem> {
        let token = self.bearer().await?;
        let copy = self
            .client
            .request(Some(&token), DuplicateFileRequest { id })
            .await?;

        self.caches.drive.invalidate().await;
        self.caches.stats.invalidate().await;
        self.events.meta_changed(FileLocation::Drive);
        self.events.storage_changed();

        info!("duplicated {id} into {}", copy.id);
        Ok(copy)
    }

    /// Reparents a file within the drive.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn move_file(&self, id: Uuid, new_parent: Option<Uuid>) -> CloudResult<FileItem> {
        let token = self.bearer().await?;
        let moved = self
            .client
            .request(Some(&token), MoveFileRequest { id, parent_id: new_parent })
            .await?;

        self.caches.drive.invalidate().await;
        self.events.meta_changed(FileLocation::Drive);

        Ok(moved)
    }

    /// A file's preview rendition (bytes + content type).
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn preview_file(&self, id: Uuid) -> CloudResult<(Vec<u8>, Option<String>)> {
        let token = self.bearer().await?;
        Ok(self.client.preview(&token, id).await?)
    }
}
