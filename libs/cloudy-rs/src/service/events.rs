pub use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::*;
use uuid::Uuid;

use crate::Cloudy;
use crate::model::file::FileLocation;

#[derive(Clone)]
pub struct EventSubs {
    tx: Sender<Event>,
}

/// The invalidation signals mutating operations broadcast. Subscribers (the
/// store, UIs) react by expiring the matching cache slot and refetching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A listing changed: something was created, renamed, moved, restored or
    /// deleted in the given location.
    MetadataChanged(FileLocation),

    /// A file finished uploading.
    FileUploaded(Uuid),

    /// A file finished downloading to disk.
    FileDownloaded(Uuid),

    /// Space accounting on the server changed.
    StorageChanged,

    /// The session ended without the user asking for it (idle timeout or the
    /// server rejecting the token).
    SessionExpired,

    /// The store snapshot was rebuilt.
    StatusUpdated,
}

impl Default for EventSubs {
    fn default() -> Self {
        let (tx, _) = broadcast::channel::<Event>(1000);
        Self { tx }
    }
}

impl EventSubs {
    pub fn meta_changed(&self, location: FileLocation) {
        self.queue(Event::MetadataChanged(location));
    }

    pub fn file_uploaded(&self, id: Uuid) {
        self.queue(Event::FileUploaded(id));
    }

    pub fn file_downloaded(&self, id: Uuid) {
        self.queue(Event::FileDownloaded(id));
    }

    pub fn storage_changed(&self) {
        self.queue(Event::StorageChanged);
    }

    pub fn session_expired(&self) {
        self.queue(Event::SessionExpired);
    }

    pub fn status_updated(&self) {
        self.queue(Event::StatusUpdated);
    }

    fn queue(&self, evt: Event) {
        // a broadcast send fails only when nobody is subscribed
        if self.tx.receiver_count() == 0 {
            debug!(?evt, "no subscribers");
            return;
        }
        if let Err(e) = self.tx.send(evt.clone()) {
            error!(?evt, ?e, "could not queue");
        }
    }
}

impl Cloudy {
    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.tx.subscribe()
    }
}
