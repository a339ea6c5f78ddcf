mod common;

use std::time::Duration;

use cloudy_rs::model::file::FileLocation;
use cloudy_rs::service::events::Event;

use crate::common::{test_cloudy, test_session};

#[tokio::test]
async fn invalidation_events_drive_a_refetch() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();
    cloudy.setup_store();

    let mut rx = cloudy.subscribe();

    // a mutating operation somewhere broadcasts this; the store reacts by
    // force-refetching, which against an unreachable server flips offline
    cloudy.events.meta_changed(FileLocation::Drive);

    tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            if let Event::StatusUpdated = rx.recv().await.unwrap() {
                break;
            }
        }
    })
    .await
    .expect("the store never processed the event");

    let store = cloudy.store().await;
    assert!(store.offline);
    assert!(store.drive.is_empty());
    assert!(store.refreshed_at.is_none());
}

#[tokio::test]
async fn setup_store_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    // installing twice must not double-process events
    cloudy.setup_store();
    cloudy.setup_store();

    let mut rx = cloudy.subscribe();
    cloudy.events.meta_changed(FileLocation::Bin);

    let mut status_updates = 0;
    let drained = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Event::StatusUpdated = rx.recv().await.unwrap() {
                status_updates += 1;
            }
        }
    })
    .await;
    assert!(drained.is_err(), "the event stream never settles");
    assert_eq!(status_updates, 1);
}

#[tokio::test]
async fn an_expired_session_resets_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();
    cloudy.setup_store();

    // make the snapshot non-default first: a failed refresh flips offline
    cloudy.events.meta_changed(FileLocation::Drive);
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cloudy.store().await.offline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("the store never went offline");

    cloudy.events.session_expired();
    tokio::time::timeout(Duration::from_secs(5), async {
        while cloudy.store().await.offline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("the snapshot was never reset");
}
