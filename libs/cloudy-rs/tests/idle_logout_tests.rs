mod common;

use std::time::Duration;

use cloudy_rs::service::events::Event;
use cloudy_rs::service::idle::IdleWatcher;
use tokio::sync::broadcast::error::TryRecvError;

use crate::common::{test_cloudy, test_session};

#[tokio::test]
async fn an_idle_session_is_signed_out_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut cloudy = test_cloudy(&dir).await;
    cloudy.idle = IdleWatcher::new(Duration::from_millis(50));
    cloudy.cache_session(test_session(true)).await.unwrap();

    let mut rx = cloudy.subscribe();
    cloudy.setup_idle_watch();

    // the watcher polls on a coarse interval; give it room to fire
    let expired = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            if let Event::SessionExpired = rx.recv().await.unwrap() {
                break;
            }
        }
    })
    .await;
    assert!(expired.is_ok(), "no forced logout happened");
    assert!(cloudy.get_session().await.is_err());

    // with the session gone the watcher has nothing left to expire
    tokio::time::sleep(Duration::from_millis(200)).await;
    loop {
        match rx.try_recv() {
            Ok(Event::SessionExpired) => panic!("signed out twice"),
            Ok(_) => continue,
            Err(TryRecvError::Empty) => break,
            Err(err) => panic!("{err:?}"),
        }
    }
}

#[tokio::test]
async fn activity_keeps_a_session_alive() {
    let dir = tempfile::tempdir().unwrap();
    let mut cloudy = test_cloudy(&dir).await;
    cloudy.idle = IdleWatcher::new(Duration::from_secs(3600));
    cloudy.cache_session(test_session(false)).await.unwrap();

    cloudy.setup_idle_watch();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(cloudy.get_session().await.is_ok());
}
