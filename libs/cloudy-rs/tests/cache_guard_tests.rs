use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cloudy_rs::CloudErrKind;
use cloudy_rs::service::cache::ResourceCache;

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_fetch() {
    let cache: ResourceCache<u32> = ResourceCache::new(Duration::from_secs(10));
    let calls = counter();

    let fetch = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(7)
        }
    };

    let (a, b) = tokio::join!(
        cache.get_or_fetch(false, fetch(calls.clone())),
        cache.get_or_fetch(false, fetch(calls.clone())),
    );

    assert_eq!(a.unwrap(), 7);
    assert_eq!(b.unwrap(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn fresh_values_skip_the_network() {
    let cache: ResourceCache<u32> = ResourceCache::new(Duration::from_secs(10));
    let calls = counter();

    let fetch = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        }
    };

    cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap();
    cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // past the freshness window the next caller pays for a fetch again
    tokio::time::advance(Duration::from_secs(11)).await;
    cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn force_refetches_a_fresh_value() {
    let cache: ResourceCache<u32> = ResourceCache::new(Duration::from_secs(10));
    let calls = counter();

    let fetch = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        }
    };

    cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap();
    cache.get_or_fetch(true, fetch(calls.clone())).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn errors_reach_every_coalesced_caller_and_nothing_is_cached() {
    let cache: ResourceCache<u32> = ResourceCache::new(Duration::from_secs(10));
    let calls = counter();

    let failing = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err(CloudErrKind::ServerUnreachable.into())
        }
    };

    let (a, b): (Result<u32, _>, Result<u32, _>) = tokio::join!(
        cache.get_or_fetch(false, failing(calls.clone())),
        cache.get_or_fetch(false, failing(calls.clone())),
    );
    assert_eq!(a.unwrap_err().kind, CloudErrKind::ServerUnreachable);
    assert_eq!(b.unwrap_err().kind, CloudErrKind::ServerUnreachable);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.cached().await, None);

    // a failure leaves no freshness behind, the next caller tries again
    let ok = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(9)
        }
    };
    assert_eq!(cache.get_or_fetch(false, ok(calls.clone())).await.unwrap(), 9);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn invalidate_expires_but_keeps_the_stale_value() {
    let cache: ResourceCache<u32> = ResourceCache::new(Duration::from_secs(10));
    let calls = counter();

    cache.prime(5).await;
    let fetch = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(6)
        }
    };

    assert_eq!(cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap(), 5);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    cache.invalidate().await;
    assert_eq!(cache.cached().await, Some(5));
    assert_eq!(cache.get_or_fetch(false, fetch(calls.clone())).await.unwrap(), 6);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
