mod common;

use cloudy_rs::CloudErrKind;
use cloudy_rs::model::file::FileLocation;
use tokio::sync::broadcast::error::TryRecvError;

use crate::common::{test_cloudy, test_file, test_session};

#[tokio::test]
async fn rename_to_the_current_name_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    let file = test_file("report.pdf");
    cloudy.caches.drive.prime(vec![file.clone()]).await;

    let mut rx = cloudy.subscribe();

    // no request goes out (the server here would refuse the connection) and
    // no invalidation event fires
    let unchanged = cloudy.rename_file(file.id, "report.pdf").await.unwrap();
    assert_eq!(unchanged, file);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn rename_still_validates_the_new_name() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    let file = test_file("report.pdf");
    cloudy.caches.drive.prime(vec![file.clone()]).await;

    let err = cloudy.rename_file(file.id, "").await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::FileNameEmpty);

    let err = cloudy.rename_file(file.id, "a/b").await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::FileNameContainsSlash);
}

#[tokio::test]
async fn operations_without_a_session_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;

    let err = cloudy.list_files(FileLocation::Drive, false).await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::AccountNonexistent);

    let err = cloudy.get_usage(false).await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::AccountNonexistent);
}

#[tokio::test]
async fn listings_surface_unreachable_servers() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    let err = cloudy.list_files(FileLocation::Drive, false).await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::ServerUnreachable);
}

#[tokio::test]
async fn purging_a_file_that_is_not_binned_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    let file = test_file("report.pdf");
    cloudy.caches.drive.prime(vec![file.clone()]).await;

    let err = cloudy.delete_permanent(file.id).await.unwrap_err();
    assert_eq!(err.kind, CloudErrKind::FileNotInBin);
}

#[tokio::test]
async fn children_filter_from_the_cached_listing() {
    let dir = tempfile::tempdir().unwrap();
    let cloudy = test_cloudy(&dir).await;
    cloudy.cache_session(test_session(false)).await.unwrap();

    let mut in_folder = test_file("nested.txt");
    let folder_id = cloudy_rs::Uuid::new_v4();
    in_folder.parent_id = Some(folder_id);
    let at_root = test_file("top.txt");
    cloudy
        .caches
        .drive
        .prime(vec![in_folder.clone(), at_root.clone()])
        .await;

    let root = cloudy.children_of(None, FileLocation::Drive).await.unwrap();
    assert_eq!(root, vec![at_root]);

    let nested = cloudy
        .children_of(Some(folder_id), FileLocation::Drive)
        .await
        .unwrap();
    assert_eq!(nested, vec![in_folder]);
}
