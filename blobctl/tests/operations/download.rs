use blobctl::{BlobClient, ErrorKind};
use blobctl_core::Context;
use pretty_assertions::assert_eq;

use crate::mock::MockBlobService;

#[tokio::test]
async fn test_download_into_missing_directory() {
    let service = MockBlobService::start().await;
    service.put_blob("reports", "a.txt", b"a");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .download_file("reports", "a.txt", dir.path().join("missing"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(service.requests(), 0);
}

#[tokio::test]
async fn test_download_missing_blob() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .download_file("reports", "missing.txt", dir.path())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(err.to_string().contains("BlobNotFound"), "{err}");
    // The local file is created before the request and left behind.
    assert!(dir.path().join("missing.txt").exists());
}

#[tokio::test]
async fn test_download_truncates_existing_file() {
    let service = MockBlobService::start().await;
    service.put_blob("reports", "a.txt", b"short");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a much longer previous content").unwrap();

    let path = client
        .download_file("reports", "a.txt", dir.path())
        .await
        .unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"short");
}

#[tokio::test]
async fn test_download_rejects_escaping_names() {
    let service = MockBlobService::start().await;
    service.put_blob("reports", "../escape.txt", b"x");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .download_file("reports", "../escape.txt", dir.path())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(service.requests(), 0);
}
