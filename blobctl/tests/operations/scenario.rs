use blobctl::{BlobClient, ErrorKind};
use blobctl_core::Context;
use pretty_assertions::assert_eq;

use crate::mock::MockBlobService;

/// Upload, list, download and delete `hello-20240101.txt` in `reports`.
#[tokio::test]
async fn test_hello_report_round_trip() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let src = tempfile::tempdir().unwrap();
    let path = src.path().join("hello-20240101.txt");
    std::fs::write(&path, b"hi").unwrap();

    assert_eq!(
        client.upload_file("reports", &path).await.unwrap(),
        "hello-20240101.txt"
    );
    assert_eq!(
        client.list_blob_names("reports").await.unwrap(),
        vec!["hello-20240101.txt"]
    );

    let dest = tempfile::tempdir().unwrap();
    let downloaded = client
        .download_file("reports", "hello-20240101.txt", dest.path())
        .await
        .unwrap();
    assert_eq!(std::fs::read(downloaded).unwrap(), b"hi");

    client
        .delete_blob("reports", "hello-20240101.txt")
        .await
        .unwrap();
    assert!(client.list_blob_names("reports").await.unwrap().is_empty());

    let err = client
        .delete_blob("reports", "hello-20240101.txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);

    for auth in service.authorizations() {
        assert!(auth.starts_with("SharedKey acct1:"), "{auth}");
    }
}
