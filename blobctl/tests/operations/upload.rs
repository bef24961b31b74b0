use blobctl::{BlobClient, ErrorKind};
use blobctl_core::Context;
use pretty_assertions::assert_eq;

use crate::mock::MockBlobService;

#[tokio::test]
async fn test_upload_then_list_and_download() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("q1 summary.csv");
    std::fs::write(&path, b"region,total\nnorth,12\n").unwrap();

    let name = client.upload_file("reports", &path).await.unwrap();
    assert_eq!(name, "q1 summary.csv");
    assert_eq!(
        client.list_blob_names("reports").await.unwrap(),
        vec!["q1 summary.csv"]
    );

    let out = tempfile::tempdir().unwrap();
    let downloaded = client
        .download_file("reports", &name, out.path())
        .await
        .unwrap();
    assert_eq!(downloaded, out.path().join("q1 summary.csv"));
    assert_eq!(
        std::fs::read(downloaded).unwrap(),
        b"region,total\nnorth,12\n"
    );
}

#[tokio::test]
async fn test_upload_empty_file() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, b"").unwrap();

    client.upload_file("reports", &path).await.unwrap();
    assert_eq!(service.blob("reports", "empty.txt"), Some(vec![]));
}

#[tokio::test]
async fn test_upload_in_blocks() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let config = service
        .config()
        .with_max_single_put_size(16)
        .with_block_size(10);
    let client = BlobClient::new(Context::new(), &config).await.unwrap();

    let content: Vec<u8> = (0..=255u8).cycle().take(95).collect();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    std::fs::write(&path, &content).unwrap();

    client.upload_file("reports", &path).await.unwrap();
    assert_eq!(service.blob("reports", "big.bin"), Some(content.clone()));
    // Ten blocks and the block list.
    assert_eq!(service.requests(), 11);

    let out = tempfile::tempdir().unwrap();
    let downloaded = client
        .download_file("reports", "big.bin", out.path())
        .await
        .unwrap();
    assert_eq!(std::fs::read(downloaded).unwrap(), content);
}

#[tokio::test]
async fn test_upload_overwrites_existing_blob() {
    let service = MockBlobService::start().await;
    service.put_blob("reports", "notes.txt", b"old");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"new").unwrap();

    client.upload_file("reports", &path).await.unwrap();
    assert_eq!(service.blob("reports", "notes.txt"), Some(b"new".to_vec()));
}

#[tokio::test]
async fn test_upload_missing_file() {
    let service = MockBlobService::start().await;
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .upload_file("reports", dir.path().join("missing.txt"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(service.requests(), 0);
}

#[tokio::test]
async fn test_upload_directory() {
    let service = MockBlobService::start().await;
    service.create_container("reports");
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let subdir = dir.path().join("adir");
    std::fs::create_dir(&subdir).unwrap();

    let err = client.upload_file("reports", &subdir).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io, "{err}");
    assert_eq!(service.requests(), 0);
    assert_eq!(service.blob("reports", "adir"), None);
}

#[tokio::test]
async fn test_upload_path_without_file_name() {
    let service = MockBlobService::start().await;
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let err = client.upload_file("reports", "/").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[tokio::test]
async fn test_upload_to_missing_container() {
    let service = MockBlobService::start().await;
    let client = BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    std::fs::write(&path, b"a").unwrap();

    let err = client.upload_file("missing", &path).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
}
