use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blobctl::{BlobClient, Config, ErrorKind};
use blobctl_core::{CommandExecute, CommandOutput, Context};
use test_case::test_case;

use crate::mock::{MockBlobService, ACCOUNT, KEY};

const TOKEN_JSON: &[u8] =
    br#"{"accessToken": "token-from-az", "expiresOn": "2099-01-01 00:00:00.000000"}"#;

/// Answers `az account get-access-token` with fixed stdout and records the args.
#[derive(Debug, Clone)]
struct FakeAz {
    stdout: &'static [u8],
    args: Arc<Mutex<Vec<String>>>,
}

impl FakeAz {
    fn new(stdout: &'static [u8]) -> Self {
        Self {
            stdout,
            args: Arc::default(),
        }
    }
}

#[async_trait]
impl CommandExecute for FakeAz {
    async fn command_execute(
        &self,
        _: &str,
        args: &[&str],
    ) -> blobctl_core::Result<CommandOutput> {
        assert_eq!(args[..2], ["account", "get-access-token"]);
        *self.args.lock().unwrap() = args.iter().map(|arg| arg.to_string()).collect();
        Ok(CommandOutput {
            status: 0,
            stdout: self.stdout.to_vec(),
            stderr: vec![],
        })
    }
}

#[test_case(KEY, true; "azurite key")]
#[test_case("a2V5", true; "short key")]
#[test_case("", false; "empty key")]
#[test_case("not base64 at all!", false; "garbage key")]
#[tokio::test]
async fn test_build_with_shared_key(key: &str, ok: bool) {
    let config = Config::default()
        .with_account_name(ACCOUNT)
        .with_account_key(key);

    match BlobClient::new(Context::new(), &config).await {
        Ok(_) => assert!(ok, "build should fail for {key:?}"),
        Err(err) => {
            assert!(!ok, "build should succeed for {key:?}: {err}");
            assert_eq!(err.kind(), ErrorKind::Auth);
        }
    }
}

#[tokio::test]
async fn test_build_makes_no_request() {
    let service = MockBlobService::start().await;

    BlobClient::new(Context::new(), &service.config())
        .await
        .unwrap();
    assert_eq!(service.requests(), 0);
}

#[tokio::test]
async fn test_cli_auth_signs_with_bearer_token() {
    let service = MockBlobService::start().await;
    service.put_blob("reports", "a.txt", b"a");

    let config = Config::default()
        .with_account_name(ACCOUNT)
        .with_cli_auth(true)
        .with_endpoint(service.endpoint());
    let client = BlobClient::new(Context::new().with_command_execute(FakeAz::new(TOKEN_JSON)), &config)
        .await
        .unwrap();

    assert_eq!(client.list_blob_names("reports").await.unwrap(), vec!["a.txt"]);
    assert_eq!(service.authorizations(), vec!["Bearer token-from-az"]);
}

#[tokio::test]
async fn test_cli_auth_without_az() {
    let config = Config::default()
        .with_account_name(ACCOUNT)
        .with_cli_auth(true);

    let err = BlobClient::new(Context::new(), &config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[test_case(b"not json"; "not json")]
#[test_case(b""; "empty output")]
#[test_case(br#"{"expiresOn": "2099-01-01 00:00:00.000000"}"#; "missing token")]
#[tokio::test]
async fn test_cli_auth_with_unparsable_output(stdout: &'static [u8]) {
    let service = MockBlobService::start().await;
    let config = Config::default()
        .with_account_name(ACCOUNT)
        .with_cli_auth(true)
        .with_endpoint(service.endpoint());

    let err = BlobClient::new(Context::new().with_command_execute(FakeAz::new(stdout)), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth, "{err}");
    assert_eq!(service.requests(), 0);
}

#[tokio::test]
async fn test_cli_auth_with_tenant() {
    let az = FakeAz::new(TOKEN_JSON);
    let config = Config::default()
        .with_account_name(ACCOUNT)
        .with_cli_auth(true)
        .with_tenant_id("54826b22");

    BlobClient::new(Context::new().with_command_execute(az.clone()), &config)
        .await
        .unwrap();

    let args = az.args.lock().unwrap().clone();
    assert_eq!(args[args.len() - 2..], ["--tenant", "54826b22"]);
}
