use blobctl_azure_storage::{Credential, RequestSigner, StaticCredentialProvider};
use blobctl_core::{Context, ErrorKind, ProvideCredential, Signer};

const KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

#[tokio::test]
async fn test_static_provider_shared_key() {
    let ctx = Context::new();

    let loader = StaticCredentialProvider::new_shared_key("acct1", KEY);
    let cred = loader.provide_credential(&ctx).await.unwrap();

    match cred {
        Some(Credential::SharedKey {
            account_name,
            account_key,
        }) => {
            assert_eq!(account_name, "acct1");
            assert_eq!(account_key, KEY);
        }
        _ => panic!("Expected SharedKey credential"),
    }

    let signer = Signer::new(ctx, loader, RequestSigner::new());
    let mut parts = http::Request::get("https://acct1.blob.core.chinacloudapi.cn/reports/a")
        .header("x-ms-version", "2023-11-03")
        .body(())
        .unwrap()
        .into_parts()
        .0;

    signer.sign(&mut parts).await.unwrap();

    let auth = parts.headers["authorization"].to_str().unwrap();
    assert!(auth.starts_with("SharedKey acct1:"));
}

#[tokio::test]
async fn test_static_provider_invalid_key_fails_signer() {
    let loader = StaticCredentialProvider::new_shared_key("acct1", "definitely%not%base64");
    let signer = Signer::new(Context::new(), loader, RequestSigner::new());

    let err = signer.credential().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
}
