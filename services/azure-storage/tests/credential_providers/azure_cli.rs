use blobctl_azure_storage::{AzureCliCredentialProvider, Credential};
use blobctl_command_execute_tokio::TokioCommandExecute;
use blobctl_core::{Context, OsEnv, ProvideCredential};

fn is_test_enabled() -> bool {
    std::env::var("BLOBCTL_AZURE_STORAGE_TEST_CLI").unwrap_or_default() == "on"
}

#[tokio::test]
async fn test_azure_cli_provider() {
    if !is_test_enabled() {
        eprintln!("Skipping test: BLOBCTL_AZURE_STORAGE_TEST_CLI is not enabled");
        return;
    }

    let ctx = Context::new()
        .with_command_execute(TokioCommandExecute)
        .with_env(OsEnv);

    // Requires Azure CLI to be installed and logged in.
    let cred = match AzureCliCredentialProvider::new()
        .provide_credential(&ctx)
        .await
    {
        Ok(Some(cred)) => cred,
        Ok(None) => panic!("Azure CLI provider returned None when test is enabled"),
        Err(e) => panic!("Azure CLI provider failed with error: {e:?}"),
    };

    match cred {
        Credential::BearerToken { token, expires_in } => {
            assert!(!token.is_empty());
            assert!(expires_in.is_some());
        }
        _ => panic!("Expected BearerToken credential from Azure CLI"),
    }
}

#[tokio::test]
async fn test_azure_cli_provider_without_executor() {
    let err = AzureCliCredentialProvider::new()
        .provide_credential(&Context::new())
        .await
        .unwrap_err();

    assert!(err.is_credential_error());
}
