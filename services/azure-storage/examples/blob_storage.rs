use blobctl_azure_storage::{
    AzureCliCredentialProvider, Credential, RequestSigner, StaticCredentialProvider, X_MS_VERSION,
};
use blobctl_command_execute_tokio::TokioCommandExecute;
use blobctl_core::{Context, OsEnv, Result, Signer};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_command_execute(TokioCommandExecute);

    // Sign with the account key when one is set, otherwise ask the Azure CLI.
    let account_name = ctx
        .env_var("AZBLOB_ACCOUNT_NAME")
        .unwrap_or_else(|| "mystorageaccount".to_string());
    let signer: Signer<Credential> = match ctx.env_var("AZBLOB_ACCOUNT_KEY") {
        Some(key) => Signer::new(
            ctx.clone(),
            StaticCredentialProvider::new_shared_key(&account_name, &key),
            RequestSigner::new(),
        ),
        None => Signer::new(
            ctx.clone(),
            AzureCliCredentialProvider::new(),
            RequestSigner::new(),
        ),
    };

    let url = format!(
        "https://{account_name}.blob.core.chinacloudapi.cn/reports?restype=container&comp=list"
    );
    let mut parts = http::Request::get(&url)
        .header(X_MS_VERSION, "2023-11-03")
        .body(())?
        .into_parts()
        .0;

    match signer.sign(&mut parts).await {
        Ok(()) => {
            println!("signed {url}");
            println!("x-ms-date: {:?}", parts.headers.get("x-ms-date"));
            println!("authorization: {:?}", parts.headers.get("authorization"));
        }
        Err(err) => eprintln!("failed to sign request: {err}"),
    }

    Ok(())
}
