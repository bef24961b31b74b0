use std::fmt::{Debug, Formatter};

use blobctl_azure_storage::{
    AzureCliCredentialProvider, Credential, RequestSigner, StaticCredentialProvider,
    AZURE_QUERY_ENCODE_SET, X_MS_VERSION,
};
use blobctl_core::{Context, Signer};
use http::header::CONTENT_LENGTH;
use http::HeaderValue;
use log::{debug, info};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Body, Response};

use crate::{Config, Error, Result};

/// Blob service REST API version sent with every request.
pub const STORAGE_VERSION: &str = "2023-11-03";

const X_MS_ERROR_CODE: &str = "x-ms-error-code";

/// Path segments keep `/` so virtual directories stay readable.
static PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// BlobClient is an authenticated handle to one storage account.
///
/// It owns a connection pool and the account credential. Cloning is cheap
/// and clones share both.
#[derive(Clone)]
pub struct BlobClient {
    endpoint: String,
    http: reqwest::Client,
    signer: Signer<Credential>,
    pub(crate) block_size: usize,
    pub(crate) max_single_put_size: u64,
}

impl Debug for BlobClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl BlobClient {
    /// Build a client from config.
    ///
    /// The credential is loaded right away: a malformed account key or a
    /// failing `az` call is reported here with [`ErrorKind::Auth`](crate::ErrorKind::Auth)
    /// instead of on the first request.
    pub async fn new(ctx: Context, config: &Config) -> Result<Self> {
        if config.account_name.is_empty() {
            return Err(Error::auth("account name must not be empty"));
        }

        let signer = if config.use_cli_auth {
            let mut provider = AzureCliCredentialProvider::new();
            if let Some(tenant_id) = &config.tenant_id {
                provider = provider.with_tenant_id(tenant_id);
            }
            Signer::new(ctx, provider, RequestSigner::new())
        } else {
            let key = config
                .account_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    Error::auth("account key is required when Azure CLI auth is disabled")
                })?;
            Signer::new(
                ctx,
                StaticCredentialProvider::new_shared_key(&config.account_name, key),
                RequestSigner::new(),
            )
        };
        signer.credential().await?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::request("failed to build http client").with_source(e))?;

        let endpoint = config.endpoint();
        debug!("blob client for {endpoint} is ready");

        Ok(Self {
            endpoint,
            http,
            signer,
            block_size: config.block_size.max(1),
            max_single_put_size: config.max_single_put_size,
        })
    }

    /// The blob service endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Delete a blob.
    ///
    /// Deleting a blob that doesn't exist is an error.
    pub async fn delete_blob(&self, container: &str, blob: &str) -> Result<()> {
        let req = http::Request::delete(self.blob_url(container, blob))
            .header(CONTENT_LENGTH, 0)
            .body(empty_body())?;

        let what = format!("delete blob {blob}");
        let resp = self.send(req, &what).await?;
        check_status(resp, &what)?;

        info!("blob {blob} is deleted");
        Ok(())
    }

    /// Delete every blob whose name contains `pattern`.
    ///
    /// Stops at the first failure. Returns the deleted names.
    pub async fn purge(&self, container: &str, pattern: &str) -> Result<Vec<String>> {
        let names = self.list_blob_names(container).await?;

        let mut deleted = Vec::new();
        for name in names.into_iter().filter(|name| name.contains(pattern)) {
            self.delete_blob(container, &name).await?;
            deleted.push(name);
        }
        Ok(deleted)
    }

    pub(crate) fn container_url(&self, container: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint,
            utf8_percent_encode(container, &PATH_ENCODE_SET)
        )
    }

    pub(crate) fn blob_url(&self, container: &str, blob: &str) -> String {
        format!(
            "{}/{}",
            self.container_url(container),
            utf8_percent_encode(blob, &PATH_ENCODE_SET)
        )
    }

    /// Sign and send a request.
    ///
    /// Only transport failures are errors here, see [`check_status`].
    pub(crate) async fn send(&self, req: http::Request<Body>, what: &str) -> Result<Response> {
        let (mut parts, body) = req.into_parts();
        parts
            .headers
            .insert(X_MS_VERSION, HeaderValue::from_static(STORAGE_VERSION));
        self.signer.sign(&mut parts).await?;

        debug!("sending {} {}", parts.method, parts.uri);
        let req = reqwest::Request::try_from(http::Request::from_parts(parts, body))
            .map_err(|e| {
                Error::request(format!("failed to build request to {what}")).with_source(e)
            })?;

        self.http
            .execute(req)
            .await
            .map_err(|e| Error::request(format!("failed to {what}")).with_source(e))
    }
}

pub(crate) fn empty_body() -> Body {
    Body::from(Vec::<u8>::new())
}

pub(crate) fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, &AZURE_QUERY_ENCODE_SET).to_string()
}

/// Turn a non-success response into an [`ErrorKind::Request`](crate::ErrorKind::Request) error.
pub(crate) fn check_status(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = match resp
        .headers()
        .get(X_MS_ERROR_CODE)
        .and_then(|v| v.to_str().ok())
    {
        Some(code) => format!("failed to {what}: {status} {code}"),
        None => format!("failed to {what}: {status}"),
    };
    Err(Error::request(message))
}
