use async_trait::async_trait;
use blobctl_core::time::{from_timestamp, DateTime};
use blobctl_core::{Context, Error, ProvideCredential, Result};
use chrono::{Local, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::constants::AZURE_STORAGE_RESOURCE;
use crate::credential::Credential;

#[cfg(windows)]
const AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
const AZ_PROGRAM: &str = "az";

/// AzureCliCredentialProvider obtains a bearer token from a logged in Azure CLI.
///
/// Runs `az account get-access-token --resource https://storage.azure.com/`
/// through [`Context::command_execute`]. Unlike a credential chain link, a
/// missing CLI or an expired login is reported as an error: the caller asked
/// for this source explicitly.
#[derive(Clone, Debug)]
pub struct AzureCliCredentialProvider {
    resource: String,
    tenant_id: Option<String>,
}

impl Default for AzureCliCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCliCredentialProvider {
    /// Create a provider requesting tokens for Azure Storage.
    pub fn new() -> Self {
        Self {
            resource: AZURE_STORAGE_RESOURCE.to_string(),
            tenant_id: None,
        }
    }

    /// Request the token from a specific tenant.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    async fn get_access_token(&self, ctx: &Context) -> Result<AzureCliToken> {
        let mut args = vec![
            "account",
            "get-access-token",
            "--resource",
            self.resource.as_str(),
            "--output",
            "json",
        ];
        if let Some(tenant_id) = &self.tenant_id {
            args.extend(["--tenant", tenant_id.as_str()]);
        }

        let output = ctx.command_execute(AZ_PROGRAM, &args).await.map_err(|e| {
            Error::credential_denied("failed to run Azure CLI, is `az` installed?").with_source(e)
        })?;

        if !output.success() {
            return Err(Error::credential_denied(format!(
                "Azure CLI exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            Error::credential_invalid("failed to parse Azure CLI output").with_source(e)
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureCliToken {
    access_token: String,
    /// Local time such as `2023-10-31 21:59:10.000000`.
    expires_on: Option<String>,
    /// Unix timestamp, only printed by Azure CLI 2.54.0 and later.
    #[serde(rename = "expires_on")]
    expires_on_timestamp: Option<i64>,
}

impl AzureCliToken {
    fn expires_at(&self) -> Option<DateTime> {
        if let Some(timestamp) = self.expires_on_timestamp {
            return from_timestamp(timestamp);
        }

        let expires_on = self.expires_on.as_deref()?;
        NaiveDateTime::parse_from_str(expires_on, "%Y-%m-%d %H:%M:%S%.f")
            .ok()?
            .and_local_timezone(Local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[async_trait]
impl ProvideCredential for AzureCliCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let token = self.get_access_token(ctx).await?;
        if token.access_token.is_empty() {
            return Err(Error::credential_invalid(
                "Azure CLI returned an empty access token",
            ));
        }

        let expires_in = token.expires_at();
        debug!("loaded bearer token from Azure CLI, expires at {expires_in:?}");

        Ok(Some(Credential::with_bearer_token(
            &token.access_token,
            expires_in,
        )))
    }
}
