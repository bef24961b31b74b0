use blobctl_core::utils::Redact;
use blobctl_core::Context;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Domain suffix of the Azure China cloud.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "core.chinacloudapi.cn";
/// Files above this size are uploaded as staged blocks.
pub const DEFAULT_MAX_SINGLE_PUT_SIZE: u64 = 256 * 1024 * 1024;
/// Size of a staged block.
pub const DEFAULT_BLOCK_SIZE: usize = 8 * 1024 * 1024;

/// Environment variable for the storage account name.
pub const AZBLOB_ACCOUNT_NAME: &str = "AZBLOB_ACCOUNT_NAME";
/// Environment variable for the container name.
pub const AZBLOB_CONTAINER: &str = "AZBLOB_CONTAINER";
/// Environment variable for the base64 account key.
pub const AZBLOB_ACCOUNT_KEY: &str = "AZBLOB_ACCOUNT_KEY";
/// Environment variable switching to Azure CLI authentication.
pub const AZBLOB_USE_CLI_AUTH: &str = "AZBLOB_USE_CLI_AUTH";
/// Environment variable overriding the whole endpoint.
pub const AZBLOB_ENDPOINT: &str = "AZBLOB_ENDPOINT";
/// Environment variable for the endpoint domain suffix.
pub const AZBLOB_ENDPOINT_SUFFIX: &str = "AZBLOB_ENDPOINT_SUFFIX";
/// Environment variable for the tenant passed to `az account get-access-token`.
pub const AZBLOB_TENANT_ID: &str = "AZBLOB_TENANT_ID";
/// Environment variable for the request timeout in seconds.
pub const AZBLOB_TIMEOUT: &str = "AZBLOB_TIMEOUT";

/// Config for a [`BlobClient`](crate::BlobClient).
///
/// Built once, then handed to [`BlobClient::new`](crate::BlobClient::new)
/// which copies what it needs.
#[derive(Clone)]
pub struct Config {
    /// Storage account name.
    pub account_name: String,
    /// Default container for CLI commands.
    pub container: String,
    /// Authenticate with a token from the Azure CLI instead of the account key.
    pub use_cli_auth: bool,
    /// Tenant to request the Azure CLI token from.
    pub tenant_id: Option<String>,
    /// Base64 encoded account key.
    pub account_key: Option<String>,
    /// Full endpoint, for example `http://127.0.0.1:10000/devstoreaccount1`.
    ///
    /// Takes precedence over `endpoint_suffix`.
    pub endpoint: Option<String>,
    /// Domain suffix, the endpoint becomes `https://{account}.blob.{suffix}`.
    pub endpoint_suffix: String,
    /// Timeout applied to every request.
    pub timeout: Option<Duration>,
    /// Size of each staged block.
    pub block_size: usize,
    /// Largest file sent with a single Put Blob.
    pub max_single_put_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_name: String::new(),
            container: String::new(),
            use_cli_auth: false,
            tenant_id: None,
            account_key: None,
            endpoint: None,
            endpoint_suffix: DEFAULT_ENDPOINT_SUFFIX.to_string(),
            timeout: None,
            block_size: DEFAULT_BLOCK_SIZE,
            max_single_put_size: DEFAULT_MAX_SINGLE_PUT_SIZE,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("container", &self.container)
            .field("use_cli_auth", &self.use_cli_auth)
            .field("tenant_id", &self.tenant_id)
            .field("account_key", &Redact::from(&self.account_key))
            .field("endpoint", &self.endpoint)
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("timeout", &self.timeout)
            .field("block_size", &self.block_size)
            .field("max_single_put_size", &self.max_single_put_size)
            .finish()
    }
}

impl Config {
    /// Load config from `AZBLOB_*` environment variables.
    ///
    /// Variables that are not set keep their default value.
    pub fn from_env(ctx: &Context) -> Self {
        let mut config = Self::default();

        if let Some(v) = ctx.env_var(AZBLOB_ACCOUNT_NAME) {
            config.account_name = v;
        }
        if let Some(v) = ctx.env_var(AZBLOB_CONTAINER) {
            config.container = v;
        }
        if let Some(v) = ctx.env_var(AZBLOB_ACCOUNT_KEY) {
            config.account_key = Some(v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_USE_CLI_AUTH) {
            config.use_cli_auth = parse_flag(&v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_TENANT_ID) {
            config.tenant_id = Some(v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_ENDPOINT) {
            config.endpoint = Some(v);
        }
        if let Some(v) = ctx.env_var(AZBLOB_ENDPOINT_SUFFIX) {
            config.endpoint_suffix = v;
        }
        if let Some(secs) = ctx
            .env_var(AZBLOB_TIMEOUT)
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Some(Duration::from_secs(secs));
        }

        config
    }

    /// Set the account name.
    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = account_name.into();
        self
    }

    /// Set the container.
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Authenticate with the account key.
    pub fn with_account_key(mut self, account_key: impl Into<String>) -> Self {
        self.account_key = Some(account_key.into());
        self
    }

    /// Authenticate with the Azure CLI.
    pub fn with_cli_auth(mut self, use_cli_auth: bool) -> Self {
        self.use_cli_auth = use_cli_auth;
        self
    }

    /// Request the Azure CLI token from a specific tenant.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the endpoint domain suffix.
    pub fn with_endpoint_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.endpoint_suffix = suffix.into();
        self
    }

    /// Set the per request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the staged block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the largest file uploaded in a single request.
    pub fn with_max_single_put_size(mut self, size: u64) -> Self {
        self.max_single_put_size = size;
        self
    }

    /// The blob service endpoint, without a trailing slash.
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.blob.{}",
                self.account_name,
                self.endpoint_suffix.trim_matches('.')
            ),
        }
    }
}

/// Same truthy spellings as clap's `BoolishValueParser`.
fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "y" | "yes" | "t" | "true" | "on"
    )
}
