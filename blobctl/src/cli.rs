use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use blobctl_core::Context;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use log::debug;

use crate::config::{
    AZBLOB_ACCOUNT_KEY, AZBLOB_ACCOUNT_NAME, AZBLOB_CONTAINER, AZBLOB_ENDPOINT,
    AZBLOB_ENDPOINT_SUFFIX, AZBLOB_TENANT_ID, AZBLOB_TIMEOUT, AZBLOB_USE_CLI_AUTH,
    DEFAULT_ENDPOINT_SUFFIX,
};
use crate::{BlobClient, Config, Error, Result};

/// Command line interface of the `blobctl` binary.
#[derive(Debug, Parser)]
#[command(name = "blobctl")]
#[command(version, about = "List, upload, download and delete Azure Storage blobs")]
pub struct Cli {
    /// Storage account name
    #[arg(long, env = AZBLOB_ACCOUNT_NAME)]
    pub account: String,

    /// Container to operate on
    #[arg(long, env = AZBLOB_CONTAINER)]
    pub container: String,

    /// Base64 encoded account key
    #[arg(long, env = AZBLOB_ACCOUNT_KEY, hide_env_values = true)]
    pub account_key: Option<String>,

    /// Authenticate with `az account get-access-token` instead of the account key
    #[arg(long, env = AZBLOB_USE_CLI_AUTH, value_parser = BoolishValueParser::new())]
    pub use_cli_auth: bool,

    /// Tenant to request the Azure CLI token from
    #[arg(long, env = AZBLOB_TENANT_ID)]
    pub tenant_id: Option<String>,

    /// Full blob service endpoint, overrides the endpoint suffix
    #[arg(long, env = AZBLOB_ENDPOINT, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Domain suffix of the blob service endpoint
    #[arg(long, env = AZBLOB_ENDPOINT_SUFFIX, default_value = DEFAULT_ENDPOINT_SUFFIX)]
    pub endpoint_suffix: String,

    /// Give up after this many seconds
    #[arg(long, env = AZBLOB_TIMEOUT, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations on the container.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List blob names
    List {
        /// Only list blobs starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Upload files, each named after its base name
    Upload {
        /// Local files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Download a blob into a directory
    Download {
        /// Blob name
        blob: String,
        /// Destination directory
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
    /// Delete blobs
    Delete {
        /// Blob names
        #[arg(required = true)]
        blobs: Vec<String>,
    },
    /// Delete every blob whose name contains PATTERN
    Purge {
        /// Substring of the names to delete
        pattern: String,
    },
}

impl Cli {
    /// Build the client config from the parsed arguments.
    pub fn config(&self) -> Config {
        let mut config = Config::default()
            .with_account_name(&self.account)
            .with_container(&self.container)
            .with_cli_auth(self.use_cli_auth)
            .with_endpoint_suffix(&self.endpoint_suffix);
        if let Some(key) = &self.account_key {
            config = config.with_account_key(key);
        }
        if let Some(tenant_id) = &self.tenant_id {
            config = config.with_tenant_id(tenant_id);
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Run the command, writing results to `out`.
    ///
    /// Stops at the first error.
    pub async fn run(self, ctx: Context, out: &mut impl Write) -> Result<()> {
        let timeout = self.timeout;
        let fut = self.execute(ctx, out);

        match timeout {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
                .await
                .map_err(|_| Error::request(format!("operation timed out after {secs}s")))?,
            None => fut.await,
        }
    }

    async fn execute(self, ctx: Context, out: &mut impl Write) -> Result<()> {
        let config = self.config();
        debug!("running {:?} with {config:?}", self.command);

        let client = BlobClient::new(ctx, &config).await?;
        let container = config.container.as_str();

        match self.command {
            Command::List { prefix } => {
                let mut pager = client.list_blobs(container);
                if let Some(prefix) = prefix {
                    pager = pager.with_prefix(prefix);
                }
                let names: Vec<String> = pager.into_stream().try_collect().await?;
                for name in names {
                    writeln!(out, "{name}").map_err(output_error)?;
                }
            }
            Command::Upload { files } => {
                for file in files {
                    let name = client.upload_file(container, &file).await?;
                    writeln!(out, "uploaded {} as {name}", file.display()).map_err(output_error)?;
                }
            }
            Command::Download { blob, dest } => {
                let path = client.download_file(container, &blob, &dest).await?;
                writeln!(out, "downloaded {blob} to {}", path.display()).map_err(output_error)?;
            }
            Command::Delete { blobs } => {
                for blob in blobs {
                    client.delete_blob(container, &blob).await?;
                }
            }
            Command::Purge { pattern } => {
                let deleted = client.purge(container, &pattern).await?;
                writeln!(out, "deleted {} blobs matching {pattern}", deleted.len())
                    .map_err(output_error)?;
            }
        }
        Ok(())
    }
}

fn output_error(err: std::io::Error) -> Error {
    Error::io("failed to write output").with_source(err)
}
