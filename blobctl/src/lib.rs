//! Azure Blob Storage operations for the command line.
//!
//! [`BlobClient`] is built once from a [`Config`] and then lists, uploads,
//! downloads and deletes blobs through the Blob service REST API. Requests
//! are signed with the account key (Shared Key) or with a bearer token
//! obtained from the Azure CLI.
//!
//! Every failure is an [`Error`] of one of three kinds: [`ErrorKind::Auth`]
//! while building the client, [`ErrorKind::Io`] for local files, and
//! [`ErrorKind::Request`] for everything that went wrong talking to the
//! service. Nothing is retried.
//!
//! ## Example
//!
//! ```no_run
//! use blobctl::{BlobClient, Config};
//! use blobctl_command_execute_tokio::TokioCommandExecute;
//! use blobctl_core::{Context, OsEnv};
//!
//! # async fn example() -> blobctl::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_command_execute(TokioCommandExecute);
//! let config = Config::from_env(&ctx);
//! let client = BlobClient::new(ctx, &config).await?;
//!
//! let name = client.upload_file("reports", "hello-20240101.txt").await?;
//! for name in client.list_blob_names("reports").await? {
//!     println!("{name}");
//! }
//! client.download_file("reports", &name, "/tmp").await?;
//! client.delete_blob("reports", &name).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod config;
pub use config::Config;

mod client;
pub use client::{BlobClient, STORAGE_VERSION};

mod list;
pub use list::BlobPager;

mod transfer;

pub mod cli;
