//! Azure Storage credentials and request signing for blobctl.
//!
//! Two ways of authenticating are supported:
//!
//! - Shared Key: requests are signed with the storage account key.
//! - Bearer token: a Microsoft Entra token obtained from the Azure CLI.
//!
//! # Example
//!
//! ```no_run
//! use blobctl_azure_storage::{RequestSigner, StaticCredentialProvider};
//! use blobctl_core::{Context, Signer};
//!
//! # async fn example() -> blobctl_core::Result<()> {
//! let ctx = Context::new();
//! let provider = StaticCredentialProvider::new_shared_key(
//!     "acct1",
//!     "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
//! );
//! let signer = Signer::new(ctx, provider, RequestSigner::new());
//!
//! let mut parts = http::Request::get("https://acct1.blob.core.chinacloudapi.cn/reports?restype=container&comp=list")
//!     .header("x-ms-version", "2023-11-03")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{AZURE_QUERY_ENCODE_SET, AZURE_STORAGE_RESOURCE, X_MS_DATE, X_MS_VERSION};

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::RequestSigner;
