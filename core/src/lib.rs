//! Core building blocks shared by the blobctl crates.
//!
//! This crate knows nothing about blobs. It provides the pieces needed to
//! obtain a credential and attach it to an outgoing request:
//!
//! - [`Context`]: the seams to the outside world (environment variables and
//!   external command execution), replaceable in tests.
//! - [`ProvideCredential`] and [`SignRequest`]: how a credential is obtained
//!   and how it is applied to a request.
//! - [`Signer`]: caches the credential and signs requests with it.
//! - [`SigningRequest`]: a mutable view over `http::request::Parts` used while
//!   building canonical strings.
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use blobctl_core::{Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential};
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FixedToken;
//!
//! #[async_trait]
//! impl ProvideCredential for FixedToken {
//!     type Credential = Token;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
//!         Ok(Some(Token("secret".to_string())))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct BearerSigner;
//!
//! #[async_trait]
//! impl SignRequest for BearerSigner {
//!     type Credential = Token;
//!
//!     async fn sign_request(&self, _: &Context, req: &mut Parts, cred: &Token) -> Result<()> {
//!         req.headers
//!             .insert(http::header::AUTHORIZATION, format!("Bearer {}", cred.0).parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), FixedToken, BearerSigner);
//! let mut parts = http::Request::get("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{
    CommandExecute, CommandOutput, Context, Env, NoopCommandExecute, NoopEnv, OsEnv, StaticEnv,
};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
