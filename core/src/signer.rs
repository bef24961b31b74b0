use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// Signer keeps a credential around and signs requests with it.
///
/// The credential is loaded on first use and reloaded whenever it stops
/// being valid, for example when a bearer token is about to expire.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a valid credential, loading it from the provider if needed.
    ///
    /// Fails if the provider errors or has no credential to offer.
    pub async fn credential(&self) -> Result<K> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|cred| cred.is_valid()) {
            return Ok(cred);
        }

        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .filter(|cred| cred.is_valid())
            .ok_or_else(|| Error::credential_invalid("no valid credential available"))?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }

    /// Sign the request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let cred = self.credential().await?;
        self.builder.sign_request(&self.ctx, req, &cred).await
    }
}
