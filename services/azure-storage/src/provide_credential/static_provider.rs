use async_trait::async_trait;
use blobctl_core::hash::base64_decode;
use blobctl_core::{Context, Error, ProvideCredential, Result};

use crate::credential::Credential;

/// StaticCredentialProvider hands out a credential fixed at construction.
///
/// Shared keys are checked before they are handed out: the account name must
/// be set and the key must be non-empty base64, otherwise no request could
/// ever be signed with it.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider for shared key authentication.
    pub fn new_shared_key(account_name: &str, account_key: &str) -> Self {
        Self {
            credential: Credential::with_shared_key(account_name, account_key),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        if let Credential::SharedKey {
            account_name,
            account_key,
        } = &self.credential
        {
            if account_name.is_empty() {
                return Err(Error::credential_invalid("account name is empty"));
            }
            if account_key.is_empty() {
                return Err(Error::credential_invalid("account key is empty"));
            }
            base64_decode(account_key).map_err(|e| {
                Error::credential_invalid("account key is not valid base64").with_source(e)
            })?;
        }

        Ok(Some(self.credential.clone()))
    }
}
