use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use blobctl_core::hash::{base64_decode, base64_hmac_sha256};
use blobctl_core::time::{format_http_date, now, DateTime};
use blobctl_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::header::{self, HeaderName};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use percent_encoding::percent_encode;
use std::fmt::Write;

/// Headers taking part in the Shared Key signature, in signing order.
static SIGNED_HEADERS: [HeaderName; 11] = [
    header::CONTENT_ENCODING,
    header::CONTENT_LANGUAGE,
    header::CONTENT_LENGTH,
    HeaderName::from_static(CONTENT_MD5),
    header::CONTENT_TYPE,
    header::DATE,
    header::IF_MODIFIED_SINCE,
    header::IF_MATCH,
    header::IF_NONE_MATCH,
    header::IF_UNMODIFIED_SINCE,
    header::RANGE,
];

/// RequestSigner implements Azure Storage Shared Key and Bearer authorization.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
/// - [Authorize with Microsoft Entra ID](https://learn.microsoft.com/en-us/rest/api/storageservices/authorize-with-azure-active-directory)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for Azure Storage requests.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(&self, _: &Context, req: &mut Parts, cred: &Credential) -> Result<()> {
        let mut ctx = SigningRequest::build(req)?;

        let now_time = self.time.unwrap_or_else(now);
        ctx.headers
            .insert(X_MS_DATE, format_http_date(now_time).parse()?);

        let authorization = match cred {
            Credential::BearerToken { token, .. } => format!("Bearer {token}"),
            Credential::SharedKey {
                account_name,
                account_key,
            } => {
                let string_to_sign = string_to_sign(&ctx, account_name)?;
                let key = base64_decode(account_key).map_err(|e| {
                    Error::credential_invalid("account key is not valid base64").with_source(e)
                })?;
                let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());
                format!("SharedKey {account_name}:{signature}")
            }
        };

        let mut value: HeaderValue = authorization.parse()?;
        value.set_sensitive(true);
        ctx.headers.insert(header::AUTHORIZATION, value);

        // Canonicalization above works on decoded values, the uri needs them encoded.
        for (_, v) in ctx.query.iter_mut() {
            *v = percent_encode(v.as_bytes(), &AZURE_QUERY_ENCODE_SET).to_string();
        }

        ctx.apply(req)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
fn string_to_sign(ctx: &SigningRequest, account_name: &str) -> Result<String> {
    let mut s = String::with_capacity(256);

    writeln!(&mut s, "{}", ctx.method.as_str())?;
    for name in &SIGNED_HEADERS {
        let value = ctx.header_get_or_default(name)?;
        // Since version 2015-02-21 a zero Content-Length is signed as empty.
        if *name == header::CONTENT_LENGTH && value == "0" {
            writeln!(&mut s)?;
        } else {
            writeln!(&mut s, "{value}")?;
        }
    }
    writeln!(&mut s, "{}", canonicalize_header(ctx)?)?;
    write!(&mut s, "{}", canonicalize_resource(ctx, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(ctx: &SigningRequest) -> Result<String> {
    Ok(SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix("x-ms-")?,
        ":",
        "\n",
    ))
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(ctx: &SigningRequest, account_name: &str) -> String {
    if ctx.query.is_empty() {
        return format!("/{}{}", account_name, ctx.path);
    }

    let query = ctx
        .query
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();

    format!(
        "/{}{}\n{}",
        account_name,
        ctx.path,
        SigningRequest::query_to_string(query, ":", "\n")
    )
}
