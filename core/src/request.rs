use std::mem;
use std::str::FromStr;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
///
/// Built from `http::request::Parts` by taking the uri and headers out of
/// it, and written back with [`SigningRequest::apply`].
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Headers go back into the request on apply.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Query values are written as they are; callers encode them first.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;

        let mut paq = self.path;
        for (i, (k, v)) in self.query.iter().enumerate() {
            paq.push(if i == 0 { '?' } else { '&' });
            paq.push_str(k);
            if !v.is_empty() {
                paq.push('=');
                paq.push_str(v);
            }
        }

        let mut uri_parts = mem::take(&mut parts.uri).into_parts();
        uri_parts.scheme = Some(self.scheme);
        uri_parts.authority = Some(self.authority);
        uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        parts.uri = Uri::from_parts(uri_parts)?;

        Ok(())
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Get lowercased headers whose name starts with prefix.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(prefix))
            .map(|(k, v)| -> Result<(String, String)> {
                Ok((k.as_str().to_lowercase(), v.to_str()?.to_string()))
            })
            .collect()
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        headers.sort();

        headers
            .into_iter()
            .map(|(k, v)| format!("{k}{sep}{v}"))
            .collect::<Vec<_>>()
            .join(join)
    }

    /// Convert sorted query to string, leaving out the separator for
    /// empty values.
    ///
    /// ```shell
    /// [(a, b), (c, "")] => "a:b\nc"
    /// ```
    pub fn query_to_string(mut query: Vec<(String, String)>, sep: &str, join: &str) -> String {
        query.sort();

        query
            .into_iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k
                } else {
                    format!("{k}{sep}{v}")
                }
            })
            .collect::<Vec<_>>()
            .join(join)
    }
}
