use futures::stream::{self, Stream, TryStreamExt};
use log::debug;
use serde::Deserialize;

use crate::client::{check_status, empty_body, encode_query_value};
use crate::{BlobClient, Error, Result};

/// BlobPager walks the blob names of a container one page at a time.
///
/// Nothing is fetched until [`BlobPager::next_page`] is called. A failed page
/// leaves the pager where it was, and [`BlobPager::restart`] rewinds it to
/// the first page.
///
/// ```no_run
/// # async fn example(client: blobctl::BlobClient) -> blobctl::Result<()> {
/// let mut pager = client.list_blobs("reports").with_prefix("hello-");
/// while let Some(names) = pager.next_page().await? {
///     println!("{names:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BlobPager {
    client: BlobClient,
    container: String,
    prefix: Option<String>,
    max_results: Option<u32>,
    marker: Option<String>,
    done: bool,
}

impl BlobClient {
    /// List the blobs in a container, lazily.
    pub fn list_blobs(&self, container: &str) -> BlobPager {
        BlobPager {
            client: self.clone(),
            container: container.to_string(),
            prefix: None,
            max_results: None,
            marker: None,
            done: false,
        }
    }

    /// Collect the names of all blobs in a container, in server order.
    ///
    /// Returns an error and no names if any page fails.
    pub async fn list_blob_names(&self, container: &str) -> Result<Vec<String>> {
        self.list_blobs(container).collect().await
    }
}

impl BlobPager {
    /// Only list blobs whose name starts with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Ask the service for at most `max_results` names per page.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the last page has been returned.
    pub async fn next_page(&mut self) -> Result<Option<Vec<String>>> {
        if self.done {
            return Ok(None);
        }

        let req = http::Request::get(self.url()).body(empty_body())?;
        let what = format!("list blobs in {}", self.container);
        let resp = check_status(self.client.send(req, &what).await?, &what)?;
        let body = resp
            .text()
            .await
            .map_err(|e| {
                Error::request(format!("failed to read response of {what}")).with_source(e)
            })?;

        let (names, next_marker) = parse_list_response(&body)?;
        debug!(
            "listed {} blobs in {}, next marker: {next_marker:?}",
            names.len(),
            self.container
        );

        self.done = next_marker.is_none();
        self.marker = next_marker;
        Ok(Some(names))
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.marker = None;
        self.done = false;
    }

    /// Fetch every remaining page.
    ///
    /// All or nothing: the first failing page discards everything listed so
    /// far.
    pub async fn collect(mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while let Some(page) = self.next_page().await? {
            names.extend(page);
        }
        Ok(names)
    }

    /// Turn the pager into a stream of names.
    pub fn into_stream(self) -> impl Stream<Item = Result<String>> {
        stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok::<_, Error>(page.map(|names| {
                let names = stream::iter(names.into_iter().map(Ok::<String, Error>));
                (names, pager)
            }))
        })
        .try_flatten()
    }

    fn url(&self) -> String {
        let mut url = format!(
            "{}?restype=container&comp=list",
            self.client.container_url(&self.container)
        );
        if let Some(prefix) = &self.prefix {
            url.push_str(&format!("&prefix={}", encode_query_value(prefix)));
        }
        if let Some(max_results) = self.max_results {
            url.push_str(&format!("&maxresults={max_results}"));
        }
        if let Some(marker) = &self.marker {
            url.push_str(&format!("&marker={}", encode_query_value(marker)));
        }
        url
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct EnumerationResults {
    blobs: Blobs,
    next_marker: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct Blobs {
    blob: Vec<Blob>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct Blob {
    name: String,
}

/// Parse a List Blobs response into names and the marker of the next page.
fn parse_list_response(body: &str) -> Result<(Vec<String>, Option<String>)> {
    let result: EnumerationResults = quick_xml::de::from_str(body)
        .map_err(|e| Error::request("failed to parse list blobs response").with_source(e))?;

    let names = result.blobs.blob.into_iter().map(|b| b.name).collect();
    let next_marker = result.next_marker.filter(|m| !m.is_empty());
    Ok((names, next_marker))
}
