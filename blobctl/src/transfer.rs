use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use blobctl_core::hash::base64_encode;
use futures::TryStreamExt;
use http::header::CONTENT_LENGTH;
use log::{debug, warn};
use reqwest::Body;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::client::{check_status, empty_body, encode_query_value};
use crate::{BlobClient, Error, Result};

const X_MS_BLOB_TYPE: &str = "x-ms-blob-type";

/// Body of a Put Block List request.
#[derive(Debug, Serialize)]
#[serde(rename = "BlockList")]
struct BlockList {
    #[serde(rename = "Latest")]
    latest: Vec<String>,
}

impl BlobClient {
    /// Upload a local file, named after its base name.
    ///
    /// An existing blob with the same name is overwritten. Returns the blob
    /// name.
    pub async fn upload_file(&self, container: &str, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::io(format!("{} has no usable file name", path.display())))?
            .to_string();

        let file = File::open(path).await.map_err(|e| {
            Error::io(format!("failed to open {}", path.display())).with_source(e)
        })?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| Error::io(format!("failed to stat {}", path.display())).with_source(e))?;
        if !metadata.is_file() {
            return Err(Error::io(format!("{} is not a regular file", path.display())));
        }
        let size = metadata.len();

        if size <= self.max_single_put_size {
            self.put_blob(container, &name, file, size, path).await?;
        } else {
            self.put_blocks(container, &name, file, path).await?;
        }

        debug!("uploaded {} ({size} bytes) as {name}", path.display());
        Ok(name)
    }

    /// Download a blob into `dest/blob`, returning the written path.
    ///
    /// The local file is created before any request goes out. On failure it
    /// is left behind with whatever was written so far.
    pub async fn download_file(
        &self,
        container: &str,
        blob: &str,
        dest: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        if !Path::new(blob)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::io(format!(
                "blob name {blob} does not map to a path inside the destination"
            )));
        }

        let path = dest.as_ref().join(blob);
        let mut file = File::create(&path).await.map_err(|e| {
            Error::io(format!("failed to create {}", path.display())).with_source(e)
        })?;

        let fetched = self.fetch_blob(container, blob, &mut file, &path).await;
        let released = release(&mut file).await;
        drop(file);

        match (fetched, released) {
            (Ok(size), Ok(())) => {
                debug!("downloaded {blob} ({size} bytes) to {}", path.display());
                Ok(path)
            }
            (Ok(_), Err(e)) => {
                Err(Error::io(format!("failed to close {}", path.display())).with_source(e))
            }
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(e)) => {
                warn!("failed to close {} after error: {e}", path.display());
                Err(err)
            }
        }
    }

    async fn put_blob(
        &self,
        container: &str,
        name: &str,
        file: File,
        size: u64,
        path: &Path,
    ) -> Result<()> {
        let (body, read_error) = file_body(file);
        let req = http::Request::put(self.blob_url(container, name))
            .header(X_MS_BLOB_TYPE, "BlockBlob")
            .header(CONTENT_LENGTH, size)
            .body(body)?;

        let what = format!("upload blob {name}");
        let resp = self.send(req, &what).await;
        // A failed read aborts the body, which reqwest reports as a transport error.
        if let Some(e) = read_error.lock().ok().and_then(|mut slot| slot.take()) {
            return Err(Error::io(format!("failed to read {}", path.display())).with_source(e));
        }
        check_status(resp?, &what)?;
        Ok(())
    }

    async fn put_blocks(
        &self,
        container: &str,
        name: &str,
        mut file: File,
        path: &Path,
    ) -> Result<()> {
        let blob_url = self.blob_url(container, name);
        let mut ids = Vec::new();

        loop {
            let mut block = Vec::with_capacity(self.block_size);
            (&mut file)
                .take(self.block_size as u64)
                .read_to_end(&mut block)
                .await
                .map_err(|e| {
                    Error::io(format!("failed to read {}", path.display())).with_source(e)
                })?;
            if block.is_empty() {
                break;
            }

            let id = block_id(ids.len());
            let req = http::Request::put(format!(
                "{blob_url}?comp=block&blockid={}",
                encode_query_value(&id)
            ))
            .header(CONTENT_LENGTH, block.len())
            .body(Body::from(block))?;

            let what = format!("upload block {} of {name}", ids.len());
            check_status(self.send(req, &what).await?, &what)?;
            ids.push(id);
        }

        let count = ids.len();
        let body = quick_xml::se::to_string(&BlockList { latest: ids })
            .map_err(|e| Error::request("failed to serialize block list").with_source(e))?;
        let req = http::Request::put(format!("{blob_url}?comp=blocklist"))
            .header(CONTENT_LENGTH, body.len())
            .body(Body::from(body))?;

        let what = format!("commit {count} blocks of {name}");
        check_status(self.send(req, &what).await?, &what)?;
        Ok(())
    }

    async fn fetch_blob(
        &self,
        container: &str,
        blob: &str,
        file: &mut File,
        path: &Path,
    ) -> Result<u64> {
        let req = http::Request::get(self.blob_url(container, blob)).body(empty_body())?;

        let what = format!("download blob {blob}");
        let mut resp = check_status(self.send(req, &what).await?, &what)?;

        let mut written = 0;
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| Error::request(format!("failed to {what}")).with_source(e))?
        {
            file.write_all(&chunk).await.map_err(|e| {
                Error::io(format!("failed to write {}", path.display())).with_source(e)
            })?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }
}

/// Block ids of one blob must all have the same length.
fn block_id(index: usize) -> String {
    base64_encode(format!("{index:016}").as_bytes())
}

/// Stream `file` as a request body.
///
/// The first read error is also kept in the returned slot.
fn file_body(file: File) -> (Body, Arc<Mutex<Option<std::io::Error>>>) {
    let read_error = Arc::new(Mutex::new(None::<std::io::Error>));
    let slot = read_error.clone();
    let stream = ReaderStream::new(file).map_err(move |e| {
        if let Ok(mut slot) = slot.lock() {
            slot.get_or_insert_with(|| std::io::Error::new(e.kind(), e.to_string()));
        }
        e
    });
    (Body::wrap_stream(stream), read_error)
}

async fn release(file: &mut File) -> std::io::Result<()> {
    file.flush().await?;
    file.sync_all().await
}
