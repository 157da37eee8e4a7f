use crate::error::FetchError;
use crate::ports::fetcher::SourceFetcher;
use async_trait::async_trait;
use axum::{body::Bytes, BoxError};
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::{fs::File, io::BufWriter};
use tokio_util::io::StreamReader;

/// Downloads sources over HTTP(S), streaming straight to disk.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

/// Sibling path the transfer is written to before the final rename.
fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let part = part_path(destination);

        let result = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            stream_to_file(&part, response.bytes_stream())
                .await
                .map_err(classify_body_error)?;
            tokio::fs::rename(&part, destination).await?;
            Ok::<_, FetchError>(())
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&part).await;
        }
        result
    }
}

/// Failures on the response side surface as I/O errors wrapping the reqwest
/// error; only errors without one come from writing the part file.
fn classify_body_error(err: io::Error) -> FetchError {
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
    {
        Some(inner) if inner.is_timeout() => FetchError::Timeout,
        Some(inner) => FetchError::Network(inner.to_string()),
        None => FetchError::Io(err),
    }
}

/// Save a `Stream` of chunks to a file without buffering the whole body.
pub async fn stream_to_file<S, E>(path: &Path, stream: S) -> io::Result<()>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;

    Ok(())
}
