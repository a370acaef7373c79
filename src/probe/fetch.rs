use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use std::path::PathBuf;
use url::Url;

use crate::error::ProbeError;

/// Source of encoded image bytes.
///
/// The probe only needs the bytes; where they come from is up to the fetcher.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Bytes, ProbeError>>;
}

/// Where an image url points to
#[derive(Debug, Clone, PartialEq)]
enum Location {
    Remote(Url),
    File(PathBuf),
}

impl Location {
    /// Supported schemes:
    /// - `http`, `https`: fetched over the network
    /// - `file`: read from disk
    /// - anything that does not parse as a url is taken as a local path
    fn parse(url: &str) -> Result<Self, ProbeError> {
        match Url::parse(url) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => Ok(Location::Remote(parsed)),
                "file" => parsed
                    .to_file_path()
                    .map(Location::File)
                    .map_err(|()| ProbeError::UnsupportedScheme(url.to_string())),
                // Windows drive letters parse as a one-letter scheme
                scheme if scheme.len() == 1 => Ok(Location::File(PathBuf::from(url))),
                scheme => Err(ProbeError::UnsupportedScheme(scheme.to_string())),
            },
            Err(_) => Ok(Location::File(PathBuf::from(url))),
        }
    }
}

/// Default fetcher: local files through tokio, remote images through reqwest
#[derive(Debug, Clone, Default)]
pub struct UrlFetcher {
    client: reqwest::Client,
}

impl UrlFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (shares its connection pool)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for UrlFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Bytes, ProbeError>> {
        let client = self.client.clone();
        let location = Location::parse(url);

        async move {
            match location? {
                Location::Remote(url) => {
                    let response = client.get(url).send().await?.error_for_status()?;
                    Ok(response.bytes().await?)
                }
                Location::File(path) => {
                    let data = tokio::fs::read(path).await?;
                    Ok(Bytes::from(data))
                }
            }
        }
        .boxed()
    }
}
