/// Private gallery data source.
///
/// The backend is asked for an album by name and answers with the public
/// base url of the album, its image filenames and optionally a manifest
/// fixing their display order. Access control lives entirely on the backend.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GalleryError;
use crate::state::data::{ImageRef, Manifest};

#[derive(Debug, Serialize)]
struct AlbumRequest<'a> {
    album_name: &'a str,
}

/// Successful backend answer
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AlbumResponse {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub manifest: Option<Vec<String>>,
}

/// Error body of a non-2xx answer
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// An album the backend granted access to
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateAlbum {
    pub base_url: String,
    pub images: Vec<String>,
    pub manifest: Option<Manifest>,
}

impl PrivateAlbum {
    /// Validate a backend answer; an album without images is an error
    pub fn from_response(response: AlbumResponse) -> Result<Self, GalleryError> {
        match response.base_url {
            Some(base_url) if !base_url.is_empty() && !response.images.is_empty() => Ok(Self {
                base_url,
                images: response.images,
                manifest: response.manifest.map(Manifest::new),
            }),
            _ => Err(GalleryError::Empty),
        }
    }

    /// One reference per image, `base_url + filename`, with the filename as alt text
    pub fn image_refs(&self) -> Vec<ImageRef> {
        self.images
            .iter()
            .map(|name| ImageRef::new(format!("{}{}", self.base_url, name)).with_alt(name.clone()))
            .collect()
    }
}

/// Client for the private gallery backend
#[derive(Debug, Clone)]
pub struct RemoteGallery {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl RemoteGallery {
    pub fn new(client: reqwest::Client, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    /// Build a client with a request timeout
    pub fn with_timeout(endpoint: Option<String>, timeout: Duration) -> Result<Self, GalleryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, endpoint))
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Ask the backend for an album
    pub async fn fetch_album(&self, album_name: &str) -> Result<PrivateAlbum, GalleryError> {
        let endpoint = self.endpoint.as_deref().ok_or(GalleryError::NotConfigured)?;
        if album_name.is_empty() {
            return Err(GalleryError::EmptyAlbumName);
        }

        info!("Verifying existence of album: '{}'", album_name);

        let response = self
            .client
            .post(endpoint)
            .json(&AlbumRequest { album_name })
            .send()
            .await
            .map_err(|e| {
                error!("Error submitting album name: {}", e);
                GalleryError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // The error body is optional and may not even be JSON
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(GalleryError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                detail: body.detail,
            });
        }

        let album = PrivateAlbum::from_response(response.json::<AlbumResponse>().await?)?;
        info!(
            "Album '{}' opened: {} images{}",
            album_name,
            album.images.len(),
            if album.manifest.is_some() { ", with manifest" } else { "" }
        );
        Ok(album)
    }
}
