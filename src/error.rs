/// Error types, one enum per concern.

use thiserror::Error;

/// Why a single dimension probe failed.
/// Never surfaced to the caller: the probe substitutes a square tile instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image header: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image reports a zero dimension")]
    EmptyDimensions,

    #[error("probe task failed: {0}")]
    Join(String),

    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
}

/// Failures of the private gallery data source
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no private gallery backend configured")]
    NotConfigured,

    #[error("album name is empty")]
    EmptyAlbumName,

    #[error("gallery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gallery backend answered {code} {reason}")]
    Status {
        code: u16,
        reason: String,
        detail: Option<String>,
    },

    #[error("gallery is empty")]
    Empty,
}

impl GalleryError {
    /// The message shown inline next to the album form
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::NotConfigured => "Private galleries are not configured.".to_string(),
            GalleryError::EmptyAlbumName => "Please enter an album name.".to_string(),
            GalleryError::Request(_) => "An error occurred. Please try again.".to_string(),
            GalleryError::Status {
                code,
                reason,
                detail,
            } => match detail {
                Some(detail) => detail.clone(),
                None => format!("Error: {} - {}", code, reason),
            },
            GalleryError::Empty => {
                "No images found for the provided album name, or the gallery is empty.".to_string()
            }
        }
    }
}

/// Failures while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while scanning a local gallery folder
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("gallery folder not found: {0}")]
    NotADirectory(std::path::PathBuf),

    #[error("folder scan failed: {0}")]
    Join(String),

    #[error("failed to read gallery page: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid placeholder selector: {0}")]
    Markup(String),
}

/// Reasons a layout pass declines to run. Not errors in the user's eyes:
/// the pass is skipped and logged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSkip {
    #[error("gallery container not found")]
    MissingContainer,

    #[error("no images to lay out")]
    EmptySourceSet,
}
