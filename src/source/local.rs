use log::{info, warn};
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

use super::page;
use crate::error::ScanError;
use crate::state::data::ImageRef;

/// Extensions the gallery shows (compared lowercase)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// A placeholder image as authored in page markup:
/// `<img class="gallery-image-source" src=".." alt=".." onclick="..">`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub src: String,
    pub alt: Option<String>,
    pub on_activate: Option<String>,
}

impl Placeholder {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            on_activate: None,
        }
    }
}

/// Turn placeholders into image references, keeping alt text and click actions
pub fn from_placeholders(placeholders: Vec<Placeholder>) -> Vec<ImageRef> {
    placeholders
        .into_iter()
        .map(|placeholder| {
            let mut reference = ImageRef::new(placeholder.src);
            reference.alt = placeholder.alt;
            reference.on_activate = placeholder.on_activate;
            reference
        })
        .collect()
}

/// Is this path a gallery image, judging by its extension
pub fn is_gallery_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Walk a folder recursively and collect every gallery image as a file:// reference
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageRef>, ScanError> {
    if !folder.is_dir() {
        return Err(ScanError::NotADirectory(folder.to_path_buf()));
    }

    info!("🔍 Scanning folder: {}", folder.display());

    let mut refs = Vec::new();
    for entry in WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Only process files (not directories)
        if !path.is_file() || !is_gallery_image(path) {
            continue;
        }

        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        match Url::from_file_path(&absolute) {
            Ok(url) => refs.push(ImageRef::new(url.to_string())),
            Err(()) => warn!("⚠️  Skipping {}: not an absolute path", absolute.display()),
        }
    }

    info!("✅ Found {} images in {}", refs.len(), folder.display());
    Ok(refs)
}

/// Scan a folder on the blocking pool
pub async fn scan_folder_async(folder: PathBuf) -> Result<Vec<ImageRef>, ScanError> {
    tokio::task::spawn_blocking(move || scan_folder(&folder))
        .await
        .map_err(|e| ScanError::Join(e.to_string()))?
}

/// Open a public gallery: a gallery page file is read for its placeholders,
/// anything else is scanned as a folder
pub fn open_gallery(path: &Path) -> Result<Vec<ImageRef>, ScanError> {
    if path.is_file() {
        page::load_page(path)
    } else {
        scan_folder(path)
    }
}

/// `open_gallery` on the blocking pool
pub async fn open_gallery_async(path: PathBuf) -> Result<Vec<ImageRef>, ScanError> {
    tokio::task::spawn_blocking(move || open_gallery(&path))
        .await
        .map_err(|e| ScanError::Join(e.to_string()))?
}
