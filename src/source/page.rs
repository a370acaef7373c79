/// Gallery pages as an image source
///
/// A page lists its images as `<img class="gallery-image-source">` placeholder
/// tags carrying `src`, `alt` and `onclick`. The grid takes their place.
/// Relative sources resolve against the page location.

use log::info;
use scraper::{Html, Selector};
use std::path::Path;
use url::Url;

use super::local::{from_placeholders, Placeholder};
use crate::error::ScanError;
use crate::state::data::ImageRef;

/// Tags that mark a gallery image in page markup
pub const PLACEHOLDER_SELECTOR: &str = "img.gallery-image-source";

/// Collect the placeholders of a page in document order.
/// Tags without a `src` are skipped.
pub fn parse_placeholders(html: &str) -> Result<Vec<Placeholder>, ScanError> {
    let selector =
        Selector::parse(PLACEHOLDER_SELECTOR).map_err(|e| ScanError::Markup(format!("{:?}", e)))?;
    let document = Html::parse_document(html);

    let placeholders = document
        .select(&selector)
        .filter_map(|element| {
            let tag = element.value();
            let src = tag.attr("src").filter(|src| !src.is_empty())?;

            Some(Placeholder {
                src: src.to_string(),
                alt: tag.attr("alt").map(str::to_string),
                on_activate: tag.attr("onclick").map(str::to_string),
            })
        })
        .collect();

    Ok(placeholders)
}

/// Make every source absolute relative to `base`; unresolvable ones are kept as written
pub fn resolve_sources(placeholders: Vec<Placeholder>, base: &Url) -> Vec<Placeholder> {
    placeholders
        .into_iter()
        .map(|mut placeholder| {
            if let Ok(resolved) = base.join(&placeholder.src) {
                placeholder.src = resolved.to_string();
            }
            placeholder
        })
        .collect()
}

/// Read a page from disk and turn its placeholders into image references
pub fn load_page(path: &Path) -> Result<Vec<ImageRef>, ScanError> {
    let html = std::fs::read_to_string(path)?;
    let placeholders = parse_placeholders(&html)?;

    let absolute = path.canonicalize()?;
    let placeholders = match Url::from_file_path(&absolute) {
        Ok(base) => resolve_sources(placeholders, &base),
        Err(()) => placeholders,
    };

    info!("📄 Found {} placeholders in {}", placeholders.len(), path.display());
    Ok(from_placeholders(placeholders))
}
