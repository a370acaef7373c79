/// Shared data structures for the layout engine
///
/// These structs represent the data model that flows between
/// the gallery sources, the dimension probe and the renderer.

/// Aspect ratio assumed for images whose dimensions could not be probed
pub const FALLBACK_ASPECT_RATIO: f64 = 1.0;

/// Sentinel width/height recorded for images whose probe failed
pub const FALLBACK_DIMENSION: u32 = 100;

/// A reference to one image, as handed to us by a gallery source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Location of the image (file://, http(s):// or a bare path)
    pub url: String,
    /// Final path segment of the url, query string stripped (e.g. "DSC_0001.jpg")
    pub display_name: String,
    /// Accessible alt text, if the source supplied one
    pub alt: Option<String>,
    /// Click action preserved from the placeholder markup
    pub on_activate: Option<String>,
}

impl ImageRef {
    /// Create a reference from a url, deriving the display name
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let display_name = display_name_of(&url).to_string();

        Self {
            url,
            display_name,
            alt: None,
            on_activate: None,
        }
    }

    /// Attach alt text
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Attach a click action to carry through to the rendered tile
    pub fn with_on_activate(mut self, action: impl Into<String>) -> Self {
        self.on_activate = Some(action.into());
        self
    }

    /// The filename used for manifest lookups and alphabetical ordering
    pub fn filename(&self) -> &str {
        &self.display_name
    }
}

/// Strip the query string and return the last path segment
pub fn display_name_of(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query.rsplit('/').next().unwrap_or(without_query)
}

/// An image whose native dimensions are known (or assumed)
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub reference: ImageRef,
    /// width / height, always > 0
    pub aspect_ratio: f64,
    pub native_width: u32,
    pub native_height: u32,
    /// Manifest position, None when unordered
    pub order: Option<usize>,
}

impl ImageRecord {
    /// Build a record from probed dimensions.
    /// Zero dimensions are not representable, callers use `fallback` instead.
    pub fn measured(reference: ImageRef, width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            reference,
            aspect_ratio: width as f64 / height as f64,
            native_width: width,
            native_height: height,
            order: None,
        }
    }

    /// The assumed-square record used when a probe fails
    pub fn fallback(reference: ImageRef) -> Self {
        Self {
            reference,
            aspect_ratio: FALLBACK_ASPECT_RATIO,
            native_width: FALLBACK_DIMENSION,
            native_height: FALLBACK_DIMENSION,
            order: None,
        }
    }

    /// Return a copy of this record carrying the given order key
    pub fn with_order(self, order: Option<usize>) -> Self {
        Self { order, ..self }
    }

    /// The filename used for manifest lookups and alphabetical ordering
    pub fn filename(&self) -> &str {
        self.reference.filename()
    }
}

/// Caller-supplied display order, as a list of filenames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub filenames: Vec<String>,
}

impl Manifest {
    pub fn new(filenames: Vec<String>) -> Self {
        Self { filenames }
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

impl From<Vec<String>> for Manifest {
    fn from(filenames: Vec<String>) -> Self {
        Self::new(filenames)
    }
}

/// How rows reach the surface during the first population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Emit rows as soon as enough leading images have been probed
    #[default]
    Incremental,
    /// Wait for every probe, then render everything at once
    Batch,
}

/// Per-gallery rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Private galleries show a filename label on every tile
    pub is_private: bool,
    pub mode: RenderMode,
}

impl RenderOptions {
    /// Options for a locally known, publicly shown gallery
    pub fn public() -> Self {
        Self {
            is_private: false,
            mode: RenderMode::Incremental,
        }
    }

    /// Options for a remote, access-gated gallery
    pub fn private() -> Self {
        Self {
            is_private: true,
            mode: RenderMode::Batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_query() {
        let image = ImageRef::new("https://cdn.example.com/album/DSC_0001.jpg?v=3&w=800");
        assert_eq!(image.display_name, "DSC_0001.jpg");
    }

    #[test]
    fn test_display_name_of_bare_name() {
        assert_eq!(display_name_of("photo.png"), "photo.png");
        assert_eq!(display_name_of("/srv/photos/a.webp"), "a.webp");
    }

    #[test]
    fn test_measured_aspect_ratio() {
        let record = ImageRecord::measured(ImageRef::new("wide.jpg"), 300, 200);
        assert!((record.aspect_ratio - 1.5).abs() < 1e-12);
        assert_eq!(record.order, None);
    }

    #[test]
    fn test_fallback_is_square_sentinel() {
        let record = ImageRecord::fallback(ImageRef::new("broken.jpg"));
        assert_eq!(record.aspect_ratio, 1.0);
        assert_eq!((record.native_width, record.native_height), (100, 100));
    }

    #[test]
    fn test_with_order_replaces() {
        let record = ImageRecord::measured(ImageRef::new("a.jpg"), 10, 10);
        let ordered = record.clone().with_order(Some(4));
        assert_eq!(ordered.order, Some(4));
        assert_eq!(record.order, None);
    }
}
