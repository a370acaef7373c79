//! Responsive, aspect-ratio preserving photo grid.
//!
//! Images are probed for their native size, put in display order, cut into
//! rows of a fixed number of images and given widths proportional to their
//! aspect ratio, so every row spans the full container and every tile in a
//! row has the same height.
//!
//! ```text
//! ImageRef ─▶ DimensionProbe ─▶ OrderingPolicy ─▶ pack ─▶ LayoutRenderer ─▶ surface
//!                                                   ▲
//!                               ViewportReactor ────┘ (resize, no re-probe)
//! ```
//!
//! The engine has no windowing dependency. Presentation surfaces implement
//! [`render::RenderSurface`]; the crate ships an HTML one, the binary an iced one.

pub mod config;
pub mod error;
pub mod layout;
pub mod probe;
pub mod render;
pub mod source;
pub mod state;
pub mod viewport;

pub use config::GalleryConfig;
pub use error::{ConfigError, GalleryError, LayoutSkip, ProbeError, ScanError};
pub use layout::{pack, OrderingPolicy, Row};
pub use probe::{DimensionProbe, ProbeOutput};
pub use render::{LayoutRenderer, RenderSurface, RowDescriptor, TileDescriptor};
pub use state::{ImageRecord, ImageRef, LayoutSession, Manifest, RenderMode, RenderOptions};
pub use viewport::ViewportReactor;
