/// Rendering module
///
/// This module turns packed rows into something a presentation surface can show:
/// - Pure tile/row descriptors (this file)
/// - Progressive row assembly while probes resolve (incremental.rs)
/// - An HTML surface mirroring the gallery page markup (html.rs)
///
/// Surfaces own nothing but what the renderer hands them.

pub mod html;
pub mod incremental;

pub use html::HtmlSurface;
pub use incremental::IncrementalAssembler;

use log::{debug, info, warn};

use crate::error::LayoutSkip;
use crate::layout::packer::{PackedTile, Row};
use crate::state::data::RenderOptions;

/// Id of the element the gallery is rendered into
pub const CONTAINER_ID: &str = "image-gallery-container";

/// How an image fills its allotted box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFit {
    /// Fill the box, crop overflow, never distort
    #[default]
    Cover,
}

/// Everything a surface needs to draw one tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    pub src: String,
    /// Empty when the source supplied none
    pub alt: String,
    /// Sizing hint, width / height
    pub aspect_ratio: f64,
    /// Percentage of the row width
    pub flex_share: f64,
    pub fit: TileFit,
    /// Filename overlay, private galleries only
    pub label: Option<String>,
    /// Click action carried over from the source markup
    pub on_activate: Option<String>,
}

impl TileDescriptor {
    pub fn from_tile(tile: &PackedTile, options: RenderOptions) -> Self {
        let reference = &tile.record.reference;

        Self {
            src: reference.url.clone(),
            alt: reference.alt.clone().unwrap_or_default(),
            aspect_ratio: tile.record.aspect_ratio,
            flex_share: tile.flex_share,
            fit: TileFit::Cover,
            label: options.is_private.then(|| reference.display_name.clone()),
            on_activate: reference.on_activate.clone(),
        }
    }
}

/// One row of tiles, left to right
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDescriptor {
    pub tiles: Vec<TileDescriptor>,
}

impl RowDescriptor {
    pub fn from_row(row: &Row, options: RenderOptions) -> Self {
        Self {
            tiles: row
                .tiles
                .iter()
                .map(|tile| TileDescriptor::from_tile(tile, options))
                .collect(),
        }
    }

    /// Row height when the row spans `width`; every tile shares it
    pub fn height_for_width(&self, width: f32) -> f32 {
        let aspect_sum: f64 = self.tiles.iter().map(|t| t.aspect_ratio).sum();
        if aspect_sum.is_finite() && aspect_sum > 0.0 {
            (width as f64 / aspect_sum) as f32
        } else {
            width / self.tiles.len().max(1) as f32
        }
    }
}

/// Describe rows without touching any surface
pub fn render_rows(rows: &[Row], options: RenderOptions) -> Vec<RowDescriptor> {
    rows.iter()
        .map(|row| RowDescriptor::from_row(row, options))
        .collect()
}

/// Something rows can be materialized into
pub trait RenderSurface {
    /// Drop everything previously rendered
    fn clear(&mut self);

    /// Append one row below the existing ones
    fn append_row(&mut self, row: RowDescriptor);
}

/// Collaborator that attaches per-tile interaction (e.g. a lightbox)
/// and must hear about every change to the set of tiles
pub trait InteractionHook {
    fn tiles_changed(&mut self, tile_count: usize, is_private: bool);
}

/// Writes rows into a surface and notifies the interaction hook
pub struct LayoutRenderer<S> {
    surface: Option<S>,
    hook: Option<Box<dyn InteractionHook>>,
    tile_count: usize,
}

impl<S: RenderSurface> LayoutRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
            hook: None,
            tile_count: 0,
        }
    }

    /// A renderer with no container yet; every pass is skipped until one is attached
    pub fn detached() -> Self {
        Self {
            surface: None,
            hook: None,
            tile_count: 0,
        }
    }

    pub fn with_hook(mut self, hook: Box<dyn InteractionHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
        self.tile_count = 0;
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Tiles currently on the surface
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Replace the surface content with `rows`
    pub fn render_full(&mut self, rows: &[Row], options: RenderOptions) -> Result<(), LayoutSkip> {
        let Some(surface) = self.surface.as_mut() else {
            warn!("Gallery container #{} not found. Layout will not run.", CONTAINER_ID);
            return Err(LayoutSkip::MissingContainer);
        };

        if rows.is_empty() {
            info!("No images to lay out, render pass skipped");
            return Err(LayoutSkip::EmptySourceSet);
        }

        surface.clear();
        self.tile_count = 0;
        for row in render_rows(rows, options) {
            self.tile_count += row.tiles.len();
            surface.append_row(row);
        }

        debug!("Full render: {} rows, {} tiles", rows.len(), self.tile_count);
        self.notify(options);
        Ok(())
    }

    /// Clear the surface ahead of an incremental population
    pub fn reset(&mut self) -> Result<(), LayoutSkip> {
        let Some(surface) = self.surface.as_mut() else {
            warn!("Gallery container #{} not found. Layout will not run.", CONTAINER_ID);
            return Err(LayoutSkip::MissingContainer);
        };

        surface.clear();
        self.tile_count = 0;
        Ok(())
    }

    /// Append a single row below what is already shown
    pub fn append_row(&mut self, row: &Row, options: RenderOptions) -> Result<(), LayoutSkip> {
        let Some(surface) = self.surface.as_mut() else {
            return Err(LayoutSkip::MissingContainer);
        };

        if row.is_empty() {
            return Err(LayoutSkip::EmptySourceSet);
        }

        self.tile_count += row.len();
        surface.append_row(RowDescriptor::from_row(row, options));
        self.notify(options);
        Ok(())
    }

    fn notify(&mut self, options: RenderOptions) {
        if let Some(hook) = self.hook.as_mut() {
            hook.tiles_changed(self.tile_count, options.is_private);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::packer::pack;
    use crate::state::data::{ImageRecord, ImageRef};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct VecSurface {
        rows: Vec<RowDescriptor>,
        clears: usize,
    }

    impl RenderSurface for VecSurface {
        fn clear(&mut self) {
            self.rows.clear();
            self.clears += 1;
        }

        fn append_row(&mut self, row: RowDescriptor) {
            self.rows.push(row);
        }
    }

    struct CountingHook {
        calls: Rc<RefCell<Vec<(usize, bool)>>>,
    }

    impl InteractionHook for CountingHook {
        fn tiles_changed(&mut self, tile_count: usize, is_private: bool) {
            self.calls.borrow_mut().push((tile_count, is_private));
        }
    }

    fn squares(n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| ImageRecord::measured(ImageRef::new(format!("https://cdn/{}.jpg", i)), 10, 10))
            .collect()
    }

    #[test]
    fn test_five_squares_in_rows_of_three() {
        let mut renderer = LayoutRenderer::new(VecSurface::default());
        renderer
            .render_full(&pack(&squares(5), 3), RenderOptions::public())
            .unwrap();

        let rows = &renderer.surface().unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tiles.len(), 3);
        assert_eq!(rows[1].tiles.len(), 2);
        for tile in &rows[0].tiles {
            assert!((tile.flex_share - 33.333_333).abs() < 1e-4);
        }
        for tile in &rows[1].tiles {
            assert!((tile.flex_share - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_full_render_replaces_content() {
        let mut renderer = LayoutRenderer::new(VecSurface::default());
        renderer.render_full(&pack(&squares(6), 2), RenderOptions::public()).unwrap();
        renderer.render_full(&pack(&squares(6), 3), RenderOptions::public()).unwrap();

        let surface = renderer.surface().unwrap();
        assert_eq!(surface.rows.len(), 2);
        assert_eq!(surface.clears, 2);
        assert_eq!(renderer.tile_count(), 6);
    }

    #[test]
    fn test_private_tiles_carry_label() {
        let record = ImageRecord::measured(ImageRef::new("https://cdn/album/x.jpg?sig=1"), 4, 3);
        let rows = pack(&[record], 3);

        let public = render_rows(&rows, RenderOptions::public());
        let private = render_rows(&rows, RenderOptions::private());

        assert_eq!(public[0].tiles[0].label, None);
        assert_eq!(private[0].tiles[0].label.as_deref(), Some("x.jpg"));
        assert_eq!(private[0].tiles[0].alt, "");
        assert_eq!(private[0].tiles[0].fit, TileFit::Cover);
    }

    #[test]
    fn test_tile_keeps_alt_and_action() {
        let reference = ImageRef::new("a.jpg")
            .with_alt("Aerial hoop")
            .with_on_activate("openLightbox(this.src, 0)");
        let rows = pack(&[ImageRecord::fallback(reference)], 2);
        let tile = &render_rows(&rows, RenderOptions::public())[0].tiles[0];

        assert_eq!(tile.alt, "Aerial hoop");
        assert_eq!(tile.on_activate.as_deref(), Some("openLightbox(this.src, 0)"));
        assert_eq!(tile.aspect_ratio, 1.0);
    }

    #[test]
    fn test_hook_fires_after_every_pass() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut renderer = LayoutRenderer::new(VecSurface::default()).with_hook(Box::new(CountingHook {
            calls: Rc::clone(&calls),
        }));

        let rows = pack(&squares(4), 2);
        renderer.reset().unwrap();
        renderer.append_row(&rows[0], RenderOptions::private()).unwrap();
        renderer.append_row(&rows[1], RenderOptions::private()).unwrap();
        renderer.render_full(&rows, RenderOptions::private()).unwrap();

        assert_eq!(*calls.borrow(), vec![(2, true), (4, true), (4, true)]);
    }

    #[test]
    fn test_missing_container_is_skipped() {
        let mut renderer: LayoutRenderer<VecSurface> = LayoutRenderer::detached();
        let rows = pack(&squares(2), 2);

        assert_eq!(
            renderer.render_full(&rows, RenderOptions::public()),
            Err(LayoutSkip::MissingContainer)
        );
        assert_eq!(
            renderer.append_row(&rows[0], RenderOptions::public()),
            Err(LayoutSkip::MissingContainer)
        );
    }

    #[test]
    fn test_empty_rows_leave_surface_untouched() {
        let mut renderer = LayoutRenderer::new(VecSurface::default());
        renderer.render_full(&pack(&squares(2), 2), RenderOptions::public()).unwrap();

        assert_eq!(
            renderer.render_full(&[], RenderOptions::public()),
            Err(LayoutSkip::EmptySourceSet)
        );
        assert_eq!(renderer.surface().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_descriptor_row_height() {
        let records = vec![
            ImageRecord::measured(ImageRef::new("a"), 3, 2),
            ImageRecord::measured(ImageRef::new("b"), 1, 2),
        ];
        let described = render_rows(&pack(&records, 2), RenderOptions::public());
        assert!((described[0].height_for_width(1000.0) - 500.0).abs() < 1e-3);
    }
}
