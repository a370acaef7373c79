/// HTML surface.
///
/// Produces the same markup the gallery pages are styled for: one
/// `grid__row` per row, one `grid__item-container` per tile sized through
/// `flex-basis`, and an `img` that keeps its aspect ratio with `object-fit: cover`.

use std::fmt::Write as _;

use super::{RenderSurface, RowDescriptor, TileDescriptor, TileFit, CONTAINER_ID};

const ROW_CLASS: &str = "grid__row";
const ITEM_CLASS: &str = "grid__item-container js-grid-item-container image-container";
const IMAGE_CLASS: &str = "grid__item-image js-grid__item-image grid__item-image-lazy js-lazy";
const OVERLAY_CLASS: &str = "filename-label filename-overlay";

/// Accumulates rendered rows as markup
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    rows: Vec<String>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows only, without the container element
    pub fn inner_html(&self) -> String {
        self.rows.concat()
    }

    /// The full container element
    pub fn to_html(&self) -> String {
        format!("<div id=\"{}\">{}</div>", CONTAINER_ID, self.inner_html())
    }
}

impl RenderSurface for HtmlSurface {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: RowDescriptor) {
        let mut html = format!("<div class=\"{}\">", ROW_CLASS);
        for tile in &row.tiles {
            write_tile(&mut html, tile);
        }
        html.push_str("</div>");
        self.rows.push(html);
    }
}

fn write_tile(html: &mut String, tile: &TileDescriptor) {
    let fit = match tile.fit {
        TileFit::Cover => "cover",
    };

    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<div class=\"{}\" style=\"flex-basis: {}%;\"><img src=\"{}\" alt=\"{}\" class=\"{}\" style=\"aspect-ratio: {}; height: 100%; object-fit: {};\"",
        ITEM_CLASS,
        tile.flex_share,
        escape(&tile.src),
        escape(&tile.alt),
        IMAGE_CLASS,
        tile.aspect_ratio,
        fit,
    );
    if let Some(action) = &tile.on_activate {
        let _ = write!(html, " onclick=\"{}\"", escape(action));
    }
    html.push('>');

    if let Some(label) = &tile.label {
        let _ = write!(html, "<div class=\"{}\">{}</div>", OVERLAY_CLASS, escape(label));
    }
    html.push_str("</div>");
}

/// Escape text for use in attributes and element content
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
