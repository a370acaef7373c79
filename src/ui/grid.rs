use iced::widget::image::Handle;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{container, image, mouse_area, scrollable, stack, text, Column, Row};
use iced::{ContentFit, Element, Length};
use std::collections::HashMap;

use photo_grid::render::{RenderSurface, RowDescriptor, TileDescriptor};
use photo_grid::state::data::display_name_of;

use crate::Message;

/// Rows rendered into the window
#[derive(Debug, Clone, Default)]
pub struct GridSurface {
    rows: Vec<RowDescriptor>,
}

impl GridSurface {
    pub fn rows(&self) -> &[RowDescriptor] {
        &self.rows
    }
}

impl RenderSurface for GridSurface {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: RowDescriptor) {
        self.rows.push(row);
    }
}

/// Scrollbar thickness and its gap to the rows
const SCROLLBAR_WIDTH: f32 = 8.0;
const SCROLLBAR_SPACING: f32 = 4.0;

/// Width left for the rows once the embedded scrollbar took its share
pub fn content_width(viewport_width: f32) -> f32 {
    (viewport_width - SCROLLBAR_WIDTH - SCROLLBAR_SPACING).max(0.0)
}

/// The scrollable grid for a viewport `viewport_width` pixels wide
pub fn view<'a>(
    rows: &'a [RowDescriptor],
    handles: &'a HashMap<String, Handle>,
    viewport_width: f32,
) -> Element<'a, Message> {
    let width = content_width(viewport_width);
    let grid = Column::with_children(rows.iter().map(|row| view_row(row, handles, width)))
        .width(Length::Fill);

    // Embedded, so the rows get exactly `content_width`
    scrollable(grid)
        .direction(Direction::Vertical(
            Scrollbar::new()
                .width(SCROLLBAR_WIDTH)
                .scroller_width(SCROLLBAR_WIDTH)
                .spacing(SCROLLBAR_SPACING),
        ))
        .height(Length::Fill)
        .into()
}

fn view_row<'a>(
    row: &'a RowDescriptor,
    handles: &'a HashMap<String, Handle>,
    width: f32,
) -> Element<'a, Message> {
    // Shares are proportional to aspect ratio, so one height fits every tile
    let height = row.height_for_width(width);

    Row::with_children(row.tiles.iter().map(|tile| view_tile(tile, handles)))
        .width(Length::Fill)
        .height(Length::Fixed(height))
        .into()
}

fn view_tile<'a>(tile: &'a TileDescriptor, handles: &'a HashMap<String, Handle>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match handles.get(&tile.src) {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        // Probe failed: keep the square slot, show nothing in it
        None => container(text(""))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(container::rounded_box)
            .into(),
    };

    let content: Element<'a, Message> = match &tile.label {
        Some(label) => stack![
            picture,
            container(text(label).size(12))
                .padding(6)
                .style(container::rounded_box),
        ]
        .into(),
        None => picture,
    };

    let content: Element<'a, Message> = match &tile.on_activate {
        Some(action) => mouse_area(content)
            .on_press(Message::TileActivated(label_of(tile), action.clone()))
            .into(),
        None => content,
    };

    container(content)
        .width(Length::FillPortion(portion(tile.flex_share)))
        .height(Length::Fill)
        .into()
}

fn label_of(tile: &TileDescriptor) -> String {
    tile.label
        .clone()
        .unwrap_or_else(|| display_name_of(&tile.src).to_string())
}

/// FillPortion only takes integers; keep two decimals of the share
fn portion(flex_share: f64) -> u16 {
    (flex_share * 100.0).round().clamp(1.0, u16::MAX as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portion_keeps_ratios() {
        assert_eq!(portion(100.0 / 3.0), 3333);
        assert_eq!(portion(50.0), 5000);
        assert_eq!(portion(0.0), 1);
    }

    #[test]
    fn test_content_width_leaves_room_for_scrollbar() {
        assert_eq!(content_width(1160.0), 1148.0);
        assert_eq!(content_width(5.0), 0.0);

        // A row of two squares in the content area is exactly half as tall as wide
        let row = RowDescriptor {
            tiles: vec![square_tile(), square_tile()],
        };
        assert_eq!(row.height_for_width(content_width(1160.0)), 574.0);
    }

    fn square_tile() -> TileDescriptor {
        TileDescriptor {
            src: "a.jpg".to_string(),
            alt: String::new(),
            aspect_ratio: 1.0,
            flex_share: 50.0,
            fit: Default::default(),
            label: None,
            on_activate: None,
        }
    }

    #[test]
    fn test_surface_replaces_rows() {
        let mut surface = GridSurface::default();
        surface.append_row(RowDescriptor::default());
        surface.append_row(RowDescriptor::default());
        surface.clear();
        surface.append_row(RowDescriptor::default());
        assert_eq!(surface.rows().len(), 1);
    }
}
