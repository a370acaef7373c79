/// Desktop presentation layer
///
/// This module materializes layout output as iced widgets:
/// - The grid surface and its widget tree (grid.rs)

pub mod grid;

pub use grid::GridSurface;
