/// State management module
///
/// This module handles all layout state, including:
/// - Shared data structures (data.rs)
/// - The layout session: record set, row size, population lifecycle (session.rs)

pub mod data;
pub mod session;

pub use data::{ImageRecord, ImageRef, Manifest, RenderMode, RenderOptions};
pub use session::{LayoutSession, PopulationTicket, Progress};
