/// Layout module
///
/// This module turns a set of probed images into rows:
/// - Deciding the display order (ordering.rs)
/// - Cutting rows and computing width shares (packer.rs)

pub mod ordering;
pub mod packer;

pub use ordering::{compare_filenames, OrderingPolicy};
pub use packer::{pack, PackedTile, Row};
