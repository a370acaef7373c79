/// Gallery sources
///
/// This module produces the image references a gallery starts from:
/// - Local folders, the public gallery (local.rs)
/// - Gallery pages and their placeholder markup (page.rs)
/// - The access-gated private gallery backend (remote.rs)

pub mod local;
pub mod page;
pub mod remote;

pub use local::{
    from_placeholders, open_gallery, open_gallery_async, scan_folder, scan_folder_async, Placeholder,
};
pub use page::{load_page, parse_placeholders};
pub use remote::{PrivateAlbum, RemoteGallery};
