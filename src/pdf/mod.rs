//! PDF handling: opening and saving documents, text overlays, label composition

pub mod document;
pub mod encoding;
pub mod matrix;
pub mod overlay;
pub mod compose;

// Re-export commonly used items
pub use document::{count_pages, open_document, page_ids, write_document};
pub use overlay::{render_overlay, composite_page, Overlay, OverlayOptions};
pub use compose::{compose, Composition};
