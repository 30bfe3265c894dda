//! Opening, counting and saving PDF documents

use std::path::Path;
use lopdf::{Document, ObjectId};
use tracing::debug;
use crate::error::{Error, Result};

/// Load a PDF from disk, mapping every failure to an open error for `path`
///
/// Documents without pages are rejected with [`Error::EmptyPdf`].
pub fn open_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path).map_err(|source| Error::DocumentOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    debug!("Opened {} ({} pages)", path.display(), page_count);
    Ok(doc)
}

/// Page object IDs in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    // get_pages() is keyed by 1-based page number, so values come out in order
    doc.get_pages().into_values().collect()
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    let doc = open_document(path)?;
    Ok(doc.get_pages().len())
}

/// Serialize `doc` completely in memory, then write it to `path` in one go
///
/// Nothing is written when serialization fails.
pub fn write_document(doc: &mut Document, path: &Path) -> Result<usize> {
    let mut buffer: Vec<u8> = Vec::new();
    doc.save_to(&mut buffer).map_err(|source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, &buffer).map_err(|source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} bytes to {}", buffer.len(), path.display());
    Ok(buffer.len())
}
