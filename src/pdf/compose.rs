//! Label composition: one order summary stamped onto each label page

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;
use crate::error::Result;
use super::document::page_ids;
use super::overlay::{add_standard_font, composite_page, render_overlay, OverlayOptions};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// The composed output together with the counts it was built from
#[derive(Debug)]
pub struct Composition {
    /// Output document, only holding the annotated pages
    pub document: Document,
    /// Pages in the output
    pub pages_written: usize,
    /// Pages in the labels document
    pub label_pages: usize,
    /// Summaries offered for composition
    pub summaries: usize,
}

impl Composition {
    /// Whether some label pages or some summaries were left unused
    pub fn is_count_mismatch(&self) -> bool {
        self.label_pages != self.summaries
    }
}

/// Stamp `texts[i]` onto label page `i` for every index both sequences share
///
/// Each text is split on `\n` into lines. Label pages without a text and
/// texts without a label page are dropped; the caller decides how to report
/// [`Composition::is_count_mismatch`].
pub fn compose<S: AsRef<str>>(
    mut labels: Document,
    texts: &[S],
    options: &OverlayOptions,
) -> Result<Composition> {
    let label_page_ids = page_ids(&labels);
    let label_pages = label_page_ids.len();
    let kept = label_pages.min(texts.len());
    let kept_ids: Vec<ObjectId> = label_page_ids.into_iter().take(kept).collect();

    // Pages leave their current tree below, so pull inherited values down first
    for &page_id in &kept_ids {
        flatten_inherited_attributes(&mut labels, page_id)?;
    }

    let font_id = add_standard_font(&mut labels, &options.font);

    for (index, (&page_id, text)) in kept_ids.iter().zip(texts).enumerate() {
        let lines: Vec<&str> = text.as_ref().split('\n').collect();
        let overlay = render_overlay(&lines, options)?;
        composite_page(&mut labels, page_id, &overlay, font_id)?;
        debug!("Stamped {} lines onto label page {}", overlay.line_count, index + 1);
    }

    rebuild_page_tree(&mut labels, &kept_ids);

    let pruned = labels.prune_objects();
    debug!("Pruned {} unreachable objects", pruned.len());
    labels.compress();

    Ok(Composition {
        document: labels,
        pages_written: kept,
        label_pages,
        summaries: texts.len(),
    })
}

/// Copy attributes the page inherits from its ancestors onto the page itself
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    for key in INHERITABLE_KEYS {
        let page_dict = doc.get_object(page_id)?.as_dict()?;
        if page_dict.has(key) {
            continue;
        }

        let mut parent = page_dict.get(b"Parent").and_then(Object::as_reference).ok();
        while let Some(parent_id) = parent {
            let Ok(parent_dict) = doc.get_object(parent_id).and_then(Object::as_dict) else {
                break;
            };
            if let Ok(value) = parent_dict.get(key) {
                inherited.push((key, value.clone()));
                break;
            }
            parent = parent_dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in inherited {
        page_dict.set(key.to_vec(), value);
    }

    Ok(())
}

/// Replace the page tree and catalog with a flat tree holding `page_ids`
fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) {
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
}
