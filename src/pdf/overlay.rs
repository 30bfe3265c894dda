//! Text overlays composited onto existing PDF pages
//!
//! An overlay is a Form XObject with a transparent background whose content
//! draws a block of text lines. It is stamped onto a page by appending a small
//! content stream that invokes the XObject. The page's original content is
//! first wrapped in `q`/`Q` so any transformation it leaves behind does not
//! move the overlay.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use crate::error::Result;
use crate::layout::{text_block_origins, PageDimensions};
use super::encoding::encode_win_ansi;

/// Resource name of the overlay XObject on each page
const XOBJECT_NAME: &str = "OrderSummary";

/// Resource name of the font inside the overlay XObject
const FONT_RESOURCE: &str = "F1";

/// Options for rendering the text overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    /// Standard PDF font used for the text (one of the 14 base fonts)
    pub font: String,
    /// Font size in points
    pub font_size: f32,
    /// Distance between baselines; defaults to 1.2 × font size
    pub leading: Option<f32>,
    /// X position of the first baseline, from the page's left edge
    pub anchor_x: f32,
    /// Y position of the first baseline, from the page's bottom edge
    pub anchor_y: f32,
    /// Size of the transparent canvas the text is drawn on
    pub canvas: PageDimensions,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            font_size: 6.0,
            leading: None,
            anchor_x: 5.0,
            anchor_y: 150.0,
            canvas: PageDimensions::a1(),
        }
    }
}

impl OverlayOptions {
    /// Effective distance between baselines
    pub fn line_height(&self) -> f32 {
        self.leading.unwrap_or(self.font_size * 1.2)
    }
}

/// A rendered overlay, ready to be composited onto any number of pages
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Uncompressed content stream drawing the text
    pub content: Vec<u8>,
    /// Form bounding box in points
    pub bbox: [i64; 4],
    /// Number of text lines drawn
    pub line_count: usize,
}

/// Render `lines` as a left-aligned block starting at the configured anchor
pub fn render_overlay<S: AsRef<str>>(lines: &[S], options: &OverlayOptions) -> Result<Overlay> {
    let origins = text_block_origins(
        options.anchor_x,
        options.anchor_y,
        options.line_height(),
        lines.len(),
    );

    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("g", vec![0.into()]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), Object::Real(options.font_size)],
        ),
    ];

    for (line, (x, y)) in lines.iter().zip(origins) {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }
        operations.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), Object::Real(x), Object::Real(y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
    }

    operations.push(Operation::new("ET", vec![]));
    operations.push(Operation::new("Q", vec![]));

    let content = Content { operations }.encode()?;

    Ok(Overlay {
        content,
        bbox: options.canvas.bbox_pt(),
        line_count: lines.len(),
    })
}

/// Add one of the standard Type1 fonts with WinAnsiEncoding to the document
pub fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

    doc.add_object(Object::Dictionary(font))
}

/// Stamp `overlay` onto the page `page_id`, drawing over its existing content
///
/// `font_id` must reference a font added with [`add_standard_font`].
pub fn composite_page(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: &Overlay,
    font_id: ObjectId,
) -> Result<()> {
    isolate_page_content(doc, page_id)?;

    let xobject_id = create_form_xobject(doc, overlay, font_id);
    add_xobject_to_page_resources(doc, page_id, xobject_id)?;

    let invoke_content = format!("q\n/{} Do\nQ\n", XOBJECT_NAME);
    let content_stream_id = doc.add_object(Stream::new(
        Dictionary::new(),
        invoke_content.into_bytes(),
    ));

    append_content_to_page(doc, page_id, content_stream_id)
}

/// Wrap the page's content streams in q/Q to isolate transformations
///
/// The streams are decoded and replaced by a single uncompressed stream.
fn isolate_page_content(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let existing = doc.get_page_content(page_id)?;
    if existing.is_empty() {
        return Ok(());
    }

    let mut wrapped = Vec::with_capacity(existing.len() + 6);
    wrapped.extend_from_slice(b"q\n");
    wrapped.extend_from_slice(&existing);
    wrapped.extend_from_slice(b"\nQ\n");

    let wrapped_stream_id = doc.add_object(Stream::new(Dictionary::new(), wrapped));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Contents", Object::Reference(wrapped_stream_id));

    Ok(())
}

/// Create the Form XObject holding the overlay text
fn create_form_xobject(doc: &mut Document, overlay: &Overlay, font_id: ObjectId) -> ObjectId {
    let mut fonts = Dictionary::new();
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(overlay.bbox.iter().map(|&v| Object::Integer(v)).collect()),
    );
    xobject_dict.set(
        "Matrix",
        Object::Array(vec![
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );
    xobject_dict.set("Resources", Object::Dictionary(resources));

    doc.add_object(Object::Stream(Stream::new(xobject_dict, overlay.content.clone())))
}

/// Add the overlay XObject reference to the page's Resources dictionary
fn add_xobject_to_page_resources(doc: &mut Document, page_id: ObjectId, xobject_id: ObjectId) -> Result<()> {
    // Resources may be a reference; resolve it so the page gets its own copy
    let mut resources = {
        let page_dict = doc.get_object(page_id)?.as_dict()?;
        match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(res_id)) => match doc.get_object(*res_id) {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                _ => Dictionary::new(),
            },
            _ => Dictionary::new(),
        }
    };

    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(xo)) => xo.clone(),
        Ok(Object::Reference(xo_id)) => match doc.get_object(*xo_id) {
            Ok(Object::Dictionary(xo)) => xo.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };
    xobjects.set(XOBJECT_NAME, Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(())
}

/// Append a content stream to a page's Contents so it draws on top
fn append_content_to_page(doc: &mut Document, page_id: ObjectId, new_content_id: ObjectId) -> Result<()> {
    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let existing_content = page_dict.get(b"Contents").ok().cloned();

    match existing_content {
        Some(Object::Reference(content_id)) => {
            page_dict.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(content_id),
                    Object::Reference(new_content_id),
                ]),
            );
        }
        Some(Object::Array(mut content_array)) => {
            content_array.push(Object::Reference(new_content_id));
            page_dict.set("Contents", Object::Array(content_array));
        }
        _ => {
            page_dict.set("Contents", Object::Array(vec![Object::Reference(new_content_id)]));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn single_page_doc(content: &[u8]) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 298.into(), 420.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    fn number(obj: &Object) -> f32 {
        match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("not a number: {:?}", other),
        }
    }

    fn text_origins(overlay: &Overlay) -> Vec<(f32, f32)> {
        Content::decode(&overlay.content)
            .unwrap()
            .operations
            .iter()
            .filter(|op| op.operator == "Tm")
            .map(|op| (number(&op.operands[4]), number(&op.operands[5])))
            .collect()
    }

    #[test]
    fn test_render_overlay_draws_each_line() {
        let options = OverlayOptions::default();
        let overlay = render_overlay(&["RefA", "Aantal: 2"], &options).unwrap();
        let content = String::from_utf8_lossy(&overlay.content);

        assert_eq!(overlay.line_count, 2);
        assert!(content.contains("/F1 "));
        assert!(content.contains("(RefA) Tj"));
        assert!(content.contains("(Aantal: 2) Tj"));
        assert_eq!(overlay.bbox, PageDimensions::a1().bbox_pt());

        let origins = text_origins(&overlay);
        assert_eq!(origins.len(), 2);
        assert!((origins[0].1 - 150.0).abs() < 0.01);
        assert!((origins[1].1 - 142.8).abs() < 0.01);
    }

    #[test]
    fn test_render_overlay_skips_empty_lines_but_keeps_spacing() {
        let options = OverlayOptions { leading: Some(10.0), ..OverlayOptions::default() };
        let overlay = render_overlay(&["first", "", "third"], &options).unwrap();
        let content = String::from_utf8_lossy(&overlay.content);

        assert_eq!(content.matches(" Tj").count(), 2);
        let origins = text_origins(&overlay);
        // third line sits two leadings below the anchor
        assert!((origins[1].1 - 130.0).abs() < 0.01);
    }

    #[test]
    fn test_composite_page_wraps_and_appends() {
        let (mut doc, page_id) = single_page_doc(b"1 0 0 -1 0 420 cm\n0 0 10 10 re f");
        let font_id = add_standard_font(&mut doc, "Helvetica");
        let overlay = render_overlay(&["RefA"], &OverlayOptions::default()).unwrap();

        composite_page(&mut doc, page_id, &overlay, font_id).unwrap();

        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 2);

        let content = doc.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.starts_with("q\n1 0 0 -1 0 420 cm"));
        assert!(content.contains("Q\n"));
        assert!(content.ends_with("/OrderSummary Do\nQ\n"));

        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert!(xobjects.get(b"OrderSummary").is_ok());
    }
}
