//! Positioned text fragments from a page's content stream

use std::collections::BTreeMap;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::Result;
use crate::pdf::encoding::{decode_utf16_be, decode_win_ansi};
use crate::pdf::matrix::TransformMatrix;

/// Average glyph advance as a fraction of the font size
const AVG_CHAR_WIDTH: f32 = 0.5;

/// TJ adjustments (thousandths of an em) below this insert a space
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// A run of text shown by one text-showing operator
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    /// X of the text origin in default user space
    pub x: f32,
    /// Baseline Y in default user space (origin bottom-left)
    pub y: f32,
    /// Estimated advance width in user space
    pub width: f32,
    /// Font size scaled to user space
    pub size: f32,
}

impl TextFragment {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Text state carried between operators inside a content stream
struct TextState {
    ctm: TransformMatrix,
    ctm_stack: Vec<TransformMatrix>,
    text_matrix: TransformMatrix,
    line_matrix: TransformMatrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: TransformMatrix::identity(),
            ctm_stack: Vec::new(),
            text_matrix: TransformMatrix::identity(),
            line_matrix: TransformMatrix::identity(),
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = TransformMatrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Emit a fragment at the current position and advance past it
    fn show(&mut self, text: String, advance: f32, out: &mut Vec<TextFragment>) {
        let render = self.text_matrix.then(&self.ctm);
        let (x, y) = render.apply(0.0, 0.0);
        let (end_x, _) = render.apply(advance, 0.0);
        self.text_matrix = TransformMatrix::translation(advance, 0.0).then(&self.text_matrix);

        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        out.push(TextFragment {
            text,
            x,
            y,
            width: (end_x - x).abs(),
            size: self.font_size * render.vertical_scale(),
        });
    }
}

/// Helper to get f32 from Object
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(number).collect()
}

/// Decode a string operand with the current font's encoding, else UTF-16BE or WinAnsi
fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return text;
            }
        }
    }

    decode_utf16_be(bytes).unwrap_or_else(|| decode_win_ansi(bytes))
}

/// Extract every non-blank text fragment of a page, in content-stream order
pub fn page_fragments(doc: &Document, page_id: ObjectId) -> Result<Vec<TextFragment>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    let mut state = TextState::new();
    let mut fragments = Vec::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = TransformMatrix::from_operands(&numbers(&op.operands)) {
                    state.ctm = m.then(&state.ctm);
                }
            }
            "BT" => {
                state.text_matrix = TransformMatrix::identity();
                state.line_matrix = TransformMatrix::identity();
            }
            "Tf" => {
                if let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) {
                    state.font = name.to_vec();
                }
                if let Some(size) = op.operands.get(1).and_then(number) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let &[tx, ty] = numbers(&op.operands).as_slice() {
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = TransformMatrix::from_operands(&numbers(&op.operands)) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    state.next_line();
                }
                if let Some(Object::String(bytes, _)) = op.operands.last() {
                    let text = decode_string(doc, &fonts, &state.font, bytes);
                    let advance = text.chars().count() as f32 * state.font_size * AVG_CHAR_WIDTH;
                    state.show(text, advance, &mut fragments);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let mut text = String::new();
                    let mut advance = 0.0;
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                let part = decode_string(doc, &fonts, &state.font, bytes);
                                advance += part.chars().count() as f32 * state.font_size * AVG_CHAR_WIDTH;
                                text.push_str(&part);
                            }
                            other => {
                                if let Some(adjust) = number(other) {
                                    advance -= adjust / 1000.0 * state.font_size;
                                    if adjust < TJ_SPACE_THRESHOLD {
                                        text.push(' ');
                                    }
                                }
                            }
                        }
                    }
                    state.show(text, advance, &mut fragments);
                }
            }
            _ => {}
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn page_with_content(content: &str) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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

    #[test]
    fn test_positions_follow_td_and_tm() {
        let (doc, page_id) = page_with_content(
            "BT /F1 10 Tf 50 700 Td (Bestelnr.) Tj 0 -14 Td (1001) Tj ET \
             BT /F1 10 Tf 1 0 0 1 200 700 Tm (EAN) Tj ET",
        );
        let fragments = page_fragments(&doc, page_id).unwrap();

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].text, "Bestelnr.");
        assert_eq!((fragments[0].x, fragments[0].y), (50.0, 700.0));
        assert_eq!((fragments[1].x, fragments[1].y), (50.0, 686.0));
        assert_eq!((fragments[2].x, fragments[2].y), (200.0, 700.0));
        assert!((fragments[2].size - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cm_and_graphics_state_stack() {
        let (doc, page_id) = page_with_content(
            "q 2 0 0 2 10 10 cm BT /F1 5 Tf 1 0 0 1 20 30 Tm (scaled) Tj ET Q \
             BT /F1 5 Tf 1 0 0 1 20 30 Tm (plain) Tj ET",
        );
        let fragments = page_fragments(&doc, page_id).unwrap();

        assert_eq!((fragments[0].x, fragments[0].y), (50.0, 70.0));
        assert!((fragments[0].size - 10.0).abs() < f32::EPSILON);
        assert_eq!((fragments[1].x, fragments[1].y), (20.0, 30.0));
    }

    #[test]
    fn test_tj_array_and_next_line_operators() {
        let (doc, page_id) = page_with_content(
            "BT /F1 10 Tf 12 TL 40 500 Td [(Blauwe) -300 (spline)] TJ T* (tweede) Tj (derde) ' ET",
        );
        let fragments = page_fragments(&doc, page_id).unwrap();

        assert_eq!(fragments[0].text, "Blauwe spline");
        assert_eq!(fragments[1].text, "tweede");
        assert_eq!(fragments[1].y, 488.0);
        assert_eq!(fragments[2].y, 476.0);
    }

    #[test]
    fn test_blank_strings_are_dropped() {
        let (doc, page_id) = page_with_content("BT /F1 10 Tf 40 500 Td (   ) Tj (x) Tj ET");
        let fragments = page_fragments(&doc, page_id).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "x");
    }
}
