//! Fixture PDFs generated on the fly

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Column labels of the bol.com order overview with their x positions
pub const COLUMNS: [(&str, i64); 6] = [
    ("Bestelnr.", 30),
    ("EAN", 100),
    ("Klantnaam", 200),
    ("Referentie", 300),
    ("Product", 400),
    ("Aant.", 540),
];

const FONT_SIZE: i64 = 8;
const ROW_HEIGHT: i64 = 12;

fn cell(text: &str, x: i64, y: i64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Save a document whose pages are given as content operations
fn save_pages(path: &Path, pages: Vec<Vec<Operation>>, media_box: [i64; 4]) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => media_box.iter().map(|v| (*v).into()).collect::<Vec<Object>>(),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

/// Orders overview: every page repeats the header, then its rows
///
/// Empty strings leave the cell out entirely, as the exporter does.
pub fn create_orders_pdf(path: &Path, pages: &[Vec<[&str; 6]>]) -> Result<(), Box<dyn std::error::Error>> {
    create_orders_pdf_with_columns(path, &COLUMNS, pages)
}

pub fn create_orders_pdf_with_columns(
    path: &Path,
    columns: &[(&str, i64)],
    pages: &[Vec<[&str; 6]>],
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = pages
        .iter()
        .enumerate()
        .map(|(index, rows)| {
            let mut operations = cell("Bestellingen", 30, 800);
            let mut y = 760;
            for (name, x) in columns {
                operations.extend(cell(name, *x, y));
            }
            for row in rows {
                y -= ROW_HEIGHT;
                for (value, (_, x)) in row.iter().zip(columns) {
                    if !value.is_empty() {
                        operations.extend(cell(value, *x, y));
                    }
                }
            }
            operations.extend(cell(&format!("Pagina {} van {}", index + 1, pages.len()), 280, 30));
            operations
        })
        .collect();

    save_pages(path, contents, [0, 0, 595, 842])
}

/// A PDF with free text only
pub fn create_text_pdf(path: &Path, lines: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let operations = lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| cell(line, 50, 780 - 14 * index as i64))
        .collect();
    save_pages(path, vec![operations], [0, 0, 595, 842])
}

/// A6 shipping labels, one per page, numbered from 1
pub fn create_labels_pdf(path: &Path, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let pages = (1..=count)
        .map(|n| {
            let mut operations = vec![Operation::new("q", vec![]), Operation::new("cm", vec![
                1.into(), 0.into(), 0.into(), 1.into(), 10.into(), 10.into(),
            ])];
            operations.extend(cell(&format!("Label {}", n), 20, 380));
            operations.push(Operation::new("re", vec![0.into(), 0.into(), 270.into(), 390.into()]));
            operations.push(Operation::new("S", vec![]));
            operations.push(Operation::new("Q", vec![]));
            operations
        })
        .collect();
    save_pages(path, pages, [0, 0, 298, 420])
}

/// Decoded content of the overlay stamped onto `page_id`
pub fn overlay_content(doc: &Document, page_id: ObjectId) -> String {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = match page.get(b"Resources").unwrap() {
        Object::Reference(id) => doc.get_object(*id).unwrap().as_dict().unwrap(),
        other => other.as_dict().unwrap(),
    };
    let xobjects = match resources.get(b"XObject").unwrap() {
        Object::Reference(id) => doc.get_object(*id).unwrap().as_dict().unwrap(),
        other => other.as_dict().unwrap(),
    };
    let form_id = xobjects.get(b"OrderSummary").unwrap().as_reference().unwrap();
    let stream = doc.get_object(form_id).unwrap().as_stream().unwrap();
    let bytes = stream.decompressed_content().unwrap_or_else(|_| stream.content.clone());
    String::from_utf8_lossy(&bytes).into_owned()
}
