//! In-memory documents for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub struct FixturePage {
    lines: Vec<String>,
    footer: Option<String>,
    graphic: bool,
    raw: Option<Vec<u8>>,
}

impl FixturePage {
    /// A page with one text line per entry
    pub fn text(lines: &[&str]) -> Self {
        FixturePage {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            footer: None,
            graphic: false,
            raw: None,
        }
    }

    /// A page with no content at all
    pub fn blank() -> Self {
        FixturePage::text(&[])
    }

    /// Only a small page number in the bottom margin
    pub fn page_number(number: u32) -> Self {
        FixturePage {
            footer: Some(number.to_string()),
            ..FixturePage::blank()
        }
    }

    /// A filled rectangle and nothing else
    pub fn graphic() -> Self {
        FixturePage {
            graphic: true,
            ..FixturePage::blank()
        }
    }

    /// A content stream that does not parse: lopdf rejects filtered
    /// inline images
    pub fn unreadable() -> Self {
        FixturePage {
            raw: Some(b"BI /W 1 /H 1 /BPC 8 /CS /G /F /AHx ID 00> EI".to_vec()),
            ..FixturePage::blank()
        }
    }

    fn content_bytes(&self) -> Vec<u8> {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.content().encode().unwrap(),
        }
    }

    fn content(&self) -> Content {
        let mut operations = Vec::new();

        for (i, line) in self.lines.iter().enumerate() {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), (700 - 20 * i as i64).into()]),
                Operation::new("Tj", vec![Object::string_literal(line.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }

        if let Some(footer) = &self.footer {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 9.into()]),
                Operation::new("Td", vec![300.into(), 30.into()]),
                Operation::new("Tj", vec![Object::string_literal(footer.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }

        if self.graphic {
            operations.extend([
                Operation::new("re", vec![100.into(), 100.into(), 400.into(), 600.into()]),
                Operation::new("f", vec![]),
            ]);
        }

        Content { operations }
    }
}

pub fn build_document(pages: &[FixturePage]) -> Document {
    let mut doc = Document::with_version("1.7");
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

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page.content_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Build a document and write it to `path`
pub fn write_document(path: &std::path::Path, pages: &[FixturePage]) {
    let mut doc = build_document(pages);
    doc.save(path).unwrap();
}
