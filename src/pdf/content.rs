//! Content-stream analysis: groups text-showing operators into blocks with an
//! estimated bounding box, so that pages can be judged by their structure as
//! well as by their extracted text.

use lopdf::content::Operation;
use lopdf::Object;

/// Axis-aligned rectangle in PDF user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// US Letter, used when a page carries no usable MediaBox
    pub fn letter() -> Self {
        Rect::new(0.0, 0.0, 612.0, 792.0)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Text shown between one `BT`/`ET` pair
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub text: String,
    pub bbox: Rect,
}

impl ContentBlock {
    /// Number of non-whitespace characters
    pub fn meaningful_len(&self) -> usize {
        meaningful_len(&self.text)
    }
}

/// Everything the blank-page classifier looks at for a single page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageContent {
    pub text: String,
    pub blocks: Vec<ContentBlock>,
    pub media_box: Rect,
    /// Painted paths, images and XObjects
    pub graphics_ops: usize,
}

impl PageContent {
    pub fn area(&self) -> f32 {
        self.media_box.area()
    }
}

pub fn meaningful_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

// Rough glyph width as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Default)]
struct TextState {
    font_size: f32,
    scale: f32,
    leading: f32,
    line_x: f32,
    line_y: f32,
    x: f32,
}

impl TextState {
    fn new() -> Self {
        TextState {
            font_size: 12.0,
            scale: 1.0,
            ..Default::default()
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx;
        self.line_y += ty;
        self.x = self.line_x;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }

    fn size(&self) -> f32 {
        (self.font_size * self.scale).abs()
    }

    /// Advance over `text` and return the area it covers
    fn show(&mut self, text: &str, kerning: f32) -> Rect {
        let size = self.size();
        let start = self.x;
        let advance = text.chars().count() as f32 * size * GLYPH_WIDTH - kerning / 1000.0 * size;
        self.x += advance;
        Rect::new(start, self.line_y, self.x.max(start), self.line_y + size)
    }
}

struct BlockBuilder {
    text: String,
    bbox: Option<Rect>,
}

impl BlockBuilder {
    fn new() -> Self {
        BlockBuilder {
            text: String::new(),
            bbox: None,
        }
    }

    fn push(&mut self, text: &str, area: Rect) {
        self.text.push_str(text);
        self.bbox = Some(match self.bbox {
            Some(bbox) => bbox.union(&area),
            None => area,
        });
    }

    fn finish(self) -> Option<ContentBlock> {
        self.bbox.map(|bbox| ContentBlock {
            text: self.text,
            bbox,
        })
    }
}

/// Walk decoded content-stream operations and collect text blocks plus a
/// count of graphics operations.
pub fn analyze_operations(operations: &[Operation]) -> (Vec<ContentBlock>, usize) {
    let mut blocks = Vec::new();
    let mut graphics_ops = 0;
    let mut state = TextState::new();
    let mut current: Option<BlockBuilder> = None;

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                state.line_x = 0.0;
                state.line_y = 0.0;
                state.x = 0.0;
                current = Some(BlockBuilder::new());
            }
            "ET" => {
                if let Some(block) = current.take().and_then(BlockBuilder::finish) {
                    blocks.push(block);
                }
            }
            "Tf" => {
                if let Some(size) = number(operands, 1) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = number(operands, 0) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = number(operands, 0).unwrap_or(0.0);
                let ty = number(operands, 1).unwrap_or(0.0);
                if op.operator == "TD" {
                    state.leading = -ty;
                }
                state.move_line(tx, ty);
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let d = number(operands, 3).unwrap_or(1.0);
                    state.scale = if d == 0.0 { 1.0 } else { d };
                    state.line_x = number(operands, 4).unwrap_or(0.0);
                    state.line_y = number(operands, 5).unwrap_or(0.0);
                    state.x = state.line_x;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    state.next_line();
                }
                let string_operand = if op.operator == "\"" {
                    operands.get(2)
                } else {
                    operands.first()
                };
                if let (Some(block), Some(Object::String(bytes, _))) =
                    (current.as_mut(), string_operand)
                {
                    let text = decode_pdf_string(bytes);
                    let area = state.show(&text, 0.0);
                    block.push(&text, area);
                }
            }
            "TJ" => {
                if let (Some(block), Some(Object::Array(items))) = (current.as_mut(), operands.first())
                {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                let text = decode_pdf_string(bytes);
                                let area = state.show(&text, 0.0);
                                block.push(&text, area);
                            }
                            Object::Integer(_) | Object::Real(_) => {
                                let adjust = item.as_float().unwrap_or(0.0);
                                // Large negative adjustments are word gaps
                                let gap = if adjust < -200.0 { " " } else { "" };
                                let area = state.show(gap, adjust);
                                block.push(gap, area);
                            }
                            _ => {}
                        }
                    }
                }
            }
            "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" | "Do" | "BI" | "sh" => {
                graphics_ops += 1;
            }
            _ => {}
        }
    }

    // Unterminated text object at end of stream
    if let Some(block) = current.and_then(BlockBuilder::finish) {
        blocks.push(block);
    }

    (blocks, graphics_ops)
}

fn number(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|o| o.as_float().ok())
}

/// Decode a PDF string: UTF-16BE when it carries a BOM, otherwise bytes are
/// taken as Latin-1 / PDFDocEncoding (simplified).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        String::from_utf16_lossy(&u16_chars)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn text(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    #[test]
    fn test_block_per_text_object() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
            op("Td", vec![100.into(), 700.into()]),
            op("Tj", vec![text("Hello")]),
            op("ET", vec![]),
            op("BT", vec![]),
            op("Td", vec![300.into(), 20.into()]),
            op("Tj", vec![text("7")]),
            op("ET", vec![]),
        ];

        let (blocks, graphics) = analyze_operations(&ops);
        assert_eq!(graphics, 0);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Hello");
        assert_eq!(blocks[0].bbox, Rect::new(100.0, 700.0, 125.0, 710.0));
        assert_eq!(blocks[1].text, "7");
        assert_eq!(blocks[1].bbox.x0, 300.0);
    }

    #[test]
    fn test_tj_array_and_gaps() {
        let ops = vec![
            op("BT", vec![]),
            op(
                "TJ",
                vec![Object::Array(vec![text("Chapter"), Object::Integer(-300), text("5")])],
            ),
            op("ET", vec![]),
        ];

        let (blocks, _) = analyze_operations(&ops);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Chapter 5");
        assert_eq!(blocks[0].meaningful_len(), 8);
    }

    #[test]
    fn test_empty_text_object_is_not_a_block() {
        let ops = vec![op("BT", vec![]), op("ET", vec![])];
        let (blocks, _) = analyze_operations(&ops);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_graphics_counted() {
        let ops = vec![
            op("re", vec![0.into(), 0.into(), 10.into(), 10.into()]),
            op("f", vec![]),
            op("Do", vec![Object::Name(b"Im1".to_vec())]),
        ];
        let (blocks, graphics) = analyze_operations(&ops);
        assert!(blocks.is_empty());
        assert_eq!(graphics, 2);
    }

    #[test]
    fn test_decode_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
        assert_eq!(decode_pdf_string(b"Plain"), "Plain");
    }
}
