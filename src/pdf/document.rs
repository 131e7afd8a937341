use crate::error::{Result, TrimError};
use crate::pdf::content::{analyze_operations, meaningful_len, ContentBlock, PageContent, Rect};
use crate::selection::PageIndexSet;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| TrimError::pdf_io(path, e))?;
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    /// Wrap an already loaded document
    #[cfg(test)]
    pub fn from_document<P: AsRef<Path>>(doc: Document, path: P) -> Self {
        PdfDocument {
            doc,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        let page_number = index as u32 + 1;
        self.doc.get_pages().get(&page_number).copied().ok_or_else(|| {
            TrimError::pdf_io(
                &self.path,
                format!("page index {} out of range ({} pages)", index, self.page_count()),
            )
        })
    }

    /// Extracted text of the page at 0-based `index`
    pub fn page_text(&self, index: usize) -> Result<String> {
        let page_id = self.page_id(index)?;
        match self.extracted_text(index) {
            Some(text) => Ok(text),
            None => {
                let (blocks, _) = self.content_blocks(page_id)?;
                Ok(join_blocks(&blocks))
            }
        }
    }

    /// Text, content blocks and geometry of the page at 0-based `index`
    pub fn page_content(&self, index: usize) -> Result<PageContent> {
        let page_id = self.page_id(index)?;
        let (blocks, graphics_ops) = self.content_blocks(page_id)?;
        let text = self
            .extracted_text(index)
            .unwrap_or_else(|| join_blocks(&blocks));

        Ok(PageContent {
            text,
            blocks,
            media_box: self.media_box(page_id),
            graphics_ops,
        })
    }

    /// Font-aware extraction through lopdf. `None` when nothing decodable
    /// came out, in which case callers fall back to the raw text operators.
    fn extracted_text(&self, index: usize) -> Option<String> {
        let page_number = index as u32 + 1;
        match self.doc.extract_text(&[page_number]) {
            Ok(text) if meaningful_len(&text) > 0 => Some(text),
            Ok(_) => None,
            Err(e) => {
                debug!(page = page_number, error = %e, "text extraction failed");
                None
            }
        }
    }

    fn content_blocks(&self, page_id: ObjectId) -> Result<(Vec<ContentBlock>, usize)> {
        let data = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| TrimError::pdf_io(&self.path, e))?;
        let content = Content::decode(&data).map_err(|e| TrimError::pdf_io(&self.path, e))?;
        Ok(analyze_operations(&content.operations))
    }

    /// MediaBox of a page, following the page tree for inherited values
    fn media_box(&self, page_id: ObjectId) -> Rect {
        let mut current = Some(page_id);
        // Bounded walk; malformed page trees can contain cycles
        for _ in 0..32 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Some(rect) = dict.get(b"MediaBox").ok().and_then(|o| self.rect_from(o)) {
                return rect;
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Rect::letter()
    }

    fn rect_from(&self, obj: &Object) -> Option<Rect> {
        let values = self.resolve(obj).as_array().ok()?;
        if values.len() < 4 {
            return None;
        }
        let mut coords = [0.0f32; 4];
        for (slot, value) in coords.iter_mut().zip(values) {
            *slot = self.resolve(value).as_float().ok()?;
        }
        Some(Rect::new(coords[0], coords[1], coords[2], coords[3]))
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Remove the pages at the given 0-based indices.
    ///
    /// Page ids are looked up once before anything is removed and pages go
    /// highest first, so earlier removals never shift later ones.
    pub fn delete_pages(&mut self, indices: &PageIndexSet) {
        if indices.is_empty() {
            return;
        }
        let page_numbers: Vec<u32> = indices.descending().map(|i| i as u32 + 1).collect();
        debug!(pages = ?page_numbers, "deleting pages");
        self.doc.delete_pages(&page_numbers);
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.doc.prune_objects();
        self.doc.compress();
        self.doc
            .save(path)
            .map_err(|e| TrimError::pdf_io(path, e))?;
        Ok(())
    }
}

fn join_blocks(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
