//! Applies a trim request to one document: locate, resolve, delete, strip
//! blank pages, save.

use crate::classify::is_blank;
use crate::config::TrimConfig;
use crate::error::{Result, TrimError};
use crate::files::{ensure_output_dir, output_path, validate_input_file};
use crate::page_spec::PageSpec;
use crate::pdf::text::locate_text;
use crate::pdf::PdfDocument;
use crate::result::{OperationKind, ProcessingResult};
use crate::selection::{
    resolve_deletion_set, Bounds, PageIndexSet, Selection, SelectionIntent, SelectionMode,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What the user asked to cut, before any document has been looked at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Search(String),
    Pages(PageSpec),
    Bounds(Bounds),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimRequest {
    pub target: Target,
    pub mode: SelectionMode,
}

impl TrimRequest {
    pub fn new(target: Target, mode: SelectionMode) -> Self {
        TrimRequest { target, mode }
    }

    pub fn operation(&self) -> OperationKind {
        match self.target {
            Target::Search(_) => OperationKind::Search,
            Target::Pages(_) => OperationKind::Delete,
            Target::Bounds(_) => OperationKind::BeforeAfter,
        }
    }

    fn failure(&self, input: &Path, err: &TrimError) -> ProcessingResult {
        let mut result =
            ProcessingResult::failure(input, self.operation(), self.mode, err.to_string());
        self.describe(&mut result);
        result
    }

    fn describe(&self, result: &mut ProcessingResult) {
        match &self.target {
            Target::Search(_) => {}
            Target::Pages(spec) => result.page_spec = Some(spec.to_string()),
            Target::Bounds(bounds) => result.bounds = Some(*bounds),
        }
    }
}

/// Trim `doc` according to `request` and write the result to `output`.
///
/// Failures never escape: they come back as a result with `success == false`.
/// The document is consumed and closed before this returns.
pub fn trim(
    doc: PdfDocument,
    request: &TrimRequest,
    output: &Path,
    config: &TrimConfig,
) -> ProcessingResult {
    let input = doc.path.clone();
    match try_trim(doc, request, output, config) {
        Ok(result) => result,
        Err(e) => {
            error!(file = %input.display(), error = %e, "failed to trim document");
            request.failure(&input, &e)
        }
    }
}

fn try_trim(
    mut doc: PdfDocument,
    request: &TrimRequest,
    output: &Path,
    config: &TrimConfig,
) -> Result<ProcessingResult> {
    let page_count = doc.page_count();
    if page_count == 0 {
        return Err(TrimError::InvalidSelection("document has no pages".into()));
    }
    let mut match_index = None;

    let selection = match &request.target {
        Target::Search(needle) => {
            match_index = locate_text(&doc, needle)?;
            match_index.map(|index| Selection::BySearch { match_index: index })
        }
        Target::Pages(spec) => Some(Selection::BySpec(spec.clone())),
        Target::Bounds(bounds) => Some(Selection::ByBounds(*bounds)),
    };

    let selected = match selection {
        Some(selection) => {
            resolve_deletion_set(&SelectionIntent::new(selection, request.mode), page_count)?
        }
        None => PageIndexSet::new(),
    };

    // Original index of every page still in the document, in order
    let survivors: Vec<usize> = (0..page_count).filter(|&i| !selected.contains(i)).collect();
    doc.delete_pages(&selected);

    let blanks = if config.strip_blanks {
        find_blank_pages(&doc)
    } else {
        PageIndexSet::new()
    };
    let blanks = if !blanks.is_empty() && blanks.len() >= doc.page_count() {
        warn!(
            file = %doc.path.display(),
            "every remaining page looks blank; skipping blank removal"
        );
        PageIndexSet::new()
    } else {
        blanks
    };
    doc.delete_pages(&blanks);

    let blank_originals: PageIndexSet = blanks.iter().map(|i| survivors[i]).collect();
    let deleted = selected.union(&blank_originals);
    let pages_remaining = doc.page_count();

    doc.save(output)?;

    let mut result = ProcessingResult {
        success: true,
        operation: request.operation(),
        mode: request.mode,
        input_file: doc.path.clone(),
        output_file: Some(output.to_path_buf()),
        message: String::new(),
        pages_deleted: deleted.len(),
        deleted_pages: deleted.page_numbers(),
        blank_pages_removed: blanks.len(),
        pages_remaining,
        kept_pages: None,
        search_found: None,
        match_page: None,
        page_spec: None,
        bounds: None,
    };
    request.describe(&mut result);

    if request.mode == SelectionMode::Keep && !matches!(request.target, Target::Search(_)) {
        result.kept_pages = Some(deleted.complement(page_count).page_numbers());
    }

    let removed = format!(
        "deleted {} page(s), removed {} blank page(s)",
        selected.len(),
        blanks.len()
    );
    result.message = match (&request.target, match_index) {
        (Target::Search(_), Some(index)) => {
            result.search_found = Some(true);
            result.match_page = Some(index as u32 + 1);
            match request.mode {
                SelectionMode::Delete => format!("trimmed at page {}, {}", index + 1, removed),
                SelectionMode::Keep => {
                    format!("kept content from page {}, {}", index + 1, removed)
                }
            }
        }
        (Target::Search(needle), None) => {
            result.search_found = Some(false);
            let not_found = TrimError::SearchNotFound(needle.clone());
            if blanks.is_empty() {
                format!("{}; no changes needed", not_found)
            } else {
                format!(
                    "{}; no trim needed, removed {} blank page(s)",
                    not_found,
                    blanks.len()
                )
            }
        }
        _ => match &result.kept_pages {
            Some(kept) => format!("kept {} page(s), {}", kept.len(), removed),
            None => removed,
        },
    };

    info!(
        file = %result.input_file.display(),
        output = %output.display(),
        deleted = ?result.deleted_pages,
        blank = result.blank_pages_removed,
        "trimmed document"
    );

    Ok(result)
}

/// 0-based indices of the pages the classifier calls blank. Pages whose
/// content can't be read are kept.
fn find_blank_pages(doc: &PdfDocument) -> PageIndexSet {
    (0..doc.page_count())
        .filter(|&index| match doc.page_content(index) {
            Ok(content) => is_blank(&content),
            Err(e) => {
                warn!(page = index + 1, error = %e, "could not read page content; keeping page");
                false
            }
        })
        .collect()
}

fn open_input(input: &Path, config: &TrimConfig) -> Result<(PdfDocument, PathBuf)> {
    validate_input_file(input)?;
    ensure_output_dir(&config.output_dir)?;
    let output = output_path(input, config);
    let doc = PdfDocument::open(input)?;
    Ok((doc, output))
}

/// Validate, open, trim and save a single file
pub fn process_file(input: &Path, request: &TrimRequest, config: &TrimConfig) -> ProcessingResult {
    debug!(file = %input.display(), request = ?request, "processing");
    match open_input(input, config) {
        Ok((doc, output)) => trim(doc, request, &output, config),
        Err(e) => {
            error!(file = %input.display(), error = %e, "failed to open document");
            request.failure(input, &e)
        }
    }
}

/// Process every input in order. A failing file is reported in its result
/// and never stops the rest of the batch.
pub fn process_batch(
    inputs: &[PathBuf],
    request: &TrimRequest,
    config: &TrimConfig,
) -> Vec<ProcessingResult> {
    inputs
        .iter()
        .map(|input| process_file(input, request, config))
        .collect()
}
