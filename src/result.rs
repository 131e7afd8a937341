use crate::selection::{Bounds, SelectionMode};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Search,
    Delete,
    BeforeAfter,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Search => f.write_str("search"),
            OperationKind::Delete => f.write_str("delete"),
            OperationKind::BeforeAfter => f.write_str("before_after"),
        }
    }
}

/// Outcome of processing one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub success: bool,
    pub operation: OperationKind,
    pub mode: SelectionMode,
    pub input_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    pub message: String,
    /// Total pages removed, selection and blank removal together
    pub pages_deleted: usize,
    /// 1-based page numbers of the input document that were removed
    pub deleted_pages: Vec<u32>,
    pub blank_pages_removed: usize,
    pub pages_remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept_pages: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_spec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl ProcessingResult {
    /// A failed result carrying only what the request itself says
    pub fn failure(
        input: &Path,
        operation: OperationKind,
        mode: SelectionMode,
        message: impl Into<String>,
    ) -> Self {
        ProcessingResult {
            success: false,
            operation,
            mode,
            input_file: input.to_path_buf(),
            output_file: None,
            message: message.into(),
            pages_deleted: 0,
            deleted_pages: Vec::new(),
            blank_pages_removed: 0,
            pages_remaining: 0,
            kept_pages: None,
            search_found: None,
            match_page: None,
            page_spec: None,
            bounds: None,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            let output = self
                .output_file
                .as_deref()
                .map(file_name)
                .unwrap_or_default();
            write!(
                f,
                "✓ Processed: {} -> {} ({})",
                file_name(&self.input_file),
                output,
                self.message
            )
        } else {
            write!(
                f,
                "✗ Error processing {}: {}",
                file_name(&self.input_file),
                self.message
            )
        }
    }
}

/// Totals over a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_pages_deleted: usize,
    pub total_blank_pages_removed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ProcessingResult]) -> Self {
        let mut summary = BatchSummary {
            total_files: results.len(),
            ..Default::default()
        };
        for result in results {
            if result.success {
                summary.successful += 1;
                summary.total_pages_deleted += result.pages_deleted;
                summary.total_blank_pages_removed += result.blank_pages_removed;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processing complete: {} successful, {} failed",
            self.successful, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let result = ProcessingResult::failure(
            Path::new("/docs/report.pdf"),
            OperationKind::Delete,
            SelectionMode::Delete,
            "Invalid selection: page 12 out of bounds (document has 10 pages)",
        );
        assert_eq!(
            result.to_string(),
            "✗ Error processing report.pdf: Invalid selection: page 12 out of bounds (document has 10 pages)"
        );
    }

    #[test]
    fn test_summary_counts() {
        let ok = ProcessingResult {
            success: true,
            pages_deleted: 3,
            blank_pages_removed: 1,
            ..ProcessingResult::failure(
                Path::new("a.pdf"),
                OperationKind::Search,
                SelectionMode::Delete,
                "",
            )
        };
        let failed =
            ProcessingResult::failure(Path::new("b.pdf"), OperationKind::Search, SelectionMode::Delete, "boom");

        let summary = BatchSummary::from_results(&[ok, failed]);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_pages_deleted, 3);
        assert_eq!(summary.total_blank_pages_removed, 1);
        assert_eq!(summary.to_string(), "Processing complete: 1 successful, 1 failed");
    }

    #[test]
    fn test_serializes_operation_kind() {
        let result = ProcessingResult::failure(
            Path::new("a.pdf"),
            OperationKind::BeforeAfter,
            SelectionMode::Keep,
            "x",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["operation"], "before_after");
        assert_eq!(json["mode"], "keep");
        assert!(json.get("output_file").is_none());
    }
}
