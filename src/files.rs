use crate::config::TrimConfig;
use crate::error::{Result, TrimError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// PDF files directly inside `dir`, sorted, skipping earlier outputs
pub fn find_pdf_files<P: AsRef<Path>>(dir: P, processed_suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut found = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            TrimError::InvalidInput(format!("Failed to scan {}: {}", dir.display(), e))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_pdf(path) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !processed_suffix.is_empty() && name.ends_with(processed_suffix) {
            skipped += 1;
            continue;
        }
        found.push(path.to_path_buf());
    }

    debug!(
        dir = %dir.display(),
        found = found.len(),
        skipped,
        "scanned for PDF files"
    );
    Ok(found)
}

/// Check that `path` is an existing, readable PDF file
pub fn validate_input_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| TrimError::InvalidInput(format!("File not found: {}", path.display())))?;

    if !metadata.is_file() {
        return Err(TrimError::InvalidInput(format!(
            "Path is not a file: {}",
            path.display()
        )));
    }
    if !is_pdf(path) {
        return Err(TrimError::InvalidInput(format!(
            "File is not a PDF: {}",
            path.display()
        )));
    }
    Ok(())
}

/// `<output_dir>/<stem><suffix>.pdf`
pub fn output_path(input: &Path, config: &TrimConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("pdf");
    config
        .output_dir
        .join(format!("{}{}.{}", stem, config.output_suffix, ext))
}

/// Create the output directory if it doesn't exist
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        TrimError::InvalidInput(format!(
            "Cannot create output directory {}: {}",
            dir.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_path() {
        let config = TrimConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(
            output_path(Path::new("dir/report.pdf"), &config),
            PathBuf::from("out/report_edit.pdf")
        );
    }

    #[test]
    fn test_find_pdf_files_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "a_edit.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = find_pdf_files(dir.path(), "_edit.pdf").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        let txt = dir.path().join("doc.txt");
        fs::write(&pdf, b"").unwrap();
        fs::write(&txt, b"").unwrap();

        assert!(validate_input_file(&pdf).is_ok());
        assert!(matches!(validate_input_file(&txt), Err(TrimError::InvalidInput(_))));
        assert!(matches!(
            validate_input_file(&dir.path().join("missing.pdf")),
            Err(TrimError::InvalidInput(_))
        ));
        assert!(matches!(validate_input_file(dir.path()), Err(TrimError::InvalidInput(_))));
    }
}
