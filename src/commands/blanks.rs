use crate::classify::{classify, ClassificationVerdict};
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct PageVerdict {
    pub page: u32,
    #[serde(flatten)]
    pub verdict: ClassificationVerdict,
}

/// Classify every page of the PDF at `path`
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Vec<PageVerdict>> {
    let doc = PdfDocument::open(&path)?;
    (0..doc.page_count())
        .map(|index| -> Result<PageVerdict> {
            let content = doc.page_content(index)?;
            Ok(PageVerdict {
                page: index as u32 + 1,
                verdict: classify(&content),
            })
        })
        .collect()
}

pub fn run<P: AsRef<Path>>(path: P, json: bool) -> Result<()> {
    let verdicts = inspect(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
        return Ok(());
    }

    for v in &verdicts {
        println!(
            "p{}: {} ({}) text={} blocks={} substantive={} coverage={:.1}% graphics={}",
            v.page,
            if v.verdict.blank { "blank" } else { "keep" },
            v.verdict.reason,
            v.verdict.text_len,
            v.verdict.block_count,
            v.verdict.substantive_blocks,
            v.verdict.coverage * 100.0,
            v.verdict.graphics_ops,
        );
    }

    let blank = verdicts.iter().filter(|v| v.verdict.blank).count();
    println!("\n{} of {} page(s) blank.", blank, verdicts.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixture::{write_document, FixturePage};

    #[test]
    fn test_inspect_reports_each_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_document(
            &path,
            &[
                FixturePage::text(&["A page with plenty of readable body text on it"]),
                FixturePage::blank(),
            ],
        );

        let verdicts = inspect(&path).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].page, 1);
        assert!(!verdicts[0].verdict.blank);
        assert!(verdicts[1].verdict.blank);
    }
}
