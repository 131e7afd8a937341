//! Blank-page heuristic.
//!
//! A page is blank when it has no meaningful text: either no text objects at
//! all, or only a few small fragments such as a running header, a page number
//! or a watermark. The decision only looks at extracted text and content
//! stream structure, never at rendered pixels, so it is deterministic for a
//! given page.

use crate::pdf::content::{meaningful_len, PageContent};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// More non-whitespace characters than this is real content
pub const TEXT_THRESHOLD: usize = 20;
/// Decorative pages carry at most this many text blocks
pub const MAX_DECORATIVE_BLOCKS: usize = 6;
/// Fraction of the page decorative blocks may cover
pub const MAX_DECORATIVE_COVERAGE: f32 = 0.25;

static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(page\s*)?[-–]?\s*\d+\s*[-–]?\s*((of|/)\s*\d+)?\s*$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    SubstantialText,
    NoContentBlocks,
    SubstantialBlock,
    FragmentedText,
    ComplexLayout,
    PageNumberOnly,
    DecorativeOnly,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::SubstantialText => "substantial text",
            Reason::NoContentBlocks => "no content blocks",
            Reason::SubstantialBlock => "substantial text block",
            Reason::FragmentedText => "many short fragments",
            Reason::ComplexLayout => "complex layout",
            Reason::PageNumberOnly => "page number only",
            Reason::DecorativeOnly => "decorative content only",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationVerdict {
    pub blank: bool,
    pub reason: Reason,
    /// Non-whitespace characters of extracted text
    pub text_len: usize,
    pub block_count: usize,
    /// Blocks with more than [`TEXT_THRESHOLD`] characters
    pub substantive_blocks: usize,
    pub page_area: f32,
    /// Summed block area over page area
    pub coverage: f32,
    pub graphics_ops: usize,
}

pub fn is_blank(page: &PageContent) -> bool {
    classify(page).blank
}

pub fn classify(page: &PageContent) -> ClassificationVerdict {
    let text_len = meaningful_len(&page.text);
    let page_area = page.area();
    let block_area: f32 = page.blocks.iter().map(|b| b.bbox.area()).sum();
    let coverage = if page_area > 0.0 {
        (block_area / page_area).min(1.0)
    } else {
        0.0
    };
    let substantive_blocks = page
        .blocks
        .iter()
        .filter(|b| b.meaningful_len() > TEXT_THRESHOLD)
        .count();
    let fragment_len: usize = page.blocks.iter().map(|b| b.meaningful_len()).sum();

    let (blank, reason) = if text_len > TEXT_THRESHOLD {
        (false, Reason::SubstantialText)
    } else if page.blocks.is_empty() {
        (true, Reason::NoContentBlocks)
    } else if substantive_blocks > 0 {
        (false, Reason::SubstantialBlock)
    } else if fragment_len > TEXT_THRESHOLD {
        (false, Reason::FragmentedText)
    } else if page.blocks.len() > MAX_DECORATIVE_BLOCKS || coverage > MAX_DECORATIVE_COVERAGE {
        (false, Reason::ComplexLayout)
    } else if PAGE_NUMBER.is_match(&page.text) && text_len > 0 {
        (true, Reason::PageNumberOnly)
    } else {
        (true, Reason::DecorativeOnly)
    };

    let verdict = ClassificationVerdict {
        blank,
        reason,
        text_len,
        block_count: page.blocks.len(),
        substantive_blocks,
        page_area,
        coverage,
        graphics_ops: page.graphics_ops,
    };

    debug!(
        blank,
        %reason,
        text_len,
        block_count = verdict.block_count,
        substantive_blocks,
        page_area,
        coverage,
        graphics_ops = page.graphics_ops,
        "classified page"
    );

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::content::{ContentBlock, Rect};

    fn page(text: &str, blocks: Vec<ContentBlock>) -> PageContent {
        PageContent {
            text: text.to_string(),
            blocks,
            media_box: Rect::letter(),
            graphics_ops: 0,
        }
    }

    fn block(text: &str, bbox: Rect) -> ContentBlock {
        ContentBlock {
            text: text.to_string(),
            bbox,
        }
    }

    fn small(text: &str) -> ContentBlock {
        block(text, Rect::new(300.0, 30.0, 320.0, 40.0))
    }

    #[test]
    fn test_empty_page_is_blank() {
        let verdict = classify(&page("", vec![]));
        assert!(verdict.blank);
        assert_eq!(verdict.reason, Reason::NoContentBlocks);
    }

    #[test]
    fn test_real_text_is_not_blank() {
        let text = "The quick brown fox jumps"; // 25 characters
        assert_eq!(text.len(), 25);
        let verdict = classify(&page(text, vec![]));
        assert!(!verdict.blank);
        assert_eq!(verdict.reason, Reason::SubstantialText);
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let text = "a b c d e f g h i j k l m n o";
        assert!(is_blank(&page(text, vec![])));
    }

    #[test]
    fn test_page_number_is_blank() {
        let verdict = classify(&page("12", vec![small("12")]));
        assert!(verdict.blank);
        assert_eq!(verdict.reason, Reason::PageNumberOnly);

        let verdict = classify(&page("Page 3 of 10", vec![small("Page 3 of 10")]));
        assert!(verdict.blank);
        assert_eq!(verdict.reason, Reason::PageNumberOnly);
    }

    #[test]
    fn test_short_header_is_decorative() {
        let verdict = classify(&page("DRAFT", vec![small("DRAFT")]));
        assert!(verdict.blank);
        assert_eq!(verdict.reason, Reason::DecorativeOnly);
    }

    #[test]
    fn test_graphics_without_text_is_blank() {
        let mut content = page("", vec![]);
        content.graphics_ops = 4;
        assert!(is_blank(&content));
    }

    #[test]
    fn test_substantive_block() {
        // extracted text came back short but the block itself is long
        let verdict = classify(&page("", vec![small("A heading that is long enough")]));
        assert!(!verdict.blank);
        assert_eq!(verdict.reason, Reason::SubstantialBlock);
    }

    #[test]
    fn test_many_fragments() {
        let blocks = vec![
            small("Alpha"),
            small("Bravo"),
            small("Charlie"),
            small("Delta"),
        ];
        let verdict = classify(&page("", blocks));
        assert!(!verdict.blank);
        assert_eq!(verdict.reason, Reason::FragmentedText);
    }

    #[test]
    fn test_many_blocks_is_complex() {
        let blocks = (0..8).map(|_| small("x")).collect();
        let verdict = classify(&page("xxxxxxxx", blocks));
        assert!(!verdict.blank);
        assert_eq!(verdict.reason, Reason::ComplexLayout);
    }

    #[test]
    fn test_large_block_is_complex() {
        let big = block("BIG", Rect::new(50.0, 200.0, 560.0, 600.0));
        let verdict = classify(&page("BIG", vec![big]));
        assert!(!verdict.blank);
        assert_eq!(verdict.reason, Reason::ComplexLayout);
        assert!(verdict.coverage > MAX_DECORATIVE_COVERAGE);
    }

    #[test]
    fn test_deterministic() {
        let content = page("7", vec![small("7")]);
        assert_eq!(classify(&content), classify(&content));
    }
}
