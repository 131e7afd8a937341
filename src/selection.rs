//! Turns a selection intent into the set of page indices to delete.
//!
//! Page numbers coming from users are 1-based; everything in a
//! [`PageIndexSet`] is a 0-based index into the original document.

use crate::error::{Result, TrimError};
use crate::page_spec::PageSpec;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Delete what the intent names
    #[default]
    Delete,
    /// Delete everything except what the intent names
    Keep,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Delete => f.write_str("delete"),
            SelectionMode::Keep => f.write_str("keep"),
        }
    }
}

/// 1-based page cutoffs. `before = 10` names pages 1-9, `after = 10` names
/// pages 11 through the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub before: Option<u32>,
    pub after: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// First page (0-based) on which the search text was found
    BySearch { match_index: usize },
    BySpec(PageSpec),
    ByBounds(Bounds),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionIntent {
    pub selection: Selection,
    pub mode: SelectionMode,
}

impl SelectionIntent {
    pub fn new(selection: Selection, mode: SelectionMode) -> Self {
        SelectionIntent { selection, mode }
    }
}

/// Ordered, duplicate-free set of 0-based page indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndexSet(BTreeSet<usize>);

impl PageIndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Indices from highest to lowest, the order pages are removed in
    pub fn descending(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().rev().copied()
    }

    /// Every index in `[0, page_count)` not in this set
    pub fn complement(&self, page_count: usize) -> Self {
        (0..page_count).filter(|i| !self.0.contains(i)).collect()
    }

    pub fn union(&self, other: &PageIndexSet) -> Self {
        self.0.union(&other.0).copied().collect()
    }

    /// Sorted 1-based page numbers
    pub fn page_numbers(&self) -> Vec<u32> {
        self.0.iter().map(|&i| i as u32 + 1).collect()
    }
}

impl FromIterator<usize> for PageIndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        PageIndexSet(iter.into_iter().collect())
    }
}

/// Compute the pages to delete for `intent` on a document of `page_count`
/// pages.
///
/// Keep mode is the complement of the Delete-mode set. A set covering the
/// whole document is rejected so that trimming never produces an empty PDF.
pub fn resolve_deletion_set(intent: &SelectionIntent, page_count: usize) -> Result<PageIndexSet> {
    if page_count == 0 {
        return Err(TrimError::InvalidSelection("document has no pages".into()));
    }

    let natural = natural_deletion_set(&intent.selection, page_count)?;
    let deletion = match intent.mode {
        SelectionMode::Delete => natural,
        SelectionMode::Keep => natural.complement(page_count),
    };

    if deletion.len() >= page_count {
        return Err(TrimError::InvalidSelection(
            "deletion would remove all pages; refusing to create an empty PDF".into(),
        ));
    }

    debug!(
        mode = %intent.mode,
        page_count,
        indices = ?deletion.iter().collect::<Vec<_>>(),
        "resolved deletion set"
    );

    Ok(deletion)
}

fn natural_deletion_set(selection: &Selection, page_count: usize) -> Result<PageIndexSet> {
    match selection {
        Selection::BySearch { match_index } => {
            if *match_index >= page_count {
                return Err(TrimError::InvalidSelection(format!(
                    "match page {} out of bounds (document has {} pages)",
                    match_index + 1,
                    page_count
                )));
            }
            Ok((*match_index..page_count).collect())
        }
        Selection::BySpec(spec) => {
            let max = spec.max_page() as usize;
            if max > page_count {
                return Err(TrimError::InvalidSelection(format!(
                    "page {} out of bounds (document has {} pages)",
                    max, page_count
                )));
            }
            Ok(spec.pages().into_iter().map(|p| p as usize - 1).collect())
        }
        Selection::ByBounds(bounds) => bounds_deletion_set(bounds, page_count),
    }
}

fn bounds_deletion_set(bounds: &Bounds, page_count: usize) -> Result<PageIndexSet> {
    if bounds.before.is_none() && bounds.after.is_none() {
        return Err(TrimError::InvalidSelection(
            "at least one of before/after is required".into(),
        ));
    }

    let mut indices = PageIndexSet::new();

    if let Some(before) = bounds.before {
        let before = before as usize;
        if before == 0 || before > page_count + 1 {
            return Err(TrimError::InvalidSelection(format!(
                "before page {} out of bounds (document has {} pages)",
                before, page_count
            )));
        }
        // before N => pages 1..N-1 => indices 0..N-2
        indices.0.extend(0..before - 1);
    }

    if let Some(after) = bounds.after {
        let after = after as usize;
        if after == 0 || after > page_count {
            return Err(TrimError::InvalidSelection(format!(
                "after page {} out of bounds (document has {} pages)",
                after, page_count
            )));
        }
        // after N => pages N+1..end => indices N..count-1
        indices.0.extend(after..page_count);
    }

    Ok(indices)
}
