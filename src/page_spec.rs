use crate::error::{Result, TrimError};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An inclusive range of 1-based page numbers. A single page `7` is `7-7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse one spec item like "7" or "1-4"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrimError::InvalidSpec("empty item".into()));
        }

        if s.contains('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() != 2 {
                return Err(TrimError::InvalidSpec(format!("invalid range '{}'", s)));
            }

            let start = parse_page_number(parts[0], "range start")?;
            let end = parse_page_number(parts[1], "range end")?;

            if end < start {
                return Err(TrimError::InvalidSpec(format!(
                    "invalid range '{}': end < start",
                    s
                )));
            }

            Ok(PageRange { start, end })
        } else {
            let page = parse_page_number(s, "page number")?;
            Ok(PageRange {
                start: page,
                end: page,
            })
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn parse_page_number(s: &str, what: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TrimError::InvalidSpec(format!("empty {}", what)));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrimError::InvalidSpec(format!("invalid {}: '{}'", what, s)));
    }

    let value = s
        .parse::<u32>()
        .map_err(|_| TrimError::InvalidSpec(format!("{} '{}' is too large", what, s)))?;
    if value == 0 {
        return Err(TrimError::InvalidSpec(format!("{} must be >= 1", what)));
    }
    Ok(value)
}

/// A parsed comma-separated page specification such as "1-4,7".
///
/// Parsing only checks syntax; whether the pages exist is decided when the
/// spec is resolved against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    ranges: Vec<PageRange>,
}

impl PageSpec {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrimError::InvalidSpec(
                "page specification cannot be empty".into(),
            ));
        }

        let ranges = s
            .split(',')
            .map(PageRange::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(PageSpec { ranges })
    }

    /// Highest page number the spec refers to
    pub fn max_page(&self) -> u32 {
        self.ranges.iter().map(|r| r.end).max().unwrap_or(0)
    }

    /// Expand into the set of 1-based page numbers, duplicates collapsed
    pub fn pages(&self) -> BTreeSet<u32> {
        self.ranges.iter().flat_map(|r| r.start..=r.end).collect()
    }
}

impl FromStr for PageSpec {
    type Err = TrimError;

    fn from_str(s: &str) -> Result<Self> {
        PageSpec::parse(s)
    }
}

impl fmt::Display for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page() {
        let range = PageRange::parse("7").unwrap();
        assert_eq!(range, PageRange { start: 7, end: 7 });
        assert!(range.is_single());
    }

    #[test]
    fn test_inclusive_range() {
        let range = PageRange::parse("1-4").unwrap();
        assert_eq!(range, PageRange { start: 1, end: 4 });
    }

    #[test]
    fn test_comma_separated() {
        let spec = PageSpec::parse("1-4,7").unwrap();
        assert_eq!(spec.pages().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 7]);
        assert_eq!(spec.max_page(), 7);
    }

    #[test]
    fn test_duplicates_collapse() {
        let spec = PageSpec::parse("1-3, 2 ,3").unwrap();
        assert_eq!(spec.pages().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_display_normalizes() {
        let spec: PageSpec = " 1 - 4 ,7".parse().unwrap();
        assert_eq!(spec.to_string(), "1-4,7");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "   ", "1,,2", "1-", "-2", "abc", "0-3", "5-2", "0", "1-2-3", "+3", "2.5"] {
            assert!(
                matches!(PageSpec::parse(bad), Err(TrimError::InvalidSpec(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(PageSpec::parse("99999999999").is_err());
    }
}
