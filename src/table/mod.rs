//! Tabular form of a test outline.
//!
//! A [`Table`] is a header row followed by data rows of equal width. Its
//! columns are divided into four contiguous groups (see [`ColumnGroup`]); the
//! table tracks the width of each group so later stages can move whole groups
//! without searching the header again.

pub mod augment;
pub mod normalize;
pub mod rearrange;

use crate::testcase::{Cell, TestSheetError};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

pub use augment::augment;
pub use normalize::normalize;
pub use rearrange::{parse_order, rearrange};

/// The header text of the numbering column.
pub const NUMBER_HEADER: &str = "No";

/// A semantic block of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnGroup {
    /// The hierarchical number column.
    No,
    /// One column per item label.
    ItemName,
    /// One column per section name.
    Content,
    /// Result-tracking columns appended by [`augment`].
    Results,
}

impl ColumnGroup {
    /// All groups in the order the normalizer produces them.
    pub const ALL: [ColumnGroup; 4] = [
        ColumnGroup::No,
        ColumnGroup::ItemName,
        ColumnGroup::Content,
        ColumnGroup::Results,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ColumnGroup::No => "no",
            ColumnGroup::ItemName => "itemname",
            ColumnGroup::Content => "content",
            ColumnGroup::Results => "results",
        }
    }
}

impl fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ColumnGroup {
    type Err = TestSheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnGroup::ALL
            .into_iter()
            .find(|g| g.tag() == s)
            .ok_or_else(|| TestSheetError::UnknownColumnGroup(s.to_string()))
    }
}

/// The width of one column group, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub group: ColumnGroup,
    pub width: usize,
}

impl ColumnSpan {
    pub fn new(group: ColumnGroup, width: usize) -> Self {
        ColumnSpan { group, width }
    }
}

/// A rectangular table whose first row is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub(crate) rows: Vec<Vec<Cell>>,
    pub(crate) spans: Vec<ColumnSpan>,
    /// Width of one repeated block of result labels, 0 without results.
    pub(crate) result_block: usize,
}

impl Table {
    /// Creates a table from rows and explicit group widths.
    ///
    /// The caller guarantees that every row is as wide as the sum of the span
    /// widths.
    pub(crate) fn with_spans(rows: Vec<Vec<Cell>>, spans: Vec<ColumnSpan>, result_block: usize) -> Self {
        Table {
            rows,
            spans,
            result_block,
        }
    }

    /// Builds a table from externally supplied rows, locating the column
    /// groups by looking their labels up in the header row.
    ///
    /// `No` must be the first column and the item labels must follow it. The
    /// result block starts at the first `result_labels` header and spans
    /// `result_labels.len() * print_count` columns; everything between the
    /// item names and the results is content.
    ///
    /// # Errors
    ///
    /// `HeaderMismatch` if the header row does not have that layout, or if
    /// the rows are not all the same width.
    pub fn from_rows(
        rows: Vec<Vec<Cell>>,
        item_labels: &[String],
        result_labels: &[String],
        print_count: usize,
    ) -> Result<Self, TestSheetError> {
        let header: Vec<String> = rows
            .first()
            .map(|r| r.iter().map(|c| c.join("\n")).collect())
            .unwrap_or_default();
        let width = header.len();
        let position = |label: &str| header.iter().position(|h| h == label);

        if position(NUMBER_HEADER) != Some(0) {
            return Err(TestSheetError::HeaderMismatch(format!(
                "\"{}\" must be the first column",
                NUMBER_HEADER
            )));
        }
        if let Some(first) = item_labels.first() {
            if position(first.as_str()) != Some(1) {
                return Err(TestSheetError::HeaderMismatch(format!(
                    "item label \"{}\" must follow \"{}\"",
                    first, NUMBER_HEADER
                )));
            }
        }

        let content_start = 1 + item_labels.len();
        let result_width = result_labels.len() * print_count;
        let result_start = match result_labels.first() {
            Some(first) if result_width > 0 => position(first.as_str()).ok_or_else(|| {
                TestSheetError::HeaderMismatch(format!("result label \"{}\" not found", first))
            })?,
            _ => width,
        };
        if result_start < content_start || result_start + result_width != width {
            return Err(TestSheetError::HeaderMismatch(format!(
                "{} result columns at column {} do not end the {} column header",
                result_width, result_start, width
            )));
        }
        if let Some(i) = rows.iter().position(|r| r.len() != width) {
            return Err(TestSheetError::HeaderMismatch(format!(
                "row {} has {} columns, header has {}",
                i,
                rows[i].len(),
                width
            )));
        }

        let spans = vec![
            ColumnSpan::new(ColumnGroup::No, 1),
            ColumnSpan::new(ColumnGroup::ItemName, item_labels.len()),
            ColumnSpan::new(ColumnGroup::Content, result_start - content_start),
            ColumnSpan::new(ColumnGroup::Results, result_width),
        ];
        let result_block = if result_width > 0 { result_labels.len() } else { 0 };
        Ok(Table::with_spans(rows, spans, result_block))
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of columns of every row.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.width).sum()
    }

    /// Width of one block of result labels; 0 when the table has no results.
    pub fn result_block_width(&self) -> usize {
        self.result_block
    }

    /// Column range of `group` in the current column order.
    pub fn range(&self, group: ColumnGroup) -> Range<usize> {
        let mut start = 0;
        for span in &self.spans {
            if span.group == group {
                return start..start + span.width;
            }
            start += span.width;
        }
        start..start
    }

    /// The rows with every cell joined into a single string.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|c| c.join("\n")).collect())
            .collect()
    }
}
