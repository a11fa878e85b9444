//! Detailed documentation for the input format and the generated sheet.
//!
//! This module contains reference documentation about the outline syntax,
//! the configuration file, and the layout of the generated worksheet.

/// # Outline Format
///
/// A markdown file consisting of lines where:
/// - `<heading> ::= { <space> } "#" { "#" } { <space> } <label>`: one `#` per
///   hierarchy level. A heading may go at most one level deeper than the
///   previous one. A heading at the same depth replaces the current label.
/// - `<section> ::= { <space> } "::" <name> [ "&&" ]`: starts a named block of
///   content for the current test item. With `&&`, the block starts with the
///   lines of the same section of the previous test item.
/// - blank lines are ignored, any other line is a content line of the open
///   section (leading and trailing spaces are removed).
///
/// A test item (row) is produced for every heading path that has at least one
/// non-empty section.
///
/// ```text
/// # Login
/// ## Valid credentials
/// ### Happy path
/// :: Precondition
/// user exists
/// :: Steps
/// enter name and password
/// press OK
/// ### Remember me
/// :: Precondition &&
/// :: Steps
/// check "remember me"
/// ```
///
/// ## Directives
///
/// `&include({"name": "<path>", "<key>": "<value>", ...})` on a line of its
/// own is replaced by the file at `<path>` (relative to the outline file),
/// with every `//**<key>**//` in it replaced by `<value>`. Other directive
/// names are ignored.
pub mod outline_format {
    /// Documentation for heading lines
    pub mod heading {
        //! Hierarchy levels of the test items
    }

    /// Documentation for section lines
    pub mod section {
        //! Named content blocks and `&&` carry-forward
    }

    /// Documentation for directives
    pub mod include {
        //! Text inclusion with placeholder substitution
    }
}

/// # Output Layout
///
/// - row 1: `Sheet.Title`, if configured
/// - row 2: `1`, `2`, ... merged above each block of result columns
/// - row 3: header, `No`, the item labels, the section names, the result
///   labels (filled with `Headers.BackColor`, font `Headers.TextColor`)
/// - following rows: one per test item
///
/// The `No` column numbers items hierarchically (`1-1-1`, `1-1-2`, `1-2-1`, ...).
/// `Headers.Rearrange` reorders the column groups `no`, `itemname`, `content`
/// and `results`. `{{name}}` in any cell is replaced by `Consts.name`.
pub mod output_layout {
    /// Documentation for the numbering column
    pub mod numbering {
        //! Hierarchical row numbers
    }

    /// Documentation for result columns
    pub mod results {
        //! Repeated blocks of result-tracking columns
    }
}
