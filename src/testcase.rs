use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while turning an outline into a test table.
#[derive(Error, Debug)]
pub enum TestSheetError {
    /// A heading descends more than one level below the current one.
    #[error("Malformed outline at line {line}: heading depth {depth} follows depth {level}")]
    MalformedOutline { line: usize, level: usize, depth: usize },

    /// A record carries more hierarchy levels than there are item labels.
    #[error("Schema mismatch in record {row}: {depth} item levels but only {labels} item labels")]
    SchemaMismatch { row: usize, depth: usize, labels: usize },

    /// An include directive references a file that cannot be read.
    #[error("Included resource \"{name}\" could not be read")]
    ResourceNotFound {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A directive line whose arguments cannot be understood.
    #[error("Invalid directive at line {line}: {message}")]
    InvalidDirective { line: usize, message: String },

    /// A rearrangement tag outside `no`, `itemname`, `content`, `results`.
    #[error("Unknown column group: \"{0}\"")]
    UnknownColumnGroup(String),

    /// Externally supplied rows whose header does not show the column groups.
    #[error("Header mismatch: {0}")]
    HeaderMismatch(String),

    /// A rearrangement order that is not a permutation of the four groups.
    #[error("Invalid column order: {0}")]
    InvalidColumnOrder(String),
}

/// A single table cell, either one string or several lines of text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Cell {
    Text(String),
    Lines(Vec<String>),
}

impl Cell {
    /// Returns an empty text cell.
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    /// Joins the cell content with the given separator.
    pub fn join(&self, sep: &str) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Lines(lines) => lines.join(sep),
        }
    }

    /// Checks whether the rendered cell spans more than one line.
    pub fn is_multiline(&self) -> bool {
        match self {
            Cell::Text(s) => s.contains('\n'),
            Cell::Lines(lines) => lines.len() > 1 || lines.iter().any(|l| l.contains('\n')),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("\n"))
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Vec<String>> for Cell {
    fn from(lines: Vec<String>) -> Self {
        Cell::Lines(lines)
    }
}

/// One leaf test item of the outline.
///
/// `items` holds one label per hierarchy level; `sections` maps each section
/// name to its content lines in the order the sections were written.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct TestRecord {
    /// Item labels from the top level down to the leaf.
    pub items: Vec<String>,
    /// Named content blocks, keyed by section name.
    pub sections: IndexMap<String, Vec<String>>,
}

impl TestRecord {
    /// Creates a new `TestRecord`.
    ///
    /// # Arguments
    ///
    /// * `items` - The item labels, one per level.
    /// * `sections` - The named content blocks of the record.
    pub fn new(items: Vec<String>, sections: IndexMap<String, Vec<String>>) -> Self {
        TestRecord { items, sections }
    }

    /// Adds a section to the record, replacing any section with the same name
    /// but keeping its original position.
    pub fn add_section(&mut self, name: &str, lines: Vec<String>) {
        self.sections.insert(name.to_string(), lines);
    }

    /// The number of hierarchy levels of the record.
    pub fn depth(&self) -> usize {
        self.items.len()
    }
}
