use crate::testcase::{TestRecord, TestSheetError};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref HEADING_REGEXP: Regex = Regex::new(r"^\s*(?P<marks>#+)\s*(?P<label>.*)$").unwrap();
    static ref SECTION_REGEXP: Regex =
        Regex::new(r"^\s*::\s*(?P<name>.*?)\s*(?P<carry>&&)?$").unwrap();
}

/// The state of a single pass over an outline.
///
/// Feed lines one at a time to [`ParserState::step`]; each call may close a
/// test record. Call [`ParserState::finish`] after the last line.
#[derive(Debug, Default)]
pub struct ParserState {
    /// Number of lines consumed so far.
    line: usize,
    /// Current heading depth.
    level: usize,
    /// One label per heading depth, `item_path.len() == level`.
    item_path: Vec<String>,
    /// Sections of the last closed non-empty record, for `&&` carry-forward.
    previous_sections: IndexMap<String, Vec<String>>,
    current_sections: IndexMap<String, Vec<String>>,
    section_name: String,
    text_buffer: Vec<String>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line, returning the record it closed, if any.
    ///
    /// # Errors
    ///
    /// `MalformedOutline` if a heading is more than one level deeper than the
    /// current level.
    pub fn step(&mut self, line: &str) -> Result<Option<TestRecord>, TestSheetError> {
        self.line += 1;

        if let Some(captures) = HEADING_REGEXP.captures(line) {
            let depth = captures["marks"].len();
            // Trailing blanks are invisible in the sheet; keep them out of the
            // labels that numbering compares.
            let label = captures["label"].trim_end().to_string();

            self.close_section();
            let record = self.take_record();
            self.enter_heading(depth, label)?;
            self.section_name.clear();
            self.text_buffer.clear();
            return Ok(record);
        }

        if let Some(captures) = SECTION_REGEXP.captures(line) {
            self.close_section();
            self.section_name = captures["name"].to_string();
            self.text_buffer = match self.previous_sections.get(&self.section_name) {
                Some(carried) if captures.name("carry").is_some() => carried.clone(),
                _ => Vec::new(),
            };
            return Ok(None);
        }

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.text_buffer.push(trimmed.to_string());
        }
        Ok(None)
    }

    /// Closes the open section and returns the last record, if any.
    pub fn finish(mut self) -> Option<TestRecord> {
        self.close_section();
        self.take_record()
    }

    fn close_section(&mut self) {
        if !self.text_buffer.is_empty() && !self.section_name.is_empty() {
            self.current_sections.insert(
                self.section_name.clone(),
                std::mem::take(&mut self.text_buffer),
            );
        }
    }

    /// Emits the record built so far and starts a new, empty section map.
    fn take_record(&mut self) -> Option<TestRecord> {
        let sections = std::mem::take(&mut self.current_sections);
        if sections.is_empty() {
            return None;
        }

        let record = if self.item_path.is_empty() {
            None
        } else {
            Some(TestRecord::new(self.item_path.clone(), sections.clone()))
        };
        self.previous_sections = sections;
        record
    }

    fn enter_heading(&mut self, depth: usize, label: String) -> Result<(), TestSheetError> {
        if depth == self.level {
            // Same depth: the heading replaces the current label.
            if let Some(last) = self.item_path.last_mut() {
                *last = label;
            }
        } else if depth == self.level + 1 {
            self.item_path.push(label);
        } else if depth < self.level {
            self.item_path.truncate(depth);
            if let Some(last) = self.item_path.last_mut() {
                *last = label;
            }
        } else {
            return Err(TestSheetError::MalformedOutline {
                line: self.line,
                level: self.level,
                depth,
            });
        }
        self.level = depth;
        Ok(())
    }
}

/// A parser for converting a markdown test outline into `TestRecord`s.
///
/// Recognised line forms, checked in order:
///
/// - `# label`, `## label`, ... : headings, one `#` per hierarchy level
/// - `:: Section` or `:: Section &&` : starts a named section, `&&` copies the
///   previous record's section of the same name
/// - blank lines : ignored
/// - anything else : content of the open section
#[derive(Debug, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn new() -> Self {
        MarkdownParser
    }

    /// Parses the (preprocessed) input string into test records.
    ///
    /// # Returns
    ///
    /// The records in document order, or `MalformedOutline` on an invalid
    /// heading jump. No partial result is returned on error.
    pub fn parse(&self, input: &str) -> Result<Vec<TestRecord>, TestSheetError> {
        let mut state = ParserState::new();
        let mut records = Vec::new();

        for line in input.lines() {
            if let Some(record) = state.step(line)? {
                records.push(record);
            }
        }
        records.extend(state.finish());

        debug!("parsed {} test records", records.len());
        Ok(records)
    }
}
