use super::{ColumnGroup, ColumnSpan, Table, NUMBER_HEADER};
use crate::testcase::{Cell, TestRecord, TestSheetError};
use indexmap::IndexSet;
use log::debug;

/// Hierarchical row numbering, folded over the records in order.
///
/// Each row moves exactly one counter: the one at the shallowest depth whose
/// label differs from the previous row. Deeper counters restart at 1.
#[derive(Debug, Clone)]
pub struct Numbering {
    counters: Vec<usize>,
    previous: Vec<String>,
}

impl Numbering {
    pub fn new(depth: usize) -> Self {
        Numbering {
            counters: vec![0; depth],
            previous: vec![String::new(); depth],
        }
    }

    /// Advances the counters for a padded item row and returns the number.
    ///
    /// `record_depth` is the unpadded depth of the record; when no label
    /// differs from the previous row, the counter at that depth moves.
    pub fn next(&mut self, items: &[String], record_depth: usize) -> String {
        if self.counters.is_empty() {
            return String::new();
        }

        let changed = (0..self.counters.len())
            .find(|&i| self.previous.get(i) != items.get(i))
            .unwrap_or_else(|| record_depth.clamp(1, self.counters.len()) - 1);

        self.counters[changed] += 1;
        for counter in &mut self.counters[changed + 1..] {
            *counter = 1;
        }
        self.previous = items.to_vec();

        self.counters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Converts test records into a rectangular table.
///
/// The header is `No`, then `item_labels`, then every section name in the
/// order it first appears. Item labels of shallow records are padded with
/// empty strings and missing sections are empty cells.
///
/// # Errors
///
/// `SchemaMismatch` if a record has more levels than `item_labels`.
pub fn normalize(item_labels: &[String], records: &[TestRecord]) -> Result<Table, TestSheetError> {
    let tilcount = item_labels.len();
    let mut section_names: IndexSet<String> = IndexSet::new();
    let mut numbering = Numbering::new(tilcount);
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(records.len() + 1);

    for (index, record) in records.iter().enumerate() {
        if record.depth() > tilcount {
            return Err(TestSheetError::SchemaMismatch {
                row: index + 1,
                depth: record.depth(),
                labels: tilcount,
            });
        }

        let mut items = record.items.clone();
        items.resize(tilcount, String::new());

        let mut row = Vec::with_capacity(1 + tilcount + section_names.len());
        row.push(Cell::from(numbering.next(&items, record.depth())));
        row.extend(items.into_iter().map(Cell::from));

        for name in record.sections.keys() {
            section_names.insert(name.clone());
        }
        row.extend(section_names.iter().map(|name| {
            record
                .sections
                .get(name)
                .map(|lines| Cell::from(lines.clone()))
                .unwrap_or_default()
        }));
        rows.push(row);
    }

    let mut header = Vec::with_capacity(1 + tilcount + section_names.len());
    header.push(Cell::from(NUMBER_HEADER));
    header.extend(item_labels.iter().map(|l| Cell::from(l.as_str())));
    header.extend(section_names.iter().map(|n| Cell::from(n.as_str())));
    rows.insert(0, header);

    let width = 1 + tilcount + section_names.len();
    for row in &mut rows {
        row.resize(width, Cell::empty());
    }

    debug!(
        "normalized {} records into {} columns ({} sections)",
        records.len(),
        width,
        section_names.len()
    );

    let spans = vec![
        ColumnSpan::new(ColumnGroup::No, 1),
        ColumnSpan::new(ColumnGroup::ItemName, tilcount),
        ColumnSpan::new(ColumnGroup::Content, section_names.len()),
        ColumnSpan::new(ColumnGroup::Results, 0),
    ];
    Ok(Table::with_spans(rows, spans, 0))
}
