use super::{ColumnGroup, ColumnSpan, Table};
use crate::testcase::Cell;
use log::debug;

/// Appends `print_count` blocks of result-tracking columns.
///
/// The header gets the label texts, every data row gets empty cells. Columns
/// are added block by block, so the new header cells are `labels` repeated
/// `print_count` times. They are inserted at the end of the results group,
/// which is the end of the row for a freshly normalized table.
pub fn augment(mut table: Table, print_count: usize, labels: &[String]) -> Table {
    let added = print_count * labels.len();
    if added == 0 {
        return table;
    }

    let at = table.range(ColumnGroup::Results).end;
    for (index, row) in table.rows.iter_mut().enumerate() {
        let new_cells: Vec<Cell> = if index == 0 {
            (0..print_count)
                .flat_map(|_| labels.iter().map(|l| Cell::from(l.as_str())))
                .collect()
        } else {
            vec![Cell::empty(); added]
        };
        row.splice(at..at, new_cells);
    }

    match table.spans.iter_mut().find(|s| s.group == ColumnGroup::Results) {
        Some(span) => span.width += added,
        None => table.spans.push(ColumnSpan::new(ColumnGroup::Results, added)),
    }
    table.result_block = labels.len();

    debug!(
        "added {} result columns ({} x {})",
        added,
        print_count,
        labels.len()
    );
    table
}
