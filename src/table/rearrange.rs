use super::{ColumnGroup, ColumnSpan, Table};
use crate::testcase::{Cell, TestSheetError};
use log::debug;

/// Parses rearrangement tags (`no`, `itemname`, `content`, `results`).
///
/// # Errors
///
/// `UnknownColumnGroup` for any other tag, `InvalidColumnOrder` if the tags
/// are not a permutation of all four groups.
pub fn parse_order<S: AsRef<str>>(tags: &[S]) -> Result<Vec<ColumnGroup>, TestSheetError> {
    let order = tags
        .iter()
        .map(|t| t.as_ref().parse::<ColumnGroup>())
        .collect::<Result<Vec<_>, _>>()?;

    for group in ColumnGroup::ALL {
        let count = order.iter().filter(|&&g| g == group).count();
        if count != 1 {
            return Err(TestSheetError::InvalidColumnOrder(format!(
                "\"{}\" appears {} times in [{}]",
                group,
                count,
                order
                    .iter()
                    .map(|g| g.tag())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }
    Ok(order)
}

/// Reorders the four column groups of every row.
///
/// Each row is cut into the group ranges currently tracked by the table and
/// reassembled in `order`; the table's spans follow the new order.
pub fn rearrange(table: Table, order: &[ColumnGroup]) -> Result<Table, TestSheetError> {
    if order.len() != ColumnGroup::ALL.len()
        || ColumnGroup::ALL.iter().any(|g| !order.contains(g))
    {
        return Err(TestSheetError::InvalidColumnOrder(format!(
            "{:?} is not a permutation of the column groups",
            order
        )));
    }

    let ranges: Vec<_> = order.iter().map(|&g| table.range(g)).collect();
    let spans: Vec<ColumnSpan> = order
        .iter()
        .zip(&ranges)
        .map(|(&group, range)| ColumnSpan::new(group, range.len()))
        .collect();

    let result_block = table.result_block;
    let rows: Vec<Vec<Cell>> = table
        .rows
        .into_iter()
        .map(|row| {
            ranges
                .iter()
                .flat_map(|range| row[range.clone()].iter().cloned())
                .collect()
        })
        .collect();

    debug!(
        "rearranged columns to [{}]",
        order.iter().map(|g| g.tag()).collect::<Vec<_>>().join(", ")
    );
    Ok(Table::with_spans(rows, spans, result_block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_table;

    fn slices(row: &[String], ranges: &[std::ops::Range<usize>]) -> Vec<String> {
        ranges.iter().flat_map(|r| row[r.clone()].to_vec()).collect()
    }

    #[test]
    fn test_identity_order() -> Result<(), TestSheetError> {
        let table = sample_table();
        let order = parse_order(&["no", "itemname", "content", "results"])?;
        let data = rearrange(table.clone(), &order)?;
        assert_eq!(data, table);
        Ok(())
    }

    #[test]
    fn test_reverse_order() -> Result<(), TestSheetError> {
        let table = sample_table();
        let order = parse_order(&["results", "content", "itemname", "no"])?;
        let data = rearrange(table.clone(), &order)?;

        let expected = table.to_strings();
        let actual = data.to_strings();
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert_eq!(a, &slices(e, &[7..15, 4..7, 1..4, 0..1]));
        }
        assert_eq!(data.range(ColumnGroup::Results), 0..8);
        assert_eq!(data.range(ColumnGroup::No), 14..15);
        Ok(())
    }

    #[test]
    fn test_mixed_order() -> Result<(), TestSheetError> {
        let table = sample_table();
        let order = parse_order(&["itemname", "no", "results", "content"])?;
        let data = rearrange(table.clone(), &order)?;

        for (a, e) in data.to_strings().iter().zip(&table.to_strings()) {
            assert_eq!(a, &slices(e, &[1..4, 0..1, 7..15, 4..7]));
        }
        Ok(())
    }

    #[test]
    fn test_unknown_tag() {
        let err = parse_order(&["no", "itemname", "content", "result"]).unwrap_err();
        assert!(matches!(err, TestSheetError::UnknownColumnGroup(ref t) if t == "result"));
    }

    #[test]
    fn test_not_a_permutation() {
        let err = parse_order(&["no", "itemname", "content"]).unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidColumnOrder(_)));

        let err = parse_order(&["no", "no", "content", "results"]).unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidColumnOrder(_)));

        let err = rearrange(sample_table(), &[ColumnGroup::No; 4]).unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidColumnOrder(_)));
    }

    #[test]
    fn test_every_permutation_keeps_cells() -> Result<(), TestSheetError> {
        let table = sample_table();
        let all = ColumnGroup::ALL;
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let mut idx = [a, b, c, d];
                        idx.sort_unstable();
                        if idx != [0, 1, 2, 3] {
                            continue;
                        }
                        let order = [all[a], all[b], all[c], all[d]];
                        let data = rearrange(table.clone(), &order)?;
                        assert_eq!(data.width(), table.width());
                        for (row, original) in data.rows().iter().zip(table.rows()) {
                            assert_eq!(row.len(), original.len());
                        }

                        let back = rearrange(data, &ColumnGroup::ALL)?;
                        assert_eq!(back, table);
                    }
                }
            }
        }
        Ok(())
    }
}
