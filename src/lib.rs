pub mod cli;
pub mod config;
pub mod docs;
pub mod generator;
pub mod parser;
pub mod table;
pub mod testcase;

pub fn get_column_group_tags() -> Vec<String> {
    table::ColumnGroup::ALL
        .iter()
        .map(|g| g.tag().to_string())
        .collect()
}
