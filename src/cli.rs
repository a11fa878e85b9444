use std::io::Write;
use std::path::Path;

use anyhow::Result;
use log::info;
use rust_xlsxwriter::Workbook;

use crate::config::Config;
use crate::generator::xlsx::{XlsxGenerator, XlsxGeneratorOptions};
use crate::parser::markdown::MarkdownParser;
use crate::parser::preprocess::{FsIncludeResolver, IncludeResolver, Preprocessor};
use crate::table::{augment, normalize, rearrange, Table};
use crate::testcase::TestSheetError;

/// Runs the text-to-table pipeline: include expansion, outline parsing,
/// normalization, result columns, and the configured column order.
pub fn build_table<R: IncludeResolver>(
    config: &Config,
    input: &str,
    resolver: R,
) -> Result<Table, TestSheetError> {
    let order = config.rearrange_order()?;

    let text = Preprocessor::new(resolver).process(input)?;
    let records = MarkdownParser::new().parse(&text)?;
    info!("{} test records", records.len());

    let table = normalize(config.item_labels(), &records)?;
    let table = augment(table, config.print_count(), config.result_labels());
    match order {
        Some(order) => rearrange(table, &order),
        None => Ok(table),
    }
}

/// Converts an outline into an XLSX workbook written to `output_writer`.
///
/// Include directives are resolved relative to `base_dir`.
pub fn run_conversion(
    config: &Config,
    input_content: &str,
    base_dir: &Path,
    output_writer: &mut dyn Write,
) -> Result<()> {
    let table = build_table(config, input_content, FsIncludeResolver::new(base_dir))?;
    info!(
        "writing {} rows x {} columns to sheet \"{}\"",
        table.rows().len(),
        table.width(),
        config.sheet.name
    );

    let generator = XlsxGenerator::new(table, XlsxGeneratorOptions::from_config(config)?);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    generator.output_to_worksheet(worksheet)?;

    // Save the workbook to a buffer and then write to the output_writer
    let buffer = workbook.save_to_buffer()?;
    output_writer.write_all(&buffer)?;
    Ok(())
}

/// Writes the table as tab-separated text, joining multi-line cells with ` / `.
pub fn write_table_tsv(table: &Table, output_writer: &mut dyn Write) -> Result<()> {
    for row in table.rows() {
        let line: Vec<String> = row.iter().map(|c| c.join(" / ")).collect();
        writeln!(output_writer, "{}", line.join("\t"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
Headers:
  TestItemsLabel: [Module, Case]
  TestResult:
    PrintCount: 1
    Labels: [result]
  Rearrange: [itemname, no, content, results]
"#;

    #[test]
    fn test_build_table() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("steps.md"), ":: Steps\nlog in as //**user**//\n")?;
        let input = r#"# Auth
## admin
&include({"name": "steps.md", "user": "root"})
:: Expected
ok
## guest
&include({"name": "steps.md", "user": "guest"})
"#;
        let config = Config::from_yaml_str(CONFIG)?;
        let table = build_table(&config, input, FsIncludeResolver::new(dir.path()))?;

        let mut output = Vec::new();
        write_table_tsv(&table, &mut output)?;
        assert_eq!(
            String::from_utf8(output)?,
            "Module\tCase\tNo\tSteps\tExpected\tresult\n\
             Auth\tadmin\t1-1\tlog in as root\tok\t\n\
             Auth\tguest\t1-2\tlog in as guest\t\t\n"
        );
        Ok(())
    }

    #[test]
    fn test_build_table_errors() -> Result<()> {
        let config = Config::from_yaml_str(CONFIG)?;
        let dir = tempfile::tempdir()?;

        let err = build_table(&config, "# a\n## b\n### c\n:: x\n1", FsIncludeResolver::new(dir.path()))
            .unwrap_err();
        assert!(matches!(err, TestSheetError::SchemaMismatch { .. }));

        let err = build_table(&config, "&include({\"name\": \"x.md\"})", FsIncludeResolver::new(dir.path()))
            .unwrap_err();
        assert!(matches!(err, TestSheetError::ResourceNotFound { .. }));

        let bad = Config::from_yaml_str(
            "Headers:\n  TestItemsLabel: [Case]\n  Rearrange: [results, no]\n",
        )?;
        let err = build_table(&bad, "# a\n:: x\n1", FsIncludeResolver::new(dir.path())).unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidColumnOrder(_)));
        Ok(())
    }
}
