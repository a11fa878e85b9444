use std::fs;
use std::path::{Path, PathBuf};

use testsheet_conv_rs::cli::{build_table, run_conversion};
use testsheet_conv_rs::config::Config;
use testsheet_conv_rs::parser::preprocess::FsIncludeResolver;
use testsheet_conv_rs::table::ColumnGroup;
use testsheet_conv_rs::testcase::TestSheetError;

fn sample_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("sample")
}

fn sample() -> (Config, String) {
    let config = Config::load(&sample_dir().join("config.yml")).unwrap();
    let input = fs::read_to_string(sample_dir().join("tests.md")).unwrap();
    (config, input)
}

#[test]
fn sample_outline_builds_numbered_table() {
    let (config, input) = sample();
    let table = build_table(&config, &input, FsIncludeResolver::new(sample_dir())).unwrap();
    let rows = table.to_strings();

    assert_eq!(
        &rows[0][..7],
        ["No", "Module", "Feature", "Case", "Precondition", "Steps", "Expected"]
    );
    assert_eq!(table.width(), 15);
    assert_eq!(table.range(ColumnGroup::Results), 7..15);

    let numbers: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(numbers, ["1-1-1", "1-1-2", "1-2-1", "2-1-1"]);

    assert_eq!(
        rows[1][5],
        "open {{product}}\nenter \"alice\" as user name\nenter \"secret\" as password\npress \"Sign in\""
    );
    // carried forward from "Happy path"
    assert_eq!(rows[2][4], "user \"alice\" exists");
    assert_eq!(&rows[4][1..4], ["Logout", "From menu", ""]);
    assert!(rows[1..].iter().all(|r| r[7..].iter().all(|c| c.is_empty())));
}

#[test]
fn sample_outline_renders_workbook() {
    let (config, input) = sample();
    let mut buffer = Vec::new();
    run_conversion(&config, &input, &sample_dir(), &mut buffer).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tests.xlsx");
    fs::write(&path, &buffer).unwrap();

    let spreadsheet = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let ws = spreadsheet.get_sheet(&0).unwrap();
    assert_eq!(ws.get_name(), "TestSheet");
    assert_eq!(ws.get_value((1, 1)), "Sample App acceptance tests");
    assert_eq!(ws.get_value((8, 2)), "1");
    assert_eq!(ws.get_value((12, 2)), "2");
    assert_eq!(ws.get_value((1, 3)), "No");
    assert_eq!(ws.get_value((8, 3)), "tester");
    assert_eq!(ws.get_value((1, 4)), "1-1-1");
    assert!(ws.get_value((6, 4)).starts_with("open Sample App\n"));
    assert_eq!(ws.get_value((2, 7)), "Logout");
}

#[test]
fn malformed_outline_aborts_conversion() {
    let (config, _) = sample();
    let mut buffer = Vec::new();
    let err = run_conversion(&config, "# a\n### b\n:: x\n1", &sample_dir(), &mut buffer).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TestSheetError>(),
        Some(TestSheetError::MalformedOutline { line: 2, .. })
    ));
    assert!(buffer.is_empty());
}
