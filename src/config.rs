//! Test sheet configuration, read from a YAML document.
//!
//! ```yaml
//! Sheet:
//!   Name: TestSheet
//! Headers:
//!   BackColor: "4F81BD"
//!   TextColor: "FFFFFF"
//!   TestItemsLabel: [Module, Feature, Case]
//!   TestResult:
//!     PrintCount: 2
//!     Labels: [tester, checker, date, result]
//!   Rearrange: [no, itemname, content, results]
//! Consts:
//!   product: Foo
//! ```

use crate::table::{parse_order, ColumnGroup};
use crate::testcase::TestSheetError;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use rust_xlsxwriter::Color;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The default configuration path of the command line tool.
pub const DEFAULT_CONFIG_PATH: &str = "sample/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub sheet: SheetConfig,
    pub headers: HeadersConfig,
    /// Values for `{{name}}` placeholders in cell text.
    #[serde(default)]
    pub consts: IndexMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SheetConfig {
    #[serde(default = "default_sheet_name")]
    pub name: String,
    /// Text of the title row, if any.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            name: default_sheet_name(),
            title: None,
        }
    }
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeadersConfig {
    /// Header fill color, `RRGGBB` or `AARRGGBB`.
    #[serde(default)]
    pub back_color: Option<String>,
    /// Header font color, `RRGGBB` or `AARRGGBB`.
    #[serde(default)]
    pub text_color: Option<String>,
    /// One label per outline level.
    pub test_items_label: Vec<String>,
    #[serde(default)]
    pub test_result: Option<TestResultConfig>,
    /// Column group order, a permutation of `no`, `itemname`, `content`, `results`.
    #[serde(default)]
    pub rearrange: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestResultConfig {
    pub print_count: usize,
    pub labels: Vec<String>,
}

impl Config {
    /// Reads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn item_labels(&self) -> &[String] {
        &self.headers.test_items_label
    }

    /// Result labels, empty when no `TestResult` is configured.
    pub fn result_labels(&self) -> &[String] {
        self.headers
            .test_result
            .as_ref()
            .map(|r| r.labels.as_slice())
            .unwrap_or(&[])
    }

    pub fn print_count(&self) -> usize {
        self.headers
            .test_result
            .as_ref()
            .map_or(0, |r| r.print_count)
    }

    /// The configured column group order, if any.
    pub fn rearrange_order(&self) -> Result<Option<Vec<ColumnGroup>>, TestSheetError> {
        self.headers
            .rearrange
            .as_deref()
            .map(|tags| parse_order(tags))
            .transpose()
    }

    pub fn header_back_color(&self) -> Result<Option<Color>> {
        self.headers
            .back_color
            .as_deref()
            .map(|c| parse_color("Headers.BackColor", c))
            .transpose()
    }

    pub fn header_text_color(&self) -> Result<Option<Color>> {
        self.headers
            .text_color
            .as_deref()
            .map(|c| parse_color("Headers.TextColor", c))
            .transpose()
    }
}

/// Parses `RRGGBB`, `AARRGGBB` or `#RRGGBB` into an RGB color. The alpha
/// byte is ignored.
pub fn parse_color(key: &str, text: &str) -> Result<Color> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("{}: \"{}\" is not a hex color", key, text);
    }
    let rgb = match hex.len() {
        6 => hex,
        8 => &hex[2..],
        _ => bail!("{}: \"{}\" is not a RRGGBB or AARRGGBB color", key, text),
    };
    let value = u32::from_str_radix(rgb, 16)?;
    Ok(Color::RGB(value))
}
