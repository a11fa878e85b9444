use crate::config::Config;
use crate::table::{ColumnGroup, Table};
use anyhow::Result;
use indexmap::IndexMap;
use rust_xlsxwriter::{Color, ColNum, Format, FormatAlign, FormatBorder, RowNum, Worksheet};

/// Row of the optional title.
const TITLE_ROW: RowNum = 0;
/// Row of the merged result block captions.
const CAPTION_ROW: RowNum = 1;
/// Row of the table header; data rows follow it.
const HEADER_ROW: RowNum = 2;

/// Excel's default column width.
const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

#[derive(Debug, Clone)]
pub struct XlsxGeneratorOptions {
    pub sheet_name: String,
    pub title: Option<String>,
    /// Header fill color.
    pub back_color: Option<Color>,
    /// Header font color.
    pub text_color: Option<Color>,
    /// Values for `{{name}}` placeholders.
    pub consts: IndexMap<String, String>,
}

impl Default for XlsxGeneratorOptions {
    fn default() -> Self {
        XlsxGeneratorOptions {
            sheet_name: "Sheet1".to_string(),
            title: None,
            back_color: None,
            text_color: None,
            consts: IndexMap::new(),
        }
    }
}

impl XlsxGeneratorOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(XlsxGeneratorOptions {
            sheet_name: config.sheet.name.clone(),
            title: config.sheet.title.clone(),
            back_color: config.header_back_color()?,
            text_color: config.header_text_color()?,
            consts: config.consts.clone(),
        })
    }
}

/// Writes a test table to a worksheet.
///
/// Layout: an optional title in the first row, merged captions `1`, `2`, ...
/// above each block of result columns in the second row, then the header and
/// the data rows. Every table cell gets a thin border.
pub struct XlsxGenerator {
    table: Table,
    options: XlsxGeneratorOptions,
}

impl XlsxGenerator {
    pub fn new(table: Table, options: XlsxGeneratorOptions) -> Self {
        XlsxGenerator { table, options }
    }

    pub fn output_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        worksheet.set_name(&self.options.sheet_name)?;

        if let Some(title) = &self.options.title {
            let title_format = Format::new().set_bold();
            worksheet.write_string_with_format(
                TITLE_ROW,
                0,
                self.expand_consts(title),
                &title_format,
            )?;
        }

        self.write_result_captions(worksheet)?;

        let cell_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Top)
            .set_align(FormatAlign::Justify);
        let mut header_format = cell_format.clone();
        if let Some(color) = self.options.back_color {
            header_format = header_format.set_background_color(color);
        }
        if let Some(color) = self.options.text_color {
            header_format = header_format.set_font_color(color);
        }

        for (row_index, row) in self.table.rows().iter().enumerate() {
            let is_header = row_index == 0;
            let base_format = if is_header { &header_format } else { &cell_format };

            for (col_index, cell) in row.iter().enumerate() {
                let multiline = cell.is_multiline();
                let text = self.expand_consts(&cell.join("\n"));
                let format = if multiline {
                    base_format.clone().set_text_wrap()
                } else {
                    base_format.clone()
                };
                worksheet.write_string_with_format(
                    HEADER_ROW + row_index as RowNum,
                    col_index as ColNum,
                    &text,
                    &format,
                )?;

                // Widen columns to fit single-line header text.
                if is_header && !multiline {
                    let width = (text.chars().count() as f64 + 2.0) * 1.4;
                    if width > DEFAULT_COLUMN_WIDTH {
                        worksheet.set_column_width(col_index as ColNum, width)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn write_result_captions(&self, worksheet: &mut Worksheet) -> Result<()> {
        let block = self.table.result_block_width();
        if block == 0 {
            return Ok(());
        }

        let caption_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);
        let results = self.table.range(ColumnGroup::Results);

        for (index, first) in results.clone().step_by(block).enumerate() {
            let last = (first + block).min(results.end) - 1;
            let caption = (index + 1).to_string();
            if last > first {
                worksheet.merge_range(
                    CAPTION_ROW,
                    first as ColNum,
                    CAPTION_ROW,
                    last as ColNum,
                    &caption,
                    &caption_format,
                )?;
            } else {
                worksheet.write_string_with_format(
                    CAPTION_ROW,
                    first as ColNum,
                    &caption,
                    &caption_format,
                )?;
            }
        }
        Ok(())
    }

    fn expand_consts(&self, text: &str) -> String {
        self.options
            .consts
            .iter()
            .fold(text.to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{{{}}}}}", name), value)
            })
    }
}
