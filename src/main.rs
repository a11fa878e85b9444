use clap::Parser;
use testsheet_conv_rs::cli::{build_table, run_conversion, write_table_tsv};
use testsheet_conv_rs::config::{Config, DEFAULT_CONFIG_PATH};
use testsheet_conv_rs::get_column_group_tags;
use testsheet_conv_rs::parser::preprocess::FsIncludeResolver;

use anyhow::Context;
use log::debug;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Test Sheet Creation Tool", long_about = None)]
struct Cli {
    /// Markdown file that defines the test items (default: stdin)
    tests: Option<String>,

    /// Excel file output destination ("-" for stdout)
    #[arg(short = 'o', long = "out", value_name = "FILE", required_unless_present_any = ["list_groups", "dump_table"])]
    out: Option<String>,

    /// Configuration file that defines the layout of the test sheet
    #[arg(short = 'c', long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the final table as tab-separated text instead of writing a workbook
    #[arg(long)]
    dump_table: bool,

    /// List the column groups accepted by Headers.Rearrange
    #[arg(short = 'l', long)]
    list_groups: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_groups {
        println!("column groups:");
        println!("{}", get_column_group_tags().join(" "));
        return Ok(());
    }

    let config = Config::load(&cli.config)?;
    debug!("loaded config from {}", cli.config.display());

    // Includes resolve relative to the outline file.
    let (input, base_dir) = match cli.tests.as_deref() {
        Some(path) if path != "-" => {
            let input = fs::read_to_string(path)
                .with_context(|| format!("Failed to read test outline: {}", path))?;
            let base_dir = Path::new(path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (input, base_dir)
        }
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            (input, PathBuf::from("."))
        }
    };

    if cli.dump_table {
        let table = build_table(&config, &input, FsIncludeResolver::new(&base_dir))?;
        write_table_tsv(&table, &mut io::stdout())?;
        return Ok(());
    }

    // Prepare output writer
    let mut output_writer: Box<dyn Write> = match cli.out.as_deref() {
        Some(path) if path != "-" => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            Box::new(
                File::create(path).with_context(|| format!("Failed to create output: {}", path))?,
            )
        }
        _ => Box::new(io::stdout()),
    };

    run_conversion(&config, &input, &base_dir, &mut output_writer)?;
    output_writer.flush()?;

    Ok(())
}
