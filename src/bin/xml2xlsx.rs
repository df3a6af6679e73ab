//! xml2xlsx CLI - batch-convert a directory of XML table exports to XLSX workbooks.
//!
//! Each `*.xml` file in the input directory becomes `<stem>.xlsx` in the output directory.
//! Per-file failures are reported and counted but do not abort the batch.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use xml2xlsx::conversion::{convert_path, ConversionOptions, FileObserver};
use xml2xlsx::workbook::write_workbook_to_path;

#[derive(Parser)]
#[command(name = "xml2xlsx")]
#[command(version, about = "Convert XML table exports into pivoted XLSX workbooks", long_about = None)]
struct Cli {
    /// Directory containing .xml files to convert
    #[arg(default_value = "downloaded_tables")]
    input: PathBuf,

    /// Output directory for .xlsx files (defaults to <input>/excel_files)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append conversion events to a log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let pattern = cli.input.join("*.xml");
    let xml_files: Vec<PathBuf> = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            eprintln!("invalid input directory pattern: {e}");
            process::exit(1);
        }
    };

    if xml_files.is_empty() {
        println!("No XML files found in {}", cli.input.display());
        return;
    }

    let output_dir = cli
        .output
        .unwrap_or_else(|| cli.input.join("excel_files"));
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!(
            "cannot create output directory {}: {e}",
            output_dir.display()
        );
        process::exit(1);
    }

    let mut options = ConversionOptions::default();
    if let Some(log) = &cli.log_file {
        options.observer = Some(Arc::new(FileObserver::new(log)));
    }

    println!("Found {} XML files to convert", xml_files.len());
    println!("Output directory: {}", output_dir.display());
    println!("{}", "-".repeat(50));

    let mut converted = 0usize;
    let mut failed = 0usize;

    for (i, xml_file) in xml_files.iter().enumerate() {
        let file_name = xml_file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = xml_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let excel_file = output_dir.join(format!("{stem}.xlsx"));

        let outcome = convert_path(xml_file, &options).and_then(|conversion| {
            write_workbook_to_path(&conversion, Some(&file_name), &excel_file)?;
            Ok(conversion)
        });

        match outcome {
            Ok(conversion) => {
                converted += 1;
                println!("[{:2}/{}] ✓ {}", i + 1, xml_files.len(), file_name);
                println!(
                    "         → {}",
                    excel_file
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                );
                println!(
                    "         → {}. {}",
                    conversion.parse_message, conversion.reshape_message
                );
            }
            Err(e) => {
                failed += 1;
                println!("[{:2}/{}] ✗ {}", i + 1, xml_files.len(), file_name);
                println!("         → Error: {e}");
            }
        }
        println!();
    }

    println!("{}", "=".repeat(50));
    println!("Conversion Summary:");
    println!("✓ Successfully converted: {converted}");
    println!("✗ Failed conversions: {failed}");
    println!("Excel files saved in: {}", output_dir.display());
}
