use crate::cli::Cli;
use crate::converter;
use crate::render::PdfRenderer;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const SEPARATOR_WIDTH: usize = 60;

/// Tally of attempted conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Run the mode selected on the command line
pub fn run(cli: &Cli, renderer: &dyn PdfRenderer) -> Result<BatchSummary> {
    match &cli.input {
        Some(input) => run_single(input, cli.output.as_deref(), &cli.output_dir, renderer),
        None => run_directory(&cli.input_dir, &cli.output_dir, renderer),
    }
}

/// Convert one file; without an explicit output it lands in `output_dir`
pub fn run_single(
    input: &Path,
    output: Option<&Path>,
    output_dir: &Path,
    renderer: &dyn PdfRenderer,
) -> Result<BatchSummary> {
    let output_path = match output {
        Some(path) => {
            ensure_parent_dir(path)?;
            path.to_path_buf()
        }
        None => {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory: {}", output_dir.display())
            })?;
            output_path_for(input, output_dir)
        }
    };

    let succeeded = convert_and_report(input, &output_path, renderer);
    Ok(BatchSummary {
        succeeded: usize::from(succeeded),
        total: 1,
    })
}

/// Convert every EPUB in `input_dir` into `output_dir`.
///
/// A failure only affects its own file.
pub fn run_directory(
    input_dir: &Path,
    output_dir: &Path,
    renderer: &dyn PdfRenderer,
) -> Result<BatchSummary> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let epubs = discover_epubs(input_dir)?;
    if epubs.is_empty() {
        println!("No EPUB files found in '{}/' directory.", input_dir.display());
        return Ok(BatchSummary {
            succeeded: 0,
            total: 0,
        });
    }

    println!(
        "Found {} EPUB file(s) in '{}/' directory.",
        epubs.len(),
        input_dir.display()
    );
    println!("Output will be saved to '{}/' directory.\n", output_dir.display());

    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut succeeded = 0;
    for epub in &epubs {
        println!("{separator}");
        let output_path = output_path_for(epub, output_dir);
        if convert_and_report(epub, &output_path, renderer) {
            succeeded += 1;
        }
        println!();
    }
    println!("{separator}");
    println!("Conversion complete: {}/{} succeeded", succeeded, epubs.len());

    Ok(BatchSummary {
        succeeded,
        total: epubs.len(),
    })
}

/// EPUB files directly inside `dir`, sorted by path.
///
/// A missing directory simply has no EPUBs.
pub fn discover_epubs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to list {}", dir.display()))
        }
    };

    let mut epubs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        if path.is_file() && is_epub(&path) {
            epubs.push(path);
        }
    }
    epubs.sort();
    Ok(epubs)
}

/// `<output_dir>/<stem>.pdf`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "book".to_string());
    output_dir.join(format!("{stem}.pdf"))
}

fn convert_and_report(input: &Path, output: &Path, renderer: &dyn PdfRenderer) -> bool {
    println!("Converting: {}", input.display());
    println!("Output: {}", output.display());

    match converter::convert(input, Some(output), renderer) {
        Ok(result) => {
            println!("Book title: {}", result.title);
            println!("Chapters found: {}", result.chapter_count);
            println!("Images found: {}", result.image_count);
            println!(
                "Success! PDF created: {} ({} bytes)",
                output.display(),
                group_thousands(result.output_bytes)
            );
            true
        }
        Err(err) => {
            warn!(input = %input.display(), "Conversion failed: {err}");
            println!("Error: {err}");
            false
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn is_epub(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "epub"
    )
}

/// `1234567` -> `1,234,567`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
