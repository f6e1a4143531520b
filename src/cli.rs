use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert EPUB ebooks to PDF
#[derive(Parser, Debug)]
#[command(name = "epub2pdf", version, about)]
pub struct Cli {
    /// Path to the input EPUB file.
    /// When omitted, every EPUB in the input directory is converted.
    pub input: Option<PathBuf>,

    /// Output PDF path for a single input file.
    /// Defaults to a PDF named after the EPUB in the output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory scanned for EPUB files when no input file is given
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    /// Directory receiving converted PDFs
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// HTML-to-PDF program, invoked as `<renderer> [args] <input.html> <output.pdf>`
    #[arg(long, default_value = "weasyprint")]
    pub renderer: String,

    /// Extra argument passed to the renderer (repeatable)
    #[arg(long = "renderer-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub renderer_args: Vec<String>,

    /// Log more detail (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log filter directive for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
