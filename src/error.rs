use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while opening or reading an EPUB container.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("{0}")]
    Open(#[source] BoxError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("Item not found in archive: {0}")]
    MissingItem(String),
}

/// Errors raised by a [`PdfRenderer`](crate::render::PdfRenderer).
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to start renderer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("renderer `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("failed to stage markup for rendering: {0}")]
    Io(#[from] io::Error),
}

/// Why a single EPUB could not be converted.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading EPUB: {0}")]
    Archive(#[from] ArchiveError),

    #[error("No HTML content found in EPUB")]
    NoContent,

    #[error("Error generating PDF: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to inspect output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
