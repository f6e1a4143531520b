use crate::error::RenderError;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Turns an assembled HTML document into a PDF file
pub trait PdfRenderer {
    fn render(&self, markup: &str, destination: &Path) -> Result<(), RenderError>;
}

/// Renders by invoking an external HTML-to-PDF program.
///
/// The program is called as `<program> <args...> <input.html> <output.pdf>`,
/// the convention shared by `weasyprint` and `wkhtmltopdf`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new("weasyprint")
    }
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl PdfRenderer for CommandRenderer {
    fn render(&self, markup: &str, destination: &Path) -> Result<(), RenderError> {
        // Removed when dropped, on every exit path
        let mut staged = tempfile::Builder::new()
            .prefix("epub2pdf-")
            .suffix(".html")
            .tempfile()?;
        staged.write_all(markup.as_bytes())?;
        staged.flush()?;

        debug!(
            program = %self.program,
            staged = %staged.path().display(),
            bytes = markup.len(),
            "Staged markup for renderer"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(staged.path())
            .arg(destination)
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        if !destination.is_file() {
            return Err(RenderError::MissingOutput(destination.to_path_buf()));
        }

        info!(program = %self.program, output = %destination.display(), "Rendered PDF");
        Ok(())
    }
}
