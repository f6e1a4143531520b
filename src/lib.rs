//! Convert EPUB ebooks into a single print-ready PDF.

pub mod batch;
pub mod cli;
pub mod converter;
pub mod document;
pub mod epub_reader;
pub mod error;
pub mod image;
pub mod metadata;
pub mod reader;
pub mod render;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use converter::{convert, prepare};
pub use error::{ConvertError, RenderError};
pub use render::{CommandRenderer, PdfRenderer};
