use crate::document;
use crate::epub_reader::EpubArchive;
use crate::error::ConvertError;
use crate::image::{self, ImageCatalog};
use crate::metadata;
use crate::reader::{ArchiveReader, ContentItem, ItemKind};
use crate::render::PdfRenderer;
use crate::resolver::{self, Chapter};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An assembled document, ready to render
#[derive(Debug, Clone)]
pub struct PreparedBook {
    pub title: String,
    pub markup: String,
    pub chapter_count: usize,
    pub image_count: usize,
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub title: String,
    pub chapter_count: usize,
    pub image_count: usize,
    pub output_bytes: u64,
}

/// `book.epub` -> `book.pdf`, next to the input
pub fn default_output_path(epub_path: &Path) -> PathBuf {
    epub_path.with_extension("pdf")
}

/// Convert one EPUB to PDF.
///
/// The archive is closed before rendering starts.
pub fn convert(
    epub_path: &Path,
    pdf_path: Option<&Path>,
    renderer: &dyn PdfRenderer,
) -> Result<ConversionResult, ConvertError> {
    let pdf_path = pdf_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(epub_path));

    let book = prepare(epub_path)?;
    renderer.render(&book.markup, &pdf_path)?;

    let output_bytes = fs::metadata(&pdf_path)
        .map_err(|source| ConvertError::Output {
            path: pdf_path.clone(),
            source,
        })?
        .len();

    info!(
        output = %pdf_path.display(),
        bytes = output_bytes,
        "Conversion finished"
    );

    Ok(ConversionResult {
        title: book.title,
        chapter_count: book.chapter_count,
        image_count: book.image_count,
        output_bytes,
    })
}

/// Extract, resolve and assemble an EPUB without rendering it
pub fn prepare(epub_path: &Path) -> Result<PreparedBook, ConvertError> {
    if !epub_path.exists() {
        return Err(ConvertError::NotFound(epub_path.to_path_buf()));
    }

    let mut archive = EpubArchive::open(epub_path)?;
    prepare_from(&mut archive, epub_path)
}

/// The extraction pipeline over any archive reader
pub fn prepare_from(
    reader: &mut dyn ArchiveReader,
    source: &Path,
) -> Result<PreparedBook, ConvertError> {
    let title = metadata::display_title(reader.metadata(), source);
    let head_tags = metadata::format_head_tags(&title, reader.metadata());

    let stylesheets = extract_stylesheets(reader);
    let mut catalog = image::build_catalog(reader);
    let chapters = extract_chapters(reader, &mut catalog);

    if chapters.is_empty() {
        return Err(ConvertError::NoContent);
    }

    info!(
        %title,
        chapters = chapters.len(),
        images = catalog.len(),
        stylesheets = stylesheets.len(),
        "Extracted EPUB content"
    );

    let markup = document::assemble(&head_tags, &stylesheets, &chapters);

    Ok(PreparedBook {
        title,
        markup,
        chapter_count: chapters.len(),
        image_count: catalog.len(),
    })
}

fn extract_stylesheets(reader: &mut dyn ArchiveReader) -> Vec<String> {
    let mut stylesheets = Vec::new();
    for item in reader.items_of_kind(ItemKind::Stylesheet) {
        match reader.read_item(&item.path) {
            Ok(bytes) => stylesheets.push(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => warn!(path = %item.path, "Could not read stylesheet: {err}"),
        }
    }
    stylesheets
}

/// Resolved chapter markup in reading order.
///
/// Falls back to every content document in manifest order when the spine
/// yields nothing.
fn extract_chapters(reader: &mut dyn ArchiveReader, catalog: &mut ImageCatalog) -> Vec<String> {
    let spine_items: Vec<ContentItem> = {
        let mut seen = HashSet::new();
        reader
            .spine()
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| match reader.item_by_id(id) {
                Some(item) if item.kind == ItemKind::Document => Some(item.clone()),
                Some(_) => None,
                None => {
                    debug!(%id, "Spine entry has no manifest item");
                    None
                }
            })
            .collect()
    };

    let chapters = resolve_items(reader, catalog, &spine_items);
    if !chapters.is_empty() {
        return chapters;
    }

    let documents = reader.items_of_kind(ItemKind::Document);
    if !documents.is_empty() {
        debug!(
            documents = documents.len(),
            "Spine yielded no chapters, using manifest order"
        );
    }
    resolve_items(reader, catalog, &documents)
}

fn resolve_items(
    reader: &mut dyn ArchiveReader,
    catalog: &mut ImageCatalog,
    items: &[ContentItem],
) -> Vec<String> {
    let mut chapters = Vec::new();
    for item in items {
        let chapter = match reader.read_item(&item.path) {
            Ok(bytes) => Chapter {
                path: item.path.clone(),
                markup: String::from_utf8_lossy(&bytes).into_owned(),
            },
            Err(err) => {
                warn!(id = %item.id, path = %item.path, "Could not read chapter: {err}");
                continue;
            }
        };
        chapters.push(resolver::resolve_chapter(&chapter, catalog, reader));
    }
    chapters
}
