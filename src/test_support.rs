use crate::error::ArchiveError;
use crate::reader::{ArchiveReader, BookMetadata, ContentItem};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// An [`ArchiveReader`] backed by plain maps
#[derive(Default)]
pub struct MemoryArchive {
    items: Vec<ContentItem>,
    spine: Vec<String>,
    metadata: BookMetadata,
    payloads: HashMap<String, Vec<u8>>,
    pub reads: Vec<String>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, id: &str, path: &str, media_type: Option<&str>, bytes: &[u8]) -> Self {
        self.items
            .push(ContentItem::new(id, path, media_type.map(str::to_string)));
        self.payloads.insert(path.to_string(), bytes.to_vec());
        self
    }

    /// Listed in the manifest but missing from the container
    pub fn with_unreadable_item(mut self, id: &str, path: &str, media_type: Option<&str>) -> Self {
        self.items
            .push(ContentItem::new(id, path, media_type.map(str::to_string)));
        self
    }

    pub fn with_spine(mut self, ids: &[&str]) -> Self {
        self.spine = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.metadata.title = Some(title.to_string());
        self
    }
}

impl ArchiveReader for MemoryArchive {
    fn items(&self) -> &[ContentItem] {
        &self.items
    }

    fn spine(&self) -> &[String] {
        &self.spine
    }

    fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    fn read_item(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        self.reads.push(path.to_string());
        self.payloads
            .get(path)
            .cloned()
            .ok_or_else(|| ArchiveError::MissingItem(path.to_string()))
    }
}

/// Minimal EPUB 2 navigation document
pub const NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head/>
  <docTitle><text>Test</text></docTitle>
  <navMap/>
</ncx>"#;

/// Zip an EPUB whose container points at `opf_path`
pub fn build_epub(opf_path: &str, opf: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    zip.start_file("META-INF/container.xml", deflated).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{opf_path}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#
    )
    .unwrap();

    zip.start_file(opf_path, deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();

    for (name, bytes) in files {
        zip.start_file(*name, deflated).unwrap();
        zip.write_all(bytes).unwrap();
    }

    zip.finish().unwrap().into_inner()
}
