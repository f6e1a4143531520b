use crate::error::ArchiveError;
use crate::reader::{ArchiveReader, BookMetadata, ContentItem};
use rbook::prelude::*;
use rbook::Epub;
use std::io::Cursor;
use std::path::Path;

/// An opened EPUB container
pub struct EpubArchive {
    epub: Epub,
    items: Vec<ContentItem>,
    spine: Vec<String>,
    metadata: BookMetadata,
}

impl EpubArchive {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let epub = Epub::options()
            .strict(false)
            .open(path)
            .map_err(|err| ArchiveError::Open(Box::new(err)))?;
        Ok(Self::from_epub(epub))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let epub = Epub::options()
            .strict(false)
            .read(Cursor::new(bytes))
            .map_err(|err| ArchiveError::Open(Box::new(err)))?;
        Ok(Self::from_epub(epub))
    }

    fn from_epub(epub: Epub) -> Self {
        let items = epub
            .manifest()
            .entries()
            .filter_map(|entry| {
                let path = item_path(entry.resource().key().value()?);
                Some(ContentItem::new(
                    entry.id(),
                    path,
                    Some(entry.media_type().to_string()),
                ))
            })
            .collect();

        let spine = epub
            .spine()
            .entries()
            .map(|entry| entry.idref().to_string())
            .collect();

        let metadata = {
            let meta = epub.metadata();
            BookMetadata {
                title: meta.title().and_then(|t| non_empty(t.value())),
                authors: meta
                    .creators()
                    .filter_map(|creator| non_empty(creator.value()))
                    .collect(),
                description: meta.descriptions().find_map(|d| non_empty(d.value())),
            }
        };

        Self {
            epub,
            items,
            spine,
            metadata,
        }
    }
}

impl ArchiveReader for EpubArchive {
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
        let manifest = self.epub.manifest();
        let entry = manifest
            .entries()
            .find(|entry| entry.resource().key().value().map(item_path).as_deref() == Some(path))
            .ok_or_else(|| ArchiveError::MissingItem(path.to_string()))?;

        entry.read_bytes().map_err(|err| ArchiveError::Read {
            path: path.to_string(),
            source: Box::new(err),
        })
    }
}

/// Manifest href as a decoded, container-relative path
fn item_path(href: &str) -> String {
    percent_encoding::percent_decode_str(href.trim_start_matches('/'))
        .decode_utf8_lossy()
        .into_owned()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
