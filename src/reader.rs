use crate::error::ArchiveError;
use std::path::Path;

/// What a manifest item is used for during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Document,
    Stylesheet,
    Image,
    Other,
}

impl ItemKind {
    /// Classify by declared media type, falling back to the file extension
    pub fn classify(media_type: Option<&str>, path: &str) -> Self {
        match media_type {
            Some(mt) => Self::from_media_type(mt),
            None => Self::from_extension(path),
        }
    }

    fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        match media_type.as_str() {
            "application/xhtml+xml" | "text/html" => ItemKind::Document,
            "text/css" => ItemKind::Stylesheet,
            mt if mt.starts_with("image/") => ItemKind::Image,
            _ => ItemKind::Other,
        }
    }

    fn from_extension(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xhtml" | "html" | "htm" => ItemKind::Document,
            "css" => ItemKind::Stylesheet,
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "webp" => ItemKind::Image,
            _ => ItemKind::Other,
        }
    }
}

/// One manifest entry of an ebook archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    /// Path relative to the package document, used as the base for relative links
    pub path: String,
    pub media_type: Option<String>,
    pub kind: ItemKind,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, path: impl Into<String>, media_type: Option<String>) -> Self {
        let path = path.into();
        let media_type = media_type.filter(|mt| !mt.trim().is_empty());
        let kind = ItemKind::classify(media_type.as_deref(), &path);
        Self {
            id: id.into(),
            path,
            media_type,
            kind,
        }
    }
}

/// Descriptive metadata pulled from the package document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub description: Option<String>,
}

/// Read access to an ebook container.
///
/// Items are listed in manifest declaration order; payloads are read on
/// demand so a single unreadable item never prevents the others from loading.
pub trait ArchiveReader {
    /// Every manifest item, in declaration order
    fn items(&self) -> &[ContentItem];
    /// Reading order as a list of manifest ids
    fn spine(&self) -> &[String];
    fn metadata(&self) -> &BookMetadata;
    /// Read the raw payload of the item at `path`
    fn read_item(&mut self, path: &str) -> Result<Vec<u8>, ArchiveError>;

    fn item_by_id(&self, id: &str) -> Option<&ContentItem> {
        self.items().iter().find(|item| item.id == id)
    }

    fn items_of_kind(&self, kind: ItemKind) -> Vec<ContentItem> {
        self.items()
            .iter()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect()
    }
}
