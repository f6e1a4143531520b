use crate::reader::{ArchiveReader, ItemKind};
use base64::Engine;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// An image ready to be embedded directly in markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub media_type: String,
    /// Base64 payload (standard alphabet, padded)
    pub encoded: String,
}

impl InlineImage {
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            encoded: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.encoded)
    }
}

/// Maps archive image paths to their inline representation.
///
/// Built once per conversion. Every entry holds a payload that was actually
/// read from the archive; unreadable images are never inserted.
#[derive(Debug, Default)]
pub struct ImageCatalog {
    entries: HashMap<String, InlineImage>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&InlineImage> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, image: InlineImage) {
        self.entries.insert(path.into(), image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Media type for an image: the declared one, else inferred from the suffix
pub fn media_type_for(declared: Option<&str>, path: &str) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|mt| !mt.is_empty()) {
        return declared.to_string();
    }

    let ext = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
    .to_string()
}

/// Encode every image in the archive, keyed by its full archive path
pub fn build_catalog(reader: &mut dyn ArchiveReader) -> ImageCatalog {
    let mut catalog = ImageCatalog::new();

    for item in reader.items_of_kind(ItemKind::Image) {
        match reader.read_item(&item.path) {
            Ok(bytes) => {
                let media_type = media_type_for(item.media_type.as_deref(), &item.path);
                debug!(path = %item.path, %media_type, bytes = bytes.len(), "Cataloged image");
                catalog.insert(item.path, InlineImage::from_bytes(media_type, &bytes));
            }
            Err(err) => {
                warn!(path = %item.path, "Could not extract image: {err}");
            }
        }
    }

    catalog
}
