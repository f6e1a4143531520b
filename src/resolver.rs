//! Rewrites chapter image references into inline data URIs.

use crate::document::{has_body_element, parse_chapter};
use crate::image::{media_type_for, ImageCatalog, InlineImage};
use crate::reader::{ArchiveReader, ItemKind};
use kuchiki::NodeRef;
use tracing::{debug, warn};

/// A content document in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Archive path of the source document; base for relative references
    pub path: String,
    pub markup: String,
}

/// Replace every resolvable `<img src>` in the chapter with a data URI.
///
/// Unresolvable references are left exactly as written.
pub fn resolve_chapter(
    chapter: &Chapter,
    catalog: &mut ImageCatalog,
    reader: &mut dyn ArchiveReader,
) -> String {
    let document = parse_chapter(&chapter.markup);

    let images: Vec<_> = match document.select("img") {
        Ok(selection) => selection.collect(),
        Err(()) => Vec::new(),
    };

    for img in images {
        let src = img.attributes.borrow().get("src").map(str::to_owned);
        let Some(src) = src.filter(|s| !s.is_empty()) else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }

        match resolve_reference(&src, &chapter.path, catalog, reader) {
            Some(data_uri) => {
                img.attributes.borrow_mut().insert("src", data_uri);
            }
            None => debug!(%src, chapter = %chapter.path, "Image reference left unresolved"),
        }
    }

    serialize_chapter(&document, has_body_element(&chapter.markup))
}

/// Resolve one reference: the chapter-relative key, then the bare filename,
/// then a scan of every archive image (path equals the key, ends with the
/// filename, or contains `src`). Scan hits are cached in the catalog.
///
/// The substring test can pick the wrong image when filenames are short.
pub fn resolve_reference(
    src: &str,
    chapter_path: &str,
    catalog: &mut ImageCatalog,
    reader: &mut dyn ArchiveReader,
) -> Option<String> {
    let key = candidate_key(src, chapter_path);
    if let Some(image) = catalog.get(&key) {
        return Some(image.data_uri());
    }

    let filename = basename(src);
    if let Some(image) = catalog.get(filename) {
        return Some(image.data_uri());
    }

    let candidates: Vec<_> = reader
        .items_of_kind(ItemKind::Image)
        .into_iter()
        .filter(|item| item.path == key || item.path.ends_with(filename) || item.path.contains(src))
        .collect();

    for item in candidates {
        match reader.read_item(&item.path) {
            Ok(bytes) => {
                let media_type = media_type_for(item.media_type.as_deref(), &item.path);
                let image = InlineImage::from_bytes(media_type, &bytes);
                let data_uri = image.data_uri();
                debug!(%src, path = %item.path, "Resolved image by archive scan");
                catalog.insert(item.path, image);
                return Some(data_uri);
            }
            Err(err) => warn!(path = %item.path, "Could not extract image: {err}"),
        }
    }

    None
}

/// Turn an `src` attribute into a catalog key relative to the chapter
pub fn candidate_key(src: &str, chapter_path: &str) -> String {
    let dir = parent_dir(chapter_path);

    if src.starts_with("../") {
        let joined = if dir.is_empty() {
            src.to_string()
        } else {
            format!("{dir}/{src}")
        };
        normalize_segments(&joined)
    } else if src.starts_with('/') {
        src.trim_start_matches('/').to_string()
    } else if dir.is_empty() {
        src.replace('\\', "/")
    } else {
        format!("{dir}/{src}").replace('\\', "/")
    }
}

/// Collapse `.` and `..` segments of a relative, slash-separated path.
///
/// Leading `..` segments that climb above the start are kept.
pub fn normalize_segments(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn serialize_chapter(document: &NodeRef, keep_document: bool) -> String {
    if keep_document {
        return document.to_string();
    }

    // The parser wraps fragments in html/head/body; emit only what was written
    let mut fragment = String::new();
    for container in ["head", "body"] {
        if let Ok(element) = document.select_first(container) {
            for child in element.as_node().children() {
                fragment.push_str(&child.to_string());
            }
        }
    }
    fragment
}
