use crate::reader::BookMetadata;
use quick_xml::escape::escape;
use std::path::Path;

/// The book title, falling back to the source file name
pub fn display_title(metadata: &BookMetadata, source: &Path) -> String {
    if let Some(title) = metadata.title.as_deref().filter(|t| !t.trim().is_empty()) {
        return title.to_string();
    }
    source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string())
}

/// Head elements describing the book, picked up by renderers as PDF document info
pub fn format_head_tags(title: &str, metadata: &BookMetadata) -> String {
    let mut lines = Vec::new();

    lines.push(format!("    <title>{}</title>", escape(title)));

    for author in &metadata.authors {
        lines.push(format!(
            "    <meta name=\"author\" content=\"{}\">",
            escape(author)
        ));
    }

    if let Some(description) = &metadata.description {
        lines.push(format!(
            "    <meta name=\"description\" content=\"{}\">",
            escape(description)
        ));
    }

    let mut result = lines.join("\n");
    result.push('\n');
    result
}
