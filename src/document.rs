use kuchiki::traits::*;
use kuchiki::NodeRef;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

/// Inserted between consecutive chapters
pub const PAGE_BREAK: &str = r#"<div style="page-break-after: always;"></div>"#;

const PRINT_STYLES: &str = r#"
        @page {
            margin: 2cm;
        }
        body {
            font-family: serif;
            line-height: 1.6;
            max-width: 100%;
            padding: 1em;
        }
        img {
            max-width: 100%;
            height: auto;
            display: block;
            margin: 0.5em auto;
        }
        table {
            border-collapse: collapse;
            width: 100%;
        }
        p, div, h1, h2, h3, h4, h5, h6 {
            max-width: 100%;
            word-wrap: break-word;
        }
    "#;

/// Build the single print document handed to the renderer.
///
/// `head_tags` is inserted verbatim after the charset declaration. Book
/// stylesheets follow the print styles so they can override them.
pub fn assemble(head_tags: &str, stylesheets: &[String], chapters: &[String]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n");
    html.push_str(head_tags);
    html.push_str("    <style>");
    html.push_str(PRINT_STYLES);
    for css in stylesheets {
        html.push_str(css);
    }
    html.push_str("</style></head><body>");

    for (i, chapter) in chapters.iter().enumerate() {
        if i > 0 {
            html.push_str(PAGE_BREAK);
        }
        html.push_str(&body_content(chapter));
    }

    html.push_str("</body></html>");
    html
}

/// The inner markup of a chapter's `<body>`, or the whole chapter when it has none
pub fn body_content(chapter: &str) -> String {
    if !has_body_element(chapter) {
        return chapter.to_string();
    }

    let document = parse_chapter(chapter);
    match document.select_first("body") {
        Ok(body) => body
            .as_node()
            .children()
            .map(|child| child.to_string())
            .collect(),
        Err(()) => chapter.to_string(),
    }
}

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Parse chapter markup into a DOM.
///
/// XHTML chapters may self-close non-void elements (`<title/>`,
/// `<script src="a.js"/>`), which an HTML parser reads as open tags that
/// swallow the rest of the document. Those are expanded into start/end
/// pairs first.
pub fn parse_chapter(markup: &str) -> NodeRef {
    match expand_empty_elements(markup) {
        Some(expanded) => kuchiki::parse_html().one(expanded),
        None => kuchiki::parse_html().one(markup),
    }
}

/// `None` when nothing needed expanding or the markup is not well-formed XML
fn expand_empty_elements(markup: &str) -> Option<String> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Vec::with_capacity(markup.len()));
    let mut expanded = false;

    loop {
        match reader.read_event().ok()? {
            Event::Eof => break,
            Event::Empty(e) if !is_void(e.local_name().as_ref()) => {
                let end = e.to_end().into_owned();
                writer.write_event(Event::Start(e)).ok()?;
                writer.write_event(Event::End(end)).ok()?;
                expanded = true;
            }
            event => writer.write_event(event).ok()?,
        }
    }

    if !expanded {
        return None;
    }
    String::from_utf8(writer.into_inner()).ok()
}

fn is_void(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// Whether the markup contains an explicit `<body>` start tag
pub fn has_body_element(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    let mut rest = lower.as_str();
    while let Some(idx) = rest.find("<body") {
        rest = &rest[idx + "<body".len()..];
        match rest.chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return true,
            _ => {}
        }
    }
    false
}
