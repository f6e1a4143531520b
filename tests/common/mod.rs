#![allow(dead_code)]

use epub2pdf::{PdfRenderer, RenderError};
use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A file placed in the EPUB next to the package document
pub struct Resource<'a> {
    pub id: &'a str,
    pub href: &'a str,
    pub media_type: &'a str,
    pub bytes: &'a [u8],
}

/// Build an EPUB with its package document at `OEBPS/content.opf`
pub fn build_epub(title: &str, resources: &[Resource<'_>], spine: &[&str]) -> Vec<u8> {
    let mut manifest = String::new();
    for r in resources {
        manifest.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            r.id, r.href, r.media_type
        ));
    }
    let itemrefs: String = spine
        .iter()
        .map(|id| format!("    <itemref idref=\"{id}\"/>\n"))
        .collect();

    let opf = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>{title}</dc:title>
    <dc:identifier id="id">test-book</dc:identifier>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
{manifest}  </manifest>
  <spine toc="ncx">
{itemrefs}  </spine>
</package>"#
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
    )
    .unwrap();
    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();
    zip.start_file("OEBPS/toc.ncx", deflated).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head/>
  <docTitle><text>Test</text></docTitle>
  <navMap/>
</ncx>"#,
    )
    .unwrap();
    for r in resources {
        zip.start_file(format!("OEBPS/{}", r.href), deflated).unwrap();
        zip.write_all(r.bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn xhtml(title: &str, body: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title></head>
<body>{body}</body>
</html>"#
    )
    .into_bytes()
}

/// Two chapters and a cover image, without reading-order metadata
pub fn two_chapter_book() -> Vec<u8> {
    let ch1 = xhtml(
        "One",
        r#"<h1>Chapter One</h1><p><img src="../images/cover.jpg" alt="cover"/></p>"#,
    );
    let ch2 = xhtml("Two", "<h1>Chapter Two</h1><p>The end.</p>");
    build_epub(
        "Two Chapters",
        &[
            Resource {
                id: "ch1",
                href: "text/ch1.html",
                media_type: "application/xhtml+xml",
                bytes: &ch1,
            },
            Resource {
                id: "ch2",
                href: "text/ch2.html",
                media_type: "application/xhtml+xml",
                bytes: &ch2,
            },
            Resource {
                id: "cover",
                href: "images/cover.jpg",
                media_type: "image/jpeg",
                bytes: b"\xff\xd8\xff\xe0fake-jpeg",
            },
        ],
        &[],
    )
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Always fails without writing anything
pub struct FailingRenderer;

impl PdfRenderer for FailingRenderer {
    fn render(&self, _markup: &str, destination: &Path) -> Result<(), RenderError> {
        Err(RenderError::MissingOutput(destination.to_path_buf()))
    }
}

/// Writes a placeholder PDF and remembers the markup it was given
#[derive(Default)]
pub struct StubRenderer {
    pub rendered: RefCell<Vec<String>>,
}

impl PdfRenderer for StubRenderer {
    fn render(&self, markup: &str, destination: &Path) -> Result<(), RenderError> {
        fs::write(destination, b"%PDF-1.4\n%stub\n")?;
        self.rendered.borrow_mut().push(markup.to_string());
        Ok(())
    }
}
