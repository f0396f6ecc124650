//! Manuscript text extraction.
//!
//! Manuscripts are reduced to plain text for the AI checks. The file
//! extension picks the reader:
//!
//! - `.txt` / `.md`: UTF-8, falling back to Latin-1
//! - `.html` / `.htm` / `.xhtml`: parsed with `scraper`
//! - `.docx`: `word/document.xml` from the zip archive
//! - `.epub`: spine documents from the zip archive, read as HTML
//! - `.pdf`: page text via `pdf-extract`

use std::collections::HashMap;
use std::fmt::Display;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::Html;
use thiserror::Error;
use zip::ZipArchive;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Errors that can occur while reading a manuscript
#[derive(Error, Debug)]
pub enum ManuscriptError {
    #[error("Failed to read manuscript: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported manuscript format '.{0}'. Use .txt, .md, .html, .htm, .xhtml, .docx, .epub or .pdf")]
    UnsupportedFormat(String),

    #[error("Cannot tell the format of '{0}': the file name has no extension")]
    MissingExtension(String),

    #[error("Could not read '{name}': {reason}")]
    Malformed { name: String, reason: String },
}

fn malformed(name: &str, reason: impl Display) -> ManuscriptError {
    ManuscriptError::Malformed {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Plain text extracted from a manuscript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manuscript {
    /// Source file name
    pub name: String,
    pub text: String,
    /// Extraction notes, e.g. a decoding fallback
    pub notes: Vec<String>,
}

impl Manuscript {
    /// Wrap text that is already plain.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            notes: Vec::new(),
        }
    }

    /// Extract text from file contents; the extension of `name` picks the format.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, ManuscriptError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ManuscriptError::MissingExtension(name.to_string()))?;

        let mut notes = Vec::new();
        let text = match extension.as_str() {
            "txt" | "md" => decode(name, bytes, &mut notes),
            "html" | "htm" | "xhtml" => html_to_text(&decode(name, bytes, &mut notes)),
            "docx" => docx_to_text(name, bytes)?,
            "epub" => epub_to_text(name, bytes)?,
            "pdf" => pdf_to_text(name, bytes)?,
            other => return Err(ManuscriptError::UnsupportedFormat(other.to_string())),
        };
        let text = text.trim().to_string();

        if text.is_empty() && extension == "pdf" {
            notes.push(format!("'{}' has no extractable text. It may be an image-based PDF.", name));
        } else if text.is_empty() {
            notes.push(format!("'{}' appears to be empty; no text was extracted.", name));
        }

        tracing::debug!(file = name, format = %extension, chars = text.chars().count(), "manuscript extracted");

        Ok(Self {
            name: name.to_string(),
            text,
            notes,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManuscriptError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&name, &bytes)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The first `max_chars` characters of the text.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}

/// UTF-8, falling back to Latin-1 (which accepts every byte).
fn decode(name: &str, bytes: &[u8], notes: &mut Vec<String>) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            notes.push(format!("'{}' was decoded as Latin-1 because it is not valid UTF-8.", name));
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

/// One line per visible text node, whitespace collapsed.
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
            })
        })
        .map(|(_, text)| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn open_archive<'a>(name: &str, bytes: &'a [u8]) -> Result<ZipArchive<Cursor<&'a [u8]>>, ManuscriptError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| malformed(name, e))
}

/// A text entry of the archive; invalid UTF-8 is replaced.
fn read_entry(
    name: &str,
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<String, ManuscriptError> {
    let mut entry = archive
        .by_name(path)
        .map_err(|e| malformed(name, format!("{}: {}", path, e)))?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, String> {
    match element.try_get_attribute(key).map_err(|e| e.to_string())? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(|e| e.to_string())?.into_owned())),
        None => Ok(None),
    }
}

/// Paragraph text from a Word document, one line per `w:p`.
fn docx_to_text(name: &str, bytes: &[u8]) -> Result<String, ManuscriptError> {
    let mut archive = open_archive(name, bytes)?;
    let xml = read_entry(name, &mut archive, "word/document.xml")?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| malformed(name, e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            // Tab stops in paragraph properties are also `w:tab`; only runs carry text.
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape().map_err(|e| malformed(name, e))?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Manifest and reading order of an EPUB package document.
#[derive(Debug, Default)]
struct Package {
    /// id -> (href, media type)
    manifest: HashMap<String, (String, String)>,
    /// Manifest ids in document order
    manifest_order: Vec<String>,
    spine: Vec<String>,
}

impl Package {
    fn parse(opf: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(opf);
        let mut package = Package::default();

        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"item" => {
                        let (Some(id), Some(href)) = (attribute(&e, "id")?, attribute(&e, "href")?) else {
                            continue;
                        };
                        let media_type = attribute(&e, "media-type")?.unwrap_or_default();
                        package.manifest_order.push(id.clone());
                        package.manifest.insert(id, (href, media_type));
                    }
                    b"itemref" => {
                        if let Some(idref) = attribute(&e, "idref")? {
                            package.spine.push(idref);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(package)
    }

    /// Content documents in reading order; manifest order when the spine is empty.
    fn documents(&self) -> Vec<&str> {
        let order = if self.spine.is_empty() { &self.manifest_order } else { &self.spine };
        order
            .iter()
            .filter_map(|id| self.manifest.get(id))
            .filter(|(_, media_type)| media_type.contains("html"))
            .map(|(href, _)| href.split('#').next().unwrap_or(href))
            .collect()
    }
}

fn epub_to_text(name: &str, bytes: &[u8]) -> Result<String, ManuscriptError> {
    let mut archive = open_archive(name, bytes)?;
    let container = read_entry(name, &mut archive, "META-INF/container.xml")?;
    let package_path = rootfile_path(&container)
        .map_err(|e| malformed(name, e))?
        .ok_or_else(|| malformed(name, "container.xml names no package document"))?;
    let package = Package::parse(&read_entry(name, &mut archive, &package_path)?).map_err(|e| malformed(name, e))?;

    // Hrefs are relative to the package document.
    let base = package_path
        .rsplit_once('/')
        .map(|(dir, _)| format!("{}/", dir))
        .unwrap_or_default();

    let mut chapters = Vec::new();
    for href in package.documents() {
        let html = read_entry(name, &mut archive, &format!("{}{}", base, href))?;
        let text = html_to_text(&html);
        if !text.is_empty() {
            chapters.push(text);
        }
    }
    Ok(chapters.join("\n\n"))
}

fn rootfile_path(container: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(container);
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                return attribute(&e, "full-path");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn pdf_to_text(name: &str, bytes: &[u8]) -> Result<String, ManuscriptError> {
    // pdf-extract panics on some malformed files.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(malformed(name, format!("{:?}", e))),
        Err(_) => Err(malformed(name, "the PDF structure could not be parsed")),
    }
}
