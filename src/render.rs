//! DOCX and PDF output for generated documents

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;

use crate::config::Settings;
use crate::error::Error;

/// Paragraphs containing any of these (upper-cased) are set in bold
const EMPHASIS_KEYWORDS: [&str; 6] =
[   "SUBJECT:"
  , "FROM:"
  , "TO:"
  , "DATE:"
  , "REFERENCE"
  , "MINUTES OF MEETING"
];

// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 90;
const MARGIN_RIGHT: i64 = 72;
const MARGIN_TOP: i64 = 72;
const MARGIN_BOTTOM: i64 = 18;
const BODY_SIZE: i64 = 11;
const BODY_LEADING: i64 = 16;
const PARAGRAPH_GAP: i64 = 19;
const HEADER_SIZE: i64 = 14;
const HEADER_LEADING: i64 = 18;
const HEADER_GAP: i64 = 44;

/// Paths of the two files written for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedFiles
{   pub docx_path: Option<String>
  , pub pdf_path: Option<String>
}

#[derive(Debug, Clone, PartialEq)]
struct Paragraph
{   text: String
  , bold: bool
}

/// Writes DOCX and PDF files under an output directory, headed with
/// the department and state names.
#[derive(Debug, Clone)]
pub struct Renderer
{   output_dir: PathBuf
  , department: String
  , state: String
}

impl Renderer
{   pub fn new(settings: &Settings) -> Result<Self, Error>
    {   Renderer::with_header(
          &settings.output_dir
        , &settings.department_name
        , &settings.state_name
        )
    }

    /// Creates `output_dir` if needed
    pub fn with_header(
      output_dir: impl AsRef<Path>
    , department: &str
    , state: &str
    ) -> Result<Self, Error>
    {   let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|e| {
          Error::Render(format!(
            "cannot create {}: {}", output_dir.display(), e
          ))
        })?;
        Ok(Renderer
        {   output_dir
          , department: department.to_string()
          , state: state.to_string()
        })
    }

    /// Write both formats for a document and return their paths
    pub fn render(
      &self
    , text: &str
    , document_type: &str
    , id: &str
    ) -> Result<RenderedFiles, Error>
    {   let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let stem = format!("{}_{}_{}", document_type, id, stamp);

        let docx_path = self.output_dir.join(format!("{}.docx", stem));
        write_file(&docx_path, &self.docx_bytes(text)?)?;

        let pdf_path = self.output_dir.join(format!("{}.pdf", stem));
        write_file(&pdf_path, &self.pdf_bytes(text)?)?;

        debug!(
          "Rendered {} and {}",
          docx_path.display(), pdf_path.display()
        );
        Ok(RenderedFiles
        {   docx_path: Some(docx_path.to_string_lossy().into_owned())
          , pdf_path: Some(pdf_path.to_string_lossy().into_owned())
        })
    }

    /// Minimal WordprocessingML package
    pub fn docx_bytes(&self, text: &str) -> Result<Vec<u8>, Error>
    {   let document = self.document_xml(text)?;

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
          .compression_method(zip::CompressionMethod::Deflated);
        let parts: [(&str, &[u8]); 3] =
        [   ("[Content_Types].xml", DOCX_CONTENT_TYPES.as_bytes())
          , ("_rels/.rels", DOCX_RELS.as_bytes())
          , ("word/document.xml", &document)
        ];
        for (name, content) in parts
        {   zip.start_file(name, options).map_err(render_error)?;
            zip.write_all(content).map_err(render_error)?;
        }
        let cursor = zip.finish().map_err(render_error)?;
        Ok(cursor.into_inner())
    }

    /// `word/document.xml`: centred bold header, blank line, then one
    /// `w:p` per paragraph
    fn document_xml(&self, text: &str) -> Result<Vec<u8>, Error>
    {   let mut w = Writer::new(Cursor::new(Vec::new()));
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
          .map_err(render_error)?;
        open(&mut w, "w:document", &[("xmlns:w", WORD_NS)])?;
        open(&mut w, "w:body", &[])?;

        open(&mut w, "w:p", &[])?;
        open(&mut w, "w:pPr", &[])?;
        empty(&mut w, "w:jc", &[("w:val", "center")])?;
        close(&mut w, "w:pPr")?;
        open(&mut w, "w:r", &[])?;
        open(&mut w, "w:rPr", &[])?;
        empty(&mut w, "w:b", &[])?;
        empty(&mut w, "w:sz", &[("w:val", "28")])?;
        close(&mut w, "w:rPr")?;
        text_lines(&mut w, &format!("{}\n{}", self.department, self.state))?;
        close(&mut w, "w:r")?;
        close(&mut w, "w:p")?;
        empty(&mut w, "w:p", &[])?;

        for paragraph in paragraphs(text)
        {   open(&mut w, "w:p", &[])?;
            open(&mut w, "w:pPr", &[])?;
            empty(&mut w, "w:spacing",
              &[("w:after", "120"), ("w:line", "360"), ("w:lineRule", "auto")])?;
            close(&mut w, "w:pPr")?;
            open(&mut w, "w:r", &[])?;
            if paragraph.bold
            {   open(&mut w, "w:rPr", &[])?;
                empty(&mut w, "w:b", &[])?;
                close(&mut w, "w:rPr")?;
            }
            text_lines(&mut w, &paragraph.text)?;
            close(&mut w, "w:r")?;
            close(&mut w, "w:p")?;
        }

        open(&mut w, "w:sectPr", &[])?;
        empty(&mut w, "w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
        empty(&mut w, "w:pgMar",
        &[  ("w:top", "1440"), ("w:right", "1440"), ("w:bottom", "1440")
          , ("w:left", "1800"), ("w:header", "720"), ("w:footer", "720")
          , ("w:gutter", "0")
        ])?;
        close(&mut w, "w:sectPr")?;
        close(&mut w, "w:body")?;
        close(&mut w, "w:document")?;

        Ok(w.into_inner().into_inner())
    }

    /// A4 PDF using the standard Helvetica faces
    pub fn pdf_bytes(&self, text: &str) -> Result<Vec<u8>, Error>
    {   let mut pages: Vec<Vec<Operation>> = vec![vec![]];
        let mut y = PAGE_HEIGHT - MARGIN_TOP;

        for line in [&self.department, &self.state]
        {   y -= HEADER_LEADING;
            let width = approx_width(line, HEADER_SIZE);
            let x = ((PAGE_WIDTH - width) / 2).max(MARGIN_LEFT);
            push_line(&mut pages, "F2", HEADER_SIZE, x, y, line);
        }
        y -= HEADER_GAP;

        let max_chars = ((PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT) * 2
          / BODY_SIZE) as usize;
        for paragraph in paragraphs(text)
        {   let font = if paragraph.bold { "F2" } else { "F1" };
            for source_line in paragraph.text.lines()
            {   for line in wrap(source_line, max_chars)
                {   if y - BODY_LEADING < MARGIN_BOTTOM
                    {   pages.push(vec![]);
                        y = PAGE_HEIGHT - MARGIN_TOP;
                    }
                    y -= BODY_LEADING;
                    push_line(&mut pages, font, BODY_SIZE, MARGIN_LEFT, y, &line);
                }
            }
            y -= PARAGRAPH_GAP;
        }

        let replaced = unencodable_count(&self.department)
          + unencodable_count(&self.state)
          + unencodable_count(text);
        if replaced > 0
        {   warn!(
              "{} characters outside Latin-1 replaced with '?' in PDF",
              replaced
            );
        }

        build_pdf(pages)
    }
}

const WORD_NS: &str 
  = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn open(w: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<(), Error>
{   let start = BytesStart::new(tag).with_attributes(attrs.iter().copied());
    w.write_event(Event::Start(start)).map_err(render_error)
}

fn close(w: &mut XmlWriter, tag: &str) -> Result<(), Error>
{   w.write_event(Event::End(BytesEnd::new(tag))).map_err(render_error)
}

fn empty(w: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<(), Error>
{   let element = BytesStart::new(tag).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(element)).map_err(render_error)
}

/// `<w:t>` runs with `<w:br/>` for single newlines
fn text_lines(w: &mut XmlWriter, text: &str) -> Result<(), Error>
{   for (i, line) in text.split('\n').enumerate()
    {   if i > 0
        {   empty(w, "w:br", &[])?;
        }
        open(w, "w:t", &[("xml:space", "preserve")])?;
        w.write_event(Event::Text(BytesText::new(line))).map_err(render_error)?;
        close(w, "w:t")?;
    }
    Ok(())
}

const DOCX_CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" \
ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const DOCX_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
Target=\"word/document.xml\"/>\
</Relationships>";

fn render_error<E: std::fmt::Display>(e: E) -> Error
{   error!("Render failed: {}", e);
    Error::Render(e.to_string())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), Error>
{   std::fs::write(path, bytes).map_err(|e| {
      Error::Render(format!("cannot write {}: {}", path.display(), e))
    })
}

/// Split on blank lines; keep trimmed, non-empty paragraphs
fn paragraphs(text: &str) -> Vec<Paragraph>
{   text.split("\n\n")
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .map(|p| {
        let upper = p.to_uppercase();
        Paragraph
        {   bold: EMPHASIS_KEYWORDS.iter().any(|k| upper.contains(k))
          , text: p.to_string()
        }
      })
      .collect()
}

/// Greedy word wrap; words longer than a line are split
fn wrap(line: &str, max_chars: usize) -> Vec<String>
{   let max_chars = max_chars.max(1);
    let mut lines = vec![];
    let mut current = String::new();

    for word in line.split_whitespace()
    {   let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars
        {   if !current.is_empty()
            {   lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty()
        {   word.chars().count()
        } else
        {   current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty()
        {   lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty()
        {   current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty()
    {   lines.push(current);
    }
    lines
}

/// Rough Helvetica width: half an em per character
fn approx_width(text: &str, size: i64) -> i64
{   text.chars().count() as i64 * size / 2
}

fn latin1(c: char) -> Option<u8>
{   let code = c as u32;
    if (0x20..0x7f).contains(&code) || (0xa0..=0xff).contains(&code)
    {   Some(code as u8)
    } else
    {   None
    }
}

/// WinAnsi bytes; anything outside Latin-1 becomes '?'
fn win_ansi(text: &str) -> Vec<u8>
{   text.chars().map(|c| latin1(c).unwrap_or(b'?')).collect()
}

/// Characters `win_ansi` would replace in drawn text; whitespace is
/// consumed by wrapping and never drawn
fn unencodable_count(text: &str) -> usize
{   text.chars()
      .filter(|c| !c.is_whitespace() && latin1(*c).is_none())
      .count()
}

fn push_line(
  pages: &mut Vec<Vec<Operation>>
, font: &str
, size: i64
, x: i64
, y: i64
, text: &str
)
{   let ops = vec![
      Operation::new("BT", vec![])
    , Operation::new("Tf", vec![font.into(), Object::Integer(size)])
    , Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)])
    , Operation::new("Tj", vec![Object::string_literal(win_ansi(text))])
    , Operation::new("ET", vec![])
    ];
    if let Some(page) = pages.last_mut()
    {   page.extend(ops);
    }
}

fn build_pdf(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, Error>
{   let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
      "Type" => "Font",
      "Subtype" => "Type1",
      "BaseFont" => "Helvetica",
      "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
      "Type" => "Font",
      "Subtype" => "Type1",
      "BaseFont" => "Helvetica-Bold",
      "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
      "Font" => dictionary! {
        "F1" => regular_id,
        "F2" => bold_id,
      },
    });

    let mut kids: Vec<Object> = vec![];
    for operations in pages
    {   let content = Content { operations };
        let encoded = content.encode().map_err(render_error)?;
        let content_id = doc.add_object(
          Stream::new(dictionary! {}, encoded)
        );
        let page_id = doc.add_object(dictionary! {
          "Type" => "Page",
          "Parent" => pages_id,
          "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources_id,
      "MediaBox" => vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(PAGE_WIDTH),
        Object::Integer(PAGE_HEIGHT),
      ],
    }));
    let catalog_id = doc.add_object(dictionary! {
      "Type" => "Catalog",
      "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(render_error)?;
    Ok(bytes)
}
