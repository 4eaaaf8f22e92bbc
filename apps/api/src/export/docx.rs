//! DOCX export: a minimal OOXML package (document, styles, bullet numbering).

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::sections::Block;
use crate::export::ExportError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const BULLET_NUM_ID: &str = "1";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="21"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="60"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:sz w:val="40"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Subtitle"><w:name w:val="Subtitle"/><w:basedOn w:val="Normal"/><w:pPr><w:jc w:val="center"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="120" w:after="20"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr></w:style></w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

/// One rendered paragraph of the Word document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// Heading level 1 to 3.
    Heading { level: u8, text: String },
    Paragraph { text: String, centered: bool, italic: bool },
    Bullet(String),
}

/// Maps export blocks onto document nodes.
pub fn build_document(blocks: &[Block]) -> Vec<DocNode> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Name(name) => DocNode::Heading {
                level: 1,
                text: name.to_uppercase(),
            },
            Block::Headline(title) => DocNode::Paragraph {
                text: title.clone(),
                centered: true,
                italic: false,
            },
            Block::Contact(parts) => DocNode::Paragraph {
                text: parts.join(" • "),
                centered: true,
                italic: false,
            },
            Block::SectionTitle { title, .. } => DocNode::Heading {
                level: 2,
                text: title.to_uppercase(),
            },
            Block::EntryTitle(text) => DocNode::Heading {
                level: 3,
                text: text.clone(),
            },
            Block::EntryMeta(text) => DocNode::Paragraph {
                text: text.clone(),
                centered: false,
                italic: true,
            },
            Block::Paragraph(text) => DocNode::Paragraph {
                text: text.clone(),
                centered: false,
                italic: false,
            },
            Block::Bullet(text) => DocNode::Bullet(text.clone()),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// document.xml
// ────────────────────────────────────────────────────────────────────────────

fn xml_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Docx(e.to_string())
}

struct BodyWriter {
    xml: Writer<Vec<u8>>,
}

impl BodyWriter {
    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Start(elem)).map_err(xml_err)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Empty(elem)).map_err(xml_err)
    }

    fn end(&mut self, name: &str) -> Result<(), ExportError> {
        self.xml
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    fn paragraph(&mut self, node: &DocNode) -> Result<(), ExportError> {
        let (style, text, centered, italic) = match node {
            DocNode::Heading { level: 1, text } => ("Title", text, false, false),
            DocNode::Heading { level: 2, text } => ("Heading2", text, false, false),
            DocNode::Heading { text, .. } => ("Heading3", text, false, false),
            DocNode::Paragraph {
                text,
                centered,
                italic,
            } => ("Normal", text, *centered, *italic),
            DocNode::Bullet(text) => ("ListBullet", text, false, false),
        };

        self.start("w:p", &[])?;
        self.start("w:pPr", &[])?;
        self.empty("w:pStyle", &[("w:val", style)])?;
        if let DocNode::Bullet(_) = node {
            self.start("w:numPr", &[])?;
            self.empty("w:ilvl", &[("w:val", "0")])?;
            self.empty("w:numId", &[("w:val", BULLET_NUM_ID)])?;
            self.end("w:numPr")?;
        }
        if centered {
            self.empty("w:jc", &[("w:val", "center")])?;
        }
        self.end("w:pPr")?;

        self.start("w:r", &[])?;
        if italic {
            self.start("w:rPr", &[])?;
            self.empty("w:i", &[])?;
            self.end("w:rPr")?;
        }
        self.start("w:t", &[("xml:space", "preserve")])?;
        self.xml
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
        self.end("w:t")?;
        self.end("w:r")?;
        self.end("w:p")
    }
}

/// Serializes `word/document.xml`.
pub fn document_xml(nodes: &[DocNode]) -> Result<Vec<u8>, ExportError> {
    let mut body = BodyWriter {
        xml: Writer::new(Vec::new()),
    };
    body.xml
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    body.start("w:document", &[("xmlns:w", WORD_NS)])?;
    body.start("w:body", &[])?;
    for node in nodes {
        body.paragraph(node)?;
    }
    // A4 with 20 mm margins, in twentieths of a point.
    body.start("w:sectPr", &[])?;
    body.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    body.empty(
        "w:pgMar",
        &[
            ("w:top", "1134"),
            ("w:right", "1134"),
            ("w:bottom", "1134"),
            ("w:left", "1134"),
        ],
    )?;
    body.end("w:sectPr")?;
    body.end("w:body")?;
    body.end("w:document")?;
    Ok(body.xml.into_inner())
}

/// Packages the document into a `.docx` zip archive.
pub fn write_docx(nodes: &[DocNode]) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(nodes)?;
    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/numbering.xml", NUMBERING_XML.as_bytes()),
        ("word/document.xml", &document),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in parts {
        zip.start_file(name, options).map_err(xml_err)?;
        zip.write_all(data).map_err(xml_err)?;
    }
    Ok(zip.finish().map_err(xml_err)?.into_inner())
}
