//! Lays out export blocks as an A4-width SVG preview (794 CSS px wide, 20 mm padding).
//! The PDF exporter rasterizes this document; its height grows with the content.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::export::metrics::wrap;
use crate::export::sections::Block;

pub const PAGE_WIDTH_PX: u32 = 794;
pub const PAGE_HEIGHT_PX: u32 = 1123;
/// 20 mm at 96 dpi.
pub const PADDING_PX: f32 = 75.6;

const FONT_FAMILY: &str = "Helvetica, Arial, 'Liberation Sans', 'DejaVu Sans', sans-serif";
const LINE_HEIGHT: f32 = 1.4;
const BULLET_INDENT_PX: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    bold: bool,
    italic: bool,
    color: &'static str,
    align: Align,
    space_before: f32,
}

impl TextStyle {
    const fn body(size: f32) -> Self {
        TextStyle {
            size,
            bold: false,
            italic: false,
            color: "#222222",
            align: Align::Left,
            space_before: 0.0,
        }
    }
}

fn style_for(block: &Block) -> TextStyle {
    match block {
        Block::Name(_) => TextStyle {
            bold: true,
            align: Align::Center,
            color: "#111111",
            ..TextStyle::body(26.0)
        },
        Block::Headline(_) => TextStyle {
            align: Align::Center,
            color: "#444444",
            space_before: 2.0,
            ..TextStyle::body(15.0)
        },
        Block::Contact(_) => TextStyle {
            align: Align::Center,
            color: "#444444",
            space_before: 4.0,
            ..TextStyle::body(11.0)
        },
        Block::SectionTitle { .. } => TextStyle {
            bold: true,
            color: "#111111",
            space_before: 16.0,
            ..TextStyle::body(14.0)
        },
        Block::EntryTitle(_) => TextStyle {
            bold: true,
            space_before: 8.0,
            ..TextStyle::body(12.5)
        },
        Block::EntryMeta(_) => TextStyle {
            italic: true,
            color: "#555555",
            ..TextStyle::body(11.0)
        },
        Block::Paragraph(_) | Block::Bullet(_) => TextStyle::body(11.0),
    }
}

#[derive(Debug, Clone)]
pub struct PreviewDocument {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

struct Canvas {
    body: String,
    y: f32,
}

impl Canvas {
    fn text(&mut self, x: f32, baseline: f32, style: &TextStyle, content: &str) {
        let anchor = match style.align {
            Align::Left => "start",
            Align::Center => "middle",
        };
        let _ = write!(
            self.body,
            r#"<text x="{x:.1}" y="{baseline:.1}" font-family="{FONT_FAMILY}" font-size="{size}" fill="{color}" text-anchor="{anchor}"{weight}{slant}>{content}</text>"#,
            size = style.size,
            color = style.color,
            weight = if style.bold { r#" font-weight="bold""# } else { "" },
            slant = if style.italic { r#" font-style="italic""# } else { "" },
            content = escape(content),
        );
    }

    fn rule(&mut self, y: f32) {
        let _ = write!(
            self.body,
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#333333" stroke-width="1"/>"##,
            x1 = PADDING_PX,
            x2 = PAGE_WIDTH_PX as f32 - PADDING_PX,
        );
    }

    /// Writes wrapped lines starting at the current cursor and advances it.
    fn lines(&mut self, x: f32, width: f32, style: &TextStyle, content: &str) -> usize {
        let line_height = style.size * LINE_HEIGHT;
        let wrapped = wrap(content, width, style.size, style.bold);
        for line in &wrapped {
            self.text(x, self.y + style.size, style, line);
            self.y += line_height;
        }
        wrapped.len()
    }
}

/// Renders `blocks` into a standalone SVG document.
pub fn render_preview(blocks: &[Block]) -> PreviewDocument {
    let content_width = PAGE_WIDTH_PX as f32 - 2.0 * PADDING_PX;
    let center_x = PAGE_WIDTH_PX as f32 / 2.0;
    let mut canvas = Canvas {
        body: String::new(),
        y: PADDING_PX,
    };

    for (i, block) in blocks.iter().enumerate() {
        let style = style_for(block);
        if i > 0 {
            canvas.y += style.space_before;
        }
        match block {
            Block::SectionTitle { title, .. } => {
                canvas.lines(PADDING_PX, content_width, &style, &title.to_uppercase());
                let rule_y = canvas.y - style.size * 0.2;
                canvas.rule(rule_y);
                canvas.y += 4.0;
            }
            Block::Bullet(text) => {
                let marker_baseline = canvas.y + style.size;
                canvas.text(PADDING_PX + 2.0, marker_baseline, &style, "•");
                canvas.lines(
                    PADDING_PX + BULLET_INDENT_PX,
                    content_width - BULLET_INDENT_PX,
                    &style,
                    text,
                );
            }
            _ if style.align == Align::Center => {
                canvas.lines(center_x, content_width, &style, &block.text());
            }
            _ => {
                canvas.lines(PADDING_PX, content_width, &style, &block.text());
            }
        }
    }

    let height = ((canvas.y + PADDING_PX).ceil() as u32).max(PAGE_HEIGHT_PX);
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="#ffffff"/>{body}</svg>"##,
        w = PAGE_WIDTH_PX,
        h = height,
        body = canvas.body,
    );
    PreviewDocument {
        svg,
        width: PAGE_WIDTH_PX,
        height,
    }
}
