//! Section/bullet parser for free-form resume text.
//!
//! Decomposes raw text into addressable items (experience or project entries) whose
//! bullets remember the exact line they came from, so edits can be spliced back into
//! the original buffer without touching anything else.

pub mod handlers;
pub mod headers;
pub mod parser;
pub mod render;

use serde::{Deserialize, Serialize};

pub use parser::parse_sections;
pub use render::render_items;

/// Bullet fragments shorter than this (in characters) are treated as noise.
pub const MIN_BULLET_CHARS: usize = 10;
/// Lines at least this long are prose, never item headers.
pub const MAX_ITEM_HEADER_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Experience,
    Project,
}

impl SectionType {
    /// Canonical header text used when re-rendering items.
    pub fn header(self) -> &'static str {
        match self {
            SectionType::Experience => "EXPERIENCE",
            SectionType::Project => "PROJECTS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBullet {
    /// Bullet text with its glyph prefix stripped.
    pub text: String,
    pub source_line_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub section_type: SectionType,
    /// Index of the item header line.
    pub source_line_index: usize,
    pub bullets: Vec<ParsedBullet>,
}

impl ParsedItem {
    /// Index of the last line belonging to this item: its last bullet, or the header.
    pub fn last_line_index(&self) -> usize {
        self.bullets
            .last()
            .map(|b| b.source_line_index)
            .unwrap_or(self.source_line_index)
    }
}
