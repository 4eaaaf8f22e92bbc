//! Shared section order and the block stream every renderer consumes.
//!
//! Text, DOCX and the PDF preview all walk the same `Vec<Block>`, so a section that
//! one format shows is shown by all of them, in the same place.

use crate::export::formatted::{FormattedCustomContent, FormattedExportModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Languages,
    Custom,
}

pub const SECTION_ORDER: [SectionKind; 10] = [
    SectionKind::Personal,
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Projects,
    SectionKind::Certifications,
    SectionKind::Achievements,
    SectionKind::Languages,
    SectionKind::Custom,
];

impl SectionKind {
    /// Display title; `None` for the personal header and custom sections, which carry
    /// their own.
    pub fn title(self) -> Option<&'static str> {
        match self {
            SectionKind::Personal | SectionKind::Custom => None,
            SectionKind::Summary => Some("Professional Summary"),
            SectionKind::Experience => Some("Experience"),
            SectionKind::Education => Some("Education"),
            SectionKind::Skills => Some("Skills"),
            SectionKind::Projects => Some("Projects"),
            SectionKind::Certifications => Some("Certifications"),
            SectionKind::Achievements => Some("Achievements"),
            SectionKind::Languages => Some("Languages"),
        }
    }

    pub fn has_content(self, model: &FormattedExportModel) -> bool {
        match self {
            SectionKind::Personal => {
                !model.personal.name.is_empty()
                    || !model.personal.title.is_empty()
                    || !model.personal.contact.is_empty()
            }
            SectionKind::Summary => !model.summary.is_empty(),
            SectionKind::Experience => !model.experience.is_empty(),
            SectionKind::Education => !model.education.is_empty(),
            SectionKind::Skills => !model.skills.is_empty(),
            SectionKind::Projects => !model.projects.is_empty(),
            SectionKind::Certifications => !model.certifications.is_empty(),
            SectionKind::Achievements => !model.achievements.is_empty(),
            SectionKind::Languages => !model.languages.is_empty(),
            SectionKind::Custom => !model.custom_sections.is_empty(),
        }
    }
}

/// How a section title is underlined in plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Underline {
    Fixed,
    TitleLength,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Name(String),
    Headline(String),
    Contact(Vec<String>),
    SectionTitle { title: String, underline: Underline },
    EntryTitle(String),
    EntryMeta(String),
    Paragraph(String),
    Bullet(String),
}

impl Block {
    pub fn text(&self) -> String {
        match self {
            Block::Contact(parts) => parts.join(" | "),
            Block::Name(s)
            | Block::Headline(s)
            | Block::EntryTitle(s)
            | Block::EntryMeta(s)
            | Block::Paragraph(s)
            | Block::Bullet(s) => s.clone(),
            Block::SectionTitle { title, .. } => title.clone(),
        }
    }
}

fn push_nonempty(blocks: &mut Vec<Block>, make: fn(String) -> Block, value: &str) {
    if !value.is_empty() {
        blocks.push(make(value.to_string()));
    }
}

/// One paragraph per non-blank line.
fn push_paragraphs(blocks: &mut Vec<Block>, text: &str) {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        blocks.push(Block::Paragraph(line.to_string()));
    }
}

fn section_title(title: &str) -> Block {
    Block::SectionTitle {
        title: title.to_string(),
        underline: Underline::Fixed,
    }
}

/// Flattens the model into blocks following `SECTION_ORDER`, skipping empty sections.
pub fn build_blocks(model: &FormattedExportModel) -> Vec<Block> {
    let mut blocks = Vec::new();
    for kind in SECTION_ORDER {
        if !kind.has_content(model) {
            continue;
        }
        if let Some(title) = kind.title() {
            blocks.push(section_title(title));
        }
        match kind {
            SectionKind::Personal => {
                let p = &model.personal;
                push_nonempty(&mut blocks, Block::Name, &p.name);
                push_nonempty(&mut blocks, Block::Headline, &p.title);
                if !p.contact.is_empty() {
                    blocks.push(Block::Contact(p.contact.clone()));
                }
            }
            SectionKind::Summary => push_paragraphs(&mut blocks, &model.summary),
            SectionKind::Experience => {
                for e in &model.experience {
                    blocks.push(Block::EntryTitle(e.title.clone()));
                    push_nonempty(&mut blocks, Block::EntryMeta, &e.organization);
                    push_nonempty(&mut blocks, Block::EntryMeta, &e.date_range);
                    push_paragraphs(&mut blocks, &e.description);
                    blocks.extend(e.highlights.iter().cloned().map(Block::Bullet));
                }
            }
            SectionKind::Education => {
                for e in &model.education {
                    blocks.push(Block::EntryTitle(e.degree.clone()));
                    push_nonempty(&mut blocks, Block::EntryMeta, &e.school);
                    push_nonempty(&mut blocks, Block::EntryMeta, &e.details);
                    push_paragraphs(&mut blocks, &e.description);
                }
            }
            SectionKind::Skills => {
                for c in &model.skills {
                    let label = c.category.trim();
                    let items = c.items.join(", ");
                    blocks.push(Block::Paragraph(if label.is_empty() {
                        items
                    } else {
                        format!("{label}: {items}")
                    }));
                }
            }
            SectionKind::Projects => {
                for p in &model.projects {
                    blocks.push(Block::EntryTitle(p.name.clone()));
                    push_nonempty(&mut blocks, Block::EntryMeta, &p.meta);
                    push_paragraphs(&mut blocks, &p.description);
                    if !p.technologies.is_empty() {
                        blocks.push(Block::Paragraph(format!(
                            "Technologies: {}",
                            p.technologies.join(", ")
                        )));
                    }
                    if let Some(url) = &p.url {
                        blocks.push(Block::Paragraph(format!("Link: {url}")));
                    }
                    blocks.extend(p.highlights.iter().cloned().map(Block::Bullet));
                }
            }
            SectionKind::Certifications => {
                blocks.extend(model.certifications.iter().cloned().map(Block::Bullet))
            }
            SectionKind::Achievements => {
                blocks.extend(model.achievements.iter().cloned().map(Block::Bullet))
            }
            SectionKind::Languages => {
                blocks.extend(model.languages.iter().cloned().map(Block::Bullet))
            }
            SectionKind::Custom => {
                for section in &model.custom_sections {
                    blocks.push(Block::SectionTitle {
                        title: section.title.clone(),
                        underline: Underline::TitleLength,
                    });
                    match &section.content {
                        FormattedCustomContent::Text(text) => push_paragraphs(&mut blocks, text),
                        FormattedCustomContent::List(items) => {
                            for item in items {
                                let mut lines = item.lines().map(str::trim).filter(|l| !l.is_empty());
                                if let Some(first) = lines.next() {
                                    blocks.push(Block::Bullet(first.to_string()));
                                }
                                blocks.extend(lines.map(|l| Block::Paragraph(l.to_string())));
                            }
                        }
                    }
                }
            }
        }
    }
    blocks
}
