//! Plain-text export.

use crate::export::sections::{Block, Underline};

pub const UNDERLINE_WIDTH: usize = 50;
const BULLET: &str = "• ";

pub fn render_text(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut entry_seen = false;

    for block in blocks {
        match block {
            Block::Name(s) | Block::Headline(s) => lines.push(s.clone()),
            Block::Contact(parts) => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(parts.join(" | "));
            }
            Block::SectionTitle { title, underline } => {
                entry_seen = false;
                if lines.last().is_some_and(|l| !l.is_empty()) {
                    lines.push(String::new());
                }
                let width = match underline {
                    Underline::Fixed => UNDERLINE_WIDTH,
                    Underline::TitleLength => title.chars().count(),
                };
                lines.push(title.to_uppercase());
                lines.push("=".repeat(width));
            }
            Block::EntryTitle(s) => {
                if entry_seen {
                    lines.push(String::new());
                }
                entry_seen = true;
                lines.push(s.clone());
            }
            Block::EntryMeta(s) | Block::Paragraph(s) => lines.push(s.clone()),
            Block::Bullet(s) => lines.push(format!("{BULLET}{s}")),
        }
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::formatted::format_resume_data;
    use crate::export::sections::build_blocks;
    use crate::models::resume::{
        CanonicalResume, CustomSection, CustomSectionBody, ExperienceEntry, PersonalInfo,
    };

    fn text_for(resume: &CanonicalResume) -> String {
        render_text(&build_blocks(&format_resume_data(resume)))
    }

    #[test]
    fn test_empty_resume_has_only_personal_header() {
        let resume = CanonicalResume {
            personal: PersonalInfo {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(text_for(&resume), "Ada Lovelace\n\nada@example.com | 555-0100\n");
        assert_eq!(text_for(&CanonicalResume::default()), "");
    }

    #[test]
    fn test_sections_underlined_and_separated() {
        let resume = CanonicalResume {
            personal: PersonalInfo {
                name: "Ada".to_string(),
                ..Default::default()
            },
            summary: "Builds things.".to_string(),
            experience: vec![
                ExperienceEntry {
                    title: "Engineer".to_string(),
                    organization: "Acme".to_string(),
                    start_date: "2020-01".to_string(),
                    bullets: vec!["Cut latency by 30%".to_string()],
                    ..Default::default()
                },
                ExperienceEntry {
                    title: "Intern".to_string(),
                    organization: "Initech".to_string(),
                    start_date: "2019-06".to_string(),
                    end_date: "2019-09".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let expected = format!(
            "Ada\n\nPROFESSIONAL SUMMARY\n{rule}\nBuilds things.\n\nEXPERIENCE\n{rule}\n\
             Engineer\nAcme\nJan 2020 - Present\n• Cut latency by 30%\n\n\
             Intern\nInitech\nJun 2019 - Sep 2019\n",
            rule = "=".repeat(50)
        );
        assert_eq!(text_for(&resume), expected);
    }

    #[test]
    fn test_custom_section_underline_matches_title() {
        let resume = CanonicalResume {
            custom_sections: vec![CustomSection {
                title: "Hobbies".to_string(),
                body: CustomSectionBody::List(vec!["Chess".to_string()]),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(text_for(&resume), "HOBBIES\n=======\n• Chess\n");
    }
}
