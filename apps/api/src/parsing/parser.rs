//! Single-pass, line-oriented section parser.

use crate::parsing::headers::{
    classify_header, is_bullet_line, is_item_header, is_section_header, split_item_header,
    strip_bullet, HeaderKind,
};
use crate::parsing::{ParsedBullet, ParsedItem, SectionType, MIN_BULLET_CHARS};

/// Parses resume text into experience and project items.
///
/// Stateless and total: ambiguous input yields fewer items, never an error. Line
/// indices refer to the input split on `\n`.
pub fn parse_sections(text: &str) -> Vec<ParsedItem> {
    let mut items = Vec::new();
    let mut section: Option<SectionType> = None;
    let mut current: Option<ParsedItem> = None;

    for (index, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_bullet_line(line) {
            if let Some(item) = current.as_mut() {
                let bullet = strip_bullet(line);
                if bullet.chars().count() >= MIN_BULLET_CHARS {
                    item.bullets.push(ParsedBullet {
                        text: bullet.to_string(),
                        source_line_index: index,
                    });
                }
            }
            continue;
        }

        if is_section_header(trimmed) {
            flush(&mut items, current.take());
            section = match classify_header(trimmed) {
                HeaderKind::Section(kind) => Some(kind),
                HeaderKind::Skip | HeaderKind::Unknown => None,
            };
            continue;
        }

        if let Some(section_type) = section {
            if is_item_header(trimmed) {
                flush(&mut items, current.take());
                let (title, subtitle) = split_item_header(trimmed);
                current = Some(ParsedItem {
                    title,
                    subtitle,
                    section_type,
                    source_line_index: index,
                    bullets: Vec::new(),
                });
            }
        }
    }

    flush(&mut items, current);
    items
}

fn flush(items: &mut Vec<ParsedItem>, item: Option<ParsedItem>) {
    if let Some(item) = item {
        if item.title.trim().chars().count() > 2 {
            items.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::render_items;

    const SAMPLE: &str = "Jane Doe\n\
        jane@example.com\n\
        \n\
        SUMMARY\n\
        Backend engineer - 2015 onward.\n\
        \n\
        PROFESSIONAL EXPERIENCE\n\
        Acme Corp - Senior Engineer - 2021 - Present\n\
        • Reduced p99 latency by 40% across services\n\
        • Led migration to Kubernetes\n\
        - ok\n\
        Globex – Engineer (2018–2021)\n\
        * Built ingestion pipeline handling 2M events/day\n\
        \n\
        SKILLS\n\
        • Rust, Go, Python and friends\n\
        \n\
        Projects:\n\
        Tailor — 2023\n\
          - Resume tailoring service in Rust\n";

    #[test]
    fn test_acme_scenario() {
        let items = parse_sections("EXPERIENCE\nAcme Corp - Jan 2020 - Present\n• Built things\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Acme Corp");
        assert_eq!(items[0].subtitle.as_deref(), Some("Jan 2020 - Present"));
        assert_eq!(items[0].section_type, SectionType::Experience);
        assert_eq!(items[0].source_line_index, 1);
        assert_eq!(items[0].bullets.len(), 1);
        assert_eq!(items[0].bullets[0].text, "Built things");
        assert_eq!(items[0].bullets[0].source_line_index, 2);
    }

    #[test]
    fn test_empty_and_headerless_input() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("Acme Corp - 2020\n• Built the thing everyone uses\n").is_empty());
    }

    #[test]
    fn test_sample_resume_structure() {
        let items = parse_sections(SAMPLE);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Acme Corp", "Globex", "Tailor"]);

        assert_eq!(items[0].subtitle.as_deref(), Some("Senior Engineer - 2021 - Present"));
        // "ok" is below the minimum bullet length.
        assert_eq!(items[0].bullets.len(), 2);
        assert_eq!(items[1].bullets[0].source_line_index, 12);
        assert_eq!(items[2].section_type, SectionType::Project);
        assert_eq!(items[2].bullets[0].text, "Resume tailoring service in Rust");
    }

    #[test]
    fn test_skip_section_closes_open_item() {
        let items = parse_sections(SAMPLE);
        let globex = &items[1];
        assert_eq!(globex.bullets.len(), 1);
        assert!(items
            .iter()
            .all(|i| i.bullets.iter().all(|b| !b.text.contains("friends"))));
    }

    #[test]
    fn test_short_titles_are_discarded() {
        let items = parse_sections("EXPERIENCE\nAB - 2020\n• Did something notable\n");
        assert!(items.is_empty());
    }

    #[test]
    fn test_long_prose_with_year_is_not_an_item() {
        let prose = format!("EXPERIENCE\n{} in 2020\n", "word ".repeat(30));
        assert!(parse_sections(&prose).is_empty());
    }

    #[test]
    fn test_bullets_are_substrings_of_input() {
        for item in parse_sections(SAMPLE) {
            for bullet in item.bullets {
                assert!(SAMPLE.contains(&bullet.text), "missing: {}", bullet.text);
                let line = SAMPLE.split('\n').nth(bullet.source_line_index).unwrap();
                assert!(line.contains(&bullet.text));
            }
        }
    }

    fn shape(items: &[ParsedItem]) -> Vec<(String, Option<String>, SectionType, Vec<String>)> {
        items
            .iter()
            .map(|i| {
                (
                    i.title.clone(),
                    i.subtitle.clone(),
                    i.section_type,
                    i.bullets.iter().map(|b| b.text.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_reparse_of_rendered_items_is_idempotent() {
        let first = parse_sections(SAMPLE);
        let second = parse_sections(&render_items(&first));
        assert_eq!(shape(&first), shape(&second));

        let third = parse_sections(&render_items(&second));
        assert_eq!(second, third);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_sections(SAMPLE), parse_sections(SAMPLE));
    }
}
