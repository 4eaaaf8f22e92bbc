//! Re-renders parsed items as canonical resume text.

use crate::parsing::headers::is_item_header;
use crate::parsing::ParsedItem;

const BULLET_GLYPH: &str = "• ";
/// Bare en dash: never longer than the separator it replaces.
const TITLE_SEPARATOR: &str = "–";

/// Renders items back to text that parses to the same items.
///
/// Consecutive items of the same section share one header line. Titles are joined
/// to subtitles with a bare en dash so the line always reads as an item header and
/// is never longer than the line it was parsed from.
pub fn render_items(items: &[ParsedItem]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut section = None;

    for item in items {
        if section != Some(item.section_type) {
            lines.push(item.section_type.header().to_string());
            section = Some(item.section_type);
        }

        let header = match &item.subtitle {
            Some(subtitle) => format!("{}{TITLE_SEPARATOR}{subtitle}", item.title),
            None if is_item_header(&item.title) => item.title.clone(),
            None => format!("{}{TITLE_SEPARATOR}", item.title),
        };
        lines.push(header);

        for bullet in &item.bullets {
            lines.push(format!("{BULLET_GLYPH}{}", bullet.text));
        }
    }

    lines.join("\n")
}
