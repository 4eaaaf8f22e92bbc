//! Line splicing for committed edits. Everything outside the touched line is preserved
//! byte for byte.

use crate::parsing::headers::bullet_prefix;

/// Glyph used for a new bullet when the item has none to copy from.
pub const DEFAULT_BULLET_PREFIX: &str = "• ";

/// Collapses any line breaks in a draft so one draft always occupies one line.
pub fn single_line(draft: &str) -> String {
    draft.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces the line at `index`, keeping the glyph prefix it was written with and its
/// `\r` if the text uses CRLF. Returns `None` when the index is out of range.
pub fn replace_line(text: &str, index: usize, draft: &str) -> Option<String> {
    let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
    let line = lines.get_mut(index)?;
    let prefix = bullet_prefix(line).unwrap_or_default().to_string();
    let cr = if line.ends_with('\r') { "\r" } else { "" };
    *line = format!("{prefix}{}{cr}", single_line(draft));
    Some(lines.join("\n"))
}

/// Inserts a new bullet line directly after line `after`, using `prefix` as its glyph.
/// The new line follows the text's CRLF or LF convention. Returns `None` when the index
/// is out of range.
pub fn insert_after(text: &str, after: usize, prefix: &str, draft: &str) -> Option<String> {
    let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
    if after >= lines.len() {
        return None;
    }
    let mut new_line = format!("{prefix}{}", single_line(draft));
    if lines[after].ends_with('\r') {
        new_line.push('\r');
    } else if after + 1 == lines.len() && text.contains("\r\n") {
        // the anchor was the unterminated last line; it now needs a CRLF break
        lines[after].push('\r');
    }
    lines.insert(after + 1, new_line);
    Some(lines.join("\n"))
}

/// Glyph prefix of the line at `index`, if that line is a bullet.
pub fn prefix_at(text: &str, index: usize) -> Option<String> {
    text.split('\n')
        .nth(index)
        .and_then(bullet_prefix)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "EXPERIENCE\nAcme Corp - 2020\n  - Built the billing service\n\nSKILLS";

    #[test]
    fn test_replace_preserves_prefix_and_line_count() {
        let out = replace_line(TEXT, 2, "Built the billing service in Rust").unwrap();
        assert_eq!(out.split('\n').count(), TEXT.split('\n').count());
        assert_eq!(out.split('\n').nth(2), Some("  - Built the billing service in Rust"));
        assert!(out.ends_with("\n\nSKILLS"));
    }

    #[test]
    fn test_replace_collapses_newlines() {
        let out = replace_line(TEXT, 2, "Line one\nline two").unwrap();
        assert_eq!(out.split('\n').count(), TEXT.split('\n').count());
        assert!(out.contains("  - Line one line two"));
    }

    #[test]
    fn test_insert_adds_exactly_one_line() {
        let out = insert_after(TEXT, 2, "  - ", "Cut costs by 20% with Terraform").unwrap();
        let lines: Vec<_> = out.split('\n').collect();
        assert_eq!(lines.len(), TEXT.split('\n').count() + 1);
        assert_eq!(lines[3], "  - Cut costs by 20% with Terraform");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_insert_after_last_line_of_text_without_trailing_newline() {
        let out = insert_after("EXPERIENCE\nAcme - 2020", 1, DEFAULT_BULLET_PREFIX, "New bullet").unwrap();
        assert_eq!(out, "EXPERIENCE\nAcme - 2020\n• New bullet");
    }

    #[test]
    fn test_crlf_text_keeps_crlf_line_endings() {
        let text = "EXPERIENCE\r\nAcme - 2020\r\n- Built billing\r\nSKILLS";
        let replaced = replace_line(text, 2, "Built billing in Rust").unwrap();
        assert_eq!(replaced, "EXPERIENCE\r\nAcme - 2020\r\n- Built billing in Rust\r\nSKILLS");

        let inserted = insert_after(text, 2, "- ", "Cut costs by 20%").unwrap();
        assert_eq!(
            inserted,
            "EXPERIENCE\r\nAcme - 2020\r\n- Built billing\r\n- Cut costs by 20%\r\nSKILLS"
        );

        let at_end = insert_after("EXPERIENCE\r\nAcme - 2020", 1, "• ", "New bullet").unwrap();
        assert_eq!(at_end, "EXPERIENCE\r\nAcme - 2020\r\n• New bullet");
        assert_eq!(at_end.matches('\n').count(), at_end.matches("\r\n").count());
    }

    #[test]
    fn test_out_of_range_indices() {
        assert!(replace_line(TEXT, 99, "x").is_none());
        assert!(insert_after(TEXT, 99, "• ", "x").is_none());
    }

    #[test]
    fn test_prefix_at() {
        assert_eq!(prefix_at(TEXT, 2).as_deref(), Some("  - "));
        assert_eq!(prefix_at(TEXT, 1), None);
    }
}
