//! Static glyph-width table for the sans-serif face used by the PDF preview.
//!
//! Widths are in em units. The table covers ASCII 0x20..=0x7E; index = (char as usize) - 32.
//! It is an approximation: the rasterizer picks whatever sans face is installed, so
//! wrapping leaves a small safety margin instead of trusting exact advances.

/// Fraction of the line width kept free to absorb metric error.
pub const WRAP_SAFETY_MARGIN: f32 = 0.03;
/// Bold glyphs run slightly wider than regular ones.
const BOLD_FACTOR: f32 = 1.06;
/// Fallback width for codepoints outside the table.
const AVERAGE_CHAR_WIDTH: f32 = 0.55;

#[rustfmt::skip]
static SANS_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.28, 0.28, 0.36, 0.56, 0.56, 0.89, 0.67, 0.19, 0.33, 0.33, 0.39, 0.58, 0.28, 0.33, 0.28, 0.28,
    // 0     1     2     3     4     5     6     7     8     9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.58, 0.58, 0.58, 0.56, 1.02,
    // A     B     C     D     E     F     G     H     I     J     K     L     M
    0.67, 0.67, 0.72, 0.72, 0.67, 0.61, 0.78, 0.72, 0.28, 0.50, 0.67, 0.56, 0.83,
    // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
    0.72, 0.78, 0.67, 0.78, 0.72, 0.67, 0.61, 0.72, 0.67, 0.94, 0.67, 0.67, 0.61,
    // [     \     ]     ^     _     `
    0.28, 0.28, 0.28, 0.47, 0.56, 0.33,
    // a     b     c     d     e     f     g     h     i     j     k     l     m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.28, 0.56, 0.56, 0.22, 0.22, 0.50, 0.22, 0.83,
    // n     o     p     q     r     s     t     u     v     w     x     y     z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.50, 0.28, 0.56, 0.50, 0.72, 0.50, 0.50, 0.50,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.58,
];

fn char_width(c: char) -> f32 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        SANS_WIDTHS[code - 32]
    } else {
        AVERAGE_CHAR_WIDTH
    }
}

/// Rendered width of `s` in pixels at `font_size` px.
pub fn measure_px(s: &str, font_size: f32, bold: bool) -> f32 {
    let em: f32 = s.chars().map(char_width).sum();
    let factor = if bold { BOLD_FACTOR } else { 1.0 };
    em * font_size * factor
}

/// Greedy word wrap at `max_width` px. Words wider than a whole line are split by
/// character.
pub fn wrap(text: &str, max_width: f32, font_size: f32, bold: bool) -> Vec<String> {
    let limit = max_width * (1.0 - WRAP_SAFETY_MARGIN);
    let space = measure_px(" ", font_size, bold);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = measure_px(word, font_size, bold);
        if word_width > limit {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for c in word.chars() {
                let w = measure_px(c.encode_utf8(&mut [0; 4]), font_size, bold);
                if current_width + w > limit && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width > limit {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_scales_with_font_size() {
        let small = measure_px("Resume", 10.0, false);
        let large = measure_px("Resume", 20.0, false);
        assert!((large - 2.0 * small).abs() < 1e-3);
        assert!(measure_px("Resume", 10.0, true) > small);
    }

    #[test]
    fn test_non_ascii_uses_average_width() {
        let w = measure_px("é", 10.0, false);
        assert!((w - AVERAGE_CHAR_WIDTH * 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_keeps_words_within_width() {
        let text = "Designed and shipped a distributed rate limiter used by every public API endpoint";
        let lines = wrap(text, 200.0, 11.0, false);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure_px(line, 11.0, false) <= 200.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let word = "x".repeat(80);
        let lines = wrap(&word, 100.0, 11.0, false);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap("   ", 100.0, 11.0, false).is_empty());
    }
}
