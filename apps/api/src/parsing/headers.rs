//! Line classification: section headers, item headers, bullet prefixes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::{SectionType, MAX_ITEM_HEADER_CHARS};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("valid year regex"));
static PRESENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(present|current)\b").expect("valid present regex"));
/// First title/subtitle separator: a spaced hyphen or dash, or a bare en/em dash.
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-–—]\s+|[–—]").expect("valid separator regex"));
/// Glyph prefix of a bullet line, including surrounding whitespace.
pub static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[•\-\*]\s*").expect("valid bullet regex"));

const EXPERIENCE_PHRASES: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "work",
    "internships",
    "career history",
    "professional background",
];

const PROJECT_PHRASES: &[&str] = &[
    "projects",
    "project",
    "personal projects",
    "key projects",
    "side projects",
    "academic projects",
    "open source",
];

const SKIP_PHRASES: &[&str] = &[
    "skills",
    "education",
    "certifications",
    "summary",
    "objective",
    "contact",
    "interests",
    "languages",
    "references",
    "awards",
    "honors",
];

/// What a section header switches the parser into. `Skip` and `Unknown` both close
/// the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Section(SectionType),
    Skip,
    Unknown,
}

pub fn is_bullet_line(line: &str) -> bool {
    BULLET_PREFIX_RE.is_match(line)
}

/// Returns the glyph prefix of a bullet line exactly as written.
pub fn bullet_prefix(line: &str) -> Option<&str> {
    BULLET_PREFIX_RE.find(line).map(|m| m.as_str())
}

/// Strips the glyph prefix and trailing whitespace from a bullet line.
pub fn strip_bullet(line: &str) -> &str {
    BULLET_PREFIX_RE
        .find(line)
        .map(|m| &line[m.end()..])
        .unwrap_or(line)
        .trim_end()
}

/// A trimmed non-bullet line is a section header when it ends with a colon or is
/// written entirely in capitals (spaces, `&` and `/` allowed).
pub fn is_section_header(trimmed: &str) -> bool {
    if trimmed.is_empty() || is_bullet_line(trimmed) {
        return false;
    }
    if trimmed.ends_with(':') {
        return true;
    }
    trimmed.chars().count() >= 2
        && trimmed.chars().any(char::is_alphabetic)
        && trimmed
            .chars()
            .all(|c| c.is_uppercase() || matches!(c, ' ' | '&' | '/'))
}

/// Classifies a section header by phrase-wise, case-insensitive keyword match.
pub fn classify_header(trimmed: &str) -> HeaderKind {
    let words: Vec<String> = trimmed
        .trim_end_matches(':')
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    if contains_any(&words, PROJECT_PHRASES) {
        HeaderKind::Section(SectionType::Project)
    } else if contains_any(&words, EXPERIENCE_PHRASES) {
        HeaderKind::Section(SectionType::Experience)
    } else if contains_any(&words, SKIP_PHRASES) {
        HeaderKind::Skip
    } else {
        HeaderKind::Unknown
    }
}

fn contains_any(words: &[String], phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| {
        let needle: Vec<&str> = phrase.split(' ').collect();
        words
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
    })
}

/// A non-bullet line inside a recognized section starts a new item when it carries a
/// date marker (year, present/current, en/em dash) and is short enough to be a header.
pub fn is_item_header(trimmed: &str) -> bool {
    trimmed.chars().count() < MAX_ITEM_HEADER_CHARS
        && (YEAR_RE.is_match(trimmed)
            || PRESENT_RE.is_match(trimmed)
            || trimmed.contains(|c: char| matches!(c, '–' | '—')))
}

/// Splits an item header at its first separator into title and optional subtitle.
pub fn split_item_header(trimmed: &str) -> (String, Option<String>) {
    match SEPARATOR_RE.find(trimmed) {
        Some(sep) => {
            let title = trimmed[..sep.start()].trim().to_string();
            let subtitle = trimmed[sep.end()..].trim();
            let subtitle = (!subtitle.is_empty()).then(|| subtitle.to_string());
            (title, subtitle)
        }
        None => (trimmed.to_string(), None),
    }
}
