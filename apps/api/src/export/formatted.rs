//! Display-ready view of a canonical resume. Every export format renders from this
//! model so dates, contact lines and custom sections read the same everywhere.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{
    CanonicalResume, CustomSectionBody, PersonalLink, SkillCategory,
};

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{1,2}$").expect("valid year-month regex"));
static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{4}$").expect("valid month-year regex"));

pub const PRESENT: &str = "Present";

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedPersonal {
    pub name: String,
    pub title: String,
    /// Email, phone, location, then each link with its scheme stripped.
    pub contact: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedExperience {
    pub title: String,
    /// "Company, Location" with empty parts dropped.
    pub organization: String,
    pub date_range: String,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedEducation {
    pub degree: String,
    pub school: String,
    /// Date range followed by `GPA: x` when a GPA is present.
    pub details: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedProject {
    pub name: String,
    /// Role and date range, either may be empty.
    pub meta: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormattedCustomContent {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedCustomSection {
    pub title: String,
    pub content: FormattedCustomContent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedExportModel {
    pub personal: FormattedPersonal,
    pub summary: String,
    pub experience: Vec<FormattedExperience>,
    pub education: Vec<FormattedEducation>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<FormattedProject>,
    /// `name, issuer (date)` lines.
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
    pub languages: Vec<String>,
    pub custom_sections: Vec<FormattedCustomSection>,
}

// ────────────────────────────────────────────────────────────────────────────
// Dates
// ────────────────────────────────────────────────────────────────────────────

/// Renders ISO-like dates as `Mon YYYY` and `present`/`current` as `Present`.
/// Anything unrecognised comes back trimmed but otherwise untouched.
pub fn format_date(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    let lower = value.to_lowercase();
    if lower == "present" || lower == "current" {
        return PRESENT.to_string();
    }
    parse_date(value)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y/%m/%d") {
        return Some(date);
    }
    if YEAR_MONTH_RE.is_match(value) {
        return NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok();
    }
    if MONTH_YEAR_RE.is_match(value) {
        return NaiveDate::parse_from_str(&format!("01/{value}"), "%d/%m/%Y").ok();
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// `start - end`, collapsing to whichever side is present.
fn date_range(start: &str, end: &str) -> String {
    let start = format_date(start);
    let end = format_date(end);
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (false, true) => start,
        (true, _) => end,
    }
}

fn end_or_present(end: &str, current: bool) -> &str {
    if current || end.trim().is_empty() {
        PRESENT
    } else {
        end
    }
}

fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn strip_scheme(url: &str) -> &str {
    let url = url.trim();
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .trim_end_matches('/')
}

fn trimmed_lines(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

pub fn format_resume_data(resume: &CanonicalResume) -> FormattedExportModel {
    FormattedExportModel {
        personal: format_personal(resume),
        summary: resume.summary.trim().to_string(),
        experience: resume
            .experience
            .iter()
            .map(|e| FormattedExperience {
                title: e.title.trim().to_string(),
                organization: join_present(
                    &[&e.organization, e.location.as_deref().unwrap_or_default()],
                    ", ",
                ),
                date_range: date_range(&e.start_date, end_or_present(&e.end_date, e.current)),
                description: e.description.trim().to_string(),
                highlights: trimmed_lines(&e.bullets),
            })
            .collect(),
        education: resume
            .education
            .iter()
            .map(|e| {
                let end = if e.current { PRESENT } else { e.end_date.as_str() };
                let gpa = e
                    .gpa
                    .as_deref()
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(|g| format!("GPA: {g}"))
                    .unwrap_or_default();
                let degree = if e.field_of_study.trim().is_empty() {
                    e.degree.trim().to_string()
                } else {
                    join_present(&[&e.degree, &e.field_of_study], " in ")
                };
                FormattedEducation {
                    degree,
                    school: join_present(&[&e.school, &e.location], ", "),
                    details: join_present(&[&date_range(&e.start_date, end), &gpa], " | "),
                    description: e.description.trim().to_string(),
                }
            })
            .collect(),
        skills: resume
            .skills
            .iter()
            .filter(|c| !c.items.is_empty())
            .cloned()
            .collect(),
        projects: resume
            .projects
            .iter()
            .map(|p| FormattedProject {
                name: p.title.trim().to_string(),
                meta: join_present(
                    &[&p.organization, &date_range(&p.start_date, &p.end_date)],
                    " | ",
                ),
                description: p.description.trim().to_string(),
                technologies: trimmed_lines(&p.technologies),
                url: p
                    .url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .map(String::from),
                highlights: trimmed_lines(&p.bullets),
            })
            .collect(),
        certifications: resume
            .certifications
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .map(|c| {
                let head = join_present(&[&c.name, &c.issuer], ", ");
                let date = format_date(&c.date);
                if date.is_empty() {
                    head
                } else {
                    format!("{head} ({date})")
                }
            })
            .collect(),
        achievements: resume
            .achievements
            .iter()
            .filter_map(|a| {
                let date = format_date(&a.date);
                let head = match (a.title.trim(), date.is_empty()) {
                    ("", _) => String::new(),
                    (title, true) => title.to_string(),
                    (title, false) => format!("{title} ({date})"),
                };
                let line = join_present(&[&head, &a.description], ": ");
                (!line.is_empty()).then_some(line)
            })
            .collect(),
        languages: resume
            .languages
            .iter()
            .filter(|l| !l.language.trim().is_empty())
            .map(|l| match l.proficiency.trim() {
                "" => l.language.trim().to_string(),
                level => format!("{} ({level})", l.language.trim()),
            })
            .collect(),
        custom_sections: resume
            .custom_sections
            .iter()
            .filter(|s| !s.body.is_empty())
            .map(|s| FormattedCustomSection {
                title: s.title.trim().to_string(),
                content: match &s.body {
                    CustomSectionBody::Text(text) => FormattedCustomContent::Text(text.trim().to_string()),
                    CustomSectionBody::List(items) => FormattedCustomContent::List(trimmed_lines(items)),
                    CustomSectionBody::Entries(entries) => FormattedCustomContent::List(
                        entries
                            .iter()
                            .map(|e| {
                                let head = join_present(
                                    &[&e.title, &e.subtitle, &format_date(&e.date)],
                                    " | ",
                                );
                                let link = if e.link.trim().is_empty() {
                                    String::new()
                                } else {
                                    format!("Link: {}", e.link.trim())
                                };
                                join_present(&[&head, &e.description, &link], "\n")
                            })
                            .filter(|line| !line.is_empty())
                            .collect(),
                    ),
                },
            })
            .collect(),
    }
}

fn format_personal(resume: &CanonicalResume) -> FormattedPersonal {
    let p = &resume.personal;
    let mut links = Vec::new();
    for (label, url) in [
        ("Website", &p.website),
        ("LinkedIn", &p.linkedin),
        ("GitHub", &p.github),
    ] {
        if !url.trim().is_empty() {
            links.push(PersonalLink {
                label: label.to_string(),
                url: url.trim().to_string(),
            });
        }
    }
    links.extend(p.links.iter().filter(|l| !l.url.trim().is_empty()).cloned());

    let mut contact: Vec<String> = [&p.email, &p.phone, &p.location]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    for link in &links {
        let shown = strip_scheme(&link.url).to_string();
        if !contact.contains(&shown) {
            contact.push(shown);
        }
    }

    FormattedPersonal {
        name: p.name.trim().to_string(),
        title: p.title.trim().to_string(),
        contact,
    }
}
