//! Normalizer: the only producer of `CanonicalResume` values from untrusted JSON.
//!
//! Accepts the canonical shape itself plus every historical editor shape (camelCase
//! keys, `personalInfo`, `position`/`company`, `duration` strings, legacy skills
//! objects, custom sections with `fields`/`entries`). Pure and total: wrong types are
//! treated as missing, nothing here returns an error.

pub mod fields;
pub mod handlers;
pub mod skills;

use serde_json::Value;

use crate::models::resume::{
    Achievement, CanonicalResume, Certification, CustomEntry, CustomSection, CustomSectionBody,
    EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo, PersonalLink, ProjectEntry,
};
use fields::{array, flag, opt_text, scalar_string, string_list, text, IdAllocator};
use skills::normalize_skills;

/// Joins the values of one `fields`/`entries` custom-section row.
const CUSTOM_VALUE_SEPARATOR: &str = " | ";

/// Normalizes any resume-shaped JSON value. Non-object input yields the empty resume.
pub fn normalize(raw: &Value) -> CanonicalResume {
    if !raw.is_object() {
        return CanonicalResume::default();
    }

    let personal_raw = raw
        .get("personal")
        .filter(|v| v.is_object())
        .or_else(|| raw.get("personalInfo").filter(|v| v.is_object()))
        .unwrap_or(&Value::Null);

    let summary = opt_text(raw, &["summary"])
        .or_else(|| opt_text(personal_raw, &["summary"]))
        .unwrap_or_default();

    CanonicalResume {
        personal: normalize_personal(personal_raw),
        summary,
        experience: normalize_experience(array(raw, &["experience"])),
        education: normalize_education(array(raw, &["education"])),
        skills: normalize_skills(raw.get("skills")),
        projects: normalize_projects(array(raw, &["projects"])),
        certifications: normalize_certifications(array(raw, &["certifications"])),
        achievements: normalize_achievements(array(raw, &["achievements"])),
        languages: normalize_languages(array(raw, &["languages"])),
        custom_sections: normalize_custom_sections(array(
            raw,
            &["custom_sections", "customSections"],
        )),
    }
}

fn normalize_personal(p: &Value) -> PersonalInfo {
    let name = opt_text(p, &["name", "fullName"]).unwrap_or_else(|| {
        let first = text(p, &["firstName", "first_name"]);
        let last = text(p, &["lastName", "last_name"]);
        format!("{first} {last}").trim().to_string()
    });

    let mut links: Vec<PersonalLink> = array(p, &["links"])
        .iter()
        .filter_map(|l| {
            let url = opt_text(l, &["url", "href"])?;
            let label = opt_text(l, &["label", "name"]).unwrap_or_else(|| "Link".to_string());
            Some(PersonalLink { label, url })
        })
        .collect();
    if let Some(url) = opt_text(p, &["portfolio"]) {
        links.insert(
            0,
            PersonalLink {
                label: "Portfolio".to_string(),
                url,
            },
        );
    }

    PersonalInfo {
        name,
        title: text(p, &["title", "headline"]),
        email: text(p, &["email"]),
        phone: text(p, &["phone"]),
        location: text(p, &["location"]),
        website: text(p, &["website"]),
        linkedin: text(p, &["linkedin"]),
        github: text(p, &["github"]),
        links,
    }
}

/// Splits a `"Jan 2020 - Present"` style range into start and end.
fn split_duration(duration: &str) -> (String, String) {
    let (start, end) = match duration.split_once(" - ") {
        Some(parts) => parts,
        None => duration
            .split_once(|c: char| matches!(c, '-' | '–' | '—'))
            .unwrap_or((duration, "")),
    };
    (start.trim().to_string(), end.trim().to_string())
}

/// Reads start/end dates, falling back to a `duration` range when both are missing.
fn date_range(obj: &Value) -> (String, String) {
    let start = text(obj, &["start_date", "startDate"]);
    let end = text(obj, &["end_date", "endDate"]);
    if start.is_empty() && end.is_empty() {
        if let Some(duration) = opt_text(obj, &["duration"]) {
            return split_duration(&duration);
        }
    }
    (start, end)
}

fn normalize_experience(items: &[Value]) -> Vec<ExperienceEntry> {
    let mut ids = IdAllocator::new("experience");
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|e| {
            let title = text(e, &["title", "position", "role"]);
            let organization = text(e, &["organization", "company", "employer"]);
            let (start_date, end_date) = date_range(e);
            let id = ids.assign(e, &[&title, &organization, &start_date]);
            ExperienceEntry {
                id,
                title,
                organization,
                location: opt_text(e, &["location"]),
                start_date,
                end_date,
                current: flag(e, &["current", "isCurrent", "is_current"]),
                description: text(e, &["description"]),
                bullets: string_list(e, &["bullets", "highlights"]),
            }
        })
        .collect()
}

fn normalize_education(items: &[Value]) -> Vec<EducationEntry> {
    let mut ids = IdAllocator::new("education");
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|e| {
            let degree = text(e, &["degree"]);
            let school = text(e, &["school", "institution"]);
            let (mut start_date, end_date) = date_range(e);
            if start_date.is_empty() {
                start_date = text(e, &["year"]);
            }
            let id = ids.assign(e, &[&degree, &school, &start_date]);
            EducationEntry {
                id,
                degree,
                school,
                field_of_study: text(e, &["field_of_study", "fieldOfStudy", "field"]),
                location: text(e, &["location"]),
                start_date,
                end_date,
                current: flag(e, &["current", "isCurrent", "is_current"]),
                gpa: opt_text(e, &["gpa"]),
                description: text(e, &["description"]),
            }
        })
        .collect()
}

fn normalize_projects(items: &[Value]) -> Vec<ProjectEntry> {
    let mut ids = IdAllocator::new("project");
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|p| {
            let title = text(p, &["title", "name"]);
            let organization = text(p, &["organization", "role"]);
            let (start_date, end_date) = date_range(p);
            let id = ids.assign(p, &[&title, &organization]);
            ProjectEntry {
                id,
                title,
                organization,
                location: opt_text(p, &["location"]),
                start_date,
                end_date,
                description: text(p, &["description"]),
                bullets: string_list(p, &["bullets", "highlights"]),
                technologies: string_list(p, &["technologies", "tech"]),
                url: opt_text(p, &["url", "link"]),
            }
        })
        .collect()
}

fn normalize_certifications(items: &[Value]) -> Vec<Certification> {
    let mut ids = IdAllocator::new("certification");
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|c| {
            let name = text(c, &["name", "title"]);
            let issuer = text(c, &["issuer"]);
            let id = ids.assign(c, &[&name, &issuer]);
            Certification {
                id,
                name,
                issuer,
                date: text(c, &["date"]),
                url: opt_text(c, &["url", "credentialUrl", "credential_url", "link"]),
            }
        })
        .collect()
}

fn normalize_achievements(items: &[Value]) -> Vec<Achievement> {
    let mut ids = IdAllocator::new("achievement");
    items
        .iter()
        .filter_map(|a| {
            let (title, date, description) = match a {
                Value::Object(_) => (
                    text(a, &["title", "text", "name"]),
                    text(a, &["date"]),
                    text(a, &["description"]),
                ),
                other => (scalar_string(other)?, String::new(), String::new()),
            };
            if title.is_empty() && description.is_empty() {
                return None;
            }
            let id = ids.assign(a, &[&title, &date]);
            Some(Achievement {
                id,
                title,
                date,
                description,
            })
        })
        .collect()
}

fn normalize_languages(items: &[Value]) -> Vec<LanguageEntry> {
    items
        .iter()
        .filter_map(|l| {
            let (language, proficiency) = match l {
                Value::Object(_) => (
                    text(l, &["language", "name"]),
                    text(l, &["proficiency", "level"]),
                ),
                other => (scalar_string(other)?, String::new()),
            };
            (!language.is_empty()).then_some(LanguageEntry {
                language,
                proficiency,
            })
        })
        .collect()
}

fn normalize_custom_sections(items: &[Value]) -> Vec<CustomSection> {
    let mut ids = IdAllocator::new("custom");
    items
        .iter()
        .filter(|v| v.is_object())
        .map(|s| {
            let title = text(s, &["title", "name"]);
            let id = ids.assign(s, &[&title]);
            CustomSection {
                id,
                title,
                body: custom_body(s),
            }
        })
        .collect()
}

fn custom_body(section: &Value) -> CustomSectionBody {
    if let Some(body) = section.get("body") {
        if let Ok(parsed) = serde_json::from_value::<CustomSectionBody>(body.clone()) {
            return parsed;
        }
    }

    let items = array(section, &["items"]);
    if !items.is_empty() {
        if items.iter().all(Value::is_object) {
            return CustomSectionBody::Entries(items.iter().map(custom_entry).collect());
        }
        return CustomSectionBody::List(
            items
                .iter()
                .filter_map(scalar_string)
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }

    let rows = array(section, &["entries"]);
    if !rows.is_empty() {
        return CustomSectionBody::List(field_rows(array(section, &["fields"]), rows));
    }

    match section.get("content") {
        Some(Value::Array(_)) => CustomSectionBody::List(string_list(section, &["content"])),
        _ => CustomSectionBody::Text(
            opt_text(section, &["content", "description"]).unwrap_or_default(),
        ),
    }
}

fn custom_entry(item: &Value) -> CustomEntry {
    CustomEntry {
        title: text(item, &["title"]),
        subtitle: text(item, &["subtitle"]),
        date: text(item, &["date"]),
        description: text(item, &["description"]),
        link: text(item, &["link", "url"]),
    }
}

/// Flattens `entries[].values` rows in declared field order. Tag fields (arrays) join
/// with commas; unknown field ids are ignored.
fn field_rows(fields: &[Value], rows: &[Value]) -> Vec<String> {
    let field_ids: Vec<String> = fields.iter().filter_map(|f| opt_text(f, &["id"])).collect();
    rows.iter()
        .filter_map(|row| {
            let values = row.get("values")?;
            let parts: Vec<String> = field_ids
                .iter()
                .filter_map(|fid| match values.get(fid.as_str()) {
                    Some(Value::Array(tags)) => {
                        let tags: Vec<String> = tags.iter().filter_map(scalar_string).collect();
                        Some(tags.join(", "))
                    }
                    Some(v) => scalar_string(v),
                    None => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(CUSTOM_VALUE_SEPARATOR))
        })
        .collect()
}
