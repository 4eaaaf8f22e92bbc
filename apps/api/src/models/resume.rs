//! Canonical resume document: the single normalized shape consumed by the exporter.
//!
//! Only `normalize` should construct these from untrusted input; everything downstream
//! relies on collections being present (possibly empty) rather than absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    /// Professional headline, e.g. "Senior Backend Engineer".
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
    pub links: Vec<PersonalLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    /// Opaque display string. Never parsed as a precondition.
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub title: String,
    /// Role or affiliation the project was done under.
    pub organization: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub bullets: Vec<String>,
    pub technologies: Vec<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub field_of_study: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub gpa: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub proficiency: String,
}

/// One named skill group. Items are unique (case-sensitive) and keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomEntry {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CustomSectionBody {
    Text(String),
    List(Vec<String>),
    Entries(Vec<CustomEntry>),
}

impl Default for CustomSectionBody {
    fn default() -> Self {
        CustomSectionBody::Text(String::new())
    }
}

impl CustomSectionBody {
    pub fn is_empty(&self) -> bool {
        match self {
            CustomSectionBody::Text(text) => text.trim().is_empty(),
            CustomSectionBody::List(items) => items.is_empty(),
            CustomSectionBody::Entries(entries) => entries.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub body: CustomSectionBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResume {
    pub personal: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
    pub languages: Vec<LanguageEntry>,
    pub custom_sections: Vec<CustomSection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resume_has_empty_collections() {
        let resume = CanonicalResume::default();
        assert!(resume.experience.is_empty());
        assert!(resume.skills.is_empty());
        assert!(resume.custom_sections.is_empty());
        assert_eq!(resume.summary, "");
    }

    #[test]
    fn test_custom_body_serializes_with_kind_tag() {
        let body = CustomSectionBody::List(vec!["Chess".to_string()]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "list");
        assert_eq!(json["value"][0], "Chess");
    }

    #[test]
    fn test_custom_body_whitespace_text_is_empty() {
        assert!(CustomSectionBody::Text("   ".to_string()).is_empty());
        assert!(!CustomSectionBody::Text("Volunteer".to_string()).is_empty());
    }

}
