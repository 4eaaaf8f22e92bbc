//! Skills normalization. Collapses every historical `skills` shape into ordered categories.

use serde_json::Value;

use crate::models::resume::SkillCategory;
use crate::normalize::fields::{scalar_string, split_commas, text};

/// Category keys of the legacy object shape, in emission order.
const LEGACY_CATEGORY_KEYS: &[&str] = &["languages", "frameworks", "tools"];

/// Label used when skills arrive as a flat list of strings.
const FLAT_LIST_CATEGORY: &str = "Skills";

/// Normalizes any supported `skills` value.
///
/// Accepted shapes:
/// - `[{category|name, items: [..] | "a, b"}]`
/// - `{languages: [..], frameworks: [..], tools: [..], <other>: [..]}`
/// - `["Rust", "Go"]`
///
/// Duplicate categories merge; items keep first-seen order with exact duplicates removed.
/// Categories left without items are dropped.
pub fn normalize_skills(raw: Option<&Value>) -> Vec<SkillCategory> {
    let mut merged = SkillMerger::default();

    match raw {
        Some(Value::Array(records)) => {
            for record in records {
                match record {
                    Value::Object(_) => {
                        let label = text(record, &["category", "name"]);
                        merged.add(&label, record_items(record.get("items")));
                    }
                    other => {
                        if let Some(item) = scalar_string(other) {
                            merged.add(FLAT_LIST_CATEGORY, vec![item]);
                        }
                    }
                }
            }
        }
        Some(Value::Object(map)) => {
            for key in LEGACY_CATEGORY_KEYS {
                merged.add(key, record_items(map.get(*key)));
            }
            for (key, value) in map {
                if !LEGACY_CATEGORY_KEYS.contains(&key.as_str()) {
                    merged.add(key, record_items(Some(value)));
                }
            }
        }
        _ => {}
    }

    merged.finish()
}

fn record_items(items: Option<&Value>) -> Vec<String> {
    match items {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(scalar_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => split_commas(s),
        _ => Vec::new(),
    }
}

#[derive(Default)]
struct SkillMerger {
    categories: Vec<SkillCategory>,
}

impl SkillMerger {
    fn add(&mut self, label: &str, items: Vec<String>) {
        let label = label.trim();
        if label.is_empty() {
            return;
        }
        let idx = match self.categories.iter().position(|c| c.category == label) {
            Some(idx) => idx,
            None => {
                self.categories.push(SkillCategory {
                    category: label.to_string(),
                    items: Vec::new(),
                });
                self.categories.len() - 1
            }
        };
        let category = &mut self.categories[idx];
        for item in items {
            if !category.items.contains(&item) {
                category.items.push(item);
            }
        }
    }

    fn finish(self) -> Vec<SkillCategory> {
        self.categories
            .into_iter()
            .filter(|c| !c.items.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_object_and_record_array_agree() {
        let legacy = json!({"languages": ["Go"], "frameworks": [], "tools": []});
        let records = json!([{"category": "languages", "items": ["Go"]}]);
        assert_eq!(
            normalize_skills(Some(&legacy)),
            normalize_skills(Some(&records))
        );
    }

    #[test]
    fn test_duplicate_categories_union_in_first_seen_order() {
        let raw = json!([
            {"category": "Backend", "items": ["Rust", "Go"]},
            {"name": "Backend", "items": ["Go", "Python", "rust"]}
        ]);
        let skills = normalize_skills(Some(&raw));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].items, vec!["Rust", "Go", "Python", "rust"]);
    }

    #[test]
    fn test_legacy_keys_come_first_in_fixed_order() {
        let raw = json!({"tools": ["Git"], "cloud": ["AWS"], "languages": ["Rust"]});
        let labels: Vec<_> = normalize_skills(Some(&raw))
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(labels, vec!["languages", "tools", "cloud"]);
    }

    #[test]
    fn test_comma_separated_items() {
        let raw = json!([{"category": "Data", "items": "SQL, Spark"}]);
        assert_eq!(normalize_skills(Some(&raw))[0].items, vec!["SQL", "Spark"]);
    }

    #[test]
    fn test_flat_string_list_becomes_single_category() {
        let raw = json!(["Rust", "Go", "Rust"]);
        let skills = normalize_skills(Some(&raw));
        assert_eq!(skills[0].category, "Skills");
        assert_eq!(skills[0].items, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_unlabeled_records_are_dropped_and_scalars_kept() {
        let raw = json!([{"items": ["Orphan"]}, 42, null]);
        let skills = normalize_skills(Some(&raw));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].items, vec!["42"]);
    }

    #[test]
    fn test_missing_skills_is_empty() {
        assert!(normalize_skills(None).is_empty());
        assert!(normalize_skills(Some(&json!("nope"))).is_empty());
    }
}
