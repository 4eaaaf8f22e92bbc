//! Loose JSON field readers used by the normalizer.
//!
//! Every reader is total: wrong types read as "missing" rather than failing.

use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Namespace for content-derived entry identifiers.
const ENTRY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f2d_1c3a_9b4e_4d7f_a1c2_5e8b_3f90_7a11);

/// Renders a scalar as a trimmed string. Arrays, objects and null read as `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the first non-empty string among `keys`, or an empty string.
pub fn text(obj: &Value, keys: &[&str]) -> String {
    opt_text(obj, keys).unwrap_or_default()
}

/// Returns the first non-empty string among `keys`.
pub fn opt_text(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(scalar_string)
        .find(|s| !s.is_empty())
}

/// Reads a boolean flag; `"true"` strings count.
pub fn flag(obj: &Value, keys: &[&str]) -> bool {
    keys.iter().filter_map(|k| obj.get(*k)).any(|v| match v {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Reads a list of strings from the first key holding an array or a comma-separated string.
/// Blank items are dropped.
pub fn string_list(obj: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .filter_map(scalar_string)
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            Some(Value::String(s)) if !s.trim().is_empty() => return split_commas(s),
            _ => continue,
        }
    }
    Vec::new()
}

pub fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Returns the array at the first matching key, or an empty slice.
pub fn array<'a>(obj: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Hands out stable identifiers for one collection.
///
/// Ids supplied by the input are kept verbatim. Missing ids are derived from the
/// entry content so the same document always normalizes to the same ids; a numeric
/// suffix separates entries whose content would collide.
pub struct IdAllocator {
    kind: &'static str,
    seen: HashMap<String, u32>,
}

impl IdAllocator {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            seen: HashMap::new(),
        }
    }

    pub fn assign(&mut self, obj: &Value, content_key: &[&str]) -> String {
        let base = match opt_text(obj, &["id"]) {
            Some(id) => id,
            None => {
                let seed = format!("{}:{}", self.kind, content_key.join("\u{1f}"));
                Uuid::new_v5(&ENTRY_ID_NAMESPACE, seed.as_bytes()).to_string()
            }
        };
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_prefers_first_non_empty_key() {
        let obj = json!({"title": "  ", "position": "Engineer"});
        assert_eq!(text(&obj, &["title", "position"]), "Engineer");
    }

    #[test]
    fn test_text_renders_numbers() {
        let obj = json!({"gpa": 3.8});
        assert_eq!(text(&obj, &["gpa"]), "3.8");
    }

    #[test]
    fn test_text_ignores_objects() {
        let obj = json!({"title": {"nested": true}});
        assert_eq!(text(&obj, &["title"]), "");
    }

    #[test]
    fn test_string_list_accepts_comma_string() {
        let obj = json!({"tech": "Rust, Tokio ,, Axum"});
        assert_eq!(string_list(&obj, &["technologies", "tech"]), vec!["Rust", "Tokio", "Axum"]);
    }

    #[test]
    fn test_string_list_drops_non_scalars() {
        let obj = json!({"bullets": ["Shipped v2", null, {"x": 1}, ""]});
        assert_eq!(string_list(&obj, &["bullets"]), vec!["Shipped v2"]);
    }

    #[test]
    fn test_flag_reads_string_true() {
        assert!(flag(&json!({"current": "true"}), &["current"]));
        assert!(!flag(&json!({"current": 1}), &["current"]));
    }

    #[test]
    fn test_id_allocator_keeps_supplied_ids() {
        let mut ids = IdAllocator::new("experience");
        assert_eq!(ids.assign(&json!({"id": "exp-1"}), &["Acme"]), "exp-1");
    }

    #[test]
    fn test_id_allocator_is_deterministic_and_disambiguates() {
        let mut first = IdAllocator::new("experience");
        let mut second = IdAllocator::new("experience");
        let a = first.assign(&json!({}), &["Engineer", "Acme"]);
        let b = second.assign(&json!({}), &["Engineer", "Acme"]);
        assert_eq!(a, b);

        let dup = first.assign(&json!({}), &["Engineer", "Acme"]);
        assert_eq!(dup, format!("{a}-2"));
    }
}
