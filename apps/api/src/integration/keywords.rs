//! Filters a ranked keyword list down to the ones a resume does not mention yet.

use std::collections::HashSet;

use regex::RegexBuilder;

/// True when `text` mentions `keyword` as a whole word, case-insensitively.
///
/// "Go" is not mentioned by "Google", nor "Java" by "JavaScript". Keywords ending in
/// punctuation ("C++", "C#") still match.
pub fn mentions_keyword(text: &str, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return false;
    }
    let pattern = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(keyword));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(text),
        Err(_) => text.to_lowercase().contains(&keyword.to_lowercase()),
    }
}

/// Keeps ranked order; drops blanks, case-insensitive duplicates and keywords the
/// resume text already mentions as a whole word.
pub fn missing_keywords(ranked: &[String], resume_text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ranked
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .filter(|k| !mentions_keyword(resume_text, k))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_keywords_filters_present_and_duplicates() {
        let ranked = kws(&["Kubernetes", "rust", " ", "Terraform", "kubernetes", "GraphQL"]);
        let resume = "Built services in Rust.\nDeployed with Terraform.";
        assert_eq!(
            missing_keywords(&ranked, resume),
            vec!["Kubernetes".to_string(), "GraphQL".to_string()]
        );
    }

    #[test]
    fn test_mentions_keyword_whole_words_only() {
        assert!(mentions_keyword("Wrote services in Go.", "go"));
        assert!(mentions_keyword("Go services", "Go"));
        assert!(!mentions_keyword("Moved to Google Cloud", "Go"));
        assert!(!mentions_keyword("Rewrote the JavaScript client", "Java"));
        assert!(mentions_keyword("Ported C++ tooling", "C++"));
        assert!(mentions_keyword("Trained machine learning models", "Machine Learning"));
        assert!(!mentions_keyword("anything", " "));
    }

    #[test]
    fn test_missing_keywords_ignores_partial_words() {
        let resume = "Migrated JavaScript services to Google Cloud";
        assert_eq!(
            missing_keywords(&kws(&["Go", "Java", "Cloud"]), resume),
            vec!["Go".to_string(), "Java".to_string()]
        );
    }

    #[test]
    fn test_missing_keywords_empty_inputs() {
        assert!(missing_keywords(&[], "anything").is_empty());
        assert_eq!(missing_keywords(&kws(&["Go"]), ""), vec!["Go".to_string()]);
    }
}
