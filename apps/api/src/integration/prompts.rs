// LLM prompt constants for the keyword integration rewrite call.

/// System prompt for bullet rewriting. Enforces JSON-only output.
pub const REWRITE_SYSTEM: &str = "You are an expert resume writer who weaves target keywords \
    into resume bullets without changing their meaning. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent employers, titles or technologies beyond the keywords provided.";

/// Rewrite prompt template.
/// Replace: {original}, {keywords}, {context}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume bullet below so it naturally includes every target keyword exactly once.

Return a JSON object with this EXACT schema (no extra fields):
{
  "rewrittenBullet": "Reduced API latency by 40% by moving hot paths to Rust"
}

Rules:
- One sentence, past tense, starting with an action verb.
- Keep any numbers already present; do not invent new metrics unless the bullet has none.
- No leading bullet glyph, no trailing line breaks.
- Stay under 220 characters.

CONTEXT (item and section the bullet belongs to):
{context}

TARGET KEYWORDS:
{keywords}

ORIGINAL BULLET:
{original}"#;

/// Builds the user prompt for one rewrite request.
pub fn build_rewrite_prompt(original: &str, keywords: &[String], context: &str) -> String {
    REWRITE_PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{keywords}", &keywords.join(", "))
        .replace("{original}", original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rewrite_prompt_fills_all_slots() {
        let prompt = build_rewrite_prompt(
            "Led migration to Kubernetes",
            &["Terraform".to_string(), "AWS".to_string()],
            "Acme Corp (experience)",
        );
        assert!(prompt.contains("Led migration to Kubernetes"));
        assert!(prompt.contains("Terraform, AWS"));
        assert!(prompt.contains("Acme Corp (experience)"));
        assert!(!prompt.contains("{original}"));
    }
}
