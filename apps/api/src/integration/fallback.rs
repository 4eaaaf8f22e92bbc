//! Local template generator used when the rewrite service cannot produce a suggestion.
//!
//! Wording is randomized from fixed pools; the shape is not. Every output is one
//! sentence ending in a period that names each requested keyword exactly once.
//! The RNG is injected so callers (and tests) control determinism.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::{Captures, Regex};

use crate::integration::keywords::mentions_keyword;

/// Percentages, currency amounts and counts with a magnitude suffix ("2M", "10k+", "3x").
static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s?%|[$€£¥]\s?\d|\b\d[\d,.]*\s?(?:k|m|b|x|\+)(?:\W|$)")
        .expect("valid metric regex")
});
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

const ACTION_VERBS: &[&str] = &[
    "Implemented",
    "Engineered",
    "Developed",
    "Designed",
    "Built",
    "Delivered",
    "Streamlined",
    "Automated",
];

const QUANTIFIED_OUTCOMES: &[&str] = &[
    "reducing processing time by 35%",
    "cutting infrastructure costs by 20%",
    "doubling release throughput",
    "supporting over 10,000 daily users",
    "raising automated test coverage to 90%",
    "shortening incident response time by 40%",
];

const QUALITATIVE_OUTCOMES: &[&str] = &[
    "improving reliability for downstream teams",
    "simplifying onboarding for new engineers",
    "strengthening code quality across the team",
    "enabling faster and safer deployments",
    "giving stakeholders clearer visibility into delivery",
];

const SINGLE_KEYWORD_TEMPLATES: &[&str] = &[
    "{verb} production features with {k1}, {quant} and {qual}.",
    "{verb} {k1}-based services end to end, {quant} while {qual}.",
    "{verb} core workflows on top of {k1}, {quant} and {qual}.",
];

const TWO_KEYWORD_TEMPLATES: &[&str] = &[
    "{verb} services combining {k1} and {k2}, {quant} and {qual}.",
    "{verb} {k1} integrations backed by {k2}, {quant} while {qual}.",
    "{verb} production workflows using {k1} alongside {k2}, {quant} and {qual}.",
];

const THREE_KEYWORD_TEMPLATES: &[&str] = &[
    "{verb} a platform built on {k1}, {k2}, and {k3}, {quant} and {qual}.",
    "{verb} {k1} services with {k2} and {k3}, {quant} while {qual}.",
    "{verb} end-to-end tooling across {k1}, {k2}, and {k3}, {quant} and {qual}.",
];

/// Used when no keyword is active or more than three are passed.
const LIST_TEMPLATES: &[&str] = &["{verb} key deliverables{with_list}, {quant} and {qual}."];

const METHOD_CLAUSES: &[&str] = &[
    " by applying {list}",
    " using {list}",
    " through disciplined use of {list}",
];

const METHOD_CLAUSES_NO_KEYWORD: &[&str] = &[
    " through disciplined engineering practices",
    " by standardizing team workflows",
];

const METRIC_CLAUSES: &[&str] = &[
    " using {list}, improving efficiency by {pct}%",
    " by leveraging {list}, cutting turnaround time by {pct}%",
    " with {list}, boosting delivery speed by {pct}%",
];

const METRIC_CLAUSES_NO_KEYWORD: &[&str] = &[
    ", improving efficiency by {pct}%",
    ", cutting turnaround time by {pct}%",
];

/// True when the text already carries a quantitative token.
pub fn has_metric(text: &str) -> bool {
    METRIC_RE.is_match(text)
}

/// Joins keywords as "A", "A and B" or "A, B, and C".
pub fn join_keywords(keywords: &[String]) -> String {
    match keywords {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

/// Appends one clause to an existing bullet naming the keywords it does not already contain.
///
/// A bullet that already has a metric gets a methodology clause; otherwise a single
/// plausible percentage improvement is added.
pub fn enhance_bullet<R: Rng>(bullet: &str, keywords: &[String], rng: &mut R) -> String {
    let base = bullet.trim().trim_end_matches('.').trim_end();
    let missing: Vec<String> = keywords
        .iter()
        .filter(|k| !mentions_keyword(base, k))
        .cloned()
        .collect();

    let pool = match (has_metric(base), missing.is_empty()) {
        (true, false) => METHOD_CLAUSES,
        (true, true) => METHOD_CLAUSES_NO_KEYWORD,
        (false, false) => METRIC_CLAUSES,
        (false, true) => METRIC_CLAUSES_NO_KEYWORD,
    };
    let clause = pick(pool, rng);
    let list = join_keywords(&missing);
    let pct = rng.gen_range(15..=40).to_string();

    let clause = fill(clause, |name| match name {
        "list" => Some(list.as_str()),
        "pct" => Some(pct.as_str()),
        _ => None,
    });
    format!("{base}{clause}.")
}

/// Composes a fresh bullet sentence weaving in the keywords.
pub fn compose_bullet<R: Rng>(keywords: &[String], rng: &mut R) -> String {
    let templates = match keywords.len() {
        1 => SINGLE_KEYWORD_TEMPLATES,
        2 => TWO_KEYWORD_TEMPLATES,
        3 => THREE_KEYWORD_TEMPLATES,
        _ => LIST_TEMPLATES,
    };
    let template = pick(templates, rng);
    let verb = pick(ACTION_VERBS, rng);
    let quant = pick(QUANTIFIED_OUTCOMES, rng);
    let qual = pick(QUALITATIVE_OUTCOMES, rng);
    let with_list = if keywords.is_empty() {
        String::new()
    } else {
        format!(" with {}", join_keywords(keywords))
    };

    fill(template, |name| match name {
        "verb" => Some(verb),
        "quant" => Some(quant),
        "qual" => Some(qual),
        "with_list" => Some(with_list.as_str()),
        "k1" => keywords.first().map(String::as_str),
        "k2" => keywords.get(1).map(String::as_str),
        "k3" => keywords.get(2).map(String::as_str),
        _ => None,
    })
}

fn pick<'a, R: Rng>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Substitutes `{name}` placeholders in one pass so keyword text is never re-expanded.
fn fill<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
