use once_cell::sync::Lazy;
use regex::Regex;

/// Institution cascade, most specific first. Each pattern is bounded by a
/// 4-digit year or a line break so the capture does not swallow the rest of
/// the education section.
static COLLEGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Full name running up to a year
        Regex::new(r"(?i)([A-Z][A-Za-z\s&,.-]+?(?:Institute|University|College|School)[A-Za-z\s&,.-]*?)\s*\d{4}").unwrap(),
        // "<Name> Institute of <Field>" form
        Regex::new(r"(?i)([A-Z][^\n]*?\s+(?:Institute|University|College|School)\s+of\s+[^\n]+?)(?:\d{4}|\n)").unwrap(),
        // Well-known abbreviations with a campus suffix
        Regex::new(r"(?i)((?:IIT|NIT|BITS|VIT|MIT|IIM|IIIT)[^\n]+?)(?:\d{4}|\n)").unwrap(),
        // Generic institute names
        Regex::new(r"(?i)([A-Z][^\n]{10,80}?(?:Institute|University|College|School)[^\n]{0,40}?)(?:\d{4}|\n)").unwrap(),
        // Bare abbreviation fallback
        Regex::new(r"(?i)\b(IIT|NIT|BITS|VIT|MIT|IIM|IIIT)\s+[A-Z][a-zA-Z]*").unwrap(),
    ]
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\s*[-–]\s*\d{4}").unwrap());
static YEAR_PRESENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\s*[-–]\s*Present").unwrap());
static EDUCATION_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Education\s*").unwrap());

/// Acceptance bounds for a cleaned institution string. A match outside the
/// bounds falls through to the next pattern instead of ending the cascade.
const MIN_COLLEGE_LEN: usize = 5;
const MAX_COLLEGE_LEN: usize = 150;

pub fn extract_college(text: &str) -> Option<String> {
    for pattern in COLLEGE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let cleaned = clean_college(caps.get(1).map_or("", |m| m.as_str()));
        if (MIN_COLLEGE_LEN..=MAX_COLLEGE_LEN).contains(&cleaned.len()) {
            return Some(cleaned);
        }
    }
    None
}

fn clean_college(raw: &str) -> String {
    let text = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let text = YEAR_RANGE_RE.replace_all(&text, "");
    let text = YEAR_PRESENT_RE.replace_all(&text, "");
    let text = EDUCATION_LABEL_RE.replace_all(&text, "");
    text.trim().to_string()
}
