use once_cell::sync::Lazy;
use regex::Regex;

/// Degree cascade. Each pattern stops before a CGPA/GPA/Grade label, a
/// 4-digit year, or a line break. The abbreviated form captures only the
/// abbreviation itself, not the specialization tail.
static DEGREE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(Bachelor\s+of\s+(?:Engineering|Technology|Science|Arts|Commerce)[^\n]*?(?:in[^\n]+?)?)\s*(?:CGPA|GPA|Grade|\d{4}|\n)").unwrap(),
        Regex::new(r"(?i)(Master\s+of\s+(?:Engineering|Technology|Science|Arts|Commerce)[^\n]*?(?:in[^\n]+?)?)\s*(?:CGPA|GPA|Grade|\d{4}|\n)").unwrap(),
        Regex::new(r"(?i)(B\.?E\.?|B\.?Tech\.?|M\.?Tech\.?|B\.?Sc\.?|M\.?Sc\.?|PhD)[^\n]*?(?:in\s+[^\n]+?)?\s*(?:CGPA|GPA|Grade|\d{4}|\n)").unwrap(),
    ]
});

/// CGPA cascade: labelled value, unlabelled ratio with a trailing label,
/// then percentage/marks.
static CGPA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:CGPA|GPA|Grade)\s*[:\-]?\s*(\d+\.?\d*)\s*(?:/|out\s+of)?\s*(\d+\.?\d*)?").unwrap(),
        Regex::new(r"(?i)(\d+\.?\d*)\s*/\s*(\d+\.?\d*)\s*(?:CGPA|GPA)").unwrap(),
        Regex::new(r"(?i)(?:Percentage|Marks)\s*[:\-]?\s*(\d+\.?\d*)%?").unwrap(),
    ]
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn extract_degree(text: &str) -> Option<String> {
    for pattern in DEGREE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
            return Some(WHITESPACE_RE.replace_all(raw, " ").into_owned());
        }
    }
    None
}

/// CGPA as raw text: two captured numbers become `"x / y"`, one stays a bare
/// number. The scale (4.0 vs 10.0) is ambiguous, so nothing is normalized.
pub fn extract_cgpa(text: &str) -> Option<String> {
    for pattern in CGPA_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let first = caps.get(1).map_or("", |m| m.as_str());
            return Some(match caps.get(2) {
                Some(second) if !second.as_str().is_empty() => {
                    format!("{} / {}", first, second.as_str())
                }
                _ => first.to_string(),
            });
        }
    }
    None
}
