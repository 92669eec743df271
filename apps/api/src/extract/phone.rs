use once_cell::sync::Lazy;
use regex::Regex;

/// Phone cascade, strongest first. Evaluation stops at the first pattern
/// that matches anywhere in the text.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Grouped formats with optional country code, parentheses, separators
        Regex::new(r"\+?\d{1,3}[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
        // Bare 10 consecutive digits
        Regex::new(r"\b\d{10}\b").unwrap(),
        // Country-code prefixed long form
        Regex::new(r"\+\d{10,15}\b").unwrap(),
    ]
});

/// First phone-shaped match with separators stripped. A leading `+` from the
/// matched substring is preserved.
pub fn extract_phone(text: &str) -> Option<String> {
    for pattern in PHONE_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            let cleaned: String = m
                .as_str()
                .chars()
                .filter(|c| !matches!(c, '-' | '.' | ' ' | '(' | ')'))
                .collect();
            return Some(cleaned);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_grouped_number_is_flattened() {
        assert_eq!(
            extract_phone("Phone: +91 782-907-9853"),
            Some("+917829079853".to_string())
        );
    }

    #[test]
    fn test_parenthesized_us_format() {
        assert_eq!(
            extract_phone("call 1 (800) 555-1234 office hours"),
            Some("18005551234".to_string())
        );
    }

    #[test]
    fn test_bare_ten_digits() {
        assert_eq!(
            extract_phone("reach me on 9876543210 anytime"),
            Some("9876543210".to_string())
        );
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        // Both the grouped and the bare-10-digit pattern could fire here;
        // the grouped pattern is tried first and takes the match.
        let text = "+1 555 123 4567 or 9876543210";
        assert_eq!(extract_phone(text), Some("+15551234567".to_string()));
    }

    #[test]
    fn test_no_phone_yields_none() {
        assert_eq!(extract_phone("no digits to speak of"), None);
        assert_eq!(extract_phone(""), None);
    }
}
