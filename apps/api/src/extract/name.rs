use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::ner::{Entity, NerProvider, PERSON_TAG};

/// Names are assumed to appear near the top of a resume; NER only sees this
/// many leading characters.
const NER_WINDOW_CHARS: usize = 1000;

/// Minimum confidence for a person span to participate in merging.
const PERSON_SCORE_THRESHOLD: f32 = 0.75;

static NAME_SPECIALS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#\*\-_\|]+").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HONORIFIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Mr\.?|Ms\.?|Mrs\.?|Dr\.?|Prof\.?)\s+").unwrap());
static NAME_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+(Resume|CV|Profile)").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Line-anchored 2-4 capitalized tokens, the last-resort name guess.
static NAME_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})").unwrap());

/// Boilerplate keywords that disqualify a line from being a name candidate.
const BOILERPLATE_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum",
    "profile",
    "contact",
    "email",
    "phone",
    "education",
    "experience",
];

/// Candidate name via NER with regex fallbacks.
///
/// The NER call is recoverable: on error the primary strategy simply yields
/// nothing and the fallbacks run. Fallbacks also run when the primary result
/// is shorter than 4 characters; the first strategy that produces an
/// accepted name wins.
pub async fn extract_name(text: &str, ner: &dyn NerProvider) -> Option<String> {
    let mut name = match ner.entities(ner_window(text)).await {
        Ok(entities) => merge_person_spans(&entities).and_then(|raw| clean_name(&raw)),
        Err(e) => {
            warn!("NER extraction failed, falling back to heuristics: {e}");
            None
        }
    };

    if name.as_deref().map_or(true, |n| n.len() < 4) {
        name = name_from_top_lines(text);
    }

    if name.as_deref().map_or(true, |n| n.len() < 4) {
        name = NAME_LINE_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean_name(m.as_str()));
    }

    name
}

/// First `NER_WINDOW_CHARS` characters, respecting char boundaries.
fn ner_window(text: &str) -> &str {
    match text.char_indices().nth(NER_WINDOW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Merges adjacent person spans into candidate full names and returns the
/// longest one.
///
/// Two-tier gap rule: a span starting within 1 character of the previous
/// span's end is a sub-word continuation and is joined directly ("Su" +
/// "jan" -> "Sujan"); a gap of 2-5 characters is a separate token of the
/// same name and is space-joined ("Sujan" + "Kumar"); anything wider starts
/// a new candidate.
pub fn merge_person_spans(entities: &[Entity]) -> Option<String> {
    let mut person_spans: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.entity_group == PERSON_TAG && e.score >= PERSON_SCORE_THRESHOLD)
        .collect();

    if person_spans.is_empty() {
        return None;
    }
    person_spans.sort_by_key(|e| e.start);

    let mut candidates: Vec<String> = Vec::new();
    let mut current = person_spans[0].word.clone();
    let mut last_end = person_spans[0].end;

    for span in &person_spans[1..] {
        let gap = span.start.saturating_sub(last_end);
        if gap <= 1 {
            current.push_str(&span.word);
        } else if gap <= 5 {
            current.push(' ');
            current.push_str(&span.word);
        } else {
            candidates.push(std::mem::replace(&mut current, span.word.clone()));
        }
        last_end = span.end;
    }
    candidates.push(current);

    // Longest candidate; the earliest one wins ties.
    candidates
        .into_iter()
        .fold(None, |best: Option<String>, c| match best {
            Some(b) if c.len() <= b.len() => Some(b),
            _ => Some(c),
        })
}

/// Scrubs NER artifacts and boilerplate from a raw name.
///
/// Accepts the result only if it still reads like a full name: at least two
/// words and 4-50 characters overall.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = NAME_SPECIALS_RE.replace_all(raw, " ");
    let name = WHITESPACE_RE.replace_all(&name, " ");
    let name = HONORIFIC_RE.replace(&name, "");
    let name = NAME_SUFFIX_RE.replace_all(&name, "");
    let name = DIGITS_RE.replace_all(&name, "");

    let cleaned = name
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = cleaned.trim();

    if cleaned.split_whitespace().count() >= 2 && (4..=50).contains(&cleaned.len()) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Fallback 1: the first plausible name-shaped line near the top of the text.
fn name_from_top_lines(text: &str) -> Option<String> {
    for line in text.lines().take(5) {
        let line = line.trim();
        let lower = line.to_lowercase();
        if BOILERPLATE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let word_count_ok = (2..=4).contains(&words.len());
        let no_digits = !line.chars().any(|c| c.is_ascii_digit());
        if !(word_count_ok && no_digits) {
            continue;
        }

        let capitalized = words
            .iter()
            .filter(|w| w.chars().count() > 1)
            .all(|w| w.chars().next().is_some_and(char::is_uppercase));
        if capitalized {
            // First line that looks like a name decides the fallback, even
            // if cleaning then rejects it.
            return clean_name(line);
        }
    }
    None
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(word: &str, start: usize, end: usize, score: f32) -> Entity {
        Entity {
            entity_group: PERSON_TAG.to_string(),
            word: word.to_string(),
            start,
            end,
            score,
        }
    }

    #[test]
    fn test_merge_joins_subword_and_adjacent_spans() {
        // "Su" + "jan" touch (gap 0, direct join); "Kumar" sits 2 chars
        // away and is space-joined.
        let entities = vec![
            person("Su", 0, 2, 0.9),
            person("jan", 2, 5, 0.9),
            person("Kumar", 7, 12, 0.9),
        ];
        assert_eq!(merge_person_spans(&entities), Some("Sujan Kumar".to_string()));
    }

    #[test]
    fn test_merge_splits_on_wide_gap_and_keeps_longest() {
        let entities = vec![
            person("Jane", 0, 4, 0.9),
            person("Doe", 6, 9, 0.9),
            person("Bob", 40, 43, 0.9),
        ];
        assert_eq!(merge_person_spans(&entities), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_merge_ignores_low_confidence_and_non_person_spans() {
        let entities = vec![
            person("Jane", 0, 4, 0.5),
            Entity {
                entity_group: "ORG".to_string(),
                word: "Acme".to_string(),
                start: 10,
                end: 14,
                score: 0.99,
            },
        ];
        assert_eq!(merge_person_spans(&entities), None);
        assert_eq!(merge_person_spans(&[]), None);
    }

    #[test]
    fn test_merge_sorts_spans_by_offset() {
        let entities = vec![person("Kumar", 7, 12, 0.9), person("Sujan", 0, 5, 0.9)];
        assert_eq!(merge_person_spans(&entities), Some("Sujan Kumar".to_string()));
    }

    #[test]
    fn test_clean_name_strips_artifacts() {
        assert_eq!(
            clean_name("Dr. John # Smith123 Resume"),
            Some("John Smith".to_string())
        );
    }

    #[test]
    fn test_clean_name_title_cases_and_drops_single_chars() {
        assert_eq!(clean_name("JANE m DOE"), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_clean_name_rejects_single_word_or_short() {
        assert_eq!(clean_name("Sujan"), None);
        assert_eq!(clean_name("J D"), None);
        assert_eq!(clean_name(""), None);
    }

    #[test]
    fn test_name_from_top_lines_skips_boilerplate() {
        let text = "Curriculum Vitae\nJane Elizabeth Doe\njane@example.com";
        assert_eq!(name_from_top_lines(text), Some("Jane Elizabeth Doe".to_string()));
    }

    #[test]
    fn test_name_from_top_lines_rejects_digit_lines() {
        let text = "Jane Doe 1992\nflat 4, some street";
        assert_eq!(name_from_top_lines(text), None);
    }

    #[test]
    fn test_ner_window_respects_char_boundaries() {
        let text = "é".repeat(1200);
        let window = ner_window(&text);
        assert_eq!(window.chars().count(), 1000);
    }

    struct FailingNer;

    #[async_trait::async_trait]
    impl NerProvider for FailingNer {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, crate::ner::NerError> {
            Err(crate::ner::NerError::ModelLoading { retries: 3 })
        }
    }

    #[tokio::test]
    async fn test_ner_failure_falls_back_to_top_lines() {
        let text = "Jane Elizabeth Doe\nsome street\njane@example.com";
        let name = extract_name(text, &FailingNer).await;
        assert_eq!(name, Some("Jane Elizabeth Doe".to_string()));
    }

    #[tokio::test]
    async fn test_ner_failure_falls_back_to_line_pattern() {
        // Top lines all carry boilerplate keywords, so the anchored regex
        // fallback has to find the name further down.
        let text = "RESUME\nContact details below\nEmail attached\n\n\nRahul Sharma\nworked at Acme";
        let name = extract_name(text, &FailingNer).await;
        assert_eq!(name, Some("Rahul Sharma".to_string()));
    }

    struct FixedNer(Vec<Entity>);

    #[async_trait::async_trait]
    impl NerProvider for FixedNer {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, crate::ner::NerError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_primary_ner_result_wins_over_fallbacks() {
        // The top line would satisfy the line fallback with a different
        // name, so the accepted NER result must be the one returned.
        let ner = FixedNer(vec![person("Sujan", 0, 5, 0.95), person("Kumar", 7, 12, 0.95)]);
        let text = "Zara Bloggs\nsome address line\n";
        assert_eq!(extract_name(text, &ner).await, Some("Sujan Kumar".to_string()));
    }
}
