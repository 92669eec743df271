//! Field extraction — turns unstructured resume text into a `CandidateRecord`.
//!
//! Five independent sub-extractors run over the same input, each an ordered
//! pattern cascade with first-match-wins semantics. No sub-extractor reads
//! another's result; a field with no match is simply absent. The only side
//! effect is the NER call behind `extract_name`, and a NER failure degrades
//! to regex fallbacks rather than failing the extraction.

pub mod college;
pub mod degree;
pub mod email;
pub mod name;
pub mod phone;

use crate::models::candidate::CandidateRecord;
use crate::ner::NerProvider;

pub use college::extract_college;
pub use degree::{extract_cgpa, extract_degree};
pub use email::extract_email;
pub use name::{clean_name, extract_name, merge_person_spans};
pub use phone::extract_phone;

/// Runs every sub-extractor and assembles the record.
///
/// Always returns a record, possibly with every field absent; `status`
/// stays at its default until the store persists the record. The sender
/// identifier is accepted for future correlation but unused by the
/// extraction logic.
pub async fn extract(text: &str, ner: &dyn NerProvider, _sender: Option<&str>) -> CandidateRecord {
    CandidateRecord {
        name: extract_name(text, ner).await,
        email: extract_email(text),
        phone: extract_phone(text),
        college: extract_college(text),
        degree: extract_degree(text),
        cgpa: extract_cgpa(text),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Status;
    use crate::ner::{Entity, NerError, PERSON_TAG};

    struct MockNer(Vec<Entity>);

    #[async_trait::async_trait]
    impl NerProvider for MockNer {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenNer;

    #[async_trait::async_trait]
    impl NerProvider for BrokenNer {
        async fn entities(&self, _text: &str) -> Result<Vec<Entity>, NerError> {
            Err(NerError::Api {
                status: 500,
                message: "inference backend down".to_string(),
            })
        }
    }

    const SAMPLE_RESUME: &str = "\
Sujan Kumar
sujan.kumar@example.com | +91 782-907-9853

Education
Shri Madhwa Vadiraja Institute of Technology & Management, Bantakal 2022–Present
Bachelor of Engineering in Computer Science
CGPA: 9.04 / 10
";

    fn sample_ner() -> MockNer {
        MockNer(vec![
            Entity {
                entity_group: PERSON_TAG.to_string(),
                word: "Sujan".to_string(),
                start: 0,
                end: 5,
                score: 0.99,
            },
            Entity {
                entity_group: PERSON_TAG.to_string(),
                word: "Kumar".to_string(),
                start: 7,
                end: 12,
                score: 0.98,
            },
        ])
    }

    #[tokio::test]
    async fn test_full_resume_extraction() {
        let record = extract(SAMPLE_RESUME, &sample_ner(), Some("+911234567890")).await;

        assert_eq!(record.name.as_deref(), Some("Sujan Kumar"));
        assert_eq!(record.email.as_deref(), Some("sujan.kumar@example.com"));
        assert_eq!(record.phone.as_deref(), Some("+917829079853"));
        assert_eq!(record.cgpa.as_deref(), Some("9.04 / 10"));
        assert_eq!(
            record.degree.as_deref(),
            Some("Bachelor of Engineering in Computer Science")
        );
        let college = record.college.unwrap();
        assert!(college.contains("Shri Madhwa Vadiraja Institute"));
        assert_eq!(record.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_record() {
        let record = extract("", &sample_ner(), None).await;
        assert_eq!(record.email, None);
        assert_eq!(record.phone, None);
        assert_eq!(record.college, None);
        assert_eq!(record.degree, None);
        assert_eq!(record.cgpa, None);
        // The mock reports person spans regardless of input, so the name
        // still resolves; every text-driven field stays absent.
        assert_eq!(record.name.as_deref(), Some("Sujan Kumar"));
    }

    #[tokio::test]
    async fn test_ner_outage_is_recovered_not_fatal() {
        let record = extract(SAMPLE_RESUME, &BrokenNer, None).await;
        // Name comes from the top-lines fallback instead.
        assert_eq!(record.name.as_deref(), Some("Sujan Kumar"));
        assert_eq!(record.email.as_deref(), Some("sujan.kumar@example.com"));
    }

    #[tokio::test]
    async fn test_extraction_is_idempotent() {
        let first = extract(SAMPLE_RESUME, &sample_ner(), None).await;
        let second = extract(SAMPLE_RESUME, &sample_ner(), None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fields_are_independent() {
        let record = extract("reach me at someone@somewhere.dev", &BrokenNer, None).await;
        assert_eq!(record.email.as_deref(), Some("someone@somewhere.dev"));
        assert_eq!(record.name, None);
        assert_eq!(record.phone, None);
    }
}
