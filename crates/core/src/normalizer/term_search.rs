//! Text search normalizer (transcripts, articles, statements).

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use settle_feeds::LookupKey;

use super::json::{items_at, string_at};
use super::{EventNormalizer, StatusMap};
use crate::errors::NormalizeError;
use crate::event::{names, Comparables, EventStatus, Fact, NormalizedEvent};

fn default_true() -> bool {
    true
}

/// Field map for a document search response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSearchSchema {
    /// Pointer to the document list (or a single document). Empty = root.
    #[serde(default)]
    pub documents: String,

    /// Pointer, within a document, to its text.
    pub text: String,

    /// Pointer, from the payload root, to a status string. Without one a
    /// present document counts as final.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub status_map: StatusMap,

    #[serde(default)]
    pub case_sensitive: bool,

    /// Only count matches bounded by non-alphanumeric characters.
    #[serde(default = "default_true")]
    pub whole_word: bool,
}

pub struct TermSearchNormalizer {
    schema: TermSearchSchema,
}

impl TermSearchNormalizer {
    pub fn new(schema: TermSearchSchema) -> Self {
        Self { schema }
    }

    fn count(&self, text: &str, term: &str) -> usize {
        if self.schema.case_sensitive {
            count_occurrences(text, term, self.schema.whole_word)
        } else {
            count_occurrences(
                &text.to_lowercase(),
                &term.to_lowercase(),
                self.schema.whole_word,
            )
        }
    }
}

impl EventNormalizer for TermSearchNormalizer {
    fn name(&self) -> &'static str {
        "term_search"
    }

    fn normalize_payload(
        &self,
        payload: &Value,
        key: &LookupKey,
        observed_at: DateTime<Utc>,
    ) -> Result<NormalizedEvent, NormalizeError> {
        let LookupKey::TextSearch { query, terms, .. } = key else {
            return Err(NormalizeError::UnsupportedKey {
                normalizer: self.name(),
                key: key.kind(),
            });
        };

        let terms: Vec<&str> = if terms.is_empty() {
            vec![query.as_str()]
        } else {
            terms.iter().map(String::as_str).collect()
        };
        let terms: Vec<&str> = terms
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Err(NormalizeError::Malformed("no search terms".to_string()));
        }

        let documents = items_at(payload, &self.schema.documents).unwrap_or_default();
        if documents.is_empty() {
            return Ok(NormalizedEvent::scheduled(observed_at));
        }

        let mut total = 0usize;
        for document in &documents {
            let text = string_at(document, &self.schema.text).ok_or_else(|| {
                NormalizeError::Malformed(format!("document without text at '{}'", self.schema.text))
            })?;
            total += terms.iter().map(|term| self.count(&text, term)).sum::<usize>();
        }
        debug!(
            "{} document(s) searched for {:?}: {} match(es)",
            documents.len(),
            terms,
            total
        );

        let comparables = Comparables::new()
            .with(names::TERM_FOUND, Fact::Flag(total > 0))
            .with(names::TERM_COUNT, Fact::Number(Decimal::from(total)));

        let status = match &self.schema.status {
            Some(path) => string_at(payload, path)
                .map(|raw| self.schema.status_map.map(&raw))
                .unwrap_or(EventStatus::Unknown),
            None => EventStatus::Final,
        };

        if status.is_final() {
            NormalizedEvent::finalized(
                comparables,
                &[names::TERM_FOUND, names::TERM_COUNT],
                observed_at,
            )
        } else {
            Ok(NormalizedEvent::pending(status, comparables, observed_at))
        }
    }
}

fn count_occurrences(haystack: &str, needle: &str, whole_word: bool) -> usize {
    haystack
        .match_indices(needle)
        .filter(|(start, matched)| {
            if !whole_word {
                return true;
            }
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + matched.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn schema() -> TermSearchSchema {
        TermSearchSchema {
            documents: "/results".to_string(),
            text: "/transcript".to_string(),
            status: None,
            status_map: StatusMap::new(),
            case_sensitive: false,
            whole_word: true,
        }
    }

    fn key(query: &str, terms: &[&str]) -> LookupKey {
        LookupKey::TextSearch {
            query: query.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
            date: None,
        }
    }

    #[test]
    fn test_counts_terms_across_documents() {
        let payload = json!({"results": [
            {"transcript": "Tariffs, tariffs and more TARIFFS."},
            {"transcript": "We discussed the tariff schedule."}
        ]});
        let event = TermSearchNormalizer::new(schema())
            .normalize_payload(&payload, &key("tariffs", &[]), Utc::now())
            .unwrap();
        assert_eq!(event.status(), EventStatus::Final);
        assert_eq!(event.comparables().flag(names::TERM_FOUND), Some(true));
        assert_eq!(event.comparables().number(names::TERM_COUNT), Some(dec!(3)));
    }

    #[test]
    fn test_terms_override_query() {
        let payload = json!({"results": {"transcript": "Bitcoin is digital gold. Crypto!"}});
        let event = TermSearchNormalizer::new(schema())
            .normalize_payload(&payload, &key("press conference", &["crypto", "bitcoin"]), Utc::now())
            .unwrap();
        assert_eq!(event.comparables().number(names::TERM_COUNT), Some(dec!(2)));
    }

    #[test]
    fn test_absent_term_is_final_false() {
        let payload = json!({"results": [{"transcript": "Nothing relevant here."}]});
        let event = TermSearchNormalizer::new(schema())
            .normalize_payload(&payload, &key("recession", &[]), Utc::now())
            .unwrap();
        assert_eq!(event.status(), EventStatus::Final);
        assert_eq!(event.comparables().flag(names::TERM_FOUND), Some(false));
    }

    #[test]
    fn test_status_pointer_keeps_event_live() {
        let schema = TermSearchSchema {
            status: Some("/state".to_string()),
            ..schema()
        };
        let payload = json!({"state": "in_progress", "results": [{"transcript": "recession"}]});
        let event = TermSearchNormalizer::new(schema)
            .normalize_payload(&payload, &key("recession", &[]), Utc::now())
            .unwrap();
        assert_eq!(event.status(), EventStatus::Live);
        assert_eq!(event.comparables().flag(names::TERM_FOUND), Some(true));
    }

    #[test]
    fn test_no_documents_is_scheduled() {
        let payload = json!({"results": []});
        let event = TermSearchNormalizer::new(schema())
            .normalize_payload(&payload, &key("recession", &[]), Utc::now())
            .unwrap();
        assert_eq!(event.status(), EventStatus::Scheduled);
    }

    #[test]
    fn test_document_without_text_is_malformed() {
        let payload = json!({"results": [{"title": "no transcript"}]});
        let err = TermSearchNormalizer::new(schema())
            .normalize_payload(&payload, &key("recession", &[]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("cat catalog cat", "cat", true), 2);
        assert_eq!(count_occurrences("cat catalog cat", "cat", false), 3);
        assert_eq!(count_occurrences("rate cut, rate-cut", "rate cut", true), 1);
        assert_eq!(count_occurrences("", "cat", true), 0);
    }
}
