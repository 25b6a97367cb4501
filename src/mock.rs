//! Mock provider connector for testing
//!
//! A deterministic, network-free [`MtConnector`] that records every call it receives,
//! so tests can assert on the locale codes and batches the adapter submitted.
//!
//! # Example
//!
//! ```ignore
//! use batch_mt_adapter::{MockConnector, MockMode, MtConnector};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockConnector::new(MockMode::Suffix);
//!     let texts = vec!["hello".to_string()];
//!     let lists = mock.batch_query(&texts, "en", "fr").await.unwrap();
//!     assert_eq!(lists[0][0].target.plain_text(), "hello_fr");
//! }
//! ```

use crate::connector::MtConnector;
use crate::data::{Fragment, QueryResult};
use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mock translation modes for testing different provider behaviours
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return the source text unchanged as the translation
    Echo,

    /// Append the target locale: "hello" → "hello_fr"
    Suffix,

    /// Predefined translations keyed by (text, target_locale), suffix fallback.
    /// Translations may carry letter-coded inline codes (`<g1>…</g1>`).
    Mappings(HashMap<(String, String), String>),

    /// Canned response returned regardless of the submitted batch
    Fixed(Vec<Vec<QueryResult>>),

    /// Echo, but silently drop every text matching the pattern
    DropMatching(Regex),

    /// Fail every call
    Error(String),
}

/// One recorded `batch_query` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub texts: Vec<String>,
    pub source_locale: String,
    pub target_locale: String,
}

#[derive(Debug)]
pub struct MockConnector {
    mode: MockMode,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockConnector {
    pub const NAME: &'static str = "Mock Connector";

    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.recorded().clone()
    }

    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    // A panic while recording must not hide the calls made before it
    fn recorded(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, texts: &[String], source_locale: &str, target_locale: &str) {
        self.recorded().push(RecordedCall {
            texts: texts.to_vec(),
            source_locale: source_locale.to_string(),
            target_locale: target_locale.to_string(),
        });
    }

    fn candidate(text: &str, target: Fragment) -> Vec<QueryResult> {
        vec![QueryResult::new(Fragment::text(text), target).with_origin(Self::NAME)]
    }

    fn answer(&self, texts: &[String], target_locale: &str) -> MtResult<Vec<Vec<QueryResult>>> {
        let lists = match &self.mode {
            MockMode::Echo => texts
                .iter()
                .map(|text| Self::candidate(text, Fragment::text(text.as_str())))
                .collect(),
            MockMode::Suffix => texts
                .iter()
                .map(|text| {
                    Self::candidate(text, Fragment::text(format!("{}_{}", text, target_locale)))
                })
                .collect(),
            MockMode::Mappings(map) => texts
                .iter()
                .map(|text| {
                    let key = (text.clone(), target_locale.to_string());
                    let target = map
                        .get(&key)
                        .map(|t| Fragment::from_letter_coded(t))
                        .unwrap_or_else(|| Fragment::text(format!("{}_{}", text, target_locale)));
                    Self::candidate(text, target)
                })
                .collect(),
            MockMode::Fixed(lists) => lists.clone(),
            MockMode::DropMatching(pattern) => texts
                .iter()
                .filter(|text| !pattern.is_match(text))
                .map(|text| Self::candidate(text, Fragment::text(text.as_str())))
                .collect(),
            MockMode::Error(msg) => return Err(MtError::Provider(msg.clone())),
        };
        Ok(lists)
    }
}

#[async_trait]
impl MtConnector for MockConnector {
    async fn batch_query(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<Vec<QueryResult>>> {
        self.record(texts, source_locale, target_locale);
        self.answer(texts, target_locale)
    }

    fn provider_name(&self) -> &str {
        Self::NAME
    }
}
