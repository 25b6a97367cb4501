//! Submission batch assembly
//!
//! Every request with a non-blank source contributes exactly one query text, in request
//! order. Blank sources are never submitted; reconciliation leaves them with no results.

use crate::data::TranslationRequest;

/// Ordered query texts for one provider call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionBatch {
    texts: Vec<String>,
    excluded: usize,
}

impl SubmissionBatch {
    /// Build the batch for `requests`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let requests = vec![
    ///     TranslationRequest::new("First"),
    ///     TranslationRequest::new("  "),
    ///     TranslationRequest::new("Third"),
    /// ];
    /// let batch = SubmissionBatch::assemble(&requests);
    /// assert_eq!(batch.texts(), ["First", "Third"]);
    /// assert_eq!(batch.excluded(), 1);
    /// ```
    pub fn assemble(requests: &[TranslationRequest]) -> Self {
        let mut batch = Self::default();
        for request in requests {
            if request.is_blank() {
                batch.excluded += 1;
            } else {
                batch.texts.push(request.source().to_string());
            }
        }
        batch
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Number of requests left out because their source was blank
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
