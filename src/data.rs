//! Core data structures exchanged between the host workflow, the adapter and the provider
//!
//! The host owns [`TranslationRequest`]s; the adapter only reads `source` and writes
//! `results`. Providers answer with [`QueryResult`]s, which the adapter turns into
//! [`TranslationResult`]s.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LETTER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)g(\d+)>|<x(\d+)/>").expect("valid letter-code regex"));

/// Role of an inline code inside a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Opening,
    Closing,
    Placeholder,
}

/// An inline formatting code (markup tag, placeholder) embedded in segment text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCode {
    /// Pairs an opening code with its closing code
    pub id: u32,
    pub kind: CodeKind,
    /// Original native markup, if the provider reported it (e.g. `<b>`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
}

impl InlineCode {
    pub fn new(id: u32, kind: CodeKind) -> Self {
        Self {
            id,
            kind,
            data: String::new(),
        }
    }

    /// Render the code in letter-coded notation: `<g1>`, `</g1>` or `<x1/>`
    pub fn letter_coded(&self) -> String {
        match self.kind {
            CodeKind::Opening => format!("<g{}>", self.id),
            CodeKind::Closing => format!("</g{}>", self.id),
            CodeKind::Placeholder => format!("<x{}/>", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentPart {
    Text(String),
    Code(InlineCode),
}

/// Provider-side text: plain text interleaved with inline codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub parts: Vec<FragmentPart>,
}

impl Fragment {
    /// A fragment with no inline codes
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            parts: vec![FragmentPart::Text(text)],
        }
    }

    /// Parse letter-coded markup (`<g1>`, `</g1>`, `<x1/>`) into text and codes
    ///
    /// Anything that is not a letter code stays text, including other angle-bracket markup.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let fragment = Fragment::from_letter_coded("Press <g1>OK</g1><x2/>");
    /// assert_eq!(fragment.plain_text(), "Press OK");
    /// assert_eq!(fragment.codes().len(), 3);
    /// ```
    pub fn from_letter_coded(coded: &str) -> Self {
        let mut fragment = Fragment::default();
        let mut last = 0;

        for caps in LETTER_CODE.captures_iter(coded) {
            let Some(whole) = caps.get(0) else { continue };
            let code = match (caps.get(2), caps.get(3)) {
                (Some(id), _) => id.as_str().parse().ok().map(|id| {
                    let kind = if caps[1].is_empty() {
                        CodeKind::Opening
                    } else {
                        CodeKind::Closing
                    };
                    InlineCode::new(id, kind)
                }),
                (None, Some(id)) => id
                    .as_str()
                    .parse()
                    .ok()
                    .map(|id| InlineCode::new(id, CodeKind::Placeholder)),
                (None, None) => None,
            };
            // Ids that overflow u32 are left as literal text
            let Some(code) = code else { continue };

            fragment.push_text(&coded[last..whole.start()]);
            fragment.parts.push(FragmentPart::Code(code));
            last = whole.end();
        }
        fragment.push_text(&coded[last..]);
        fragment
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(FragmentPart::Text(prev)) = self.parts.last_mut() {
            prev.push_str(text);
        } else {
            self.parts.push(FragmentPart::Text(text.to_string()));
        }
    }

    /// The text with every inline code removed
    pub fn plain_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                FragmentPart::Text(text) => Some(text.as_str()),
                FragmentPart::Code(_) => None,
            })
            .collect()
    }

    /// The text with inline codes rendered in letter-coded notation
    pub fn letter_coded(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                FragmentPart::Text(text) => out.push_str(text),
                FragmentPart::Code(code) => out.push_str(&code.letter_coded()),
            }
        }
        out
    }

    /// Inline codes in order of appearance
    pub fn codes(&self) -> Vec<InlineCode> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                FragmentPart::Code(code) => Some(code.clone()),
                FragmentPart::Text(_) => None,
            })
            .collect()
    }

    pub fn has_codes(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, FragmentPart::Code(_)))
    }
}

/// One candidate the provider returned for a submitted query text
///
/// `source` is the provider's echo of the query, which is what reconciliation matches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub source: Fragment,
    pub target: Fragment,
    /// Provider-reported quality, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Name of the provider that produced the candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl QueryResult {
    pub fn new(source: Fragment, target: Fragment) -> Self {
        Self {
            source,
            target,
            quality: None,
            origin: None,
        }
    }

    /// Plain-text candidate, the common case for text-only providers
    pub fn plain(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(Fragment::text(source), Fragment::text(target))
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.min(100));
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// A machine translation attached to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Plain translation, or letter-coded translation when codes are included
    pub translation: String,
    /// Inline codes of the translation; empty unless codes are included
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<InlineCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl TranslationResult {
    /// Build a result from a provider candidate
    pub fn from_query_result(result: QueryResult, include_codes: bool) -> Self {
        let (translation, codes) = if include_codes {
            (result.target.letter_coded(), result.target.codes())
        } else {
            (result.target.plain_text(), Vec::new())
        };
        Self {
            translation,
            codes,
            quality: result.quality,
            origin: result.origin,
        }
    }
}

/// A segment handed over by the host workflow
///
/// `source`, `score` and `is_repetition` are read-only for the adapter;
/// `results` stays `None` until a successful `translate` call fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    source: String,
    #[serde(default)]
    score: i32,
    #[serde(default)]
    is_repetition: bool,
    #[serde(default)]
    results: Option<Vec<TranslationResult>>,
}

impl TranslationRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            score: 0,
            is_repetition: false,
            results: None,
        }
    }

    /// Request carrying the workflow's translation-memory score and repetition flag
    pub fn with_metadata(source: impl Into<String>, score: i32, is_repetition: bool) -> Self {
        Self {
            source: source.into(),
            score,
            is_repetition,
            results: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_repetition(&self) -> bool {
        self.is_repetition
    }

    pub fn results(&self) -> Option<&[TranslationResult]> {
        self.results.as_deref()
    }

    pub fn set_results(&mut self, results: Vec<TranslationResult>) {
        self.results = Some(results);
    }

    /// True when the source has nothing worth sending to a provider
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }
}
