//! The batch MT adapter
//!
//! One [`MtAdapter::translate`] call resolves locales, submits every non-blank segment in
//! a single provider call, reconciles the answer by content and writes the results back
//! onto the host's requests.
//!
//! # Example
//!
//! ```ignore
//! use batch_mt_adapter::{MemoryResourceStore, MockConnector, MockMode, MtAdapter, TranslationRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = MtAdapter::new(
//!         Arc::new(MockConnector::new(MockMode::Suffix)),
//!         Arc::new(MemoryResourceStore::new()),
//!     );
//!     let mut requests = vec![TranslationRequest::new("Hello")];
//!     let report = adapter.translate(&mut requests, "en", "fr").await?;
//!     println!("{:?} {:?}", report, requests[0].results());
//!     Ok(())
//! }
//! ```

use crate::batch::SubmissionBatch;
use crate::config::AdapterConfiguration;
use crate::connector::{MtConnector, ProviderInvoker};
use crate::data::TranslationRequest;
use crate::error::{MtError, MtResult};
use crate::locale::LocaleResolver;
use crate::locale_map::LocaleMapCache;
use crate::reconcile::ResultReconciler;
use crate::resource::ResourceStore;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{info, warn};

/// Summary of one `translate` call
#[derive(Debug, Default, Serialize)]
pub struct TranslationReport {
    /// Source locale code sent to the provider
    pub source_locale: String,
    /// Target locale code sent to the provider
    pub target_locale: String,
    /// Query texts submitted
    pub submitted: usize,
    /// Requests left out of the batch because their source was blank
    pub excluded: usize,
    /// Requests that received provider results
    pub matched: usize,
    /// Requests that received an empty result array
    pub unmatched: usize,
    /// Set when the locale map could not be loaded and unmapped codes were used
    #[serde(serialize_with = "error_message")]
    pub locale_map_error: Option<MtError>,
}

fn error_message<S: Serializer>(error: &Option<MtError>, serializer: S) -> Result<S::Ok, S::Error> {
    error
        .as_ref()
        .map(ToString::to_string)
        .serialize(serializer)
}

pub struct MtAdapter {
    connector: Arc<dyn MtConnector>,
    resolver: LocaleResolver,
    configuration: AdapterConfiguration,
}

impl MtAdapter {
    /// Adapter with default configuration and its own locale-map cache
    pub fn new(connector: Arc<dyn MtConnector>, store: Arc<dyn ResourceStore>) -> Self {
        Self::with_cache(connector, store, Arc::new(LocaleMapCache::new()))
    }

    /// Adapter sharing a locale-map cache with other adapters
    pub fn with_cache(
        connector: Arc<dyn MtConnector>,
        store: Arc<dyn ResourceStore>,
        cache: Arc<LocaleMapCache>,
    ) -> Self {
        Self {
            connector,
            resolver: LocaleResolver::new(store, cache),
            configuration: AdapterConfiguration::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: AdapterConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn configuration(&self) -> &AdapterConfiguration {
        &self.configuration
    }

    /// Replace the configuration used by subsequent calls
    pub fn set_configuration(&mut self, configuration: AdapterConfiguration) {
        self.configuration = configuration;
    }

    /// Translate `requests` in place
    ///
    /// On success every request's results slot holds an array, possibly empty, and the
    /// order of `requests` is untouched. On failure no request is modified.
    ///
    /// A locale map that cannot be loaded does not fail the call: the unmapped codes are
    /// used and the error is returned in [`TranslationReport::locale_map_error`].
    ///
    /// # Errors
    ///
    /// * [`MtError::Provider`] - the provider call failed; this is the only error that
    ///   aborts a call once the locale map fallback has been applied
    pub async fn translate(
        &self,
        requests: &mut [TranslationRequest],
        source_language: &str,
        target_language: &str,
    ) -> MtResult<TranslationReport> {
        if requests.is_empty() {
            return Ok(TranslationReport::default());
        }
        let configuration = &self.configuration;

        let ((source_locale, target_locale), locale_map_error) = match self
            .resolver
            .resolve_pair(
                source_language,
                target_language,
                configuration.locale_map_path(),
            )
            .await
        {
            Ok(pair) => (pair, None),
            Err(e) if e.is_configuration() => {
                warn!(error = %e, "Locale map unavailable, using unmapped locale codes");
                (
                    LocaleResolver::unmapped_pair(source_language, target_language),
                    Some(e),
                )
            }
            Err(e) => return Err(e),
        };

        let batch = SubmissionBatch::assemble(requests);
        let lists = if batch.is_empty() {
            Vec::new()
        } else {
            ProviderInvoker::new(self.connector.as_ref())
                .invoke(&batch, &source_locale, &target_locale)
                .await?
        };

        let reconciliation =
            ResultReconciler::new(configuration.include_codes).reconcile(requests, lists);
        if reconciliation.leftover > 0 {
            warn!(
                leftover = reconciliation.leftover,
                "Provider returned results for text that was not requested"
            );
        }

        let report = TranslationReport {
            source_locale,
            target_locale,
            submitted: batch.len(),
            excluded: batch.excluded(),
            matched: reconciliation.matched,
            unmatched: reconciliation.unmatched,
            locale_map_error,
        };

        for (request, results) in requests.iter_mut().zip(reconciliation.results) {
            request.set_results(results);
        }

        info!(
            provider = self.connector.provider_name(),
            source = %report.source_locale,
            target = %report.target_locale,
            submitted = report.submitted,
            matched = report.matched,
            unmatched = report.unmatched,
            "Batch translated"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for MtAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtAdapter")
            .field("provider", &self.connector.provider_name())
            .field("resolver", &self.resolver)
            .field("configuration", &self.configuration)
            .finish()
    }
}
