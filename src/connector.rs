//! Provider connector seam and the single batched invocation
//!
//! [`MtConnector`] abstracts the external MT provider. The adapter never manages the
//! connector's transport, authentication or retries; it calls [`ProviderInvoker::invoke`]
//! exactly once per non-empty `translate` call.
//!
//! # Example
//!
//! ```ignore
//! use batch_mt_adapter::{MockConnector, MockMode, MtConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = MockConnector::new(MockMode::Echo);
//!     let texts = vec!["Hello".to_string(), "Goodbye".to_string()];
//!     let results = connector.batch_query(&texts, "en", "fr").await?;
//!     println!("{:?}", results);
//!     Ok(())
//! }
//! ```

use crate::batch::SubmissionBatch;
use crate::data::QueryResult;
use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use tracing::debug;

/// Generic trait for batched machine translation providers
#[async_trait]
pub trait MtConnector: Send + Sync {
    /// Query the provider with an ordered list of source texts
    ///
    /// # Arguments
    ///
    /// * `texts` - Source texts, in submission order
    /// * `source_locale` - Effective source locale code (e.g. "en", "es-419")
    /// * `target_locale` - Effective target locale code
    ///
    /// # Returns
    ///
    /// One candidate list per answered text. Providers may drop texts (blank, duplicate,
    /// unsupported), so the outer list can be shorter than `texts`; each candidate echoes
    /// the source text it answers.
    async fn batch_query(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<Vec<QueryResult>>>;

    /// Name of this provider, used for logging and result attribution
    fn provider_name(&self) -> &str;
}

/// Performs the one provider call of a `translate` invocation
pub struct ProviderInvoker<'a> {
    connector: &'a dyn MtConnector,
}

impl<'a> ProviderInvoker<'a> {
    pub fn new(connector: &'a dyn MtConnector) -> Self {
        Self { connector }
    }

    /// Submit the whole batch in one call
    ///
    /// Any connector failure is reported as [`MtError::Provider`]. A response with more
    /// candidate lists than submitted texts is malformed and rejected the same way.
    pub async fn invoke(
        &self,
        batch: &SubmissionBatch,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<Vec<QueryResult>>> {
        let provider = self.connector.provider_name();
        debug!(
            provider,
            submitted = batch.len(),
            source_locale,
            target_locale,
            "Submitting batch"
        );

        let lists = self
            .connector
            .batch_query(batch.texts(), source_locale, target_locale)
            .await
            .map_err(|e| match e {
                MtError::Provider(msg) => MtError::Provider(msg),
                other => MtError::Provider(format!("{} failed: {}", provider, other)),
            })?;

        if lists.len() > batch.len() {
            return Err(MtError::Provider(format!(
                "{} returned {} result lists for {} submitted texts",
                provider,
                lists.len(),
                batch.len()
            )));
        }

        debug!(provider, returned = lists.len(), "Batch answered");
        Ok(lists)
    }
}
