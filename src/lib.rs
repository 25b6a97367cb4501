//! Batch machine-translation request adapter
//!
//! Takes an ordered array of translation requests from a host workflow, submits the
//! non-blank segments to an MT provider in a single batched call and writes the
//! provider's candidates back onto the original requests.
//!
//! # Overview
//!
//! 1. **Locale resolution** - host locale codes are canonicalised and optionally remapped
//!    through an override table loaded from a host resource ([`LocaleResolver`])
//! 2. **Batch assembly** - one query text per non-blank request ([`SubmissionBatch`])
//! 3. **Provider call** - exactly one [`MtConnector::batch_query`] per `translate`
//! 4. **Reconciliation** - provider output is matched to requests by echoed source text,
//!    never by position ([`ResultReconciler`])
//!
//! # Example
//!
//! ```ignore
//! use batch_mt_adapter::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FsResourceStore::new("/srv/host"));
//!     let adapter = MtAdapter::new(Arc::new(MockConnector::new(MockMode::Echo)), store)
//!         .with_configuration(
//!             AdapterConfiguration::default().with_locale_map_path("/Configuration/locales.txt"),
//!         );
//!
//!     let mut requests = vec![
//!         TranslationRequest::new("First segment"),
//!         TranslationRequest::new("Second segment"),
//!     ];
//!     let report = adapter.translate(&mut requests, "es_CO", "en").await?;
//!     println!("{:?}", report);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod batch;
pub mod config;
pub mod connector;
pub mod data;
pub mod error;
pub mod locale;
pub mod locale_map;
pub mod mock;
pub mod reconcile;
pub mod resource;


pub use adapter::{MtAdapter, TranslationReport};
pub use batch::SubmissionBatch;
pub use config::AdapterConfiguration;
pub use connector::{MtConnector, ProviderInvoker};
pub use data::{
    CodeKind, Fragment, FragmentPart, InlineCode, QueryResult, TranslationRequest,
    TranslationResult,
};
pub use error::{MtError, MtResult};
pub use locale::{LocaleResolver, canonicalize_locale};
pub use locale_map::{LocaleMapCache, LocaleMapTable};
pub use mock::{MockConnector, MockMode, RecordedCall};
pub use reconcile::{Reconciliation, ResultReconciler};
pub use resource::{FsResourceStore, MemoryResourceStore, ResourceStore};
