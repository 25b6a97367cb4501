//! Locale override table loaded from a host resource
//!
//! The resource is plain UTF-8 text, one `<sourceCode>=<targetCode>` mapping per line:
//!
//! ```text
//! # Provider expects the UN M.49 region for Latin American Spanish
//! es-CO=es-419
//! es-MX=es-419
//! zh-TW=zh-Hant
//! ```

use crate::error::{MtError, MtResult};
use crate::locale::canonicalize_locale;
use crate::resource::ResourceStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Mapping from one locale code to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleMapTable {
    entries: HashMap<String, String>,
}

impl LocaleMapTable {
    /// Parse table text
    ///
    /// Blank lines, `#` comments, lines without `=` and lines with an empty side are
    /// skipped. Keys are canonicalised, so `es_CO` and `es-CO` name the same entry.
    /// On duplicate keys the last line wins.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((from, to)) = line.split_once('=') else {
                debug!(line, "Skipping locale map line without '='");
                continue;
            };
            let (from, to) = (from.trim(), to.trim());
            if from.is_empty() || to.is_empty() {
                debug!(line, "Skipping incomplete locale map line");
                continue;
            }
            entries.insert(canonicalize_locale(from), to.to_string());
        }
        Self { entries }
    }

    /// Decode resource bytes as UTF-8 and parse them
    pub fn from_bytes(bytes: &[u8]) -> MtResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            MtError::Configuration(format!("Locale map is not valid UTF-8: {}", e))
        })?;
        Ok(Self::parse(text.strip_prefix('\u{feff}').unwrap_or(text)))
    }

    /// Fetch the resource at `path` and parse it
    pub async fn load(store: &dyn ResourceStore, path: &str) -> MtResult<Self> {
        let bytes = store.fetch(path).await?;
        let table = Self::from_bytes(&bytes)?;
        info!(path, entries = table.len(), "Loaded locale map");
        Ok(table)
    }

    /// Mapped code for a canonical locale code, if the table has one
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.entries.get(locale).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
struct CachedTable {
    path: String,
    table: Arc<LocaleMapTable>,
}

/// Holds the most recently loaded table, keyed by its resource path
///
/// The first caller for a path loads the table while holding the lock; concurrent
/// callers wait for that load and never see a partially built table. Requesting a
/// different path replaces the entry. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct LocaleMapCache {
    slot: Mutex<Option<CachedTable>>,
}

impl LocaleMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `path`, loading it through `store` on a miss
    pub async fn get_or_load(
        &self,
        store: &dyn ResourceStore,
        path: &str,
    ) -> MtResult<Arc<LocaleMapTable>> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref().filter(|cached| cached.path == path) {
            return Ok(Arc::clone(&cached.table));
        }
        if let Some(stale) = slot.take() {
            debug!(old = %stale.path, new = path, "Locale map path changed, reloading");
        }

        let table = Arc::new(LocaleMapTable::load(store, path).await?);
        *slot = Some(CachedTable {
            path: path.to_string(),
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drop the cached table; the next lookup reloads it
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    /// Resource path of the cached table, if any
    pub async fn cached_path(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|c| c.path.clone())
    }
}
