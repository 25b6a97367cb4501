//! Locale resolution for provider queries
//!
//! Host languages arrive in host notation (`es_CO`, `es-CO`). [`canonicalize_locale`]
//! turns them into BCP-47 codes, and [`LocaleResolver`] applies the optional override
//! table before the codes are sent to the provider.

use crate::error::MtResult;
use crate::locale_map::{LocaleMapCache, LocaleMapTable};
use crate::resource::ResourceStore;
use icu_locale::Locale;
use std::sync::Arc;
use tracing::debug;

/// Canonical BCP-47 form of a host locale code
///
/// Underscores become hyphens and subtag case is normalised (`es_co` → `es-CO`).
/// Codes that are not valid BCP-47 are returned trimmed but otherwise unchanged.
///
/// # Example
///
/// ```ignore
/// assert_eq!(canonicalize_locale("es_CO"), "es-CO");
/// assert_eq!(canonicalize_locale("zh-hant-tw"), "zh-Hant-TW");
/// assert_eq!(canonicalize_locale("zh-CHS"), "zh-CHS");
/// ```
pub fn canonicalize_locale(code: &str) -> String {
    let trimmed = code.trim();
    match trimmed.replace('_', "-").parse::<Locale>() {
        Ok(locale) => locale.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Resolves the effective source/target codes for one query
pub struct LocaleResolver {
    store: Arc<dyn ResourceStore>,
    cache: Arc<LocaleMapCache>,
}

impl LocaleResolver {
    pub fn new(store: Arc<dyn ResourceStore>, cache: Arc<LocaleMapCache>) -> Self {
        Self { store, cache }
    }

    /// Effective code for a single locale
    ///
    /// Without a map path the canonical code is returned unverified, even when empty.
    /// With one, the table is consulted and unmapped codes pass through. Fails with
    /// [`MtError::Configuration`](crate::error::MtError::Configuration) if the table
    /// cannot be loaded.
    pub async fn resolve(&self, locale: &str, map_path: Option<&str>) -> MtResult<String> {
        let code = canonicalize_locale(locale);
        match map_path {
            None => Ok(code),
            Some(path) => {
                let table = self.cache.get_or_load(self.store.as_ref(), path).await?;
                Ok(Self::apply(&table, code))
            }
        }
    }

    /// Effective (source, target) codes, loading the table at most once
    pub async fn resolve_pair(
        &self,
        source: &str,
        target: &str,
        map_path: Option<&str>,
    ) -> MtResult<(String, String)> {
        let source = canonicalize_locale(source);
        let target = canonicalize_locale(target);
        match map_path {
            None => Ok((source, target)),
            Some(path) => {
                let table = self.cache.get_or_load(self.store.as_ref(), path).await?;
                Ok((Self::apply(&table, source), Self::apply(&table, target)))
            }
        }
    }

    /// Canonical (source, target) codes with no table applied
    pub fn unmapped_pair(source: &str, target: &str) -> (String, String) {
        (canonicalize_locale(source), canonicalize_locale(target))
    }

    fn apply(table: &LocaleMapTable, code: String) -> String {
        match table.get(&code) {
            Some(mapped) => {
                debug!(from = %code, to = mapped, "Remapped locale");
                mapped.to_string()
            }
            None => code,
        }
    }
}

impl std::fmt::Debug for LocaleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResourceStore;

    fn resolver_with(store: MemoryResourceStore) -> (LocaleResolver, Arc<MemoryResourceStore>) {
        let store = Arc::new(store);
        let resolver = LocaleResolver::new(store.clone(), Arc::new(LocaleMapCache::new()));
        (resolver, store)
    }

    #[test]
    fn test_canonicalize_underscore() {
        assert_eq!(canonicalize_locale("es_CO"), "es-CO");
        assert_eq!(canonicalize_locale("en_US"), "en-US");
    }

    #[test]
    fn test_canonicalize_case() {
        assert_eq!(canonicalize_locale("EN"), "en");
        assert_eq!(canonicalize_locale("zh-hant-tw"), "zh-Hant-TW");
    }

    #[test]
    fn test_canonicalize_keeps_numeric_region() {
        assert_eq!(canonicalize_locale("es-419"), "es-419");
    }

    #[test]
    fn test_canonicalize_passes_through_invalid() {
        assert_eq!(canonicalize_locale(" not a locale! "), "not a locale!");
    }

    #[tokio::test]
    async fn test_resolve_without_map_path() {
        let (resolver, store) = resolver_with(MemoryResourceStore::new());
        assert_eq!(resolver.resolve("es_CO", None).await.unwrap(), "es-CO");
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_mapped() {
        let (resolver, _) = resolver_with(
            MemoryResourceStore::new().with_resource("/Configuration/locales.txt", "es-CO=es-419"),
        );
        let code = resolver
            .resolve("es_CO", Some("/Configuration/locales.txt"))
            .await
            .unwrap();
        assert_eq!(code, "es-419");
    }

    #[tokio::test]
    async fn test_resolve_unmapped_passes_through() {
        let (resolver, _) =
            resolver_with(MemoryResourceStore::new().with_resource("/locales.txt", "es-CO=es-419"));
        let code = resolver.resolve("fr-FR", Some("/locales.txt")).await.unwrap();
        assert_eq!(code, "fr-FR");
    }

    #[tokio::test]
    async fn test_resolve_missing_resource() {
        let (resolver, _) = resolver_with(MemoryResourceStore::new());
        let err = resolver.resolve("en", Some("/locales.txt")).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_resolve_empty_locale_passes_through() {
        let (resolver, _) = resolver_with(MemoryResourceStore::new());
        assert_eq!(resolver.resolve("  ", None).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_resolve_pair_loads_table_once() {
        let (resolver, store) = resolver_with(
            MemoryResourceStore::new().with_resource("/locales.txt", "es-CO=es-419\nzh-TW=zh-Hant"),
        );
        let pair = resolver
            .resolve_pair("es_CO", "zh_TW", Some("/locales.txt"))
            .await
            .unwrap();
        assert_eq!(pair, ("es-419".to_string(), "zh-Hant".to_string()));
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_unmapped_pair() {
        let pair = LocaleResolver::unmapped_pair("es_CO", "en");
        assert_eq!(pair, ("es-CO".to_string(), "en".to_string()));
    }
}
