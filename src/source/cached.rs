use crate::cache::{content_key, ExpiringCache};
use crate::source::{ContentSource, FetchError};
use std::sync::Arc;
use std::time::Duration;

/// Serves file content from an [`ExpiringCache`], falling back to `inner`.
///
/// Failures are not cached, so a file that failed once is fetched again.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<dyn ExpiringCache>,
    namespace: String,
    ttl: Duration,
}

impl<S: ContentSource> CachedSource<S> {
    pub fn new(
        inner: S,
        cache: Arc<dyn ExpiringCache>,
        namespace: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            inner,
            cache,
            namespace: namespace.into(),
            ttl,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ContentSource> ContentSource for CachedSource<S> {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let key = content_key(&self.namespace, path);
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(path, "cache hit");
            return Ok(hit);
        }
        let content = self.inner.fetch(path)?;
        self.cache.set(&key, content.clone(), self.ttl);
        Ok(content)
    }
}
