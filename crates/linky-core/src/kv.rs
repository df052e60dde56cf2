use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One bounded page of keys returned by [`KvStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvPage {
    /// Keys in this page, in no guaranteed order.
    pub keys: Vec<String>,
    /// Continuation cursor. `None` once the listing is exhausted.
    pub cursor: Option<String>,
}

/// The external key-value backend.
///
/// The backend is string-keyed, string-valued, eventually consistent and
/// non-transactional. Implementations may be Redis, an in-memory map, or any
/// other store with a cursor-based key listing.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes the value, overwriting any existing one unconditionally.
    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Removes the key. It is not an error if the key does not exist.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists at most roughly `limit` keys starting at `cursor`.
    ///
    /// Pass `None` to start a new listing and the previous page's cursor to
    /// continue one.
    async fn list(&self, cursor: Option<&str>, limit: usize) -> Result<KvPage>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn list(&self, cursor: Option<&str>, limit: usize) -> Result<KvPage> {
        (**self).list(cursor, limit).await
    }
}
