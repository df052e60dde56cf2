use linky_core::{KvStore, LinkRecord, Result, Slug, StorageError, RESERVED_KEY};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/// Default number of keys requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Translates between [`LinkRecord`]s and the string values of a [`KvStore`].
///
/// A stored value that fails to decode behaves exactly like a missing key:
/// it is logged and reported as absent, never as an error. Backend failures
/// are always propagated as [`StorageError`].
#[derive(Debug, Clone)]
pub struct LinkStore<K> {
    kv: K,
    page_size: usize,
}

impl<K: KvStore> LinkStore<K> {
    /// Creates a store over `kv` with the default listing page size.
    pub fn new(kv: K) -> Self {
        Self::with_page_size(kv, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(kv: K, page_size: usize) -> Self {
        Self {
            kv,
            page_size: page_size.max(1),
        }
    }

    /// Returns a reference to the underlying backend.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Loads the record for `slug`. Absent and corrupt values both yield `None`.
    pub async fn get(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        if slug.is_reserved() {
            return Ok(None);
        }

        trace!(slug = %slug, "Fetching link record");
        let Some(raw) = self.kv.get(slug.as_str()).await? else {
            trace!(slug = %slug, "Link record not found");
            return Ok(None);
        };

        match LinkRecord::decode(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(slug = %slug, error = %e, "Ignoring corrupt link record");
                Ok(None)
            }
        }
    }

    /// Writes `record` under `slug`, overwriting whatever was there.
    pub async fn put(&self, slug: &Slug, record: &LinkRecord) -> Result<()> {
        if slug.is_reserved() {
            return Err(StorageError::Operation(format!(
                "refusing to write a link under the reserved key '{RESERVED_KEY}'"
            )));
        }

        let value = record
            .encode()
            .map_err(|e| StorageError::Operation(format!("failed to encode link record: {e}")))?;
        self.kv.put(slug.as_str(), value).await?;
        debug!(slug = %slug, "Stored link record");
        Ok(())
    }

    /// Removes the record for `slug`. Deleting an absent slug succeeds.
    pub async fn delete(&self, slug: &Slug) -> Result<()> {
        if slug.is_reserved() {
            return Ok(());
        }

        self.kv.delete(slug.as_str()).await?;
        debug!(slug = %slug, "Deleted link record");
        Ok(())
    }

    /// Enumerates every decodable link, following the backend cursor until
    /// the listing is exhausted.
    ///
    /// The reserved key is excluded. Keys deleted between the listing and the
    /// fetch, and corrupt values, are skipped. Order is unspecified.
    pub async fn list_all(&self) -> Result<Vec<(Slug, LinkRecord)>> {
        let slugs = self.list_slugs().await?;

        let mut records = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if let Some(record) = self.get(&slug).await? {
                records.push((slug, record));
            }
        }

        debug!(count = records.len(), "Listed link records");
        Ok(records)
    }

    /// Reads the operator secret stored under [`RESERVED_KEY`].
    pub async fn reserved_secret(&self) -> Result<Option<String>> {
        Ok(self
            .kv
            .get(RESERVED_KEY)
            .await?
            .filter(|secret| !secret.is_empty()))
    }

    async fn list_slugs(&self) -> Result<BTreeSet<Slug>> {
        let mut slugs = BTreeSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.kv.list(cursor.as_deref(), self.page_size).await?;
            pages += 1;

            slugs.extend(
                page.keys
                    .into_iter()
                    .filter(|key| key != RESERVED_KEY)
                    .map(Slug::new_unchecked),
            );

            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        trace!(pages, count = slugs.len(), "Collected slugs from backend");
        Ok(slugs)
    }
}
