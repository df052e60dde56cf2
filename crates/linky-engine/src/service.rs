use crate::config::EngineConfig;
use crate::engine::{CreateLink, Created, LinkEngine};
use crate::lifecycle::{
    decide_resolve, decide_visibility, plan_create, LinkView, Mutation, Resolution, Visibility,
};
use crate::password::PasswordHasher;
use crate::{LinkError, Result};
use async_trait::async_trait;
use jiff::Timestamp;
use linky_core::{KvStore, LinkRecord, PasswordState, Slug};
use linky_generator::Generator;
use linky_storage::LinkStore;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Runs lifecycle decisions against a [`LinkStore`].
///
/// Every call is a read followed by at most one write. Nothing is cached
/// between calls, so concurrent callers race the way the store allows:
/// click increments may be lost, purges and migrations may be repeated.
pub struct LinkService<K, G> {
    store: Arc<LinkStore<K>>,
    generator: Arc<G>,
    hasher: Arc<dyn PasswordHasher>,
    config: EngineConfig,
}

impl<K, G> Clone for LinkService<K, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            hasher: Arc::clone(&self.hasher),
            config: self.config.clone(),
        }
    }
}

impl<K: KvStore, G: Generator> LinkService<K, G> {
    pub fn new(store: LinkStore<K>, generator: G, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            hasher: config.hasher.build(),
            config,
        }
    }

    /// Replaces the hasher chosen by [`EngineConfig::hasher`].
    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn store(&self) -> &LinkStore<K> {
        &self.store
    }

    async fn apply(&self, slug: &Slug, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Delete => {
                self.store.delete(slug).await?;
                info!(slug = %slug, "Purged expired link");
            }
            Mutation::Put(record) => self.store.put(slug, &record).await?,
        }
        Ok(())
    }

    fn protect(&self, password: Option<String>) -> Result<PasswordState> {
        let Some(password) = password else {
            return Ok(PasswordState::Public);
        };

        Ok(PasswordState::Hashed {
            hash: self.hasher.hash(&password)?,
            recovery: self.config.retain_recoverable_passwords.then_some(password),
        })
    }
}

#[async_trait]
impl<K: KvStore, G: Generator> LinkEngine for LinkService<K, G> {
    async fn resolve(
        &self,
        slug: &Slug,
        now: Timestamp,
        credential: Option<&str>,
        is_privileged: bool,
    ) -> Result<Resolution> {
        trace!(slug = %slug, privileged = is_privileged, "Resolving link");

        let record = self.store.get(slug).await?;
        let decision = decide_resolve(record, now, credential, self.hasher.as_ref())?;

        if let Some(mutation) = decision.mutation {
            self.apply(slug, mutation).await?;
        }

        debug!(slug = %slug, resolution = ?decision.resolution, "Resolved link");
        Ok(decision.resolution)
    }

    async fn create(&self, request: CreateLink, now: Timestamp) -> Result<Created> {
        let plan = plan_create(
            &request.url,
            request.expiration.as_deref(),
            request.slug.as_deref(),
            request.password.as_deref(),
            now,
        )?;

        let slug = match plan.slug {
            Some(slug) => slug,
            None => self.generator.generate().into(),
        };
        let password = self.protect(plan.password)?;
        let record = LinkRecord::new(plan.target_url, now, plan.expires_at, password);

        self.store.put(&slug, &record).await?;
        info!(
            slug = %slug,
            url = %record.target_url,
            expires_at = ?record.expires_at,
            password_protected = record.is_password_protected(),
            "Created link"
        );

        Ok(Created {
            password_protected: record.is_password_protected(),
            slug,
            target_url: record.target_url,
            expires_at: record.expires_at,
        })
    }

    async fn list(&self, now: Timestamp, is_privileged: bool) -> Result<Vec<LinkView>> {
        let mut views = Vec::new();
        let mut hidden = 0usize;

        for (slug, record) in self.store.list_all().await? {
            match decide_visibility(&slug, &record, now, is_privileged) {
                Visibility::Purge => self.apply(&slug, Mutation::Delete).await?,
                Visibility::Hidden => hidden += 1,
                Visibility::Visible(view) => views.push(view),
            }
        }

        views.sort_by(|a, b| a.slug.cmp(&b.slug));
        debug!(count = views.len(), hidden, privileged = is_privileged, "Listed links");
        Ok(views)
    }

    async fn inspect(
        &self,
        slug: &Slug,
        now: Timestamp,
        is_privileged: bool,
    ) -> Result<Option<LinkView>> {
        let Some(record) = self.store.get(slug).await? else {
            return Ok(None);
        };

        match decide_visibility(slug, &record, now, is_privileged) {
            Visibility::Purge => {
                self.apply(slug, Mutation::Delete).await?;
                Ok(None)
            }
            Visibility::Hidden => Ok(None),
            Visibility::Visible(view) => Ok(Some(view)),
        }
    }

    async fn remove(&self, slug: &Slug, is_privileged: bool) -> Result<()> {
        if self.config.require_privileged_delete && !is_privileged {
            debug!(slug = %slug, "Rejected unprivileged delete");
            return Err(LinkError::Forbidden);
        }

        self.store.delete(slug).await?;
        info!(slug = %slug, "Removed link");
        Ok(())
    }

    async fn stored_secret(&self) -> Result<Option<String>> {
        Ok(self.store.reserved_secret().await?)
    }
}
