use crate::lifecycle::{LinkView, Resolution};
use crate::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use linky_core::Slug;
use typed_builder::TypedBuilder;

/// Raw inputs of a new link, as they arrive from the edge.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateLink {
    #[builder(setter(into))]
    pub url: String,
    /// Blank means the link never expires.
    #[builder(default, setter(strip_option, into))]
    pub expiration: Option<String>,
    /// Blank means a slug is generated.
    #[builder(default, setter(strip_option, into))]
    pub slug: Option<String>,
    /// Blank means the link is public.
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
}

/// A link that was just written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub slug: Slug,
    pub target_url: String,
    pub expires_at: Option<Timestamp>,
    pub password_protected: bool,
}

#[async_trait]
pub trait LinkEngine: Send + Sync + 'static {
    /// Looks up `slug` for a visitor and applies whatever write the outcome needs.
    async fn resolve(
        &self,
        slug: &Slug,
        now: Timestamp,
        credential: Option<&str>,
        is_privileged: bool,
    ) -> Result<Resolution>;

    async fn create(&self, request: CreateLink, now: Timestamp) -> Result<Created>;

    /// Every live link the caller may see, sorted by slug. Expired links are purged.
    async fn list(&self, now: Timestamp, is_privileged: bool) -> Result<Vec<LinkView>>;

    /// A single link under the same visibility rules as [`LinkEngine::list`].
    async fn inspect(
        &self,
        slug: &Slug,
        now: Timestamp,
        is_privileged: bool,
    ) -> Result<Option<LinkView>>;

    /// Deletes `slug`. Deleting an absent slug succeeds.
    async fn remove(&self, slug: &Slug, is_privileged: bool) -> Result<()>;

    /// The operator secret kept in the store, if one was provisioned there.
    async fn stored_secret(&self) -> Result<Option<String>>;
}
