pub mod random;

use linky_core::Slug;

pub use random::RandomGenerator;

/// Trait for generating slugs.
///
/// Implementations are pure generators that don't interact with storage.
/// Callers do not check generated slugs for collisions; the last writer of a
/// slug wins.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<Slug>;

    fn generate(&self) -> Self::Output;
}
