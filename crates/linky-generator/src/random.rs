use crate::Generator;
use linky_core::slug::MAX_LENGTH;
use linky_core::Slug;
use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated slugs. 62^6 is roughly 5.7e10 possible values.
pub const DEFAULT_LENGTH: usize = 6;

/// Generates slugs of random ASCII letters and digits.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::with_length(DEFAULT_LENGTH)
    }

    /// Creates a generator producing slugs of `length` characters, clamped
    /// to the valid slug length range.
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_LENGTH),
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = Slug;

    /// Draws again on the rare outcome that collides with a reserved name.
    fn generate(&self) -> Slug {
        let mut rng = rand::rng();
        loop {
            let candidate: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(self.length)
                .map(char::from)
                .collect();
            if let Ok(slug) = Slug::new(candidate) {
                return slug;
            }
        }
    }
}
