use crate::password::HasherKind;
use typed_builder::TypedBuilder;

/// Engine knobs. Everything else is a per-call parameter.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EngineConfig {
    /// Hasher for passwords of newly created links.
    #[builder(default)]
    pub hasher: HasherKind,
    /// Keep a plaintext copy of new passwords so privileged listings can
    /// show them again.
    #[builder(default = true)]
    pub retain_recoverable_passwords: bool,
    /// Reject deletes from callers without the privileged secret.
    #[builder(default = false)]
    pub require_privileged_delete: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
