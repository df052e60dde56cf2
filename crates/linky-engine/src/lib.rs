//! Link lifecycle engine.
//!
//! [`lifecycle`] holds the pure decisions: what a lookup reports and which
//! write it implies, what an administrative read may show, and how raw
//! creation inputs are validated. [`LinkService`] runs those decisions
//! against a [`linky_storage::LinkStore`] and is exposed to the edge through
//! the [`LinkEngine`] trait.

pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod password;
pub mod service;

pub use config::EngineConfig;
pub use engine::{CreateLink, Created, LinkEngine};
pub use error::{LinkError, Result};
pub use lifecycle::{LinkView, Resolution};
pub use password::{Argon2Hasher, HasherKind, PasswordHasher, Sha256Hasher};
pub use service::LinkService;
