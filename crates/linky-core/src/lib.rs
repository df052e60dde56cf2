//! Core types and traits for the Linky link shortener.
//!
//! This crate holds the link record and its persisted form, the slug and
//! expiration types, the key-value backend seam and the error taxonomy
//! shared by the storage, engine and gateway crates.

pub mod error;
pub mod expiration;
pub mod kv;
pub mod record;
pub mod slug;

pub use error::{CodecError, Result, StorageError, ValidationError};
pub use expiration::ExpirationPolicy;
pub use kv::{KvPage, KvStore};
pub use record::{LinkRecord, PasswordState};
pub use slug::{Slug, RESERVED_KEY};
