//! Key-value backends and the link record store.
//!
//! [`InMemoryKv`] and [`RedisKv`] implement the [`linky_core::KvStore`]
//! seam; [`LinkStore`] layers record serialization, cursor-following
//! listing and reserved-key handling on top of any of them.

pub mod link_store;
pub mod memory;
pub mod redis;

pub use link_store::{LinkStore, DEFAULT_PAGE_SIZE};
pub use memory::InMemoryKv;
pub use self::redis::RedisKv;
