use async_trait::async_trait;
use linky_core::{KvPage, KvStore, Result, StorageError};
use redis::AsyncCommands;
use tracing::{trace, warn};

/// A Redis-backed implementation of [`KvStore`].
///
/// Values are stored as plain strings. An optional key prefix namespaces all
/// keys, so several deployments can share one Redis database. Listing uses
/// `SCAN`, which may return a key more than once across pages.
#[derive(Debug, Clone)]
pub struct RedisKv {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

fn is_wrong_type(err: &redis::RedisError) -> bool {
    err.code() == Some("WRONGTYPE")
}

/// Escapes the glob metacharacters understood by `SCAN MATCH`.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl RedisKv {
    /// Creates a store over an existing multiplexed connection, without a key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "")
    }

    /// Creates a store whose keys are all namespaced under `key_prefix`
    /// (e.g. "linky:").
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a client for `redis_url` and establishes a multiplexed connection.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StorageError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let full_key = self.full_key(key);
        trace!(key = %full_key, "Fetching value from Redis");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<Vec<u8>>>(&full_key).await {
            // invalid UTF-8 survives as replacement characters and fails to decode upstream
            Ok(value) => Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if is_wrong_type(&e) => {
                warn!(key = %full_key, "Ignoring Redis key holding a non-string value");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %full_key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let full_key = self.full_key(key);
        trace!(key = %full_key, "Writing value to Redis");

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&full_key, value).await.map_err(|e| {
            warn!(key = %full_key, error = %e, "Redis error on set");
            map_redis_error("failed to write value to Redis", e)
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full_key = self.full_key(key);
        trace!(key = %full_key, "Removing value from Redis");

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&full_key).await.map_err(|e| {
            warn!(key = %full_key, error = %e, "Redis error on del");
            map_redis_error("failed to delete value from Redis", e)
        })
    }

    async fn list(&self, cursor: Option<&str>, limit: usize) -> Result<KvPage> {
        let start: u64 = match cursor {
            None => 0,
            Some(raw) => raw.parse().map_err(|_| {
                StorageError::InvalidData(format!("invalid SCAN cursor '{raw}'"))
            })?,
        };
        let pattern = format!("{}*", escape_glob(&self.key_prefix));

        let mut conn = self.conn.clone();
        let (next, keys): (u64, Vec<Vec<u8>>) = redis::cmd("SCAN")
            .arg(start)
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(limit.max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!(pattern = %pattern, error = %e, "Redis error on scan");
                map_redis_error("failed to scan keys in Redis", e)
            })?;

        trace!(cursor = start, next, count = keys.len(), "Scanned Redis keys");

        let keys = keys
            .into_iter()
            .filter_map(|raw| match String::from_utf8(raw) {
                Ok(key) => key.strip_prefix(&self.key_prefix).map(str::to_owned),
                Err(e) => {
                    warn!(key = ?e.as_bytes(), "Skipping Redis key that is not valid UTF-8");
                    None
                }
            })
            .collect();

        Ok(KvPage {
            keys,
            cursor: (next != 0).then(|| next.to_string()),
        })
    }
}
