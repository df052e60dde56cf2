use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestInfraError>;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to start container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("invalid redis url: {0}")]
    InvalidUrl(#[source] redis::RedisError),

    /// The container started but never accepted a connection.
    #[error("redis at {url} not reachable after {attempts} attempts: {last}")]
    Unreachable {
        url: String,
        attempts: usize,
        #[source]
        last: redis::RedisError,
    },
}
