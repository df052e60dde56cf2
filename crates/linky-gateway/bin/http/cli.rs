use clap::{ArgAction, Parser, ValueEnum};
use linky_engine::HasherKind;
use linky_gateway::telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LINKY_LISTEN_ADDR";
pub const API_KEY_ENV: &str = "LINKY_API_KEY";
pub const SUPER_SECRET_ENV: &str = "LINKY_SUPER_SECRET";
pub const STORAGE_BACKEND_ENV: &str = "LINKY_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "LINKY_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "LINKY_REDIS_KEY_PREFIX";
pub const PASSWORD_HASHER_ENV: &str = "LINKY_PASSWORD_HASHER";
pub const RETAIN_RECOVERABLE_PASSWORDS_ENV: &str = "LINKY_RETAIN_RECOVERABLE_PASSWORDS";
pub const REQUIRE_PRIVILEGED_DELETE_ENV: &str = "LINKY_REQUIRE_PRIVILEGED_DELETE";
pub const LIST_PAGE_SIZE_ENV: &str = "LINKY_LIST_PAGE_SIZE";
pub const LOG_FORMAT_ENV: &str = "LINKY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PasswordHasherArg {
    #[value(name = "argon2")]
    Argon2,
    #[value(name = "sha256")]
    Sha256,
}

impl From<PasswordHasherArg> for HasherKind {
    fn from(value: PasswordHasherArg) -> Self {
        match value {
            PasswordHasherArg::Argon2 => HasherKind::Argon2,
            PasswordHasherArg::Sha256 => HasherKind::Sha256,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linky")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Bearer token required on every `/api` route. Unset disables the API.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Privileged secret. Unset falls back to the store's reserved key.
    #[arg(long, env = SUPER_SECRET_ENV, hide_env_values = true)]
    pub super_secret: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = "")]
    pub redis_key_prefix: String,

    #[arg(
        long,
        env = PASSWORD_HASHER_ENV,
        value_enum,
        default_value_t = PasswordHasherArg::Argon2
    )]
    pub password_hasher: PasswordHasherArg,

    #[arg(
        long,
        env = RETAIN_RECOVERABLE_PASSWORDS_ENV,
        action = ArgAction::Set,
        default_value_t = true
    )]
    pub retain_recoverable_passwords: bool,

    #[arg(
        long,
        env = REQUIRE_PRIVILEGED_DELETE_ENV,
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub require_privileged_delete: bool,

    #[arg(long, env = LIST_PAGE_SIZE_ENV, default_value_t = linky_storage::DEFAULT_PAGE_SIZE)]
    pub list_page_size: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
