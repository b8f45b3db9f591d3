use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::constants::{
    BIND_ADDRESS, DEFAULT_AVATAR, MAX_BODY_BYTES, MAX_SESSION_TTL_SECS, SESSION_TTL_SECS,
};
use super::defaults::*;
use super::utils::{expand_env_reference, resolve_path};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "bind_address")]
    pub bind: String,

    #[serde(default = "max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default = "default_true")]
    pub cors: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    /// Logs go to stderr when no file is configured
    #[serde(default)]
    pub file: Option<LogFile>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum StorageConfig {
    #[serde(rename = "sqlite")]
    Sqlite(SqliteStorage),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SqliteStorage {
    #[serde(default)]
    pub path: Option<String>,

    /// Abort startup when the tables cannot be created. When false the
    /// failure is only logged.
    #[serde(default = "default_true")]
    pub schema_errors_fatal: bool,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// Shared secret the bot sends in the Authorization header
    #[serde(default)]
    pub api_secret: String,

    #[serde(default)]
    pub admin_username: String,

    #[serde(default)]
    pub admin_password: String,

    #[serde(default = "session_ttl_secs")]
    pub session_ttl_secs: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RenderConfig {
    #[serde(default)]
    pub template_path: Option<String>,

    #[serde(default = "default_avatar")]
    pub default_avatar: String,

    /// chrono strftime format used for every timestamp on a transcript page
    #[serde(default = "timestamp_format")]
    pub timestamp_format: String,

    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Configuration {
    /// Expands `${VAR}` credentials, checks the session lifetime and turns
    /// every configured path into an absolute one.
    pub fn resolve(mut self) -> Result<Self> {
        self.auth.api_secret = expand_env_reference(&self.auth.api_secret);
        self.auth.admin_username = expand_env_reference(&self.auth.admin_username);
        self.auth.admin_password = expand_env_reference(&self.auth.admin_password);

        let ttl = self.auth.session_ttl_secs;
        if ttl == 0 || ttl > MAX_SESSION_TTL_SECS {
            bail!("auth.session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}, got {ttl}");
        }

        if let Some(file) = self.log.file.as_mut() {
            file.path = resolve_path(&file.path)
                .wrap_err(format!("resolving log file path {}", file.path))?;
        }

        let StorageConfig::Sqlite(sqlite) = &mut self.storage;
        if let Some(path) = sqlite.path.as_mut() {
            *path = resolve_path(path).wrap_err(format!("resolving database path {}", path))?;
        }

        if let Some(path) = self.render.template_path.as_mut() {
            *path = resolve_path(path).wrap_err(format!("resolving template path {}", path))?;
        }
        Ok(self)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_secret", &"<redacted>")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: BIND_ADDRESS.to_string(),
            max_body_bytes: MAX_BODY_BYTES,
            cors: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            filters: None,
            file: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteStorage::default())
    }
}

impl Default for SqliteStorage {
    fn default() -> Self {
        Self {
            path: None,
            schema_errors_fatal: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_secret: String::new(),
            admin_username: String::new(),
            admin_password: String::new(),
            session_ttl_secs: SESSION_TTL_SECS,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            default_avatar: DEFAULT_AVATAR.to_string(),
            timestamp_format: timestamp_format(),
            utc_offset_minutes: 0,
        }
    }
}
