//! Client configuration.
//!
//! A [`Config`] names the server and how to reach it. It can be built in code,
//! loaded from a JSON file, and overridden from `NZBGET_*` environment
//! variables:
//!
//! ```json
//! {
//!   "url": "http://localhost:6789",
//!   "user": "nzbget",
//!   "pass": "tegbzn6789",
//!   "verify_ssl": true,
//!   "timeout_secs": 60
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Path segment every NZBGet JSON-RPC endpoint ends with.
const RPC_PATH: &str = "/jsonrpc";

/// Errors raised while building a client or loading its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed or is not http(s).
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A zero timeout would fail every call before it starts.
    #[error("Invalid timeout: must be greater than zero")]
    InvalidTimeout,

    /// The credentials cannot be sent as a header value.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The HTTP client could not be constructed (TLS backend failure).
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for a [`Config`].
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Connection settings for one NZBGet server.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL, with or without the trailing `/jsonrpc`.
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    /// Verify the server's TLS certificate.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    /// Per-call timeout covering connect, send and body read. Stored as
    /// whole seconds under `timeout_secs` in config files.
    #[serde(rename = "timeout_secs", with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,
    /// Use this HTTP client instead of building one. `verify_ssl` is ignored
    /// when set.
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// `Duration` as whole seconds on the wire, rounded up so a non-zero
/// sub-second timeout never saves as 0.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs() + u64::from(value.subsec_nanos() > 0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl Config {
    /// Create a config for the given base URL with default settings.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            user: String::new(),
            pass: String::new(),
            verify_ssl: true,
            timeout: default_timeout(),
            http_client: None,
        }
    }

    /// Set basic-auth credentials.
    pub fn with_credentials(mut self, user: &str, pass: &str) -> Self {
        self.user = user.to_string();
        self.pass = pass.to_string();
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the per-call timeout. Must be non-zero; [`NzbGet::new`] rejects a
    /// zero timeout.
    ///
    /// [`NzbGet::new`]: crate::NzbGet::new
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a caller-supplied HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimeout` if the timeout is zero.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(self.timeout)
    }

    /// The effective JSON-RPC endpoint.
    ///
    /// One trailing `/` and one trailing `/jsonrpc` are stripped before a
    /// single `/jsonrpc` is appended, so `http://h`, `http://h/`,
    /// `http://h/jsonrpc` and `http://h/jsonrpc/` all yield
    /// `http://h/jsonrpc`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the result does not parse or its
    /// scheme is not `http` or `https`.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let normalized = normalize_url(&self.url);
        let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme {:?}", other),
            }),
        }
    }

    /// The `Authorization` header value, if credentials are configured.
    ///
    /// Credentials count as configured unless both user and password are
    /// empty.
    pub fn auth_header(&self) -> Option<String> {
        if self.user.is_empty() && self.pass.is_empty() {
            return None;
        }
        let encoded = BASE64.encode(format!("{}:{}", self.user, self.pass));
        Some(format!("Basic {}", encoded))
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location.
    ///
    /// `$XDG_CONFIG_HOME/nzbget-rpc/config.json` on Linux,
    /// `~/Library/Application Support/nzbget-rpc/config.json` on macOS.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nzbget-rpc").join("config.json"))
    }

    /// Overwrite fields from `NZBGET_URL`, `NZBGET_USER`, `NZBGET_PASS`,
    /// `NZBGET_VERIFY_SSL` and `NZBGET_TIMEOUT_SECS` when they are set.
    /// Unparseable boolean or numeric values are ignored.
    pub fn apply_env_overrides(&mut self) {
        macro_rules! apply_override {
            ($field:ident, $env:literal, $parser:ident) => {
                if let Some(val) = Self::$parser($env) {
                    self.$field = val;
                }
            };
        }

        apply_override!(url, "NZBGET_URL", env_string);
        apply_override!(user, "NZBGET_USER", env_string);
        apply_override!(pass, "NZBGET_PASS", env_string);
        apply_override!(verify_ssl, "NZBGET_VERIFY_SSL", env_bool);
        apply_override!(timeout, "NZBGET_TIMEOUT_SECS", env_secs);
    }

    fn env_string(key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn env_secs(key: &str) -> Option<Duration> {
        std::env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
    }

    fn env_bool(key: &str) -> Option<bool> {
        std::env::var(key).ok().and_then(|v| v.parse().ok())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:6789")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("pass", &if self.pass.is_empty() { "" } else { "<redacted>" })
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Strip one trailing `/` and one trailing `/jsonrpc`, then append `/jsonrpc`.
pub fn normalize_url(base: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let base = base.strip_suffix(RPC_PATH).unwrap_or(base);
    format!("{}{}", base, RPC_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_url_converges() {
        for input in ["http://h", "http://h/", "http://h/jsonrpc", "http://h/jsonrpc/"] {
            assert_eq!(normalize_url(input), "http://h/jsonrpc", "input: {}", input);
            let endpoint = Config::new(input).endpoint().unwrap();
            assert_eq!(endpoint.as_str(), "http://h/jsonrpc", "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_url_keeps_prefix_path() {
        assert_eq!(
            normalize_url("https://nas.local:6789/nzbget/"),
            "https://nas.local:6789/nzbget/jsonrpc"
        );
    }

    #[test]
    fn test_endpoint_rejects_bad_urls() {
        assert!(matches!(
            Config::new("not a url").endpoint(),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Config::new("ftp://h").endpoint(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_auth_header() {
        let config = Config::new("http://h").with_credentials("user", "pass");
        // base64("user:pass")
        assert_eq!(config.auth_header().as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_auth_header_absent_without_credentials() {
        assert_eq!(Config::new("http://h").auth_header(), None);
    }

    #[test]
    fn test_auth_header_password_only() {
        let config = Config::new("http://h").with_credentials("", "secret");
        // base64(":secret")
        assert_eq!(config.auth_header().as_deref(), Some("Basic OnNlY3JldA=="));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new("http://h");
        assert!(config.verify_ssl);
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(60));
        assert!(config.http_client.is_none());
    }

    #[test]
    fn test_with_timeout_keeps_subsecond_precision() {
        let config = Config::new("http://h").with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(1500));

        // Config files hold whole seconds, rounded up.
        let saved = serde_json::to_value(&config).unwrap();
        assert_eq!(saved["timeout_secs"], 2);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config::new("http://h").with_timeout(Duration::ZERO);
        assert!(matches!(config.timeout(), Err(ConfigError::InvalidTimeout)));

        let config: Config =
            serde_json::from_str(r#"{"url": "http://h", "timeout_secs": 0}"#).unwrap();
        assert!(matches!(config.timeout(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: Config = serde_json::from_str(r#"{"url": "http://h:6789"}"#).unwrap();
        assert_eq!(config.url, "http://h:6789");
        assert!(config.user.is_empty());
        assert!(config.verify_ssl);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"url": "https://nas/", "user": "u", "pass": "p", "verify_ssl": false, "timeout_secs": 5}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.url, "https://nas/");
        assert_eq!(config.user, "u");
        assert!(!config.verify_ssl);
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_file_errors() {
        let missing = Config::from_file(Path::new("/nonexistent/nzbget-rpc.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let bad = Config::from_file(file.path());
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config::new("http://h").with_credentials("user", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("nzbget-rpc/config.json"));
        }
    }
}
