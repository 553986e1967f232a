use crate::content::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsdConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Total timeout for following a short link
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    concat!("PromptSD/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Public anon key (row-level security applies)
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_list_limit")]
    pub default_limit: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

const fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

const fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_list_limit(),
            search_limit: default_search_limit(),
        }
    }
}

/// Filter used when neither `RUST_LOG` nor `logging.level` is set
pub const DEFAULT_LOG_FILTER: &str = "info,promptsd=debug,hyper=warn,reqwest=warn";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also append logs to a file
    #[serde(default)]
    pub enabled: bool,
    /// `EnvFilter` directives, e.g. `"warn,promptsd::suno=debug"`
    #[serde(default)]
    pub level: Option<String>,
}

impl LoggingConfig {
    /// Read only the `[logging]` table from config text.
    ///
    /// Tracing starts before the full config is loaded, so anything that fails
    /// to parse falls back to defaults instead of aborting startup.
    #[must_use]
    pub fn peek(content: &str) -> Self {
        #[derive(Deserialize)]
        struct LoggingOnly {
            #[serde(default)]
            logging: LoggingConfig,
        }

        toml::from_str::<LoggingOnly>(content)
            .map(|c| c.logging)
            .unwrap_or_default()
    }

    /// Same as [`LoggingConfig::peek`], reading from `path`. A missing file is the default.
    #[must_use]
    pub fn peek_file(path: &Path) -> Self {
        fs::read_to_string(path)
            .map(|content| Self::peek(&content))
            .unwrap_or_default()
    }

    /// Filter directives to use when `RUST_LOG` is unset
    #[must_use]
    pub fn filter_directives(&self) -> &str {
        self.level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }
}

impl PromptsdConfig {
    /// Get the config file path (`$PROMPTSD_CONFIG_DIR` or ~/.config/promptsd, then config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default location or create the template on first run
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` after writing the template, or an error if the
    /// file cannot be read or parsed.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Load config from `path`, writing the template there if it is missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` after writing the template, or an error if the
    /// file cannot be read or parsed.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` on invalid TOML or mismatched types.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check the fields the server cannot run without
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.supabase.url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "supabase.url".into(),
            });
        }
        if self.supabase.anon_key.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "supabase.anon_key".into(),
            });
        }
        if self.gallery.default_limit == 0 || self.gallery.search_limit == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "gallery limits must be greater than zero".into(),
            });
        }
        if self.resolver.timeout_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "resolver.timeout_secs must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Template written on first run
pub const CONFIG_TEMPLATE: &str = r#"# PromptSD Configuration
# ~/.config/promptsd/config.toml

[server]
bind = "127.0.0.1:3000"

[resolver]
# Short links are followed once per submission; failures are not retried
timeout_secs = 10
connect_timeout_secs = 5

[supabase]
# Required: project URL and public anon key from the Supabase dashboard
url = ""
anon_key = ""

[gallery]
default_limit = 50
search_limit = 10

[logging]
# Also append logs to a file in the cache directory
enabled = false
# Filter directives; RUST_LOG takes precedence when set
# level = "info,promptsd=debug"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_with_defaults() {
        let config = PromptsdConfig::parse(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.resolver.timeout(), Duration::from_secs(10));
        assert_eq!(config.gallery.default_limit, 50);
        assert_eq!(config.gallery.search_limit, 10);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_template_requires_supabase_fields() {
        let config = PromptsdConfig::parse(CONFIG_TEMPLATE).unwrap();
        match config.validate() {
            Err(CoreError::ConfigMissingField { field }) => assert_eq!(field, "supabase.url"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PromptsdConfig::parse("").unwrap();
        assert_eq!(config.resolver.connect_timeout(), Duration::from_secs(5));
        assert!(config.resolver.user_agent.starts_with("PromptSD/"));
    }

    #[test]
    fn test_valid_config() {
        let config = PromptsdConfig::parse(
            r#"
            [supabase]
            url = "https://project.supabase.co"
            anon_key = "anon"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = PromptsdConfig::default();
        config.supabase.url = "https://project.supabase.co".into();
        config.supabase.anon_key = "anon".into();
        config.gallery.search_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = PromptsdConfig::parse("[server\nbind = 1").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParseError(_)));
    }

    #[test]
    fn test_load_or_create_writes_template() {
        let dir = std::env::temp_dir().join(format!("promptsd-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let err = PromptsdConfig::load_or_create_at(&path).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
        assert!(path.exists());

        let config = PromptsdConfig::load_or_create_at(&path).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_logging_peek_ignores_other_sections() {
        let logging = LoggingConfig::peek(
            r#"
            [server]
            bind = 42

            [logging]
            enabled = true
            level = "warn,promptsd::suno=debug"
            "#,
        );
        assert!(logging.enabled);
        assert_eq!(logging.filter_directives(), "warn,promptsd::suno=debug");
    }

    #[test]
    fn test_logging_defaults() {
        for content in ["", "[logging\n", "[logging]\nlevel = \"  \""] {
            let logging = LoggingConfig::peek(content);
            assert!(!logging.enabled, "{content:?}");
            assert_eq!(logging.filter_directives(), DEFAULT_LOG_FILTER, "{content:?}");
        }

        let missing = std::env::temp_dir().join("promptsd-no-such-dir/config.toml");
        assert!(!LoggingConfig::peek_file(&missing).enabled);
    }
}
