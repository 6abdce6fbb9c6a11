//! Updater configuration and the activation preflight engines share.

use crate::bundle::HostBundle;
use crate::error::{ActivationError, Result, UpdaterError};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Shortest automatic check interval an engine may use (one hour).
pub const MIN_CHECK_INTERVAL_SECS: u64 = 3600;

/// Default automatic check interval (one day).
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 86_400;

/// Default delay before the startup-failure alert is shown.
pub const DEFAULT_STARTUP_ALERT_DELAY_SECS: u64 = 4;

/// Shortest delay before the startup-failure alert is shown.
pub const MIN_STARTUP_ALERT_DELAY_SECS: u64 = 2;

/// Overrides the directory [`UpdaterConfig::default_config_path`] resolves into.
pub const CONFIG_DIR_ENV: &str = "STANDARD_UPDATER_CONFIG_DIR";

const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// Updater settings supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Appcast feed URL. The updater delegate may override it at activation.
    pub feed_url: Option<String>,
    /// Base64-encoded EdDSA (ed25519) public key used to verify updates.
    pub public_ed_key: Option<String>,
    /// Accept `http` feeds. Off by default.
    pub allow_insecure_feed: bool,
    /// Whether the engine schedules background checks.
    pub automatically_checks: bool,
    /// Interval between background checks in seconds.
    pub check_interval_secs: u64,
    /// Delay before a startup-failure alert is presented, in seconds.
    pub startup_alert_delay_secs: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            public_ed_key: None,
            allow_insecure_feed: false,
            automatically_checks: true,
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            startup_alert_delay_secs: DEFAULT_STARTUP_ALERT_DELAY_SECS,
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| UpdaterError::Config(e.to_string()))
    }

    /// Load from `path`, or return defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| UpdaterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `<config dir>/<bundle identifier>/updater.toml`.
    ///
    /// The config dir is `$STANDARD_UPDATER_CONFIG_DIR` when set, otherwise
    /// `dirs::config_dir()`.
    #[must_use]
    pub fn default_config_path(host: &HostBundle) -> PathBuf {
        let base = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .unwrap_or_else(|| std::env::temp_dir().join("standard-updater-config"));
        base.join(&host.identifier).join("updater.toml")
    }

    /// Background check interval, clamped to [`MIN_CHECK_INTERVAL_SECS`].
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs.max(MIN_CHECK_INTERVAL_SECS))
    }

    /// Startup-failure alert delay, clamped to [`MIN_STARTUP_ALERT_DELAY_SECS`].
    #[must_use]
    pub fn startup_alert_delay(&self) -> Duration {
        Duration::from_secs(self.startup_alert_delay_secs.max(MIN_STARTUP_ALERT_DELAY_SECS))
    }

    /// Preflight an engine runs before it starts.
    ///
    /// `feed_override` is the updater delegate's feed URL, which takes
    /// precedence over [`UpdaterConfig::feed_url`]. Returns the feed URL the
    /// engine should poll.
    ///
    /// # Errors
    ///
    /// Returns the first misconfiguration found, checked in order: host
    /// identity, feed URL, public key.
    pub fn validate(
        &self,
        host: &HostBundle,
        feed_override: Option<&str>,
    ) -> std::result::Result<Url, ActivationError> {
        host.validate()?;
        let feed = self.resolve_feed(feed_override)?;
        self.validate_public_key()?;
        Ok(feed)
    }

    fn resolve_feed(
        &self,
        feed_override: Option<&str>,
    ) -> std::result::Result<Url, ActivationError> {
        let raw = feed_override
            .or(self.feed_url.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ActivationError::MissingFeedUrl)?;

        let url = Url::parse(raw).map_err(|e| ActivationError::InvalidFeedUrl {
            url: raw.to_owned(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "https" => Ok(url),
            "http" if self.allow_insecure_feed => Ok(url),
            "http" => Err(ActivationError::InsecureFeedUrl(raw.to_owned())),
            other => Err(ActivationError::InvalidFeedUrl {
                url: raw.to_owned(),
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }

    fn validate_public_key(&self) -> std::result::Result<(), ActivationError> {
        let key = self
            .public_ed_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ActivationError::MissingPublicKey)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(key)
            .map_err(|e| ActivationError::InvalidPublicKey(e.to_string()))?;
        if bytes.len() != ED25519_PUBLIC_KEY_LEN {
            return Err(ActivationError::InvalidPublicKey(format!(
                "expected {ED25519_PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn host() -> HostBundle {
        HostBundle::new("com.example.notes", "Notes", "1")
    }

    fn valid_config() -> UpdaterConfig {
        UpdaterConfig {
            feed_url: Some("https://example.com/appcast.xml".to_owned()),
            public_ed_key: Some(KEY.to_owned()),
            ..UpdaterConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = UpdaterConfig::default();
        assert!(config.feed_url.is_none());
        assert!(config.automatically_checks);
        assert_eq!(config.check_interval(), Duration::from_secs(86_400));
        assert_eq!(config.startup_alert_delay(), Duration::from_secs(4));
    }

    #[test]
    fn valid_config_returns_feed() {
        let url = valid_config().validate(&host(), None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/appcast.xml");
    }

    #[test]
    fn delegate_feed_overrides_config() {
        let url = valid_config()
            .validate(&host(), Some("https://beta.example.com/appcast.xml"))
            .unwrap();
        assert_eq!(url.host_str(), Some("beta.example.com"));
    }

    #[test]
    fn override_satisfies_missing_feed() {
        let config = UpdaterConfig {
            feed_url: None,
            ..valid_config()
        };
        assert!(
            config
                .validate(&host(), Some("https://example.com/feed.xml"))
                .is_ok()
        );
    }

    #[test]
    fn missing_feed_is_rejected() {
        let config = UpdaterConfig {
            feed_url: Some("  ".to_owned()),
            ..valid_config()
        };
        assert_eq!(
            config.validate(&host(), None),
            Err(ActivationError::MissingFeedUrl)
        );
    }

    #[test]
    fn malformed_feed_is_rejected() {
        let config = UpdaterConfig {
            feed_url: Some("not a url".to_owned()),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(&host(), None),
            Err(ActivationError::InvalidFeedUrl { .. })
        ));

        let config = UpdaterConfig {
            feed_url: Some("ftp://example.com/appcast.xml".to_owned()),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(&host(), None),
            Err(ActivationError::InvalidFeedUrl { .. })
        ));
    }

    #[test]
    fn http_feed_needs_opt_in() {
        let mut config = UpdaterConfig {
            feed_url: Some("http://example.com/appcast.xml".to_owned()),
            ..valid_config()
        };
        assert!(matches!(
            config.validate(&host(), None),
            Err(ActivationError::InsecureFeedUrl(_))
        ));

        config.allow_insecure_feed = true;
        assert!(config.validate(&host(), None).is_ok());
    }

    #[test]
    fn public_key_is_checked() {
        let mut config = UpdaterConfig {
            public_ed_key: None,
            ..valid_config()
        };
        assert_eq!(
            config.validate(&host(), None),
            Err(ActivationError::MissingPublicKey)
        );

        config.public_ed_key = Some("%%%".to_owned());
        assert!(matches!(
            config.validate(&host(), None),
            Err(ActivationError::InvalidPublicKey(_))
        ));

        // 16 bytes instead of 32.
        config.public_ed_key = Some("AAAAAAAAAAAAAAAAAAAAAA==".to_owned());
        assert!(matches!(
            config.validate(&host(), None),
            Err(ActivationError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn host_identity_is_checked_first() {
        let config = UpdaterConfig::default();
        let bad_host = HostBundle::new("", "Notes", "1");
        assert!(matches!(
            config.validate(&bad_host, None),
            Err(ActivationError::InvalidHost(_))
        ));
    }

    #[test]
    fn check_interval_is_clamped() {
        let config = UpdaterConfig {
            check_interval_secs: 60,
            ..UpdaterConfig::default()
        };
        assert_eq!(
            config.check_interval(),
            Duration::from_secs(MIN_CHECK_INTERVAL_SECS)
        );
    }

    #[test]
    fn startup_alert_is_never_immediate() {
        let config = UpdaterConfig {
            startup_alert_delay_secs: 0,
            ..UpdaterConfig::default()
        };
        assert_eq!(
            config.startup_alert_delay(),
            Duration::from_secs(MIN_STARTUP_ALERT_DELAY_SECS)
        );

        let config = UpdaterConfig {
            startup_alert_delay_secs: 9,
            ..UpdaterConfig::default()
        };
        assert_eq!(config.startup_alert_delay(), Duration::from_secs(9));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("updater.toml");

        let config = UpdaterConfig {
            startup_alert_delay_secs: 10,
            automatically_checks: false,
            ..valid_config()
        };
        config.save_to_file(&path).unwrap();

        let loaded = UpdaterConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("updater.toml");
        std::fs::write(&path, "feed_url = \"https://example.com/a.xml\"\n").unwrap();

        let loaded = UpdaterConfig::from_file(&path).unwrap();
        assert_eq!(loaded.feed_url.as_deref(), Some("https://example.com/a.xml"));
        assert_eq!(loaded.check_interval_secs, DEFAULT_CHECK_INTERVAL_SECS);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(matches!(
            UpdaterConfig::from_file(&path),
            Err(UpdaterError::Config(_))
        ));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = UpdaterConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, UpdaterConfig::default());
    }

    #[test]
    fn default_config_path_is_per_host() {
        let path = UpdaterConfig::default_config_path(&host());
        assert!(path.ends_with("com.example.notes/updater.toml"));
    }
}
