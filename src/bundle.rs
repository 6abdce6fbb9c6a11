//! Identity of the host application being updated.

use crate::error::ActivationError;
use serde::{Deserialize, Serialize};

/// The application bundle the engine and user driver are bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBundle {
    /// Reverse-DNS identifier (e.g. `"com.example.notes"`).
    pub identifier: String,
    /// Human-readable application name, used in alerts.
    pub name: String,
    /// Machine-comparable version string.
    pub version: String,
    /// Marketing version shown to users, if different from `version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_version: Option<String>,
}

impl HostBundle {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            version: version.into(),
            display_version: None,
        }
    }

    #[must_use]
    pub fn with_display_version(mut self, display_version: impl Into<String>) -> Self {
        self.display_version = Some(display_version.into());
        self
    }

    /// Version string to show to users.
    #[must_use]
    pub fn display_version(&self) -> &str {
        self.display_version.as_deref().unwrap_or(&self.version)
    }

    /// Check that the identity is usable for updating.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::InvalidHost`] when the identifier is not a
    /// dotted reverse-DNS name or the version is empty.
    pub fn validate(&self) -> Result<(), ActivationError> {
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            return Err(ActivationError::InvalidHost(
                "bundle identifier is empty".to_owned(),
            ));
        }
        let well_formed = identifier.contains('.')
            && identifier.split('.').all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            });
        if !well_formed {
            return Err(ActivationError::InvalidHost(format!(
                "bundle identifier {identifier:?} is not a reverse-DNS name"
            )));
        }
        if self.version.trim().is_empty() {
            return Err(ActivationError::InvalidHost(format!(
                "bundle {identifier:?} has no version"
            )));
        }
        Ok(())
    }
}
