//! Value types carried through delegate callbacks.

use serde::{Deserialize, Serialize};

/// An update offered by the engine, as already parsed from its feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    /// Machine-comparable version.
    pub version: String,
    /// Version shown to users.
    pub display_version: String,
    /// Release notes page, if the feed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes_url: Option<String>,
    /// Critical updates are presented more insistently.
    #[serde(default)]
    pub critical: bool,
}

impl UpdateItem {
    pub fn new(version: impl Into<String>, display_version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            display_version: display_version.into(),
            release_notes_url: None,
            critical: false,
        }
    }
}

/// Who asked for an update check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// User-initiated, with visible progress and results.
    Explicit,
    /// Scheduled by the engine, silent unless an update is found.
    Background,
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Background => write!(f, "background"),
        }
    }
}
