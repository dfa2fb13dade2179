use serde::{Deserialize, Serialize};

// ── Warning code constants ──

pub const W_SRC_NOT_FOUND: &str = "W_SRC_NOT_FOUND";
pub const W_SRC_UNREADABLE: &str = "W_SRC_UNREADABLE";
pub const W_EMPTY_GROUP: &str = "W_EMPTY_GROUP";

/// A single non-fatal warning raised while assembling destination groups.
///
/// Warnings are advisory: the file (or group) they describe is skipped and
/// processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEntry {
    /// Machine-readable stable warning code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Path the warning refers to
    pub path: String,
}

impl WarningEntry {
    pub fn new(code: &str, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
        }
    }
}

/// Accumulated warnings from one load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub warnings: Vec<WarningEntry>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: WarningEntry) {
        self.warnings.push(entry);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.warnings.extend(other.warnings);
    }
}

/// Errors that prevent loading a project configuration entirely
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid option `{option}`: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("I/O error reading {0}: {1}")]
    Io(String, #[source] std::io::Error),
}
