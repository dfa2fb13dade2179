pub mod error;
pub mod loader;
pub mod options;

// Re-exports
pub use error::{ConfigError, LoadReport, WarningEntry};
pub use loader::{SourceFile, SourceGroup, CONFIG_FILE_NAME};
pub use options::{AmdOption, NameTransform, NamespaceOption, TaskConfig, TaskOptions, Target};
