use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Top-level project configuration (tplgen.config.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// JSON Schema reference
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Generation options shared by all targets
    #[serde(default)]
    pub options: TaskOptions,

    /// Source-to-destination groupings, processed in order
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// One destination group: the sources compiled into a single output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Target {
    /// Source template files or directories, in order
    pub src: Vec<PathBuf>,

    /// Destination path for the generated module
    pub dest: PathBuf,
}

/// Generation options. Every field has a default, so a partial (or empty)
/// `options` object in the config file is merged over the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskOptions {
    /// String inserted between joined per-file entries
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Indentation unit for continuation lines and module wrapping
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Delimiter character for generated string literals
    #[serde(default = "default_quote_char")]
    pub quote_char: char,

    /// Keep template line structure readable in the generated source
    #[serde(default = "default_raw")]
    pub raw: bool,

    /// Dotted namespace templates are registered under, or `false` to
    /// disable namespacing entirely
    #[serde(default)]
    pub namespace: NamespaceOption,

    /// Root expression every namespace access path is built from
    #[serde(default = "default_global")]
    pub global: String,

    /// Dependency-module wrapping: `false`, `true`, a module name, or an
    /// ordered list of module names
    #[serde(default)]
    pub amd: AmdOption,

    /// Pre-compile template source through an external template compiler
    /// instead of escaping it as a raw string literal
    #[serde(default)]
    pub compile: bool,

    /// How a source file path becomes the entry's namespace key
    #[serde(default)]
    pub process_name: NameTransform,
}

fn default_separator() -> String {
    "\n\n".to_string()
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_quote_char() -> char {
    '\''
}

fn default_raw() -> bool {
    true
}

fn default_global() -> String {
    "this".to_string()
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            indent: default_indent(),
            quote_char: default_quote_char(),
            raw: default_raw(),
            namespace: NamespaceOption::default(),
            global: default_global(),
            amd: AmdOption::default(),
            compile: false,
            process_name: NameTransform::default(),
        }
    }
}

/// Namespace selection: a dotted path string, or `false` to disable.
///
/// `true` has no meaning and is rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NamespaceOption {
    Flag(bool),
    Dotted(String),
}

impl Default for NamespaceOption {
    fn default() -> Self {
        NamespaceOption::Dotted("app.tpl".to_string())
    }
}

impl NamespaceOption {
    /// The dotted namespace, or `None` when namespacing is disabled.
    pub fn as_dotted(&self) -> Option<&str> {
        match self {
            NamespaceOption::Flag(_) => None,
            NamespaceOption::Dotted(ns) => Some(ns),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, NamespaceOption::Dotted(_))
    }
}

/// Dependency-module wrapping: disabled, enabled without dependencies, or
/// enabled with one or more declared dependency modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AmdOption {
    Flag(bool),
    Module(String),
    Modules(Vec<String>),
}

impl Default for AmdOption {
    fn default() -> Self {
        AmdOption::Flag(false)
    }
}

impl AmdOption {
    /// Declared dependency module names, or `None` when wrapping is disabled.
    /// `Some(&[])` means wrapping with an empty dependency list.
    pub fn modules(&self) -> Option<&[String]> {
        match self {
            AmdOption::Flag(false) => None,
            AmdOption::Flag(true) => Some(&[]),
            AmdOption::Module(name) => Some(std::slice::from_ref(name)),
            AmdOption::Modules(names) => Some(names),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.modules().is_some()
    }
}

/// File-name-to-key transform for template registration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NameTransform {
    /// Use the source path exactly as listed
    #[default]
    Identity,
    /// Use the file name, dropping leading directories
    FileName,
    /// Use the file name without its extension
    FileStem,
}

impl NameTransform {
    /// Compute the registration key for one source path.
    pub fn apply(&self, path: &Path) -> String {
        match self {
            NameTransform::Identity => path.to_string_lossy().into_owned(),
            NameTransform::FileName => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            NameTransform::FileStem => path
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        }
    }
}
