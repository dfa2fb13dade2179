use std::path::Path;

use crate::error::CodegenError;

/// Resolves the dotted namespace a source file registers under.
///
/// Selected once per destination group: a fixed string for the common case,
/// or a function of the source path when templates spread across several
/// namespaces in one destination.
pub trait NamespaceResolver {
    fn resolve(&self, source_path: &Path) -> String;
}

/// The constant resolver: every file in the group shares one namespace.
pub struct FixedNamespace(String);

impl FixedNamespace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }
}

impl NamespaceResolver for FixedNamespace {
    fn resolve(&self, _source_path: &Path) -> String {
        self.0.clone()
    }
}

/// The path-dependent resolver: the namespace is computed per file.
pub struct PathNamespace<F>(F);

impl<F> PathNamespace<F>
where
    F: Fn(&Path) -> String,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> NamespaceResolver for PathNamespace<F>
where
    F: Fn(&Path) -> String,
{
    fn resolve(&self, source_path: &Path) -> String {
        (self.0)(source_path)
    }
}

/// External template compiler: turns raw template markup into executable
/// function source. Template syntax is opaque to this crate; an
/// implementation is wired in by the caller when compile mode is enabled.
pub trait TemplateCompiler {
    fn compile(&self, source: &str, source_path: &Path) -> Result<String, CodegenError>;
}
