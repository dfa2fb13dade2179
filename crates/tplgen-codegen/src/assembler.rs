use indexmap::IndexSet;
use log::debug;

use tplgen_config::{SourceFile, TaskOptions};

use crate::error::CodegenError;
use crate::escape::escape;
use crate::namespace::{self, AccessPath};
use crate::traits::{FixedNamespace, NamespaceResolver, TemplateCompiler};

/// Assembles the source files of one destination group into a single
/// generated module string.
///
/// Processing is pure: the assembler reads files in caller-supplied order,
/// deduplicates namespace guard statements across the group
/// (insertion-ordered, first writer wins), joins per-file entries with the
/// configured separator, and optionally wraps the result in an AMD-style
/// `define` header whose export target is the common ancestor of every
/// namespace used in the group.
pub struct ModuleAssembler<'a> {
    options: &'a TaskOptions,
    resolver: Option<Box<dyn NamespaceResolver + 'a>>,
    compiler: Option<Box<dyn TemplateCompiler + 'a>>,
}

impl<'a> ModuleAssembler<'a> {
    /// Create an assembler for the given options. A dotted `namespace`
    /// option installs the constant resolver; `namespace: false` leaves
    /// namespacing off.
    pub fn new(options: &'a TaskOptions) -> Self {
        let resolver = options
            .namespace
            .as_dotted()
            .map(|ns| Box::new(FixedNamespace::new(ns)) as Box<dyn NamespaceResolver + 'a>);
        Self {
            options,
            resolver,
            compiler: None,
        }
    }

    /// Replace the namespace resolver, e.g. with a per-file function.
    pub fn with_resolver(mut self, resolver: Box<dyn NamespaceResolver + 'a>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Wire the external template compiler used in compile mode.
    pub fn with_compiler(mut self, compiler: Box<dyn TemplateCompiler + 'a>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Produce the generated module text for one destination group.
    pub fn assemble(&self, files: &[SourceFile]) -> Result<String, CodegenError> {
        let options = self.options;
        let quote = options.quote_char;
        let amd = options.amd.modules();
        let namespacing = self.resolver.is_some();

        // Literals opened on continuation lines sit one level inside the
        // registration statement, two inside an AMD body.
        let escape_indent = if amd.is_some() || namespacing {
            options.indent.repeat(2)
        } else {
            String::new()
        };

        let mut defined: IndexSet<String> = IndexSet::new();
        let mut roots: IndexSet<AccessPath> = IndexSet::new();
        let mut entries = Vec::with_capacity(files.len());

        for file in files {
            let literal = if options.compile {
                let compiler = self
                    .compiler
                    .as_ref()
                    .ok_or(CodegenError::CompilerNotConfigured)?;
                let compiled = compiler.compile(&file.text, &file.path)?;
                let mut body = compiled.replace("\r\n", "").replace('\n', "");
                body.push(';');
                body
            } else {
                let body = escape(&file.text, quote, options.raw, &escape_indent);
                format!("{quote}{body}{quote};")
            };

            let mut entry = String::new();
            match &self.resolver {
                Some(resolver) => {
                    let namespace = resolver.resolve(&file.path);
                    let path = namespace::declare(&namespace, &options.global);
                    roots.insert(path.clone());

                    let fresh: Vec<String> = path
                        .guards(quote)
                        .into_iter()
                        .filter(|guard| defined.insert(guard.clone()))
                        .collect();
                    if !fresh.is_empty() {
                        for guard in &fresh {
                            if amd.is_some() {
                                entry.push_str(&options.indent);
                            }
                            entry.push_str(guard);
                            entry.push('\n');
                        }
                        entry.push('\n');
                    }

                    if amd.is_some() {
                        entry.push_str(&options.indent);
                    }
                    let key = options.process_name.apply(&file.path);
                    entry.push_str(&path.expression(quote));
                    entry.push_str(&format!("[{quote}{key}{quote}] = "));
                    entry.push_str(&literal);
                }
                None if amd.is_some() => {
                    entry.push_str(&options.indent);
                    entry.push_str("return ");
                    entry.push_str(&literal);
                }
                None => entry.push_str(&literal),
            }
            entries.push(entry);
        }

        let body = entries.join(&normalize_linefeeds(&options.separator));
        debug!(
            "assembled {} entr{} with {} guard statement(s)",
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" },
            defined.len()
        );

        let Some(modules) = amd else {
            return Ok(body);
        };

        let mut out = String::from("define(");
        if !modules.is_empty() {
            let list: Vec<String> = modules
                .iter()
                .map(|name| format!("{quote}{name}{quote}"))
                .collect();
            out.push_str(&format!("[{}], ", list.join(", ")));
        }
        out.push_str(&format!("function ({}) {{\n", modules.join(", ")));
        out.push_str(&body);

        if namespacing {
            let order: Vec<AccessPath> = roots.into_iter().collect();
            let top = namespace::common_prefix(&order);
            let export = if top.is_empty() {
                options.global.clone()
            } else {
                top.expression(quote)
            };
            out.push_str(&format!("\n\n{}return {export};", options.indent));
        }

        out.push_str("\n});");
        Ok(out)
    }
}

fn normalize_linefeeds(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}
