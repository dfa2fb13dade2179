//! Namespace access paths.
//!
//! A dotted namespace like `app.tpl` becomes a structured [`AccessPath`]:
//! the configured global root plus an ordered segment list. Paths stay
//! structured through prefix reduction; rendering to `root["a"]["b"]` text
//! happens only when the assembler emits output.

/// An access path rooted at a global reference, e.g. `this["app"]["tpl"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPath {
    root: String,
    segments: Vec<String>,
}

impl AccessPath {
    /// A path that is just the root reference, with no segments.
    pub fn bare(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the degenerate prefix-reduction result: no shared token at
    /// all, not even the root.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.segments.is_empty()
    }

    /// Render the fully-indexed access expression, quoting each segment
    /// with `quote`. The degenerate empty path renders as an empty string.
    pub fn expression(&self, quote: char) -> String {
        let mut expr = self.root.clone();
        for segment in &self.segments {
            expr.push_str(&format!("[{quote}{segment}{quote}]"));
        }
        expr
    }

    /// Render one idempotent guard statement per segment, outer-to-inner.
    /// Each guard uses the running expression *after* its segment is
    /// appended, so guard order matches left-to-right traversal of the
    /// rendered expression.
    pub fn guards(&self, quote: char) -> Vec<String> {
        let mut running = self.root.clone();
        self.segments
            .iter()
            .map(|segment| {
                running.push_str(&format!("[{quote}{segment}{quote}]"));
                format!("{running} = {running} || {{}};")
            })
            .collect()
    }

    fn token_at(&self, index: usize) -> Option<&str> {
        if index == 0 {
            Some(&self.root)
        } else {
            self.segments.get(index - 1).map(String::as_str)
        }
    }

    fn token_count(&self) -> usize {
        1 + self.segments.len()
    }
}

/// Build the access path for a dotted namespace.
///
/// An empty namespace yields the bare root. When the first dotted segment
/// textually equals `root` it is dropped, so a caller writing the root as
/// the leading segment does not double-prefix the path. The root is used
/// verbatim; any namespace string is accepted.
pub fn declare(namespace: &str, root: &str) -> AccessPath {
    if namespace.is_empty() {
        return AccessPath::bare(root);
    }

    let mut parts = namespace.split('.').peekable();
    if parts.peek() == Some(&root) {
        parts.next();
    }

    AccessPath {
        root: root.to_string(),
        segments: parts.map(str::to_string).collect(),
    }
}

/// Reduce several access paths to their longest common leading-token
/// prefix (the root counts as the first token).
///
/// A single path is returned unchanged. Paths that disagree at the root
/// reduce to the empty path; callers treat that degenerate result as "use
/// the literal root" rather than an error.
pub fn common_prefix(paths: &[AccessPath]) -> AccessPath {
    let Some((first, rest)) = paths.split_first() else {
        return AccessPath {
            root: String::new(),
            segments: Vec::new(),
        };
    };
    if rest.is_empty() {
        return first.clone();
    }

    let mut shared = 0;
    'walk: while shared < first.token_count() {
        let token = first.token_at(shared);
        for other in rest {
            if other.token_at(shared) != token {
                break 'walk;
            }
        }
        shared += 1;
    }

    if shared == 0 {
        return AccessPath {
            root: String::new(),
            segments: Vec::new(),
        };
    }
    AccessPath {
        root: first.root.clone(),
        segments: first.segments[..shared - 1].to_vec(),
    }
}
