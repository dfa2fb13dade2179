use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{
    ConfigError, LoadReport, WarningEntry, W_EMPTY_GROUP, W_SRC_NOT_FOUND, W_SRC_UNREADABLE,
};
use crate::options::TaskConfig;

/// Default config file name looked up inside a project directory.
pub const CONFIG_FILE_NAME: &str = "tplgen.config.json";

/// One source template, read and ready for assembly.
///
/// `path` is the path as listed in the config (or discovered relative to the
/// project root); it is what the name transform sees when computing the
/// registration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// All sources mapped to one output destination, in caller-supplied order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub dest: PathBuf,
    pub files: Vec<SourceFile>,
}

/// Parse a task config from a file, or from `tplgen.config.json` inside a
/// directory.
pub fn load_config(path: &Path) -> Result<TaskConfig, ConfigError> {
    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };

    if !config_path.is_file() {
        return Err(ConfigError::NotFound(
            config_path.to_string_lossy().into_owned(),
        ));
    }

    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::Io(config_path.to_string_lossy().into_owned(), e))?;

    let config: TaskConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: config_path.to_string_lossy().into_owned(),
        source: e,
    })?;

    validate(&config)?;
    Ok(config)
}

/// Load a project: parse the config and expand every target into a
/// [`SourceGroup`] with file contents.
///
/// Missing or unreadable source files are dropped with a warning and never
/// abort the load. Group order and file order within a group follow the
/// config exactly.
pub fn load_project(root: &Path) -> Result<(TaskConfig, Vec<SourceGroup>, LoadReport), ConfigError> {
    let config = load_config(root)?;
    let base = if root.is_dir() {
        root.to_path_buf()
    } else {
        root.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut report = LoadReport::new();
    let mut groups = Vec::with_capacity(config.targets.len());

    for target in &config.targets {
        let mut files = Vec::new();

        for entry in &target.src {
            for rel in expand_entry(&base, entry, &mut report) {
                let abs = base.join(&rel);
                match std::fs::read_to_string(&abs) {
                    Ok(text) => files.push(SourceFile { path: rel, text }),
                    Err(e) => {
                        warn!("skipping unreadable source {}: {e}", rel.display());
                        report.push(WarningEntry::new(
                            W_SRC_UNREADABLE,
                            format!("Failed to read source file \"{}\": {e}", rel.display()),
                            rel.to_string_lossy(),
                        ));
                    }
                }
            }
        }

        if files.is_empty() {
            report.push(WarningEntry::new(
                W_EMPTY_GROUP,
                format!(
                    "No source files found for destination \"{}\".",
                    target.dest.display()
                ),
                target.dest.to_string_lossy(),
            ));
        }

        debug!(
            "group {} resolved with {} source file(s)",
            target.dest.display(),
            files.len()
        );
        groups.push(SourceGroup {
            dest: target.dest.clone(),
            files,
        });
    }

    Ok((config, groups, report))
}

/// Expand one `src` entry into relative file paths. A directory entry is
/// walked in sorted order; a file entry is kept as listed; anything else
/// raises a not-found warning.
fn expand_entry(base: &Path, entry: &Path, report: &mut LoadReport) -> Vec<PathBuf> {
    let abs = base.join(entry);

    if abs.is_dir() {
        return WalkDir::new(&abs)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(base)
                    .unwrap_or(e.path())
                    .to_path_buf()
            })
            .collect();
    }

    if abs.is_file() {
        return vec![entry.to_path_buf()];
    }

    warn!("source file {} not found", entry.display());
    report.push(WarningEntry::new(
        W_SRC_NOT_FOUND,
        format!("Source file \"{}\" not found.", entry.display()),
        entry.to_string_lossy(),
    ));
    Vec::new()
}

fn validate(config: &TaskConfig) -> Result<(), ConfigError> {
    if config.options.namespace == crate::options::NamespaceOption::Flag(true) {
        return Err(ConfigError::InvalidOption {
            option: "namespace".to_string(),
            reason: "expected false or a dotted path string".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &Path, json: &serde_json::Value) {
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            serde_json::to_string_pretty(json).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn load_project_reads_listed_files_in_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.html"), "<b></b>").unwrap();
        std::fs::write(tmp.path().join("a.html"), "<a></a>").unwrap();
        write_config(
            tmp.path(),
            &serde_json::json!({
                "targets": [{ "src": ["b.html", "a.html"], "dest": "out.js" }]
            }),
        );

        let (_, groups, report) = load_project(tmp.path()).unwrap();
        assert!(report.is_clean());
        assert_eq!(groups.len(), 1);
        let paths: Vec<_> = groups[0].files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("b.html"), PathBuf::from("a.html")]);
        assert_eq!(groups[0].files[0].text, "<b></b>");
    }

    #[test]
    fn missing_source_is_warned_and_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("here.html"), "<p></p>").unwrap();
        write_config(
            tmp.path(),
            &serde_json::json!({
                "targets": [{ "src": ["gone.html", "here.html"], "dest": "out.js" }]
            }),
        );

        let (_, groups, report) = load_project(tmp.path()).unwrap();
        assert_eq!(groups[0].files.len(), 1);
        assert_eq!(groups[0].files[0].path, PathBuf::from("here.html"));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, W_SRC_NOT_FOUND);
        assert!(report.warnings[0].message.contains("gone.html"));
    }

    #[test]
    fn directory_entry_expands_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("templates");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("z.html"), "z").unwrap();
        std::fs::write(dir.join("a.html"), "a").unwrap();
        write_config(
            tmp.path(),
            &serde_json::json!({
                "targets": [{ "src": ["templates"], "dest": "out.js" }]
            }),
        );

        let (_, groups, report) = load_project(tmp.path()).unwrap();
        assert!(report.is_clean());
        let paths: Vec<_> = groups[0].files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("templates/a.html"),
                PathBuf::from("templates/z.html"),
            ]
        );
    }

    #[test]
    fn empty_group_is_warned_but_kept() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            &serde_json::json!({
                "targets": [{ "src": ["nothing.html"], "dest": "out.js" }]
            }),
        );

        let (_, groups, report) = load_project(tmp.path()).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].files.is_empty());
        let codes: Vec<_> = report.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec![W_SRC_NOT_FOUND, W_EMPTY_GROUP]);
    }

    #[test]
    fn missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn namespace_true_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            &serde_json::json!({
                "options": { "namespace": true },
                "targets": []
            }),
        );

        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn config_path_may_name_the_file_directly() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), &serde_json::json!({ "targets": [] }));

        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(config.targets.is_empty());
    }
}
