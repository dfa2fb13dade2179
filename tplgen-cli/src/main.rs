use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use tplgen_codegen::ModuleAssembler;
use tplgen_config::loader::{load_project, CONFIG_FILE_NAME};
use tplgen_config::LoadReport;

#[derive(Parser)]
#[command(name = "tplgen", about = "tplgen – compile markup templates into script modules")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new tplgen project
    Init {
        /// Project name
        name: String,
        /// Target directory (defaults to ./<name>)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Load a project config and show what would be built
    Check {
        /// Project directory or config file (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Generate all destination modules
    Build {
        /// Project directory or config file (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Directory destination paths are resolved against
        /// (defaults to the project directory)
        #[arg(short, long)]
        out_root: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init { name, dir } => cmd_init(&name, dir.as_deref()),
        Command::Check { path } => cmd_check(&path),
        Command::Build { path, out_root } => cmd_build(&path, out_root.as_deref()),
    };

    match result {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn cmd_init(name: &str, dir: Option<&Path>) -> Result<bool> {
    let project_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => {
            validate_default_dir_name(name)?;
            PathBuf::from(name)
        }
    };

    if project_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", project_dir.display());
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create directory '{}'", project_dir.display()))?;
    std::fs::create_dir_all(project_dir.join("templates"))?;

    let config = serde_json::json!({
        "options": {
            "namespace": "app.tpl"
        },
        "targets": [
            { "src": ["templates"], "dest": "dist/templates.js" }
        ]
    });
    std::fs::write(
        project_dir.join(CONFIG_FILE_NAME),
        serde_json::to_string_pretty(&config)?,
    )?;

    std::fs::write(
        project_dir.join("templates/greeting.html"),
        "<p>Hello, <%= name %>!</p>\n",
    )?;

    println!(
        "{} Created project '{}' at {}",
        "✓".green().bold(),
        name.bold(),
        project_dir.display()
    );
    println!("  {} {}", "→".dimmed(), CONFIG_FILE_NAME);
    println!("  {} templates/greeting.html", "→".dimmed());
    println!();
    println!("Next steps:");
    println!("  {} {}", "cd".dimmed(), project_dir.display());
    println!("  {} build", "tplgen".dimmed());

    Ok(true)
}

fn validate_default_dir_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Project name must not be empty");
    }

    // Prevent path traversal when the name doubles as the directory.
    if name.contains('/') || name.contains('\\') {
        anyhow::bail!("Project name must not contain path separators");
    }

    let mut components = Path::new(name).components();
    let Some(first) = components.next() else {
        anyhow::bail!("Project name must not be empty");
    };

    if components.next().is_some() {
        anyhow::bail!("Project name must be a single path component");
    }

    match first {
        std::path::Component::Normal(_) => Ok(()),
        _ => anyhow::bail!("Project name must be a normal directory name"),
    }
}

fn cmd_check(path: &Path) -> Result<bool> {
    println!(
        "{} {}",
        "Checking".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    let (config, groups, report) = load_project(path)
        .with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    println!();
    println!("{}", "Options".bold().underline());
    println!(
        "  Namespace:  {}",
        config
            .options
            .namespace
            .as_dotted()
            .unwrap_or("(disabled)")
    );
    println!("  Global:     {}", config.options.global);
    println!("  Quote:      {}", config.options.quote_char);
    println!("  Raw:        {}", config.options.raw);
    println!(
        "  AMD:        {}",
        match config.options.amd.modules() {
            None => "(disabled)".to_string(),
            Some(modules) if modules.is_empty() => "enabled".to_string(),
            Some(modules) => modules.join(", "),
        }
    );
    println!("  Compile:    {}", config.options.compile);

    println!();
    println!("{}", "Targets".bold().underline());
    for group in &groups {
        println!(
            "  {} {} ({} source file(s))",
            "→".dimmed(),
            group.dest.display(),
            group.files.len()
        );
    }

    print_warnings(&report);

    println!();
    if report.is_clean() {
        println!("{} {} target(s) ready", "✓".green().bold(), groups.len());
    } else {
        println!(
            "{} {} target(s), {} warning(s)",
            "⚠".yellow().bold(),
            groups.len(),
            report.warnings.len()
        );
    }
    Ok(true)
}

fn cmd_build(path: &Path, out_root: Option<&Path>) -> Result<bool> {
    let (config, groups, report) = load_project(path)
        .with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    let base = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    let out_base = out_root.map(Path::to_path_buf).unwrap_or(base);

    print_warnings(&report);

    let assembler = ModuleAssembler::new(&config.options);
    let mut count = 0usize;

    for group in &groups {
        let module = assembler
            .assemble(&group.files)
            .with_context(|| format!("Failed to assemble '{}'", group.dest.display()))?;

        let dest = out_base.join(&group.dest);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        std::fs::write(&dest, &module)
            .with_context(|| format!("Failed to write '{}'", dest.display()))?;

        println!("  {} {}", "→".dimmed(), dest.display());
        count += 1;
    }

    println!(
        "{} {} {} created",
        "✓".green().bold(),
        count,
        if count == 1 { "file" } else { "files" }
    );
    Ok(true)
}

fn print_warnings(report: &LoadReport) {
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning.message);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_fixture_project(dir: &Path) {
        std::fs::write(dir.join("x.html"), "<p>hi</p>").unwrap();
        std::fs::write(dir.join("y.html"), "<p>\nyo</p>").unwrap();
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            serde_json::to_string_pretty(&serde_json::json!({
                "options": { "quoteChar": "\"" },
                "targets": [{ "src": ["x.html", "y.html"], "dest": "dist/templates.js" }]
            }))
            .unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn init_rejects_parent_dir_name() {
        let result = cmd_init("..", None);
        assert!(result.is_err());
    }

    #[test]
    fn init_creates_minimal_project() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("my-templates");

        cmd_init("my-templates", Some(project_dir.as_path())).unwrap();

        assert!(project_dir.join(CONFIG_FILE_NAME).exists());
        assert!(project_dir.join("templates/greeting.html").exists());
    }

    #[test]
    fn build_writes_every_destination() {
        let tmp = TempDir::new().unwrap();
        write_fixture_project(tmp.path());

        let ok = cmd_build(tmp.path(), None).unwrap();
        assert!(ok);

        let out = std::fs::read_to_string(tmp.path().join("dist/templates.js")).unwrap();
        assert!(out.contains("this[\"app\"] = this[\"app\"] || {};"));
        assert!(out.contains("this[\"app\"][\"tpl\"][\"x.html\"] = \"<p>hi</p>\";"));
        assert!(out.contains("\"yo</p>\";"));
    }

    #[test]
    fn build_honors_out_root() {
        let tmp = TempDir::new().unwrap();
        write_fixture_project(tmp.path());
        let out_root = tmp.path().join("elsewhere");

        cmd_build(tmp.path(), Some(out_root.as_path())).unwrap();
        assert!(out_root.join("dist/templates.js").exists());
    }

    #[test]
    fn build_continues_past_missing_sources() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("real.html"), "real").unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            serde_json::to_string_pretty(&serde_json::json!({
                "targets": [{ "src": ["ghost.html", "real.html"], "dest": "out.js" }]
            }))
            .unwrap(),
        )
        .unwrap();

        let ok = cmd_build(tmp.path(), None).unwrap();
        assert!(ok);

        let out = std::fs::read_to_string(tmp.path().join("out.js")).unwrap();
        assert!(out.contains("['real.html'] = 'real';"));
    }

    #[test]
    fn check_reports_fixture_ok() {
        let tmp = TempDir::new().unwrap();
        write_fixture_project(tmp.path());

        let ok = cmd_check(tmp.path()).unwrap();
        assert!(ok);
    }

    #[test]
    fn check_fails_on_missing_config() {
        let tmp = TempDir::new().unwrap();
        let result = cmd_check(tmp.path());
        assert!(result.is_err());
    }
}
