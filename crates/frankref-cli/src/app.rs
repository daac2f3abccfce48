//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use frankref_core::{DeclarationKind, Diagnostic, Document, LineIndex};
use frankref_lsp::config::Settings;
use frankref_lsp::workspace::{load_documents, DiskFiles, WorkspaceFile, WorkspaceIndex};
use frankref_lsp::ValidationEngine;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "frankref")]
#[command(author, version, about = "Cross-reference checks for Frank!Framework configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every configuration file in a workspace for unresolved references
    Check {
        /// Workspace root directory
        #[arg(default_value = ".")]
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Strict mode: exit with error code if any diagnostics are found
        #[arg(long)]
        strict: bool,
    },

    /// List the Adapter and JavaListener names declared in a workspace
    Registry {
        /// Workspace root directory
        #[arg(default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Diagnostics of one workspace file
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path relative to the workspace root when possible
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    text: String,
}

impl FileReport {
    /// Render as `path:line:col: severity[CODE]: message` lines
    pub fn render_text(&self) -> Vec<String> {
        let index = LineIndex::new(&self.text);
        self.diagnostics
            .iter()
            .map(|diag| {
                let pos = index.position(diag.range.start);
                format!(
                    "{}:{}:{}: {}",
                    self.file.display(),
                    pos.line + 1,
                    pos.column + 1,
                    diag
                )
            })
            .collect()
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            format,
            config,
            strict,
        } => {
            let clean = check_command(&input, format, config.as_deref())?;
            // Exit with error code in strict mode if there are diagnostics
            if strict && !clean {
                std::process::exit(1);
            }
        }
        Commands::Registry { input, config } => {
            registry_command(&input, config.as_deref())?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout only carries the report
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the check command; returns true if no diagnostics were found
pub fn check_command(
    input: &Path,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<bool> {
    let reports = check_workspace(input, config_path)?;
    let total: usize = reports.iter().map(|r| r.diagnostics.len()).sum();

    match format {
        OutputFormat::Text => {
            for report in &reports {
                for line in report.render_text() {
                    println!("{}", line);
                }
            }
            if total == 0 {
                println!("✓ No unresolved references found");
            } else {
                println!();
                println!(
                    "{} unresolved reference(s) in {} file(s)",
                    total,
                    reports.len()
                );
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("Failed to serialize diagnostics")?;
            println!("{}", json);
        }
    }

    Ok(total == 0)
}

/// Execute the registry command
pub fn registry_command(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let settings = load_settings(input, config_path)?;
    let documents: Vec<Document> = load_workspace(input, &settings)?
        .into_iter()
        .map(|f| f.document)
        .collect();
    let registry = WorkspaceIndex::build(&documents).registry();

    for kind in DeclarationKind::WORKSPACE {
        let names = registry.names(kind);
        println!("{} ({}):", kind, names.len());
        for name in names {
            println!("  {}", name);
        }
    }

    Ok(())
}

/// Validate every file of a workspace; only files with diagnostics are reported
pub fn check_workspace(input: &Path, config_path: Option<&Path>) -> Result<Vec<FileReport>> {
    let settings = load_settings(input, config_path)?;
    let files = load_workspace(input, &settings)?;
    let documents: Vec<Document> = files.iter().map(|f| f.document.clone()).collect();
    let registry = WorkspaceIndex::build(&documents).registry();
    let engine = ValidationEngine::with_settings(&settings.rules);

    let mut reports: Vec<FileReport> = files
        .into_iter()
        .filter_map(|file| {
            let diagnostics = engine.validate(&file.document, &registry);
            if diagnostics.is_empty() {
                return None;
            }
            Some(FileReport {
                file: relative_path(input, &file.path),
                diagnostics,
                text: file.document.text,
            })
        })
        .collect();

    reports.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(reports)
}

/// Load settings from an explicit config file or the workspace root
fn load_settings(input: &Path, config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => Settings::discover(input)
            .with_context(|| format!("Failed to load config from {}", input.display())),
    }
}

/// Load all configuration files under a directory
fn load_workspace(input: &Path, settings: &Settings) -> Result<Vec<WorkspaceFile>> {
    let files = DiskFiles::from_settings(input, &settings.workspace);
    load_documents(&files)
        .with_context(|| format!("Failed to scan workspace: {}", input.display()))
}

/// Path of a workspace file relative to the workspace root
fn relative_path(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
