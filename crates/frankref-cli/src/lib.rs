//! frankref CLI - Command-line interface library
//!
//! This library provides the CLI functionality for frankref:
//! - Check: Report unresolved references in a workspace
//! - Registry: List the Adapter and JavaListener names a workspace declares
//!
//! # Library Usage
//!
//! ```ignore
//! use frankref_cli::{check_workspace, run_cli};
//!
//! // Run the full CLI
//! run_cli()?;
//!
//! // Or collect the reports programmatically
//! let reports = check_workspace(Path::new("configurations"), None)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Check a workspace
//! frankref check configurations/
//!
//! # Machine-readable output, failing the build on any finding
//! frankref check configurations/ --format json --strict
//!
//! # Show which names are declared
//! frankref registry configurations/
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{check_command, check_workspace, registry_command};
pub use app::{run_cli, FileReport, OutputFormat};
