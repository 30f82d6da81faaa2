//! CLI module for suitegen
//!
//! ## Commands
//!
//! - `build -s <root>... -d <dep>...` - Compile, discover and print the assembled suite
//! - `closure <TYPE> -s <root>... -d <dep>...` - Print the supertype closure of one type
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use suitegen_core::TypeName;

use crate::config::{ResolutionMode, SuiteConfig};
use crate::errors::{FailureKind, SuiteError};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Assembly failure, or any other error
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const PRECONDITION: ExitCode = ExitCode(2);
    pub const COMPILATION: ExitCode = ExitCode(3);
}

impl From<FailureKind> for ExitCode {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Precondition => ExitCode::PRECONDITION,
            FailureKind::Compilation => ExitCode::COMPILATION,
            FailureKind::Assembly => ExitCode::FAILURE,
        }
    }
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<SuiteError> for CliError {
    /// Compiler diagnostics first, then the error itself rendered by miette.
    fn from(err: SuiteError) -> Self {
        let exit_code = ExitCode::from(err.kind());
        let mut message = String::new();
        for diagnostic in err.diagnostics() {
            message.push_str(diagnostic.trim_end());
            message.push_str("\n\n");
        }
        message.push_str(&format!("{:?}", miette::Report::new(err)));
        CliError::new(message.trim_end(), exit_code)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Dynamic test-suite assembler
#[derive(Parser, Debug)]
#[command(name = "suitegen")]
#[command(version = VERSION)]
#[command(about = "Compile declaration sources and assemble the test classes they contain", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every pipeline command.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Source root to compile and search (repeatable, in traversal order)
    #[arg(short = 's', long = "source", value_name = "PATH", required = true)]
    pub sources: Vec<PathBuf>,
    /// Dependency file or directory (repeatable, in resolution order)
    #[arg(short = 'd', long = "dep", value_name = "PATH")]
    pub deps: Vec<PathBuf>,
    /// Marker contract test classes must conform to
    #[arg(long, value_name = "TYPE")]
    pub marker: Option<TypeName>,
    /// Treat unresolved supertypes as compile errors
    #[arg(long)]
    pub strict: bool,
    /// Source file extension
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,
}

impl PipelineArgs {
    pub fn to_config(&self) -> SuiteConfig {
        let mut config = SuiteConfig::new();
        config.source_roots = self.sources.clone();
        config.dependencies = self.deps.clone();
        if let Some(marker) = &self.marker {
            config = config.with_marker(marker.clone());
        }
        if self.strict {
            config = config.with_mode(ResolutionMode::Strict);
        }
        if let Some(extension) = &self.extension {
            config = config.with_source_extension(extension.trim_start_matches('.'));
        }
        config
    }
}

/// Output format of `build`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the suite and print it
    Build {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Suite name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also list rejected and skipped candidates
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the supertype closure of a declared type
    Closure {
        /// Fully qualified type name
        #[arg(value_name = "TYPE")]
        type_name: TypeName,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Build {
            pipeline,
            name,
            format,
            verbose,
        } => {
            let mut config = pipeline.to_config();
            if let Some(name) = name {
                config = config.with_name(name);
            }
            commands::build(config, format, verbose)
        }
        Command::Closure { type_name, pipeline } => commands::closure(pipeline.to_config(), &type_name),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::errors::CompileFailure;

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::try_parse_from([
            "suitegen", "build", "-s", "stdlib", "-s", "kunit/src", "-d", "libs/junit.incn", "--format", "json", "-v",
        ])
        .unwrap();
        let Command::Build {
            pipeline,
            format,
            verbose,
            name,
        } = cli.command
        else {
            panic!("Expected Build command");
        };
        assert_eq!(pipeline.sources, vec![PathBuf::from("stdlib"), PathBuf::from("kunit/src")]);
        assert_eq!(pipeline.deps, vec![PathBuf::from("libs/junit.incn")]);
        assert_eq!(format, OutputFormat::Json);
        assert!(verbose);
        assert!(name.is_none());
    }

    #[test]
    fn test_cli_build_requires_a_source() {
        assert!(Cli::try_parse_from(["suitegen", "build"]).is_err());
    }

    #[test]
    fn test_cli_parse_closure() {
        let cli = Cli::try_parse_from(["suitegen", "closure", "std.ListTest", "-s", "stdlib", "--strict"]).unwrap();
        let Command::Closure { type_name, pipeline } = cli.command else {
            panic!("Expected Closure command");
        };
        assert_eq!(type_name.as_str(), "std.ListTest");
        assert!(pipeline.strict);
    }

    #[test]
    fn test_cli_rejects_invalid_type_names() {
        assert!(Cli::try_parse_from(["suitegen", "closure", "not a type", "-s", "x"]).is_err());
        assert!(Cli::try_parse_from(["suitegen", "build", "-s", "x", "--marker", "a..b"]).is_err());
    }

    #[test]
    fn test_pipeline_args_to_config() {
        let cli = Cli::try_parse_from([
            "suitegen", "build", "-s", "src", "--marker", "kunit.Marker", "--strict", "--ext", ".decl",
        ])
        .unwrap();
        let Command::Build { pipeline, .. } = cli.command else {
            panic!("Expected Build command");
        };
        let config = pipeline.to_config();
        assert_eq!(config.marker.as_str(), "kunit.Marker");
        assert_eq!(config.mode, ResolutionMode::Strict);
        assert_eq!(config.source_extension, "decl");
    }

    #[test]
    fn test_exit_codes_follow_failure_kind() {
        let err = CliError::from(SuiteError::MissingDependency {
            path: PathBuf::from("missing.incn"),
        });
        assert_eq!(err.exit_code, ExitCode::PRECONDITION);
        assert!(err.message.contains("missing.incn"));

        let err = CliError::from(SuiteError::from(CompileFailure::single("syntax error: boom")));
        assert_eq!(err.exit_code, ExitCode::COMPILATION);
        assert!(err.message.starts_with("syntax error: boom"));
    }
}
