//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use suitegen_core::TypeName;

use super::{CliError, CliResult, ExitCode, OutputFormat};
use crate::config::SuiteConfig;
use crate::hierarchy::HierarchyResolver;
use crate::pipeline::SuiteBuilder;

/// Build the suite and print it to stdout.
pub fn build(config: SuiteConfig, format: OutputFormat, verbose: bool) -> CliResult<ExitCode> {
    let suite = SuiteBuilder::new(config).build_suite()?;

    match format {
        OutputFormat::Text => println!("{}", suite.render_text(verbose)),
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&suite.to_json())
                .map_err(|e| CliError::failure(format!("cannot render suite as JSON: {e}")))?;
            println!("{rendered}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Compile the source set and print the supertype closure of `type_name`.
pub fn closure(config: SuiteConfig, type_name: &TypeName) -> CliResult<ExitCode> {
    let builder = SuiteBuilder::new(config);
    let compilation = builder.compile()?;
    let config = builder.config();

    let ty = compilation.types.get(type_name).ok_or_else(|| {
        CliError::failure(format!(
            "type '{type_name}' is not declared in the source set or its dependencies"
        ))
    })?;

    let resolver = HierarchyResolver::new(&compilation.types, &config.universal_root);
    let closure = resolver
        .closure(ty)
        .map_err(|e| CliError::failure(format!("error: {e}")))?;

    println!("{type_name}");
    for supertype in &closure {
        println!("  {supertype}");
    }
    let verdict = if closure.contains(&config.marker) {
        "conforms to"
    } else {
        "does not conform to"
    };
    println!("{type_name} {verdict} {}", config.marker);
    Ok(ExitCode::SUCCESS)
}
