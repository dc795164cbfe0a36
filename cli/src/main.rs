#![deny(missing_docs)]

//! # Streamgen CLI
//!
//! Command Line Interface for the AsyncAPI resolution core.
//!
//! Supported Commands:
//! - `generate`: Contract -> IR (schemas, handlers, imports, binding properties).

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod error;
mod generate;
mod logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "AsyncAPI to Spring Cloud Stream model resolver")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolves a contract and writes its intermediate model.
    Generate(generate::GenerateArgs),
}

fn main() -> CliResult<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "streamgen",
            "generate",
            "asyncapi.yaml",
            "--format",
            "yaml",
            "--binder",
            "solace",
            "--view",
            "provider",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command;
        assert_eq!(args.format, generate::OutputFormat::Yaml);
        assert_eq!(args.binder.as_deref(), Some("solace"));
        assert_eq!(args.view, Some(streamgen_core::View::Provider));
    }
}
