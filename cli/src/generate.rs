#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads a contract, resolves it and writes the IR as JSON or YAML.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use streamgen_core::{resolve_contract, Contract, GeneratorOptions, ModelIr, View};

use crate::error::{CliError, CliResult};

/// Serialization of the written IR.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the AsyncAPI contract (YAML or JSON).
    pub input: PathBuf,

    /// Output file for the IR. Printed to stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// YAML options file; the flags below win over it.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Protocol binder (kafka, rabbit, solace).
    #[clap(long, env = "STREAMGEN_BINDER")]
    pub binder: Option<String>,

    /// Direction view (client, provider). The contract's `x-view` wins.
    #[clap(long, env = "STREAMGEN_VIEW")]
    pub view: Option<View>,

    /// Java package. The contract's `x-java-package` wins.
    #[clap(long, env = "STREAMGEN_PACKAGE")]
    pub package: Option<String>,

    /// Application class name. The contract's `x-java-class` wins.
    #[clap(long)]
    pub application_class: Option<String>,
}

impl GenerateArgs {
    /// Options file (if any) overlaid with the command-line flags.
    pub fn options(&self) -> CliResult<GeneratorOptions> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::from_yaml(&read(path)?)?,
            None => GeneratorOptions::default(),
        };
        if let Some(binder) = &self.binder {
            options.binder = binder.clone();
        }
        if self.view.is_some() {
            options.view = self.view;
        }
        if let Some(package) = &self.package {
            options.java_package = Some(package.clone());
        }
        if let Some(class) = &self.application_class {
            options.application_class = Some(class.clone());
        }
        Ok(options)
    }
}

fn read(path: &Path) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::General(format!("File not found: {:?}", path)));
    }
    Ok(fs::read_to_string(path)?)
}

fn load_contract(path: &Path) -> CliResult<Contract> {
    let text = read(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let contract = if is_json {
        Contract::from_json(&text)?
    } else {
        Contract::from_yaml(&text)?
    };
    Ok(contract)
}

/// Serializes the IR.
pub fn render(ir: &ModelIr, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(ir)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| CliError::Output(e.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(ir).map_err(|e| CliError::Output(e.to_string())),
    }
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let options = args.options()?;
    let contract = load_contract(&args.input)?;
    let ir = resolve_contract(&contract, &options)?;
    let text = render(&ir, args.format)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            tracing::info!(output = ?path, handlers = ir.handlers.len(), "IR written");
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONTRACT: &str = r#"
asyncapi: 2.6.0
info:
  title: Orders
  version: 1.0.0
channels:
  orders/{region}:
    publish:
      message:
        name: OrderPlaced
        payload:
          type: object
          properties:
            id:
              type: string
"#;

    fn args(input: PathBuf, output: Option<PathBuf>) -> GenerateArgs {
        GenerateArgs {
            input,
            output,
            format: OutputFormat::Json,
            config: None,
            binder: None,
            view: None,
            package: None,
            application_class: None,
        }
    }

    #[test]
    fn test_execute_writes_json_ir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("asyncapi.yaml");
        let output = dir.path().join("out/ir.json");
        fs::write(&input, CONTRACT).unwrap();

        execute(&args(input, Some(output.clone()))).unwrap();

        let ir: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(ir["handlers"][0]["name"], "sendOrderPlaced");
        assert_eq!(ir["handlers"][0]["kind"], "send");
        assert_eq!(ir["application"]["package"], "com.company");
    }

    #[test]
    fn test_flags_win_over_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("options.yaml");
        fs::write(&config, "binder: solace\njavaPackage: com.acme\nview: provider\n").unwrap();

        let mut generate = args(dir.path().join("unused.yaml"), None);
        generate.config = Some(config);
        generate.package = Some("com.override".into());

        let options = generate.options().unwrap();
        assert_eq!(options.binder, "solace");
        assert_eq!(options.java_package.as_deref(), Some("com.override"));
        assert_eq!(options.view, Some(View::Provider));
    }

    #[test]
    fn test_unsupported_binder_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("asyncapi.yaml");
        fs::write(&input, CONTRACT).unwrap();

        let mut generate = args(input, None);
        generate.binder = Some("pulsar".into());
        let err = execute(&generate).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
    }

    #[test]
    fn test_missing_contract() {
        let dir = tempdir().unwrap();
        let err = execute(&args(dir.path().join("missing.yaml"), None)).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
