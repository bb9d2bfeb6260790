use crate::config::GeneratorConfig;
use crate::generator::{generate_file, GenerateReport};
use crate::linter::{fail_if_errors, lint_source, print_lint_issues, LintSeverity};
use crate::schema::extract_schema;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for apigen
///
/// Without a subcommand, generates handler code from INPUT into OUTPUT.
#[derive(Parser, Debug)]
#[command(name = "apigen", version)]
#[command(about = "Generate validating HTTP handlers from annotated Rust services", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

/// Arguments of the default (generate) command
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// YAML configuration file
    #[arg(long, value_name = "FILE", env = "APIGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reject unknown constraint tokens and non-integer bounds
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Path generated code uses to reach the runtime (default: apigen::runtime)
    #[arg(long, value_name = "PATH")]
    pub runtime_path: Option<String>,

    /// Render and report without writing OUTPUT
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Rust source file with service and record declarations
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// File the generated handlers are written to
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the extracted schema as JSON
    Inspect {
        /// Rust source file to scan
        input: PathBuf,

        /// YAML configuration file
        #[arg(long, value_name = "FILE", env = "APIGEN_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Lint service and record declarations
    ///
    /// Reports unknown constraint tokens, inverted bounds, enum defaults that
    /// are not members, lookup key collisions, missing records and duplicate
    /// routes.
    Lint {
        /// Rust source file to scan
        input: PathBuf,

        /// YAML configuration file
        #[arg(long, value_name = "FILE", env = "APIGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Parse the process arguments and run.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => {
            let report = run_generate(&cli.generate)?;
            print_report(&report);
            Ok(())
        }
        Some(Commands::Inspect { input, config }) => {
            let json = inspect_json(&input, config.as_deref())?;
            println!("{json}");
            Ok(())
        }
        Some(Commands::Lint {
            input,
            config,
            fail_on_error,
            errors_only,
        }) => {
            let cfg = GeneratorConfig::load(config.as_deref())?;
            let mut issues = lint_source(&input, &cfg.to_extract_options())?;
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);
            if fail_on_error {
                fail_if_errors(&issues)?;
            }
            Ok(())
        }
    }
}

/// Resolve configuration layers and run the generator.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<GenerateReport> {
    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        anyhow::bail!("both <INPUT> and <OUTPUT> are required (see --help)");
    };
    let cfg = resolve_config(args)?;
    generate_file(input, output, &cfg.to_generate_options(args.dry_run))
}

/// Defaults, config file and environment, then command-line flags.
pub fn resolve_config(args: &GenerateArgs) -> anyhow::Result<GeneratorConfig> {
    let mut cfg = GeneratorConfig::load(args.config.as_deref())?;
    if args.strict {
        cfg.strict_constraints = true;
    }
    if let Some(path) = &args.runtime_path {
        cfg.runtime_path.clone_from(path);
    }
    Ok(cfg)
}

/// Extract a source file and render its schema as pretty JSON.
pub fn inspect_json(input: &Path, config: Option<&Path>) -> anyhow::Result<String> {
    let cfg = GeneratorConfig::load(config)?;
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read source file {}", input.display()))?;
    let schema = extract_schema(&source, &cfg.to_extract_options())
        .with_context(|| format!("failed to extract schema from {}", input.display()))?;
    Ok(serde_json::to_string_pretty(&schema)?)
}

fn print_report(report: &GenerateReport) {
    if report.written {
        println!(
            "✅ Generated {} endpoint(s) across {} service(s) → {}",
            report.endpoints,
            report.services,
            report.output.display()
        );
    } else {
        println!(
            "🔍 Dry run: {} endpoint(s) across {} service(s), {} bytes not written to {}",
            report.endpoints,
            report.services,
            report.bytes,
            report.output.display()
        );
    }
    if report.endpoints > 0 && report.records == 0 {
        println!("⚠️  No parameter records found; every record is built with Default");
    }
}
