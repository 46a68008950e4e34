mod config;
mod loader;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use paramspec_codegen::{RustTarget, generate_package};
use paramspec_core::{ParamChecker, Schema, SchemaPackage};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use crate::config::ParamspecConfig;
use crate::loader::{bundle_schema_files, collect_schema_paths, load_input, load_schemas};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_OUTPUT: &str = "generated";

#[derive(Debug, Parser)]
#[command(name = "paramspec")]
#[command(about = "Compile, lint and check parameter schemas")]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate typed accessor sources from schema files.
    Generate(GenerateArgs),
    /// Validate one or more schema files.
    Validate(ValidateArgs),
    /// Check an input document against a schema.
    Check(CheckArgs),
    /// Bundle schema files into a SchemaPackage file.
    Bundle(BundleArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Schema files and/or directories containing schema files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output directory (default: the configured output, else `generated`).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories containing schema files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema file (single schema or package).
    #[arg(long)]
    schema: PathBuf,
    /// Schema to use when the file holds several.
    #[arg(long)]
    name: Option<String>,
    /// JSON or YAML document mapping parameter names to values.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Inline parameter as `key=value`; may be repeated and overrides --input.
    #[arg(long = "param", short = 'p', value_parser = parse_key_value)]
    params: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Schema files and/or directories containing schema files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output JSON bundle path.
    #[arg(long)]
    output: PathBuf,
    /// Optional bundle name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional bundle description metadata.
    #[arg(long)]
    description: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = ParamspecConfig::load_or_default(cli.config.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|config| match cli.command {
            Command::Generate(args) => run_generate(args, &config),
            Command::Validate(args) => run_validate(args),
            Command::Check(args) => run_check(args, &config),
            Command::Bundle(args) => run_bundle(args),
        });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs, config: &ParamspecConfig) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs).map_err(|e| e.to_string())?;
    let schemas = load_schemas(&paths).map_err(|e| e.to_string())?;

    let mut package = SchemaPackage::new(PACKAGE_VERSION, chrono::Utc::now().to_rfc3339());
    package.schemas = schemas;
    let files = generate_package(&RustTarget, &package).map_err(|e| e.to_string())?;

    let output = args
        .output
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    fs::create_dir_all(&output).map_err(|err| {
        format!(
            "Failed to create output directory '{}': {err}",
            output.display()
        )
    })?;

    for file in &files {
        let path = output.join(&file.file_name);
        fs::write(&path, &file.source)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote generated source");
    }

    println!(
        "Generated {} accessor(s) into '{}'.",
        package.schema_count(),
        output.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs).map_err(|e| e.to_string())?;
    let schemas = load_schemas(&paths).map_err(|e| e.to_string())?;

    // Same checks as `generate`, including cross-schema name collisions.
    let mut package = SchemaPackage::new(PACKAGE_VERSION, chrono::Utc::now().to_rfc3339());
    package.schemas = schemas;
    generate_package(&RustTarget, &package).map_err(|e| e.to_string())?;

    println!(
        "Validated {} schema file(s) containing {} schema(s).",
        paths.len(),
        package.schema_count()
    );
    Ok(())
}

fn run_check(args: CheckArgs, config: &ParamspecConfig) -> Result<(), String> {
    let schemas = load_schemas(std::slice::from_ref(&args.schema)).map_err(|e| e.to_string())?;
    let schema = select_schema(schemas, args.name.as_deref(), &args.schema)?;

    let mut input = match &args.input {
        Some(path) => load_input(path).map_err(|e| e.to_string())?,
        None => Map::new(),
    };
    for (key, value) in args.params {
        input.insert(key, Value::String(value));
    }

    let registry = config.registry().map_err(|e| e.to_string())?;
    let whitelist = config.whitelist();
    let problems = ParamChecker::new(&registry)
        .check(&schema, &input, &whitelist)
        .map_err(|e| e.to_string())?;

    if problems.is_empty() {
        println!("OK: input satisfies '{}'.", schema.name());
        return Ok(());
    }
    for problem in problems.iter() {
        println!("{problem}");
    }
    Err(format!(
        "{} problem(s) found checking '{}'",
        problems.len(),
        schema.name()
    ))
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs).map_err(|e| e.to_string())?;
    let package = bundle_schema_files(&paths, PACKAGE_VERSION, args.name, args.description)
        .map_err(|e| e.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = serde_json::to_string_pretty(&package)
        .map_err(|err| format!("Failed to serialize schema bundle: {err}"))?;
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        package.schema_count(),
        args.output.display()
    );
    Ok(())
}

fn select_schema(schemas: Vec<Schema>, name: Option<&str>, path: &Path) -> Result<Schema, String> {
    match name {
        Some(name) => schemas
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| format!("No schema named '{name}' in '{}'", path.display())),
        None => {
            let count = schemas.len();
            let mut iter = schemas.into_iter();
            match (iter.next(), count) {
                (Some(schema), 1) => Ok(schema),
                _ => Err(format!(
                    "'{}' holds {count} schemas; pick one with --name",
                    path.display()
                )),
            }
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
