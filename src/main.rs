use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yamlpatch::resource::{Resource, Spec};

/// yamlpatch - locate a key inside YAML documents, verify it, patch it
#[derive(Parser)]
#[command(name = "yamlpatch")]
#[command(version)]
#[command(about = "Locate a key inside YAML documents, verify it, patch it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Working directory to resolve relative file paths against
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current value of the key
    Source(ResourceArgs),
    /// Check that the key holds the expected value
    Condition(ResourceArgs),
    /// Rewrite the key to the desired value
    Target {
        #[command(flatten)]
        args: ResourceArgs,

        /// Compute and print the diff without writing any file
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct ResourceArgs {
    /// YAML manifest holding the resource spec, instead of inline flags
    #[arg(long, conflicts_with_all = ["file", "files", "key"])]
    manifest: Option<PathBuf>,

    /// Single yaml file to operate on
    #[arg(long)]
    file: Option<String>,

    /// List of yaml files to operate on
    #[arg(long)]
    files: Vec<String>,

    /// Path expression (dotted key, or yamlpath starting with '$')
    #[arg(long)]
    key: Option<String>,

    /// Desired or expected value
    #[arg(long)]
    value: Option<String>,

    /// Only check that the key exists (conditions)
    #[arg(long)]
    key_only: bool,

    /// Exclude files where the key is absent instead of failing
    #[arg(long)]
    search_pattern: bool,

    /// Zero-based sub-document selector for multi-document files
    #[arg(long)]
    document_index: Option<usize>,

    /// Trailing comment to attach when rewriting (targets)
    #[arg(long)]
    comment: Option<String>,

    /// Path engine: legacy or yamlpath (default: by key prefix)
    #[arg(long)]
    engine: Option<String>,

    /// Indentation for re-rendered files (legacy engine)
    #[arg(long)]
    indent: Option<i64>,

    /// Value supplied by an upstream source
    #[arg(long)]
    source_input: Option<String>,
}

impl ResourceArgs {
    fn into_spec(self) -> Result<Spec> {
        if let Some(path) = &self.manifest {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading manifest {}", path.display()))?;
            let spec: Spec = serde_yaml::from_str(&content)
                .with_context(|| format!("parsing manifest {}", path.display()))?;
            return Ok(spec);
        }

        Ok(Spec {
            file: self.file,
            files: self.files,
            key: self.key.unwrap_or_default(),
            value: self.value,
            key_only: self.key_only,
            search_pattern: self.search_pattern,
            document_index: self.document_index,
            comment: self.comment,
            engine: self.engine,
            indent: self.indent,
        })
    }
}

fn run(cli: Cli) -> Result<bool> {
    let workdir = cli.workdir;

    match cli.command {
        Command::Source(args) => {
            let mut resource = Resource::new(args.into_spec()?)?;
            let value = resource.source(workdir.as_deref())?;
            println!("{}", value);
            Ok(true)
        }
        Command::Condition(args) => {
            let source_input = args.source_input.clone();
            let mut resource = Resource::new(args.into_spec()?)?;
            let result = resource.condition(source_input.as_deref(), workdir.as_deref())?;
            println!("{}", result.description);
            Ok(result.pass)
        }
        Command::Target { args, dry_run } => {
            let source_input = args.source_input.clone();
            let mut resource = Resource::new(args.into_spec()?)?;
            let result =
                resource.target(source_input.as_deref(), workdir.as_deref(), dry_run)?;
            println!("{}", result.description);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
