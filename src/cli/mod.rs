pub mod args;
pub mod commands;

pub use args::{CheckArgs, NormalizeArgs, ProvisionArgs, TypesArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tessera.toml";

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(version = crate::VERSION)]
#[command(about = "Read, check and normalize polymorphic workflow definitions")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: list known activity types, check a definition for unresolved nodes, then normalize it."
)]
pub struct Args {
    /// Configuration file (default: ./tessera.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Explicit `--config`, else `tessera.toml` in the working directory if it exists.
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            candidate.exists().then_some(candidate)
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "List registered activity types",
        long_about = "Types prints every activity kind the registry can construct, in registration order.",
        after_help = "Example:\n    tessera types --json"
    )]
    Types(TypesArgs),
    #[command(
        about = "Load a definition and report unresolved activities",
        long_about = "Check reads a workflow definition, validates graph-level invariants and lists nodes whose type is not registered.",
        after_help = "Example:\n    tessera check ./workflow.json --strict"
    )]
    Check(CheckArgs),
    #[command(
        about = "Read a definition and write it back in canonical form",
        long_about = "Normalize round-trips a definition through the serializer, filling generated ids and canonical wrapper shapes.",
        after_help = "Example:\n    tessera normalize ./workflow.yaml --output ./workflow.json"
    )]
    Normalize(NormalizeArgs),
    #[command(
        about = "Create monthly store indices and their aliases",
        long_about = "Provision ensures each configured document type has its current index in the document store, attached to its alias.",
        after_help = "Example:\n    tessera provision --config ./tessera.toml --dry-run"
    )]
    Provision(ProvisionArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    let config_file = args.config_file();
    let config = commands::load_config(config_file.as_deref())?;
    match args.command {
        Command::Types(types_args) => commands::types(types_args),
        Command::Check(check_args) => commands::check(check_args, &config),
        Command::Normalize(normalize_args) => commands::normalize(normalize_args, &config),
        Command::Provision(provision_args) => commands::provision(provision_args, &config).await,
    }
}
