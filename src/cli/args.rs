use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Emit the registry as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Workflow definition to inspect (.json, .yaml or .yml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Fail when any activity type is not registered
    #[arg(long)]
    pub strict: bool,

    /// Emit the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Workflow definition to re-write (.json, .yaml or .yml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the normalized document here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Report the indices that would be created without contacting the store
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the provisioning report as JSON
    #[arg(long)]
    pub json: bool,
}
