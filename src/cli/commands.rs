use crate::{
    cli::args::{CheckArgs, NormalizeArgs, ProvisionArgs, TypesArgs},
    core::{
        activity::{ActivityRegistry, ActivitySerializer},
        config::{ConfigLoader, TesseraConfig},
        store::{
            provision_indices_and_aliases, ElasticsearchStore, InMemoryIndexStore,
            ProvisioningReport,
        },
        workflow::{WorkflowDefinition, WorkflowDefinitionSerializer},
    },
    Result,
};
use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;

/// Load `tessera.toml` (or defaults) with env overrides applied.
pub fn load_config(config_file: Option<&Path>) -> Result<TesseraConfig> {
    match config_file {
        Some(path) if !path.exists() => {
            Err(anyhow!("config file {} does not exist", path.display()))
        }
        Some(path) => Ok(ConfigLoader::load(path)?),
        None => Ok(ConfigLoader::load(Path::new(crate::cli::DEFAULT_CONFIG_FILE))?),
    }
}

fn definition_serializer(config: &TesseraConfig) -> WorkflowDefinitionSerializer {
    WorkflowDefinitionSerializer::new(
        ActivitySerializer::new(ActivityRegistry::with_builtins()),
        config.serializer.to_options(),
    )
}

pub fn types(args: TypesArgs) -> Result<()> {
    let registry = ActivityRegistry::with_builtins();
    let mut stdout = std::io::stdout().lock();

    if args.json {
        let entries: Vec<_> = registry
            .descriptors()
            .map(|descriptor| {
                json!({
                    "typeName": descriptor.type_name(),
                    "version": descriptor.version(),
                    "category": descriptor.category(),
                    "description": descriptor.description(),
                })
            })
            .collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    let width = registry
        .descriptors()
        .map(|descriptor| descriptor.type_name().len())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());
    writeln!(stdout, "{:<width$}  {:>7}  CATEGORY", "TYPE", "VERSION")?;
    for descriptor in registry.descriptors() {
        writeln!(
            stdout,
            "{:<width$}  {:>7}  {}",
            descriptor.type_name(),
            descriptor.version(),
            descriptor.category()
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckSummary<'a> {
    definition_id: &'a str,
    version: u32,
    activities: usize,
    unresolved: Vec<UnresolvedEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnresolvedEntry<'a> {
    id: &'a str,
    type_name: &'a str,
}

fn summarize(definition: &WorkflowDefinition) -> CheckSummary<'_> {
    CheckSummary {
        definition_id: &definition.definition_id,
        version: definition.version,
        activities: definition.walk().len(),
        unresolved: definition
            .unresolved()
            .into_iter()
            .map(|node| UnresolvedEntry {
                id: &node.id,
                type_name: &node.original_type_name,
            })
            .collect(),
    }
}

pub fn check(args: CheckArgs, config: &TesseraConfig) -> Result<()> {
    let serializer = definition_serializer(config);
    let definition = serializer.load_from_file(&args.file)?;
    definition.validate()?;

    let summary = summarize(&definition);
    let mut stdout = std::io::stdout().lock();
    if args.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(
            stdout,
            "{} v{}: {} activities, {} unresolved",
            summary.definition_id,
            summary.version,
            summary.activities,
            summary.unresolved.len()
        )?;
        for entry in &summary.unresolved {
            writeln!(stdout, "  unresolved {} ({})", entry.type_name, entry.id)?;
        }
    }

    if args.strict && !summary.unresolved.is_empty() {
        return Err(anyhow!(
            "{} activit{} could not be resolved",
            summary.unresolved.len(),
            if summary.unresolved.len() == 1 { "y" } else { "ies" }
        ));
    }
    Ok(())
}

pub fn normalize(args: NormalizeArgs, config: &TesseraConfig) -> Result<()> {
    let serializer = definition_serializer(config);
    let definition = serializer.load_from_file(&args.file)?;
    let unresolved = definition.unresolved().len();
    if unresolved > 0 {
        tracing::warn!(
            "{} unresolved activities keep only their typeName and id",
            unresolved
        );
    }

    match args.output {
        Some(path) => {
            serializer.save_to_file(&path, &definition, !args.compact)?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let text = serializer.write_string(&definition, !args.compact)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(())
}

pub async fn provision(args: ProvisionArgs, config: &TesseraConfig) -> Result<()> {
    let store_config = &config.store;
    let now = Utc::now();

    let report: ProvisioningReport = if args.dry_run {
        let store = InMemoryIndexStore::new();
        provision_indices_and_aliases(
            &store,
            &store_config.aliases,
            &store_config.document_types,
            now,
        )
        .await?
    } else {
        let store = ElasticsearchStore::from_config(store_config)?;
        tracing::info!("provisioning indices at {}", store.base_url());
        provision_indices_and_aliases(
            &store,
            &store_config.aliases,
            &store_config.document_types,
            now,
        )
        .await?
    };

    let mut stdout = std::io::stdout().lock();
    if args.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let verb = if args.dry_run { "would create" } else { "created" };
        for index in &report.created {
            writeln!(stdout, "{} {}", verb, index)?;
        }
        for index in &report.existing {
            writeln!(stdout, "exists {}", index)?;
        }
    }
    Ok(())
}
