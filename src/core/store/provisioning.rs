use super::naming::{generate_index_name, normalize_alias};
use super::{IndexStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one provisioning pass, as index names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisioningReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Ensure every document type has its current monthly index, reachable
/// through the configured alias.
///
/// Indices that already exist are left alone, so repeated calls create nothing.
/// Store errors abort the pass and propagate unchanged; indices created before
/// the failure stay in place.
pub async fn provision_indices_and_aliases<S>(
    store: &S,
    aliases: &BTreeMap<String, String>,
    document_types: &[String],
    now: DateTime<Utc>,
) -> Result<ProvisioningReport, StoreError>
where
    S: IndexStore + ?Sized,
{
    let mut report = ProvisioningReport::default();
    for document_type in document_types {
        let alias = aliases
            .get(document_type)
            .ok_or_else(|| StoreError::MissingAlias {
                document_type: document_type.clone(),
            })?;
        let alias = normalize_alias(alias)?;
        let index = generate_index_name(&alias, now)?;

        if store.index_exists(&index).await? {
            tracing::debug!("index {} for {} already exists", index, document_type);
            report.existing.push(index);
            continue;
        }

        store.create_index(&index, &alias).await?;
        report.created.push(index);
    }
    Ok(report)
}
