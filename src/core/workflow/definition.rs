#![allow(clippy::result_large_err)] // Workflow document APIs return AppError to preserve structured read context without boxing.

use crate::core::activity::{
    Activity, ActivityBox, ActivitySerializer, NotFoundActivity, SerializerOptions, Variable,
};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_version() -> u32 {
    1
}

/// Persisted workflow definition: identity metadata plus the root activity.
#[derive(Debug)]
pub struct WorkflowDefinition {
    pub id: String,
    pub definition_id: String,
    pub version: u32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub variables: Vec<Variable>,
    pub root: ActivityBox,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionHeader {
    #[serde(default)]
    id: Option<String>,
    definition_id: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    variables: Vec<Value>,
    root: Value,
}

impl WorkflowDefinition {
    pub fn new(definition_id: impl Into<String>, root: ActivityBox) -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            definition_id: definition_id.into(),
            version: 1,
            name: None,
            description: None,
            is_published: false,
            variables: Vec::new(),
            root,
        }
    }

    /// Every node in the graph, depth-first in document order.
    pub fn walk(&self) -> Vec<&dyn Activity> {
        let mut nodes = Vec::new();
        let mut stack = vec![self.root.as_ref()];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children().into_iter().rev());
        }
        nodes
    }

    /// Placeholders for activity kinds the current registry does not know.
    pub fn unresolved(&self) -> Vec<&NotFoundActivity> {
        self.walk()
            .into_iter()
            .filter_map(|node| node.downcast_ref::<NotFoundActivity>())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&dyn Activity> {
        self.walk().into_iter().find(|node| node.id() == id)
    }

    /// Check graph-level invariants that single-node reads cannot see.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.definition_id.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::MalformedDocument,
                "workflow definitionId must not be empty",
            )
            .with_code("WF-VAL-001"));
        }
        let mut ids = HashSet::new();
        for node in self.walk() {
            if !ids.insert(node.id()) {
                return Err(AppError::new(
                    ErrorCategory::MalformedDocument,
                    format!("duplicate activity id: {}", node.id()),
                )
                .with_code("WF-VAL-002"));
            }
        }
        let mut names = HashSet::new();
        for variable in &self.variables {
            if !names.insert(variable.name.as_str()) {
                return Err(AppError::new(
                    ErrorCategory::MalformedDocument,
                    format!("duplicate workflow variable: {}", variable.name),
                )
                .with_code("WF-VAL-003"));
            }
        }
        Ok(())
    }
}

/// Reads and writes [`WorkflowDefinition`] documents through an activity serializer.
#[derive(Debug, Clone)]
pub struct WorkflowDefinitionSerializer {
    activities: ActivitySerializer,
    options: SerializerOptions,
}

impl WorkflowDefinitionSerializer {
    pub fn new(activities: ActivitySerializer, options: SerializerOptions) -> Self {
        Self {
            activities,
            options,
        }
    }

    pub fn activities(&self) -> &ActivitySerializer {
        &self.activities
    }

    pub fn read_str(&self, text: &str) -> Result<WorkflowDefinition, AppError> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            AppError::malformed(
                "WF-READ-001",
                format!("failed to parse workflow definition: {}", err),
            )
        })?;
        self.read_value(value)
    }

    pub fn read_value(&self, value: Value) -> Result<WorkflowDefinition, AppError> {
        let header: DefinitionHeader = serde_json::from_value(value).map_err(|err| {
            AppError::malformed(
                "WF-READ-002",
                format!("invalid workflow definition: {}", err),
            )
        })?;
        let codecs = self.options.with_wrapper_codecs();
        let variables = header
            .variables
            .iter()
            .map(|variable| codecs.decode_variable(variable))
            .collect::<Result<Vec<_>, _>>()?;
        let root = self.activities.read_value(&header.root, &self.options)?;

        Ok(WorkflowDefinition {
            id: header
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(crate::core::activity::generate_id),
            definition_id: header.definition_id,
            version: header.version,
            name: header.name,
            description: header.description,
            is_published: header.is_published,
            variables,
            root,
        })
    }

    pub fn write_value(&self, definition: &WorkflowDefinition) -> Result<Value, AppError> {
        let codecs = self.options.with_wrapper_codecs();
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(definition.id.clone()));
        object.insert(
            "definitionId".to_string(),
            Value::String(definition.definition_id.clone()),
        );
        object.insert("version".to_string(), Value::from(definition.version));
        insert_optional(&mut object, "name", &definition.name, &self.options);
        insert_optional(
            &mut object,
            "description",
            &definition.description,
            &self.options,
        );
        object.insert(
            "isPublished".to_string(),
            Value::Bool(definition.is_published),
        );
        let variables = definition
            .variables
            .iter()
            .map(|variable| codecs.encode_variable(variable))
            .collect::<Result<Vec<_>, _>>()?;
        object.insert("variables".to_string(), Value::Array(variables));
        object.insert(
            "root".to_string(),
            self.activities
                .write_value(definition.root.as_ref(), &self.options)?,
        );
        Ok(Value::Object(object))
    }

    pub fn write_string(
        &self,
        definition: &WorkflowDefinition,
        pretty: bool,
    ) -> Result<String, AppError> {
        let value = self.write_value(definition)?;
        let text = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|err| {
            AppError::new(
                ErrorCategory::SerializationFailure,
                format!("failed to render workflow definition: {}", err),
            )
            .with_code("WF-WRITE-001")
        })
    }

    /// Load a definition from a JSON or YAML file, chosen by extension.
    pub fn load_from_file(&self, path: &Path) -> Result<WorkflowDefinition, AppError> {
        let text = fs::read_to_string(path).map_err(|err| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to read {}: {}", path.display(), err),
            )
        })?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let value: Value = if is_yaml {
            serde_yaml::from_str(&text).map_err(|err| {
                AppError::malformed(
                    "WF-READ-001",
                    format!("failed to parse {}: {}", path.display(), err),
                )
            })?
        } else {
            serde_json::from_str(&text).map_err(|err| {
                AppError::malformed(
                    "WF-READ-001",
                    format!("failed to parse {}: {}", path.display(), err),
                )
            })?
        };
        let definition = self.read_value(value)?;
        tracing::debug!(
            "loaded workflow definition {} from {}",
            definition.definition_id,
            path.display()
        );
        Ok(definition)
    }

    /// Write a definition as JSON through a temp file and rename.
    pub fn save_to_file(
        &self,
        path: &Path,
        definition: &WorkflowDefinition,
        pretty: bool,
    ) -> Result<(), AppError> {
        let text = self.write_string(definition, pretty)?;
        atomic_write(path, text.as_bytes())
    }
}

fn insert_optional(
    object: &mut Map<String, Value>,
    key: &str,
    value: &Option<String>,
    options: &SerializerOptions,
) {
    match value {
        Some(value) => {
            object.insert(key.to_string(), Value::String(value.clone()));
        }
        None if !options.skip_null_values => {
            object.insert(key.to_string(), Value::Null);
        }
        None => {}
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to create directory {}: {}", parent.display(), err),
            )
        })?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data).map_err(|err| {
        AppError::new(
            ErrorCategory::IoError,
            format!("failed to write {}: {}", tmp_path.display(), err),
        )
    })?;
    fs::rename(&tmp_path, path).map_err(|err| {
        AppError::new(
            ErrorCategory::IoError,
            format!(
                "failed to rename {} -> {}: {}",
                tmp_path.display(),
                path.display(),
                err
            ),
        )
    })?;
    Ok(())
}
