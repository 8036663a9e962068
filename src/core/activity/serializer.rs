#![allow(clippy::result_large_err)] // Dispatcher APIs return AppError to preserve read/write diagnostics without boxing.

use crate::core::activity::codec::{CodecOptions, SerializerOptions};
use crate::core::activity::context::{read_id, ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityBox, NotFoundActivity};
use crate::core::activity::registry::ActivityRegistry;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde_json::Value;
use std::io::Read;

pub const TYPE_NAME_KEY: &str = "typeName";
pub const ID_KEY: &str = "id";

/// Converts between wire documents and polymorphic activity nodes.
///
/// Holds only the frozen registry, so clones are cheap and may be used from
/// any number of threads at once. Every call derives its own codec options.
#[derive(Debug, Clone)]
pub struct ActivitySerializer {
    registry: ActivityRegistry,
}

impl ActivitySerializer {
    pub fn new(registry: ActivityRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActivityRegistry {
        &self.registry
    }

    pub fn read_str(&self, text: &str, options: &SerializerOptions) -> Result<ActivityBox, AppError> {
        let value: Value = serde_json::from_str(text).map_err(parse_error)?;
        self.read_value(&value, options)
    }

    pub fn read_slice(
        &self,
        bytes: &[u8],
        options: &SerializerOptions,
    ) -> Result<ActivityBox, AppError> {
        let value: Value = serde_json::from_slice(bytes).map_err(parse_error)?;
        self.read_value(&value, options)
    }

    pub fn read_reader<R: Read>(
        &self,
        reader: R,
        options: &SerializerOptions,
    ) -> Result<ActivityBox, AppError> {
        let value: Value = serde_json::from_reader(reader).map_err(parse_error)?;
        self.read_value(&value, options)
    }

    /// Reconstruct one node from an already buffered subtree.
    pub fn read_value(
        &self,
        value: &Value,
        options: &SerializerOptions,
    ) -> Result<ActivityBox, AppError> {
        let codec_options = options.with_wrapper_codecs();
        self.read_nested(value, &codec_options, 0)
    }

    /// Read path shared by top-level and nested nodes of one document.
    pub(crate) fn read_nested(
        &self,
        value: &Value,
        options: &CodecOptions,
        depth: usize,
    ) -> Result<ActivityBox, AppError> {
        let max_depth = options.serializer_options().max_depth;
        if depth > max_depth {
            return Err(AppError::malformed(
                "ACT-READ-003",
                format!("activity nesting exceeds the maximum depth of {}", max_depth),
            ));
        }

        let element = value.as_object().ok_or_else(|| {
            AppError::malformed(
                "ACT-READ-002",
                format!("activity node must be an object, got {}", json_kind(value)),
            )
        })?;

        let type_name = match element.get(TYPE_NAME_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.as_str(),
            Some(Value::String(_)) => {
                return Err(AppError::malformed(
                    "ACT-READ-002",
                    "activity typeName must not be empty",
                ))
            }
            Some(other) => {
                return Err(AppError::malformed(
                    "ACT-READ-002",
                    format!("activity typeName must be a string, got {}", json_kind(other)),
                ))
            }
            None => {
                return Err(AppError::malformed(
                    "ACT-READ-002",
                    "failed to extract activity typeName",
                ))
            }
        };

        let Some(descriptor) = self.registry.find(type_name) else {
            let id = read_id(element).unwrap_or_else(crate::core::activity::generate_id);
            tracing::warn!(
                "activity type {} is not registered; substituting placeholder for {}",
                type_name,
                id
            );
            return Ok(Box::new(NotFoundActivity::new(id, type_name)));
        };

        let ctx = ConstructionContext::new(element, descriptor.type_name(), options, self, depth);
        let activity = descriptor.construct(&ctx)?;

        if activity.type_name() != descriptor.type_name() {
            return Err(AppError::construction(
                descriptor.type_name(),
                format!(
                    "constructor for {} produced a node of type {}",
                    descriptor.type_name(),
                    activity.type_name()
                ),
            )
            .with_code("ACT-CTOR-002"));
        }
        if activity.id().trim().is_empty() {
            return Err(AppError::construction(
                descriptor.type_name(),
                format!("constructor for {} produced a node without an id", type_name),
            )
            .with_code("ACT-CTOR-003"));
        }

        tracing::trace!("resolved activity {} ({})", activity.id(), type_name);
        Ok(activity)
    }

    /// Serialize a node using its concrete runtime type.
    pub fn write_value(
        &self,
        activity: &dyn Activity,
        options: &SerializerOptions,
    ) -> Result<Value, AppError> {
        let codec_options = options.with_wrapper_codecs();
        self.write_nested(activity, &codec_options, 0)
    }

    pub fn write_string(
        &self,
        activity: &dyn Activity,
        options: &SerializerOptions,
        pretty: bool,
    ) -> Result<String, AppError> {
        let value = self.write_value(activity, options)?;
        let text = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|err| {
            AppError::new(
                ErrorCategory::SerializationFailure,
                format!("failed to render activity document: {}", err),
            )
            .with_code("ACT-WRITE-005")
        })
    }

    pub(crate) fn write_nested(
        &self,
        activity: &dyn Activity,
        options: &CodecOptions,
        depth: usize,
    ) -> Result<Value, AppError> {
        let max_depth = options.serializer_options().max_depth;
        if depth > max_depth {
            return Err(AppError::serialization(
                activity.type_name(),
                format!("activity nesting exceeds the maximum depth of {}", max_depth),
            )
            .with_code("ACT-WRITE-006"));
        }
        if activity.id().trim().is_empty() {
            return Err(AppError::serialization(
                activity.type_name(),
                "activity id must be non-empty",
            )
            .with_code("ACT-WRITE-008"));
        }
        let mut writer = ActivityWriter::new(activity, options, self, depth);
        activity.write(&mut writer)?;
        Ok(writer.finish())
    }
}

fn parse_error(err: serde_json::Error) -> AppError {
    AppError::malformed(
        "ACT-READ-001",
        format!("failed to parse activity document: {}", err),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
