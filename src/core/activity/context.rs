#![allow(clippy::result_large_err)] // Context accessors return AppError so failures carry type and field names.

use crate::core::activity::bindings::{Input, Output, ValueType, Variable};
use crate::core::activity::codec::CodecOptions;
use crate::core::activity::node::{Activity, ActivityBox};
use crate::core::activity::serializer::{ActivitySerializer, ID_KEY, TYPE_NAME_KEY};
use crate::core::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Buffered node plus the per-call options a descriptor constructor decodes with.
pub struct ConstructionContext<'a> {
    element: &'a Map<String, Value>,
    type_name: &'a str,
    options: &'a CodecOptions,
    serializer: &'a ActivitySerializer,
    depth: usize,
}

impl<'a> ConstructionContext<'a> {
    pub(crate) fn new(
        element: &'a Map<String, Value>,
        type_name: &'a str,
        options: &'a CodecOptions,
        serializer: &'a ActivitySerializer,
        depth: usize,
    ) -> Self {
        Self {
            element,
            type_name,
            options,
            serializer,
            depth,
        }
    }

    /// The raw buffered node.
    pub fn element(&self) -> &Map<String, Value> {
        self.element
    }

    pub fn type_name(&self) -> &str {
        self.type_name
    }

    pub fn options(&self) -> &CodecOptions {
        self.options
    }

    /// Node id from the document, or a freshly generated one when absent or empty.
    pub fn id(&self) -> String {
        read_id(self.element).unwrap_or_else(crate::core::activity::generate_id)
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        self.element.get(name).filter(|value| !value.is_null())
    }

    fn missing(&self, name: &str) -> AppError {
        AppError::construction(
            self.type_name,
            format!("{} is missing required field '{}'", self.type_name, name),
        )
        .at_field(name)
    }

    fn located(&self, name: &str, mut err: AppError) -> AppError {
        if !err.context.contains_key("type_name") {
            err.add_context("type_name", self.type_name);
        }
        err.at_field(name)
    }

    /// Required plain field decoded with serde.
    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Result<T, AppError> {
        self.optional_field(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_field<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, AppError> {
        match self.present(name) {
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|err| {
                AppError::construction(
                    self.type_name,
                    format!("field '{}' has an unexpected shape: {}", name, err),
                )
                .at_field(name)
            }),
            None => Ok(None),
        }
    }

    pub fn input<T: ValueType>(&self, name: &str) -> Result<Input<T>, AppError> {
        self.optional_input(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_input<T: ValueType>(&self, name: &str) -> Result<Option<Input<T>>, AppError> {
        match self.present(name) {
            Some(value) => self
                .options
                .input_codec::<T>()
                .decode(value)
                .map(Some)
                .map_err(|err| self.located(name, err)),
            None => Ok(None),
        }
    }

    /// Outputs are optional: an activity may run without capturing its result.
    pub fn output<T: ValueType>(&self, name: &str) -> Result<Option<Output<T>>, AppError> {
        match self.present(name) {
            Some(value) => self
                .options
                .output_codec::<T>()
                .decode(value)
                .map(Some)
                .map_err(|err| self.located(name, err)),
            None => Ok(None),
        }
    }

    pub fn variables(&self, name: &str) -> Result<Vec<Variable>, AppError> {
        let Some(value) = self.present(name) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| {
            AppError::construction(self.type_name, format!("field '{}' must be an array", name))
                .at_field(name)
        })?;
        items
            .iter()
            .map(|item| {
                self.options
                    .decode_variable(item)
                    .map_err(|err| self.located(name, err))
            })
            .collect()
    }

    /// Nested activity dispatched through the same serializer and options.
    pub fn activity(&self, name: &str) -> Result<Option<ActivityBox>, AppError> {
        match self.present(name) {
            Some(value) => self
                .serializer
                .read_nested(value, self.options, self.depth + 1)
                .map(Some),
            None => Ok(None),
        }
    }

    pub fn activities(&self, name: &str) -> Result<Vec<ActivityBox>, AppError> {
        let Some(value) = self.present(name) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| {
            AppError::construction(self.type_name, format!("field '{}' must be an array", name))
                .at_field(name)
        })?;
        items
            .iter()
            .map(|item| {
                self.serializer
                    .read_nested(item, self.options, self.depth + 1)
            })
            .collect()
    }

    /// Decode the whole node with serde, for kinds without bound fields.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.element.clone())).map_err(|err| {
            AppError::construction(
                self.type_name,
                format!("{} could not be decoded: {}", self.type_name, err),
            )
        })
    }
}

pub(crate) fn read_id(element: &Map<String, Value>) -> Option<String> {
    element
        .get(ID_KEY)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

/// Write-side counterpart of [`ConstructionContext`].
pub struct ActivityWriter<'a> {
    fields: Map<String, Value>,
    type_name: &'a str,
    options: &'a CodecOptions,
    serializer: &'a ActivitySerializer,
    depth: usize,
}

impl<'a> ActivityWriter<'a> {
    pub(crate) fn new(
        activity: &'a dyn Activity,
        options: &'a CodecOptions,
        serializer: &'a ActivitySerializer,
        depth: usize,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert(
            TYPE_NAME_KEY.to_string(),
            Value::String(activity.type_name().to_string()),
        );
        fields.insert(ID_KEY.to_string(), Value::String(activity.id().to_string()));
        Self {
            fields,
            type_name: activity.type_name(),
            options,
            serializer,
            depth,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        self.options
    }

    fn put(&mut self, name: &str, value: Value) -> Result<(), AppError> {
        if name == TYPE_NAME_KEY || name == ID_KEY {
            return Err(AppError::serialization(
                self.type_name,
                format!("field '{}' is reserved for node identity", name),
            )
            .with_code("ACT-WRITE-004")
            .at_field(name));
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn put_absent(&mut self, name: &str) -> Result<(), AppError> {
        if self.options.serializer_options().skip_null_values {
            return Ok(());
        }
        self.put(name, Value::Null)
    }

    fn located(&self, name: &str, mut err: AppError) -> AppError {
        if !err.context.contains_key("type_name") {
            err.add_context("type_name", self.type_name);
        }
        err.at_field(name)
    }

    pub fn field<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value).map_err(|err| {
            AppError::serialization(
                self.type_name,
                format!("field '{}' is not representable: {}", name, err),
            )
            .at_field(name)
        })?;
        self.put(name, value)
    }

    pub fn optional_field<T: Serialize>(
        &mut self,
        name: &str,
        value: Option<&T>,
    ) -> Result<(), AppError> {
        match value {
            Some(value) => self.field(name, value),
            None => self.put_absent(name),
        }
    }

    pub fn input<T: ValueType>(&mut self, name: &str, input: &Input<T>) -> Result<(), AppError> {
        let value = self
            .options
            .input_codec::<T>()
            .encode(input)
            .map_err(|err| self.located(name, err))?;
        self.put(name, value)
    }

    pub fn optional_input<T: ValueType>(
        &mut self,
        name: &str,
        input: Option<&Input<T>>,
    ) -> Result<(), AppError> {
        match input {
            Some(input) => self.input(name, input),
            None => self.put_absent(name),
        }
    }

    pub fn output<T: ValueType>(
        &mut self,
        name: &str,
        output: Option<&Output<T>>,
    ) -> Result<(), AppError> {
        match output {
            Some(output) => {
                let value = self
                    .options
                    .output_codec::<T>()
                    .encode(output)
                    .map_err(|err| self.located(name, err))?;
                self.put(name, value)
            }
            None => self.put_absent(name),
        }
    }

    pub fn variables(&mut self, name: &str, variables: &[Variable]) -> Result<(), AppError> {
        let encoded = variables
            .iter()
            .map(|variable| {
                self.options
                    .encode_variable(variable)
                    .map_err(|err| self.located(name, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.put(name, Value::Array(encoded))
    }

    pub fn activity(&mut self, name: &str, activity: Option<&dyn Activity>) -> Result<(), AppError> {
        match activity {
            Some(activity) => {
                let value = self
                    .serializer
                    .write_nested(activity, self.options, self.depth + 1)?;
                self.put(name, value)
            }
            None => self.put_absent(name),
        }
    }

    pub fn activities(&mut self, name: &str, activities: &[ActivityBox]) -> Result<(), AppError> {
        let encoded = activities
            .iter()
            .map(|activity| {
                self.serializer
                    .write_nested(activity.as_ref(), self.options, self.depth + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.put(name, Value::Array(encoded))
    }

    pub(crate) fn finish(self) -> Value {
        Value::Object(self.fields)
    }
}
