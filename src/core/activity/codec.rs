#![allow(clippy::result_large_err)] // Codecs return AppError so decode failures keep their field context.

use crate::core::activity::bindings::{
    Expression, Input, MemoryReference, Output, ValueType, Variable,
};
use crate::core::activity::expression::{ExpressionSyntaxes, ExpressionValidator, LITERAL_SYNTAX};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde_json::{json, Map, Value};
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

const TYPE_NAME_KEY: &str = "typeName";
const EXPRESSION_KEY: &str = "expression";
const MEMORY_REFERENCE_KEY: &str = "memoryReference";

/// Caller-supplied serialization configuration.
///
/// Cheap to clone and safe to share between threads. Readers and writers never
/// mutate it; they layer the wrapper codecs onto a private copy instead.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializerOptions {
    /// Omit absent optional fields on write instead of emitting `null`.
    pub skip_null_values: bool,
    /// Maximum nesting of activities inside one document.
    pub max_depth: usize,
    /// Reject wrappers whose `typeName` disagrees with the declared value type.
    pub strict_type_names: bool,
    /// Compile expression sources whose syntax supports it.
    pub validate_expressions: bool,
    pub expression_syntaxes: ExpressionSyntaxes,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            skip_null_values: true,
            max_depth: 64,
            strict_type_names: false,
            validate_expressions: true,
            expression_syntaxes: ExpressionSyntaxes::default(),
        }
    }
}

impl SerializerOptions {
    /// Copy these options and extend the copy with the bound-value codecs.
    pub fn with_wrapper_codecs(&self) -> CodecOptions {
        let base = self.clone();
        CodecOptions {
            input_codecs: InputCodecFactory::new(&base),
            output_codecs: OutputCodecFactory::new(&base),
            base,
        }
    }
}

/// Per-call options: a private copy of [`SerializerOptions`] plus codec factories.
///
/// Factories cache one codec per value type, so this value is neither `Send`
/// nor `Sync`; every conversion call derives its own.
pub struct CodecOptions {
    base: SerializerOptions,
    input_codecs: InputCodecFactory,
    output_codecs: OutputCodecFactory,
}

impl CodecOptions {
    pub fn serializer_options(&self) -> &SerializerOptions {
        &self.base
    }

    pub fn input_codec<T: ValueType>(&self) -> Rc<InputCodec<T>> {
        self.input_codecs.codec::<T>()
    }

    pub fn output_codec<T: ValueType>(&self) -> Rc<OutputCodec<T>> {
        self.output_codecs.codec::<T>()
    }

    /// Number of distinct value types a codec has been built for.
    pub fn cached_codecs(&self) -> usize {
        self.input_codecs.cache.borrow().len() + self.output_codecs.cache.borrow().len()
    }

    pub fn decode_variable(&self, value: &Value) -> Result<Variable, AppError> {
        let variable: Variable = serde_json::from_value(value.clone()).map_err(|err| {
            AppError::new(
                ErrorCategory::ConstructionFailure,
                format!("invalid variable: {}", err),
            )
            .with_code("ACT-VAR-001")
        })?;
        if variable.id.trim().is_empty() || variable.name.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConstructionFailure,
                "variable id and name must be non-empty",
            )
            .with_code("ACT-VAR-001"));
        }
        Ok(variable)
    }

    /// A `null` value is written the same way as an absent one.
    pub fn encode_variable(&self, variable: &Variable) -> Result<Value, AppError> {
        if variable.id.trim().is_empty() || variable.name.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::SerializationFailure,
                "variable id and name must be non-empty",
            )
            .with_code("ACT-VAR-002"));
        }
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(variable.id.clone()));
        object.insert("name".to_string(), Value::String(variable.name.clone()));
        object.insert(
            TYPE_NAME_KEY.to_string(),
            Value::String(variable.type_name.clone()),
        );
        match variable.value.as_ref().filter(|value| !value.is_null()) {
            Some(value) => {
                object.insert("value".to_string(), value.clone());
            }
            None if !self.base.skip_null_values => {
                object.insert("value".to_string(), Value::Null);
            }
            None => {}
        }
        Ok(Value::Object(object))
    }
}

/// Produces input codecs lazily, one per value type.
struct InputCodecFactory {
    syntaxes: ExpressionSyntaxes,
    validate: bool,
    strict: bool,
    cache: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl InputCodecFactory {
    fn new(options: &SerializerOptions) -> Self {
        Self {
            syntaxes: options.expression_syntaxes.clone(),
            validate: options.validate_expressions,
            strict: options.strict_type_names,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn codec<T: ValueType>(&self) -> Rc<InputCodec<T>> {
        let key = TypeId::of::<T>();
        if let Some(cached) = self.cache.borrow().get(&key) {
            if let Ok(codec) = Rc::clone(cached).downcast::<InputCodec<T>>() {
                return codec;
            }
        }
        let codec = Rc::new(InputCodec::<T> {
            type_alias: T::type_alias(),
            syntaxes: self.syntaxes.clone(),
            validator: self.validate.then(ExpressionValidator::default),
            strict: self.strict,
            _marker: PhantomData,
        });
        self.cache
            .borrow_mut()
            .insert(key, Rc::clone(&codec) as Rc<dyn Any>);
        codec
    }
}

/// Produces output codecs lazily, one per value type.
struct OutputCodecFactory {
    strict: bool,
    cache: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl OutputCodecFactory {
    fn new(options: &SerializerOptions) -> Self {
        Self {
            strict: options.strict_type_names,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn codec<T: ValueType>(&self) -> Rc<OutputCodec<T>> {
        let key = TypeId::of::<T>();
        if let Some(cached) = self.cache.borrow().get(&key) {
            if let Ok(codec) = Rc::clone(cached).downcast::<OutputCodec<T>>() {
                return codec;
            }
        }
        let codec = Rc::new(OutputCodec::<T> {
            type_alias: T::type_alias(),
            strict: self.strict,
            _marker: PhantomData,
        });
        self.cache
            .borrow_mut()
            .insert(key, Rc::clone(&codec) as Rc<dyn Any>);
        codec
    }
}

fn wrapper_error(code: &str, message: String) -> AppError {
    AppError::new(ErrorCategory::ConstructionFailure, message).with_code(code)
}

fn check_type_name(
    object: &Map<String, Value>,
    expected: &str,
    strict: bool,
) -> Result<(), AppError> {
    match object.get(TYPE_NAME_KEY) {
        Some(Value::String(found)) if strict && found != expected => Err(wrapper_error(
            "ACT-BIND-002",
            format!("wrapper declares type {}, expected {}", found, expected),
        )),
        Some(Value::String(_)) | None | Some(Value::Null) => Ok(()),
        Some(other) => Err(wrapper_error(
            "ACT-BIND-002",
            format!("wrapper typeName must be a string, got {}", other),
        )),
    }
}

/// Codec for [`Input<T>`], closed over one value type.
pub struct InputCodec<T> {
    type_alias: Cow<'static, str>,
    syntaxes: ExpressionSyntaxes,
    validator: Option<ExpressionValidator>,
    strict: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueType> InputCodec<T> {
    pub fn type_alias(&self) -> &str {
        &self.type_alias
    }

    pub fn decode(&self, value: &Value) -> Result<Input<T>, AppError> {
        let object = value.as_object().ok_or_else(|| {
            wrapper_error(
                "ACT-BIND-001",
                format!("expected an input object, got {}", value),
            )
        })?;
        check_type_name(object, &self.type_alias, self.strict)?;

        let expression = object
            .get(EXPRESSION_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                wrapper_error(
                    "ACT-BIND-001",
                    "input is missing its expression object".to_string(),
                )
            })?;
        let syntax = expression
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                wrapper_error(
                    "ACT-BIND-001",
                    "input expression is missing its type".to_string(),
                )
            })?;
        let payload = expression.get("value").cloned().unwrap_or(Value::Null);

        if syntax == LITERAL_SYNTAX {
            let literal = serde_json::from_value(payload).map_err(|err| {
                wrapper_error(
                    "ACT-BIND-003",
                    format!("literal is not a valid {}: {}", self.type_alias, err),
                )
            })?;
            return Ok(Input::Literal(literal));
        }

        if !self.syntaxes.contains(syntax) {
            return Err(wrapper_error(
                "ACT-BIND-004",
                format!("unknown expression syntax '{}'", syntax),
            ));
        }
        let source = payload.as_str().ok_or_else(|| {
            wrapper_error(
                "ACT-BIND-004",
                format!("{} expression source must be a string", syntax),
            )
        })?;
        if let Some(validator) = &self.validator {
            validator.validate(syntax, source)?;
        }
        Ok(Input::Expression(Expression::new(syntax, source)))
    }

    pub fn encode(&self, input: &Input<T>) -> Result<Value, AppError> {
        let expression = match input {
            Input::Literal(literal) => {
                let not_representable = |reason: String| {
                    AppError::new(
                        ErrorCategory::SerializationFailure,
                        format!("literal {} is not representable: {}", self.type_alias, reason),
                    )
                    .with_code("ACT-WRITE-002")
                };
                let value = serde_json::to_value(literal)
                    .map_err(|err| not_representable(err.to_string()))?;
                // serde_json writes non-finite floats as null; refuse what cannot be read back.
                serde_json::from_value::<T>(value.clone())
                    .map_err(|err| not_representable(err.to_string()))?;
                json!({ "type": LITERAL_SYNTAX, "value": value })
            }
            Input::Expression(expression) => {
                if !self.syntaxes.contains(&expression.syntax) {
                    return Err(AppError::new(
                        ErrorCategory::SerializationFailure,
                        format!("unknown expression syntax '{}'", expression.syntax),
                    )
                    .with_code("ACT-WRITE-003"));
                }
                json!({ "type": expression.syntax, "value": expression.source })
            }
        };
        Ok(json!({
            TYPE_NAME_KEY: self.type_alias,
            EXPRESSION_KEY: expression,
        }))
    }
}

/// Codec for [`Output<T>`], closed over one value type.
pub struct OutputCodec<T> {
    type_alias: Cow<'static, str>,
    strict: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueType> OutputCodec<T> {
    pub fn type_alias(&self) -> &str {
        &self.type_alias
    }

    pub fn decode(&self, value: &Value) -> Result<Output<T>, AppError> {
        let object = value.as_object().ok_or_else(|| {
            wrapper_error(
                "ACT-BIND-005",
                format!("expected an output object, got {}", value),
            )
        })?;
        check_type_name(object, &self.type_alias, self.strict)?;
        let id = object
            .get(MEMORY_REFERENCE_KEY)
            .and_then(|reference| reference.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                wrapper_error(
                    "ACT-BIND-005",
                    "output must reference a variable id".to_string(),
                )
            })?;
        Ok(Output::new(MemoryReference::new(id)))
    }

    pub fn encode(&self, output: &Output<T>) -> Result<Value, AppError> {
        let id = &output.memory_reference().id;
        if id.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::SerializationFailure,
                format!("output {} must reference a variable id", self.type_alias),
            )
            .with_code("ACT-WRITE-007"));
        }
        Ok(json!({
            TYPE_NAME_KEY: self.type_alias,
            MEMORY_REFERENCE_KEY: { "id": id },
        }))
    }
}
