//! Bound values attached to activity fields.
//!
//! An [`Input`] is either a literal or a deferred expression. An [`Output`]
//! points at a [`Variable`] slot owned by an enclosing container; the activity
//! only keeps the reference.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Value types a bound wrapper can close over.
pub trait ValueType:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Wire alias written next to wrapped values.
    fn type_alias() -> Cow<'static, str>;
}

macro_rules! value_type {
    ($($ty:ty => $alias:literal),* $(,)?) => {
        $(
            impl ValueType for $ty {
                fn type_alias() -> Cow<'static, str> {
                    Cow::Borrowed($alias)
                }
            }
        )*
    };
}

value_type! {
    String => "String",
    bool => "Boolean",
    i32 => "Int32",
    i64 => "Int64",
    u32 => "UInt32",
    u64 => "UInt64",
    f64 => "Double",
    DateTime<Utc> => "DateTime",
    Value => "Object",
}

impl<T: ValueType> ValueType for Vec<T> {
    fn type_alias() -> Cow<'static, str> {
        Cow::Owned(format!("{}[]", T::type_alias()))
    }
}

/// Deferred expression evaluated by the workflow runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub syntax: String,
    pub source: String,
}

impl Expression {
    pub fn new(syntax: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            syntax: syntax.into(),
            source: source.into(),
        }
    }
}

/// Value supplied to an activity field.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Literal(T),
    Expression(Expression),
}

impl<T: ValueType> Input<T> {
    pub fn literal(value: T) -> Self {
        Input::Literal(value)
    }

    pub fn expression(syntax: impl Into<String>, source: impl Into<String>) -> Self {
        Input::Expression(Expression::new(syntax, source))
    }

    pub fn as_literal(&self) -> Option<&T> {
        match self {
            Input::Literal(value) => Some(value),
            Input::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Input::Literal(_) => None,
            Input::Expression(expression) => Some(expression),
        }
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Literal(value.to_string())
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Literal(value)
    }
}

/// Reference to a variable slot in the enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryReference {
    pub id: String,
}

impl MemoryReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Capture target for a value produced by an activity.
pub struct Output<T> {
    memory_reference: MemoryReference,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueType> Output<T> {
    pub fn new(memory_reference: MemoryReference) -> Self {
        Self {
            memory_reference,
            _marker: PhantomData,
        }
    }

    /// Capture into `variable`. The variable must carry the same value type.
    pub fn to(variable: &Variable<T>) -> Self {
        Self::new(variable.reference())
    }

    pub fn memory_reference(&self) -> &MemoryReference {
        &self.memory_reference
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            memory_reference: self.memory_reference.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Output<T> {
    fn eq(&self, other: &Self) -> bool {
        self.memory_reference == other.memory_reference
    }
}

impl<T: ValueType> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("type", &T::type_alias())
            .field("memory_reference", &self.memory_reference)
            .finish()
    }
}

/// Named, typed storage slot scoped to a workflow subtree.
///
/// Containers keep variables erased to JSON (`Variable<Value>`); typed variables
/// are built in code and erased before being attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable<T = Value> {
    pub id: String,
    pub name: String,
    pub type_name: String,
    /// `None` when unset; an erased `null` collapses to `None` as well.
    #[serde(default)]
    pub value: Option<T>,
}

impl<T: ValueType> Variable<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            name: name.into(),
            type_name: T::type_alias().into_owned(),
            value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    pub fn reference(&self) -> MemoryReference {
        MemoryReference::new(self.id.clone())
    }

    /// Drop the static type, keeping the alias in `type_name`.
    pub fn erase(self) -> Result<Variable, AppError> {
        let value = match self.value {
            Some(value) => serde_json::to_value(value).map_err(|err| {
                AppError::new(
                    ErrorCategory::SerializationFailure,
                    format!("variable '{}' value is not representable: {}", self.name, err),
                )
                .with_code("ACT-VAR-002")
            })?,
            None => Value::Null,
        };
        let value = (!value.is_null()).then_some(value);
        Ok(Variable {
            id: self.id,
            name: self.name,
            type_name: self.type_name,
            value,
        })
    }
}

impl Variable {
    /// Recover a typed view; fails when the stored alias or value disagrees with `T`.
    pub fn typed<T: ValueType>(&self) -> Result<Variable<T>, AppError> {
        let alias = T::type_alias();
        if self.type_name != alias {
            return Err(AppError::new(
                ErrorCategory::ConstructionFailure,
                format!(
                    "variable '{}' has type {}, expected {}",
                    self.name, self.type_name, alias
                ),
            )
            .with_code("ACT-VAR-003"));
        }
        let value = match self.value.as_ref().filter(|value| !value.is_null()) {
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|err| {
                AppError::new(
                    ErrorCategory::ConstructionFailure,
                    format!("variable '{}' value is not a {}: {}", self.name, alias, err),
                )
                .with_code("ACT-VAR-003")
            })?),
            None => None,
        };
        Ok(Variable {
            id: self.id.clone(),
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            value,
        })
    }
}
