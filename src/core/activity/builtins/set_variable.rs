use crate::core::activity::bindings::{Input, MemoryReference};
use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityKind};
use crate::core::error::AppError;
use serde_json::Value;
use std::any::Any;

#[derive(Debug, Clone, PartialEq)]
pub struct SetVariable {
    pub id: String,
    pub variable: MemoryReference,
    pub value: Input<Value>,
}

impl SetVariable {
    pub fn new(variable: MemoryReference, value: Input<Value>) -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            variable,
            value,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Activity for SetVariable {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        if self.variable.id.trim().is_empty() {
            return Err(AppError::serialization(
                Self::TYPE_NAME,
                "variable reference must carry an id",
            )
            .with_code("ACT-WRITE-007")
            .at_field("variable"));
        }
        writer.field("variable", &self.variable)?;
        writer.input("value", &self.value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ActivityKind for SetVariable {
    const TYPE_NAME: &'static str = "Tessera.SetVariable";
    const DESCRIPTION: &'static str = "Assign a value to a variable in scope.";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError> {
        let variable: MemoryReference = ctx.field("variable")?;
        if variable.id.trim().is_empty() {
            return Err(AppError::construction(
                Self::TYPE_NAME,
                "variable reference must carry an id",
            )
            .at_field("variable"));
        }
        Ok(Self {
            id: ctx.id(),
            variable,
            value: ctx.input("value")?,
        })
    }
}
