use crate::core::activity::bindings::Input;
use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityKind};
use crate::core::error::AppError;
use std::any::Any;

/// Writes a line of text to the host's console sink.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteLine {
    pub id: String,
    pub text: Input<String>,
}

impl WriteLine {
    pub fn new(text: impl Into<Input<String>>) -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            text: text.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Activity for WriteLine {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        writer.input("text", &self.text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ActivityKind for WriteLine {
    const TYPE_NAME: &'static str = "Tessera.WriteLine";
    const CATEGORY: &'static str = "Console";
    const DESCRIPTION: &'static str = "Write a line of text to the console.";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError> {
        Ok(Self {
            id: ctx.id(),
            text: ctx.input("text")?,
        })
    }
}
