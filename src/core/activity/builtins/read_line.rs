use crate::core::activity::bindings::Output;
use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityKind};
use crate::core::error::AppError;
use std::any::Any;

/// Reads a line from the console, optionally capturing it into a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadLine {
    pub id: String,
    pub result: Option<Output<String>>,
}

impl ReadLine {
    pub fn new() -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            result: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn capture(mut self, output: Output<String>) -> Self {
        self.result = Some(output);
        self
    }
}

impl Default for ReadLine {
    fn default() -> Self {
        Self::new()
    }
}

impl Activity for ReadLine {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        writer.output("result", self.result.as_ref())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ActivityKind for ReadLine {
    const TYPE_NAME: &'static str = "Tessera.ReadLine";
    const CATEGORY: &'static str = "Console";
    const DESCRIPTION: &'static str = "Read a line of text from the console.";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError> {
        Ok(Self {
            id: ctx.id(),
            result: ctx.output("result")?,
        })
    }
}
