use crate::core::activity::bindings::Variable;
use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityBox, ActivityKind};
use crate::core::error::AppError;
use std::any::Any;

/// Runs child activities in order, owning the variables they share.
#[derive(Debug)]
pub struct Sequence {
    pub id: String,
    pub variables: Vec<Variable>,
    pub activities: Vec<ActivityBox>,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            variables: Vec::new(),
            activities: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_activity<A: Activity>(mut self, activity: A) -> Self {
        self.activities.push(Box::new(activity));
        self
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Activity for Sequence {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        writer.variables("variables", &self.variables)?;
        writer.activities("activities", &self.activities)
    }

    fn children(&self) -> Vec<&dyn Activity> {
        self.activities.iter().map(|child| child.as_ref()).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ActivityKind for Sequence {
    const TYPE_NAME: &'static str = "Tessera.Sequence";
    const CATEGORY: &'static str = "Workflows";
    const DESCRIPTION: &'static str = "Execute a set of activities in sequence.";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError> {
        Ok(Self {
            id: ctx.id(),
            variables: ctx.variables("variables")?,
            activities: ctx.activities("activities")?,
        })
    }
}
