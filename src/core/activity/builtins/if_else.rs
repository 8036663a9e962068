use crate::core::activity::bindings::Input;
use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::activity::node::{Activity, ActivityBox, ActivityKind};
use crate::core::error::AppError;
use std::any::Any;

/// Branches on a boolean input. Both branches are optional.
#[derive(Debug)]
pub struct If {
    pub id: String,
    pub condition: Input<bool>,
    pub then: Option<ActivityBox>,
    pub otherwise: Option<ActivityBox>,
}

impl If {
    pub fn new(condition: Input<bool>) -> Self {
        Self {
            id: crate::core::activity::generate_id(),
            condition,
            then: None,
            otherwise: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_then<A: Activity>(mut self, activity: A) -> Self {
        self.then = Some(Box::new(activity));
        self
    }

    pub fn with_otherwise<A: Activity>(mut self, activity: A) -> Self {
        self.otherwise = Some(Box::new(activity));
        self
    }
}

impl Activity for If {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        writer.input("condition", &self.condition)?;
        writer.activity("then", self.then.as_deref())?;
        writer.activity("else", self.otherwise.as_deref())
    }

    fn children(&self) -> Vec<&dyn Activity> {
        self.then
            .iter()
            .chain(self.otherwise.iter())
            .map(|child| child.as_ref())
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ActivityKind for If {
    const TYPE_NAME: &'static str = "Tessera.If";
    const CATEGORY: &'static str = "Control Flow";
    const DESCRIPTION: &'static str = "Evaluate a boolean condition and run one of two branches.";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError> {
        Ok(Self {
            id: ctx.id(),
            condition: ctx.input("condition")?,
            then: ctx.activity("then")?,
            otherwise: ctx.activity("else")?,
        })
    }
}
