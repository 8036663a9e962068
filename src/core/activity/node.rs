#![allow(clippy::result_large_err)]

use crate::core::activity::context::{ActivityWriter, ConstructionContext};
use crate::core::error::AppError;
use std::any::Any;
use std::fmt;

/// Owned, type-erased activity node.
pub type ActivityBox = Box<dyn Activity>;

/// One unit of behavior in a workflow definition graph.
///
/// Writers call [`Activity::write`] through the trait object, so every concrete
/// field reaches the wire even though callers only hold `dyn Activity`.
pub trait Activity: Send + Sync + fmt::Debug + 'static {
    /// Identity, stable across read/write cycles.
    fn id(&self) -> &str;

    /// Discriminator this node was built from and is written back as.
    fn type_name(&self) -> &str;

    /// Emit type-specific fields. `typeName` and `id` are written by the caller.
    fn write(&self, writer: &mut ActivityWriter<'_>) -> Result<(), AppError>;

    /// Directly nested activities, in document order.
    fn children(&self) -> Vec<&dyn Activity> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn Activity + 'a {
    pub fn downcast_ref<T: Activity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Activity>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// True for placeholders produced from an unregistered discriminator.
    pub fn is_unresolved(&self) -> bool {
        self.is::<NotFoundActivity>()
    }
}

/// Statically known activity kind that can describe itself to the registry.
pub trait ActivityKind: Activity + Sized {
    const TYPE_NAME: &'static str;
    const CATEGORY: &'static str = "Primitives";
    const DESCRIPTION: &'static str = "";

    fn construct(ctx: &ConstructionContext<'_>) -> Result<Self, AppError>;
}

/// Placeholder synthesized when a discriminator is not registered.
///
/// Only identity survives: the id and the original discriminator. Writing it
/// back emits exactly those two fields, so a later read against a registry
/// that knows the type resolves it again, minus its type-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundActivity {
    pub id: String,
    pub original_type_name: String,
}

impl NotFoundActivity {
    pub fn new(id: impl Into<String>, original_type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_type_name: original_type_name.into(),
        }
    }
}

impl Activity for NotFoundActivity {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        &self.original_type_name
    }

    fn write(&self, _writer: &mut ActivityWriter<'_>) -> Result<(), AppError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
