#![allow(clippy::result_large_err)] // Registry and constructors return AppError directly for structured diagnostics without boxing.

use crate::core::activity::context::ConstructionContext;
use crate::core::activity::node::{ActivityBox, ActivityKind};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Constructor closure stored by a descriptor.
pub type ActivityConstructor =
    Arc<dyn Fn(&ConstructionContext<'_>) -> Result<ActivityBox, AppError> + Send + Sync>;

/// Registered metadata and constructor for one activity kind.
#[derive(Clone)]
pub struct ActivityDescriptor {
    type_name: String,
    version: u32,
    category: String,
    description: Option<String>,
    constructor: ActivityConstructor,
}

impl ActivityDescriptor {
    pub fn new<F>(type_name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&ConstructionContext<'_>) -> Result<ActivityBox, AppError> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            version: 1,
            category: "Miscellaneous".to_string(),
            description: None,
            constructor: Arc::new(constructor),
        }
    }

    /// Descriptor for a statically known kind.
    pub fn of<T: ActivityKind>() -> Self {
        let descriptor = Self::new(T::TYPE_NAME, |ctx| {
            T::construct(ctx).map(|activity| Box::new(activity) as ActivityBox)
        })
        .with_category(T::CATEGORY);
        if T::DESCRIPTION.is_empty() {
            descriptor
        } else {
            descriptor.with_description(T::DESCRIPTION)
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn construct(&self, ctx: &ConstructionContext<'_>) -> Result<ActivityBox, AppError> {
        (self.constructor)(ctx)
    }
}

impl fmt::Debug for ActivityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityDescriptor")
            .field("type_name", &self.type_name)
            .field("version", &self.version)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Builder used to register activity kinds during startup.
pub struct ActivityRegistryBuilder {
    descriptors: IndexMap<String, Arc<ActivityDescriptor>>,
}

impl Default for ActivityRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityRegistryBuilder {
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    pub fn register(&mut self, descriptor: ActivityDescriptor) -> &mut Self {
        if let Err(err) = self.try_register(descriptor) {
            panic!("{}", err.message);
        }
        self
    }

    pub fn register_kind<T: ActivityKind>(&mut self) -> &mut Self {
        self.register(ActivityDescriptor::of::<T>())
    }

    pub fn try_register(&mut self, descriptor: ActivityDescriptor) -> Result<(), AppError> {
        let type_name = descriptor.type_name();
        if type_name.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "activity type name must not be empty",
            )
            .with_code("ACT-REG-001"));
        }
        if self.descriptors.contains_key(type_name) {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!("duplicate activity type registered: {}", type_name),
            )
            .with_code("ACT-REG-002"));
        }
        self.descriptors
            .insert(type_name.to_string(), Arc::new(descriptor));
        Ok(())
    }

    pub fn build(self) -> ActivityRegistry {
        tracing::debug!("activity registry frozen with {} kinds", self.descriptors.len());
        ActivityRegistry {
            inner: Arc::new(self.descriptors),
        }
    }
}

/// Immutable descriptor table shared by every conversion.
#[derive(Clone)]
pub struct ActivityRegistry {
    inner: Arc<IndexMap<String, Arc<ActivityDescriptor>>>,
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityRegistry {
    pub fn new() -> Self {
        ActivityRegistryBuilder::new().build()
    }

    pub fn builder() -> ActivityRegistryBuilder {
        ActivityRegistryBuilder::new()
    }

    /// Registry preloaded with the built-in kinds.
    pub fn with_builtins() -> Self {
        let mut builder = Self::builder();
        crate::core::activity::builtins::register_builtins(&mut builder);
        builder.build()
    }

    pub fn find(&self, type_name: &str) -> Option<Arc<ActivityDescriptor>> {
        self.inner.get(type_name).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ActivityDescriptor> {
        self.inner.values().map(|descriptor| descriptor.as_ref())
    }
}

impl fmt::Debug for ActivityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.keys()).finish()
    }
}
