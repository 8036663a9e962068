pub mod activity;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod workflow;

pub use activity::{
    Activity, ActivityBox, ActivityDescriptor, ActivityRegistry, ActivitySerializer,
    NotFoundActivity, SerializerOptions,
};
pub use config::{ConfigLoader, ConfigValidator, TesseraConfig};
pub use error::AppError;
pub use types::*;
pub use workflow::{WorkflowDefinition, WorkflowDefinitionSerializer};
