//! Workflow definition documents whose root is a polymorphic activity graph.

pub mod definition;

pub use definition::{WorkflowDefinition, WorkflowDefinitionSerializer};
