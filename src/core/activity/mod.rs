//! Polymorphic activity (de)serialization.
//!
//! [`ActivitySerializer`] dispatches on the `typeName` discriminator through a
//! frozen [`ActivityRegistry`]. Unregistered discriminators degrade to a
//! [`NotFoundActivity`] placeholder instead of failing the document.

pub mod bindings;
pub mod builtins;
pub mod codec;
pub mod context;
pub mod expression;
pub mod node;
pub mod registry;
pub mod serializer;

pub use bindings::{Expression, Input, MemoryReference, Output, ValueType, Variable};
pub use codec::{CodecOptions, InputCodec, OutputCodec, SerializerOptions};
pub use context::{ActivityWriter, ConstructionContext};
pub use expression::ExpressionSyntaxes;
pub use node::{Activity, ActivityBox, ActivityKind, NotFoundActivity};
pub use registry::{ActivityDescriptor, ActivityRegistry, ActivityRegistryBuilder};
pub use serializer::ActivitySerializer;

/// New node or variable identity: a v4 UUID without hyphens.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
