//! Activity kinds shipped with the core. Plugins register theirs the same way.

pub mod if_else;
pub mod read_line;
pub mod sequence;
pub mod set_variable;
pub mod write_line;

use crate::core::activity::registry::ActivityRegistryBuilder;

pub use if_else::If;
pub use read_line::ReadLine;
pub use sequence::Sequence;
pub use set_variable::SetVariable;
pub use write_line::WriteLine;

/// Register built-in activity kinds into the supplied builder.
pub fn register_builtins(builder: &mut ActivityRegistryBuilder) {
    builder
        .register_kind::<Sequence>()
        .register_kind::<WriteLine>()
        .register_kind::<ReadLine>()
        .register_kind::<SetVariable>()
        .register_kind::<If>();
}
