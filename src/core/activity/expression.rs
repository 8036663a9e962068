use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use rhai::Engine;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Tag used on the wire for literal inputs. Never a valid expression syntax.
pub const LITERAL_SYNTAX: &str = "Literal";

pub const JAVASCRIPT_SYNTAX: &str = "JavaScript";
pub const LIQUID_SYNTAX: &str = "Liquid";
pub const RHAI_SYNTAX: &str = "Rhai";

/// Set of expression languages an input may defer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionSyntaxes {
    names: Arc<BTreeSet<String>>,
}

impl Default for ExpressionSyntaxes {
    fn default() -> Self {
        Self::from_names([JAVASCRIPT_SYNTAX, LIQUID_SYNTAX, RHAI_SYNTAX])
    }
}

impl ExpressionSyntaxes {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty() && name != LITERAL_SYNTAX)
            .collect();
        Self {
            names: Arc::new(names),
        }
    }

    pub fn contains(&self, syntax: &str) -> bool {
        self.names.contains(syntax)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Copy of this set with `syntax` added.
    pub fn with(&self, syntax: &str) -> Self {
        Self::from_names(self.names().chain(std::iter::once(syntax)))
    }
}

/// Compile-only checker for expression sources.
///
/// Only Rhai sources are compiled; other syntaxes are evaluated by the runtime
/// that consumes the activity graph and are accepted as opaque text.
pub struct ExpressionValidator {
    engine: Engine,
}

impl Default for ExpressionValidator {
    fn default() -> Self {
        let mut engine = Engine::new_raw();
        engine.set_max_operations(50_000);
        engine.set_max_call_levels(64);
        engine.set_max_expr_depths(64, 64);
        engine.on_print(|_| {});
        engine.on_debug(|_, _, _| {});
        ExpressionValidator { engine }
    }
}

impl ExpressionValidator {
    pub fn validate(&self, syntax: &str, source: &str) -> Result<(), AppError> {
        if syntax != RHAI_SYNTAX {
            return Ok(());
        }
        self.engine.compile(source).map(|_| ()).map_err(|err| {
            AppError::new(
                ErrorCategory::ConstructionFailure,
                format!("expression compile error: {}", err),
            )
            .with_code("ACT-EXPR-001")
        })
    }
}
