use crate::cli::Command;
use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Interactive use from a terminal.
    LocalDev,
    /// The command writes its document to stdout; logs must stay off it.
    Pipeline,
    /// Scripted runs that should be quiet on the console.
    Automation,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should be disabled.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Automation)
    }
}

/// Derive the active execution context from a parsed CLI command plus overrides.
pub fn detect_context(command: &Command) -> ExecutionContext {
    if automation_override_enabled() {
        return ExecutionContext::Automation;
    }

    match command {
        Command::Normalize(args) if args.output.is_none() => ExecutionContext::Pipeline,
        Command::Types(_) | Command::Check(_) | Command::Normalize(_) | Command::Provision(_) => {
            ExecutionContext::LocalDev
        }
    }
}

fn automation_override_enabled() -> bool {
    env::var("TESSERA_AUTOMATION")
        .map(|value| value.trim() == "1")
        .unwrap_or(false)
}
