use crate::builtins;
use crate::command::{Command, CommandContext, Output};
use crate::error::{Result, ShellError};
use crate::registry::Registry;
use crate::session::Session;
use crate::words;

/// The literal command interpreter.
///
/// A `Shell` is built once and then shared read-only between callers; all
/// per-caller state lives in the [`Session`] passed to each call.
#[derive(Default)]
pub struct Shell {
    registry: Registry,
}

impl Shell {
    /// A shell with no commands at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shell with the filesystem, process and meta built-ins registered.
    pub fn with_builtins() -> Self {
        let mut shell = Self::new();
        builtins::register_all(&mut shell);
        shell
    }

    pub fn register(&mut self, command: impl Command + 'static) {
        self.registry.register(Box::new(command));
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_command(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Run one command by name. History is not touched.
    pub fn dispatch(&self, session: &mut Session, name: &str, args: &[String]) -> Result<Output> {
        let command = self
            .registry
            .get(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
        tracing::debug!(command = %name, argc = args.len(), "dispatch");
        let mut ctx = CommandContext::new(self, session);
        Ok(command.execute(&mut ctx, args))
    }

    /// Record, tokenize and run a full command line.
    pub fn execute_line(&self, session: &mut Session, line: &str) -> Output {
        if line.trim().is_empty() {
            return Output::empty();
        }
        session.record(line);

        let mut words = words::split(line);
        if words.is_empty() {
            return Output::empty();
        }
        let name = words.remove(0);
        match self.dispatch(session, &name, &words) {
            Ok(output) => output,
            Err(err) => Output::Text(err.to_string()),
        }
    }
}
