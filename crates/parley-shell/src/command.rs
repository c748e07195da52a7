use crate::session::Session;
use crate::shell::Shell;

/// What a command hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Ordinary output. An empty string means success with nothing to print.
    Text(String),
    /// Terminate the session.
    Exit,
    /// Clear the visible output.
    Clear,
}

impl Output {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Exit | Self::Clear => None,
        }
    }

    pub fn is_signal(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Everything a command may touch while it runs.
///
/// The shell is shared and read-only; the session belongs to the caller
/// (one REPL, one HTTP session token) and is the only mutable state.
pub struct CommandContext<'a> {
    pub shell: &'a Shell,
    pub session: &'a mut Session,
}

impl<'a> CommandContext<'a> {
    pub fn new(shell: &'a Shell, session: &'a mut Session) -> Self {
        Self { shell, session }
    }

    /// Run a literal command line through the shell on behalf of this caller.
    pub fn execute_line(&mut self, line: &str) -> Output {
        self.shell.execute_line(self.session, line)
    }
}

pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn help(&self) -> String {
        format!("{}: {}", self.name(), self.description())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output;
}
