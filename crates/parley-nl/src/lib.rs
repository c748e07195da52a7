//! Plain-English front end for the parley shell
//!
//! An utterance is checked against an ordered table of phrase templates
//! ([`table::PatternTable`]); the first template that matches decides the
//! [`intents::Intent`] and extracts up to two slot values. The adapters then
//! turn that into a quoted literal command line for the shell, or carry out
//! a move/rename/copy directly.
//!
//! ```no_run
//! # fn main() -> Result<(), parley_nl::PatternError> {
//! let shell = parley_nl::build_shell()?;
//! let mut session = parley_shell::Session::new("/tmp");
//! let out = shell.execute_line(&mut session, "nlp create a new folder called Projects");
//! # let _ = out;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod command;
pub mod engine;
pub mod intents;
pub mod routing;
pub mod table;
pub mod template;

pub use command::NlCommand;
pub use engine::{Resolution, Resolver};
pub use intents::Intent;
pub use routing::route_free_text;
pub use table::{Match, PatternTable};
pub use template::{PatternError, Template};

use parley_shell::Shell;

/// A shell with every built-in plus `nlp`.
pub fn build_shell() -> Result<Shell, PatternError> {
    let mut shell = Shell::with_builtins();
    shell.register(NlCommand::new()?);
    Ok(shell)
}
