//! Parley literal command layer
//!
//! This crate owns everything below the natural-language front end:
//!
//! - the [`Command`] trait and the [`Registry`] that maps names to commands,
//! - the [`Shell`] line executor (tokenize, look up, dispatch),
//! - the per-caller [`Session`] (working directory, history, completion toggle),
//! - the built-in filesystem, process and meta commands.
//!
//! Commands never fail with `Err`: they report problems as text, the way a
//! shell prints diagnostics. The two out-of-band signals (terminate, clear the
//! display) are variants of [`Output`] rather than magic strings.

pub mod builtins;
pub mod command;
pub mod completion;
pub mod error;
pub mod registry;
pub mod session;
pub mod shell;
pub mod words;

pub use command::{Command, CommandContext, Output};
pub use error::{Result, ShellError};
pub use registry::Registry;
pub use session::Session;
pub use shell::Shell;
