//! Built-in literal commands.

mod fs;
mod meta;
mod system;

pub use fs::{Cat, Cd, Ls, Mkdir, Pwd, Rm, Touch};
pub use meta::{Autocomplete, Clear, Exit, Help, History};
pub use system::{Df, Echo, Ps, Top};

use crate::shell::Shell;

/// Register every built-in on `shell`.
pub fn register_all(shell: &mut Shell) {
    shell.register(Pwd);
    shell.register(Ls);
    shell.register(Cd);
    shell.register(Mkdir);
    shell.register(Rm);
    shell.register(Touch);
    shell.register(Cat);

    shell.register(Echo);
    shell.register(Ps);
    shell.register(Top);
    shell.register(Df);

    shell.register(History);
    shell.register(Clear);
    shell.register(Exit);
    shell.register(Help);
    shell.register(Autocomplete);
}

/// Split at the first `--`: options before it, operands only after it.
fn split_options(args: &[String]) -> (&[String], &[String]) {
    match args.iter().position(|a| a == "--") {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[]),
    }
}

/// True when `args` carries any of the given flags before a `--`.
pub(crate) fn has_flag(args: &[String], flags: &[&str]) -> bool {
    let (options, _) = split_options(args);
    options.iter().any(|a| flags.contains(&a.as_str()))
}

/// Arguments that are not flags. Everything after `--` is an operand.
pub(crate) fn operands(args: &[String]) -> impl Iterator<Item = &str> {
    let (options, rest) = split_options(args);
    options
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with('-') || *a == "-")
        .chain(rest.iter().map(String::as_str))
}
