//! Deciding whether free text from a transport is a literal command line.

use std::borrow::Cow;

use parley_shell::Shell;

use crate::command::NlCommand;

/// Prefix `text` with `nlp ` unless its first word is a registered command
/// or it already starts with `nlp `.
///
/// This only looks at the first word, so "ls it all" runs `ls` literally and
/// an English sentence that happens to start with a command name is never
/// treated as English. Blank text is passed through untouched.
pub fn route_free_text<'a>(shell: &Shell, text: &'a str) -> Cow<'a, str> {
    let Some(first) = text.split_whitespace().next() else {
        return Cow::Borrowed(text);
    };
    let prefix = format!("{} ", NlCommand::NAME);
    if shell.is_command(first) || text.starts_with(&prefix) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{prefix}{text}"))
    }
}
