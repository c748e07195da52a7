//! Tokenizing and quoting of command lines.
//!
//! Lines are split with POSIX shell rules so that anything produced by
//! [`quote`] comes back as exactly one word.

use crate::error::{Result, ShellError};

/// Split a command line into words.
///
/// Unbalanced quotes do not make the line unusable: it is split on
/// whitespace instead, the way a forgiving interactive shell would.
pub fn split(line: &str) -> Vec<String> {
    match shlex::split(line) {
        Some(words) => words,
        None => line.split_whitespace().map(str::to_string).collect(),
    }
}

/// Quote one word so that [`split`] yields it back unchanged.
pub fn quote(word: &str) -> Result<String> {
    shlex::try_quote(word)
        .map(|q| q.into_owned())
        .map_err(|_| ShellError::Unquotable(word.to_string()))
}

/// Quote every word and join them with single spaces.
pub fn join<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let quoted = words.into_iter().map(quote).collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(" "))
}
