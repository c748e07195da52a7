//! Tab completion for command names and path arguments.

use std::fs;
use std::path::Path;

use crate::session::Session;
use crate::shell::Shell;

/// Commands whose arguments are completed as paths.
pub const PATH_COMMANDS: &[&str] = &["cd", "ls", "cat", "rm", "mkdir", "touch"];

/// Candidates for the word under the cursor at the end of `line`.
///
/// Nothing is offered while the session has completion switched off.
pub fn complete(shell: &Shell, session: &Session, line: &str) -> Vec<String> {
    if !session.completion_enabled {
        return Vec::new();
    }
    complete_with(shell.registry().names(), session, line)
}

/// Completion against an explicit command list, ignoring the session toggle.
pub fn complete_with<'a>(
    commands: impl IntoIterator<Item = &'a str>,
    session: &Session,
    line: &str,
) -> Vec<String> {
    if !line.contains(' ') {
        return commands
            .into_iter()
            .filter(|name| name.starts_with(line))
            .map(str::to_string)
            .collect();
    }

    let command = line.split_whitespace().next().unwrap_or_default();
    if !PATH_COMMANDS.contains(&command) {
        return Vec::new();
    }
    let partial = if line.ends_with(char::is_whitespace) {
        ""
    } else {
        line.split_whitespace().last().unwrap_or_default()
    };
    complete_path(session, partial)
}

fn complete_path(session: &Session, partial: &str) -> Vec<String> {
    let (dir_part, name_part) = match partial.rfind('/') {
        Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
        None => ("", partial),
    };
    let search_dir = if dir_part.is_empty() {
        session.cwd().to_path_buf()
    } else {
        session.resolve(dir_part)
    };

    let Ok(entries) = fs::read_dir(&search_dir) else {
        return Vec::new();
    };
    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(name_part) {
                return None;
            }
            if name.starts_with('.') && !name_part.starts_with('.') {
                return None;
            }
            let suffix = if is_dir(&entry.path()) { "/" } else { "" };
            Some(format!("{dir_part}{name}{suffix}"))
        })
        .collect();
    matches.sort();
    matches
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
