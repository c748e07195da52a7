//! Turning a matched intent and its slots into an effect.
//!
//! Most intents become a literal command line for the shell. Move, rename
//! and copy need to look at what the destination is, so they touch the
//! filesystem directly. Nothing here returns an error: failures come back
//! as text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parley_shell::error::describe_io;
use parley_shell::{words, CommandContext, Output, Session, Shell};
use walkdir::WalkDir;

use crate::intents::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Move,
    Rename,
    Copy,
}

impl TransferKind {
    fn past(self) -> &'static str {
        match self {
            TransferKind::Move => "Moved",
            TransferKind::Rename => "Renamed",
            TransferKind::Copy => "Copied",
        }
    }

    fn progressive(self) -> &'static str {
        match self {
            TransferKind::Move => "moving",
            TransferKind::Rename => "renaming",
            TransferKind::Copy => "copying",
        }
    }
}

/// What to do for one matched utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run this literal command line through the shell.
    Line(String),
    /// Move, rename or copy a path; `source` and `destination` are the
    /// trimmed slot values as the user typed them.
    Transfer {
        kind: TransferKind,
        source: String,
        destination: String,
    },
    /// Answer with this text and do nothing else.
    Reply(String),
}

/// `name`, its flags, then the operands, each quoted so it stays one word.
/// An operand that looks like a flag is put behind `--`.
fn line(name: &str, flags: &[&str], operands: &[&str]) -> Action {
    let mut argv = flags.to_vec();
    if operands.iter().any(|op| op.starts_with('-')) {
        argv.push("--");
    }
    argv.extend_from_slice(operands);
    match words::join(argv) {
        Ok(quoted) if quoted.is_empty() => Action::Line(name.to_string()),
        Ok(quoted) => Action::Line(format!("{name} {quoted}")),
        Err(err) => Action::Reply(err.to_string()),
    }
}

fn slot(slots: &[String], i: usize) -> &str {
    slots.get(i).map_or("", |s| s.trim())
}

/// Pick the command a help question is about: the first word naming a
/// registered command, else the first word, else nothing.
fn help_topic<'a>(shell: &Shell, topic: &'a str) -> Option<&'a str> {
    let topic_words: Vec<&str> = topic
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    topic_words
        .iter()
        .find(|w| shell.is_command(w))
        .or_else(|| topic_words.first())
        .copied()
}

pub fn missing_slot(name: &str) -> String {
    format!("No {name} given. Type 'nlp help' for examples.")
}

pub fn plan(intent: Intent, slots: &[String], shell: &Shell, session: &Session) -> Action {
    let missing = intent
        .required_slots()
        .iter()
        .enumerate()
        .find(|(i, _)| slot(slots, *i).is_empty());
    if let Some((_, name)) = missing {
        return Action::Reply(missing_slot(name));
    }

    let first = slot(slots, 0);
    let second = slot(slots, 1);
    match intent {
        Intent::CreateDirectory => line("mkdir", &[], &[first]),
        Intent::CreateFile => line("touch", &[], &[first]),
        Intent::ListDirectory => line("ls", &[], &[if first.is_empty() { "." } else { first }]),
        Intent::ShowFile => line("cat", &[], &[first]),
        Intent::Remove => {
            if session.resolve(first).is_dir() {
                line("rm", &["-r"], &[first])
            } else {
                line("rm", &[], &[first])
            }
        }
        Intent::Move | Intent::Rename | Intent::Copy => Action::Transfer {
            kind: match intent {
                Intent::Move => TransferKind::Move,
                Intent::Rename => TransferKind::Rename,
                _ => TransferKind::Copy,
            },
            source: first.to_string(),
            destination: second.to_string(),
        },
        Intent::ChangeDirectory => line("cd", &[], &[first]),
        Intent::ListProcesses => line("ps", &[], &[]),
        Intent::ResourceUsage => line("top", &[], &[]),
        Intent::DiskUsage => line("df", &["-h"], &[]),
        Intent::CurrentDirectory => line("pwd", &[], &[]),
        Intent::History => line("history", &[], &[]),
        Intent::ListCommands => line("help", &[], &[]),
        Intent::CommandHelp => match help_topic(shell, first) {
            Some(topic) => line("help", &[], &[topic]),
            None => line("help", &[], &[]),
        },
        Intent::Exit => line("exit", &[], &[]),
        Intent::Clear => line("clear", &[], &[]),
    }
}

pub fn perform(action: Action, ctx: &mut CommandContext<'_>) -> Output {
    match action {
        Action::Line(line) => ctx.execute_line(&line),
        Action::Reply(text) => Output::Text(text),
        Action::Transfer {
            kind,
            source,
            destination,
        } => {
            let result = ctx.session.resolve_operand(&source).and_then(|from| {
                let to = ctx.session.resolve_operand(&destination)?;
                transfer(kind, &from, &to)
            });
            match result {
                Ok(()) => Output::Text(format!("{} {source} to {destination}", kind.past())),
                Err(err) => {
                    tracing::warn!(
                        ?kind,
                        %source,
                        %destination,
                        cwd = %ctx.session.cwd().display(),
                        error = %err,
                        "transfer failed"
                    );
                    Output::Text(format!(
                        "Error {} {source} to {destination}: {}",
                        kind.progressive(),
                        describe_io(&err)
                    ))
                }
            }
        }
    }
}

/// Where `source` ends up: inside `destination` when that is an existing
/// directory, otherwise at `destination` itself.
pub fn destination_path(source: &Path, destination: &Path) -> PathBuf {
    if destination.is_dir() {
        if let Some(name) = source.file_name() {
            return destination.join(name);
        }
    }
    destination.to_path_buf()
}

fn transfer(kind: TransferKind, source: &Path, destination: &Path) -> io::Result<()> {
    match kind {
        TransferKind::Move => move_path(source, &destination_path(source, destination)),
        TransferKind::Rename => fs::rename(source, destination),
        TransferKind::Copy => {
            if source.is_dir() {
                let target = if destination.exists() {
                    match source.file_name() {
                        Some(name) => destination.join(name),
                        None => destination.to_path_buf(),
                    }
                } else {
                    destination.to_path_buf()
                };
                copy_tree(source, &target)
            } else {
                copy_file(source, &destination_path(source, destination))
            }
        }
    }
}

fn move_path(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(from = %source.display(), "rename crosses devices, copying");
            if source.is_dir() {
                copy_tree(source, target)?;
                fs::remove_dir_all(source)
            } else {
                copy_file(source, target)?;
                fs::remove_file(source)
            }
        }
        other => other,
    }
}

/// Copy contents and permissions, then carry the modification time over.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target)?;
    if let Ok(modified) = fs::metadata(source).and_then(|m| m.modified()) {
        fs::OpenOptions::new()
            .write(true)
            .open(target)?
            .set_modified(modified)?;
    }
    Ok(())
}

fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    if target.exists() {
        return Err(io::Error::from(io::ErrorKind::AlreadyExists));
    }
    if target.starts_with(source) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot copy a directory into itself",
        ));
    }
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(source).map_err(io::Error::other)?;
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            copy_file(entry.path(), &dest)?;
        }
    }
    Ok(())
}
