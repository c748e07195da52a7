use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use super::{has_flag, operands};
use crate::command::{Command, CommandContext, Output};
use crate::error::{describe_io, ShellError};

pub struct Pwd;

impl Command for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn description(&self) -> &str {
        "Print the current working directory"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Output {
        Output::Text(ctx.session.cwd().display().to_string())
    }
}

pub struct Ls;

struct Entry {
    name: String,
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
}

impl Entry {
    fn read(name: String, path: &Path) -> Self {
        let meta = fs::metadata(path).ok();
        Self {
            name,
            is_dir: meta.as_ref().is_some_and(|m| m.is_dir()),
            size: meta.as_ref().map_or(0, |m| m.len()),
            modified: meta.and_then(|m| m.modified().ok()),
        }
    }

    fn short(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn long(&self) -> String {
        let kind = if self.is_dir { 'd' } else { '-' };
        let when = self
            .modified
            .map(|t| DateTime::<Local>::from(t).format("%b %d %H:%M").to_string())
            .unwrap_or_else(|| "?".repeat(12));
        format!("{kind} {:8} {when} {}", self.size, self.short())
    }
}

impl Command for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn description(&self) -> &str {
        "List directory contents"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let show_hidden = has_flag(args, &["-a", "--all", "-la", "-al"]);
        let long = has_flag(args, &["-l", "-la", "-al"]);
        let target = operands(args).next().unwrap_or(".");
        let dir = match ctx.session.resolve_operand(target) {
            Ok(dir) => dir,
            Err(err) => {
                return Output::Text(format!(
                    "ls: cannot access '{target}': {}",
                    describe_io(&err)
                ));
            }
        };

        let listing = match fs::read_dir(&dir) {
            Ok(listing) => listing,
            Err(_) if dir.is_file() => {
                let entry = Entry::read(target.to_string(), &dir);
                return Output::Text(if long { entry.long() } else { entry.short() });
            }
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Output::Text(format!(
                    "ls: cannot open directory '{target}': Permission denied"
                ));
            }
            Err(err) => {
                return Output::Text(format!(
                    "ls: cannot access '{target}': {}",
                    describe_io(&err)
                ));
            }
        };

        let mut entries: Vec<Entry> = listing
            .filter_map(|e| e.ok())
            .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
            .filter(|(name, _)| show_hidden || !name.starts_with('.'))
            .map(|(name, path)| Entry::read(name, &path))
            .collect();
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

        if long {
            let lines: Vec<String> = entries.iter().map(Entry::long).collect();
            Output::Text(lines.join("\n"))
        } else {
            let names: Vec<String> = entries.iter().map(Entry::short).collect();
            Output::Text(names.join("  "))
        }
    }
}

pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn description(&self) -> &str {
        "Change the current working directory"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let target = match operands(args).next() {
            Some(target) => target.to_string(),
            None => match dirs::home_dir() {
                Some(home) => home.display().to_string(),
                None => return Output::text("cd: HOME not set"),
            },
        };
        match ctx.session.change_dir(&target) {
            Ok(()) => Output::empty(),
            Err(ShellError::NotADirectory(_)) => {
                Output::Text(format!("cd: {target}: Not a directory"))
            }
            Err(ShellError::Io { source, .. }) => {
                Output::Text(format!("cd: {target}: {}", describe_io(&source)))
            }
            Err(other) => Output::Text(format!("cd: {other}")),
        }
    }
}

pub struct Mkdir;

impl Command for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn description(&self) -> &str {
        "Create new directories"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let paths: Vec<&str> = operands(args).collect();
        if paths.is_empty() {
            return Output::text("mkdir: missing operand");
        }
        let parents = has_flag(args, &["-p", "--parents"]);
        let errors: Vec<String> = paths
            .into_iter()
            .filter_map(|path| {
                let result = ctx.session.resolve_operand(path).and_then(|resolved| {
                    if parents {
                        fs::create_dir_all(&resolved)
                    } else {
                        fs::create_dir(&resolved)
                    }
                });
                result.err().map(|err| {
                    format!(
                        "mkdir: cannot create directory '{path}': {}",
                        describe_io(&err)
                    )
                })
            })
            .collect();
        Output::Text(errors.join("\n"))
    }
}

pub struct Rm;

impl Rm {
    fn remove(path: &Path, recursive: bool) -> io::Result<Option<&'static str>> {
        let meta = fs::symlink_metadata(path)?;
        if meta.is_dir() {
            if !recursive {
                return Ok(Some("Is a directory"));
            }
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(None)
    }
}

impl Command for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn description(&self) -> &str {
        "Remove files or directories"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let recursive = has_flag(args, &["-r", "-R", "--recursive", "-rf", "-fr"]);
        let force = has_flag(args, &["-f", "--force", "-rf", "-fr"]);
        let paths: Vec<&str> = operands(args).collect();
        if paths.is_empty() {
            return Output::text("rm: missing operand");
        }

        let mut errors = Vec::new();
        for path in paths {
            let removed = ctx
                .session
                .resolve_operand(path)
                .and_then(|resolved| Self::remove(&resolved, recursive));
            match removed {
                Ok(None) => {}
                Ok(Some(reason)) => errors.push(format!("rm: cannot remove '{path}': {reason}")),
                Err(err) if force && err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    errors.push(format!("rm: cannot remove '{path}': {}", describe_io(&err)))
                }
            }
        }
        Output::Text(errors.join("\n"))
    }
}

pub struct Touch;

fn touch(path: &Path) -> io::Result<()> {
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    file.set_modified(SystemTime::now())
}

impl Command for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn description(&self) -> &str {
        "Create empty files or update file timestamps"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let paths: Vec<&str> = operands(args).collect();
        if paths.is_empty() {
            return Output::text("touch: missing file operand");
        }
        let errors: Vec<String> = paths
            .into_iter()
            .filter_map(|path| {
                ctx.session
                    .resolve_operand(path)
                    .and_then(|resolved| touch(&resolved))
                    .err()
                    .map(|err| format!("touch: cannot touch '{path}': {}", describe_io(&err)))
            })
            .collect();
        Output::Text(errors.join("\n"))
    }
}

pub struct Cat;

impl Command for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn description(&self) -> &str {
        "Concatenate and print files"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let paths: Vec<&str> = operands(args).collect();
        if paths.is_empty() {
            return Output::text("cat: missing file operand");
        }
        let parts: Vec<String> = paths
            .into_iter()
            .map(|path| {
                let resolved = match ctx.session.resolve_operand(path) {
                    Ok(resolved) => resolved,
                    Err(err) => return format!("cat: {path}: {}", describe_io(&err)),
                };
                if resolved.is_dir() {
                    return format!("cat: {path}: Is a directory");
                }
                match fs::read_to_string(&resolved) {
                    Ok(mut content) => {
                        if content.ends_with('\n') {
                            content.pop();
                        }
                        content
                    }
                    Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                        format!("cat: {path}: Binary file")
                    }
                    Err(err) => format!("cat: {path}: {}", describe_io(&err)),
                }
            })
            .collect();
        Output::Text(parts.join("\n"))
    }
}
