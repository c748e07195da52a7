//! Per-caller interpreter state.
//!
//! A [`Session`] is what used to be process-wide in a classic shell: the
//! working directory and the command history. Every command receives the
//! caller's session explicitly, so two callers (two browser tabs, two
//! scripts) never observe each other's `cd`.

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ShellError};

/// Lines kept in a session's history; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct Session {
    cwd: PathBuf,
    history: Vec<String>,
    /// Whether tab completion offers candidates (`autocomplete on|off`).
    pub completion_enabled: bool,
}

impl Session {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            history: Vec::new(),
            completion_enabled: false,
        }
    }

    /// A session rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| ShellError::io(".", e))?;
        Ok(Self::new(cwd))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a user-supplied path against this session.
    ///
    /// `~` and `~/...` expand to the home directory; absolute paths are kept;
    /// everything else is joined onto the session working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let mut components = path.components();
        if let Some(Component::Normal(first)) = components.next() {
            if first == "~" {
                if let Some(home) = dirs::home_dir() {
                    return home.join(components.as_path());
                }
            }
        }
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// [`resolve`](Self::resolve) for a command operand. An empty operand
    /// names no file (`rm ''` fails with ENOENT) rather than the working
    /// directory.
    pub fn resolve_operand(&self, operand: &str) -> io::Result<PathBuf> {
        if operand.is_empty() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(self.resolve(operand))
    }

    /// Change the working directory. The target must exist and be a directory;
    /// the stored path is canonical.
    pub fn change_dir(&mut self, target: impl AsRef<Path>) -> Result<()> {
        let resolved = self.resolve(target);
        let meta = fs::metadata(&resolved).map_err(|e| ShellError::io(&resolved, e))?;
        if !meta.is_dir() {
            return Err(ShellError::NotADirectory(resolved));
        }
        let canonical = fs::canonicalize(&resolved).map_err(|e| ShellError::io(&resolved, e))?;
        tracing::debug!(cwd = %canonical.display(), "changed directory");
        self.cwd = canonical;
        Ok(())
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn record(&mut self, line: &str) {
        self.history.push(line.to_string());
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// `user@host:cwd$ ` with the home directory shown as `~`.
    pub fn prompt(&self) -> String {
        let user = env::var("USER")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "user".to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        format!("{user}@{host}:{}$ ", self.display_cwd())
    }

    fn display_cwd(&self) -> String {
        if let Some(home) = dirs::home_dir() {
            if let Ok(rest) = self.cwd.strip_prefix(&home) {
                if rest.as_os_str().is_empty() {
                    return "~".to_string();
                }
                return format!("~/{}", rest.display());
            }
        }
        self.cwd.display().to_string()
    }
}
