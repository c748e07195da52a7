use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{}: {}", .path.display(), describe_io(.source))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: Not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{0}: command not found")]
    UnknownCommand(String),

    #[error("Cannot use '{0}': contains a NUL byte")]
    Unquotable(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;

impl ShellError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Short, shell-style description of an I/O error (`No such file or directory`).
///
/// The platform message is kept but the trailing `(os error N)` is dropped so
/// diagnostics read like coreutils output.
pub fn describe_io(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::AlreadyExists => "File exists".to_string(),
        _ => {
            let text = err.to_string();
            match text.split_once(" (os error") {
                Some((head, _)) => head.to_string(),
                None => text,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_io_uses_coreutils_wording() {
        let err = io::Error::new(io::ErrorKind::NotFound, "whatever");
        assert_eq!(describe_io(&err), "No such file or directory");

        let err = io::Error::from_raw_os_error(20);
        assert!(!describe_io(&err).contains("os error"));
    }

    #[test]
    fn io_error_display_names_the_path() {
        let err = ShellError::io(
            "missing.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.to_string(), "missing.txt: Permission denied");
    }
}
