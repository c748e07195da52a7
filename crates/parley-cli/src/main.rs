//! Parley CLI
//!
//! A small shell that also accepts plain English:
//! - `parley` / `parley repl`: interactive session with line editing
//! - `parley exec`: run lines from `-c` and/or a script, non-interactively
//! - `parley serve`: browser terminal over HTTP, one session per token

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use parley_shell::{Session, Shell};
use tracing_subscriber::EnvFilter;

mod repl;
mod server;

/// Default listen address for `serve`, overridden by `--listen`.
const LISTEN_ENV: &str = "PARLEY_LISTEN";
/// Log filter, overridden by `--log-level`.
const LOG_ENV: &str = "PARLEY_LOG";
const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Parley: a command shell that also understands plain English")]
struct Cli {
    /// Log filter (e.g. `debug`, `parley_nl=trace`). Logs go to stderr.
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    /// Starting working directory (defaults to the current directory).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (the default).
    Repl {
        /// Start with tab completion switched on (`autocomplete on`).
        #[arg(long)]
        autocomplete: bool,
    },

    /// Run command lines non-interactively.
    ///
    /// Lines from `--script` run first, then each `-c` in order. Blank lines
    /// and lines starting with `#` are skipped.
    Exec {
        /// Script file, one command per line. Use `-` to read from stdin.
        #[arg(long)]
        script: Option<PathBuf>,
        /// One command line (may be repeated).
        #[arg(short = 'c', long = "cmd", value_name = "LINE")]
        cmd: Vec<String>,
        /// Keep going when the script cannot be read.
        #[arg(long)]
        continue_on_error: bool,
        /// Do not echo lines before running them.
        #[arg(long)]
        quiet: bool,
    },

    /// Serve the browser terminal over HTTP.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address (default `$PARLEY_LISTEN`, else `127.0.0.1:8080`; use port 0 to auto-pick).
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// If set, write a small JSON file once the server is listening.
    ///
    /// Useful for scripts/tests to learn the chosen port when `--listen ...:0`.
    #[arg(long)]
    ready_file: Option<PathBuf>,

    /// Maximum live sessions; the least recently used one is dropped beyond this.
    #[arg(long, default_value_t = 256)]
    max_sessions: usize,
}

fn init_logging(level: Option<&str>) {
    let spec = level
        .map(str::to_string)
        .or_else(|| env::var(LOG_ENV).ok())
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn initial_session(dir: Option<&PathBuf>) -> Result<Session> {
    let mut session =
        Session::from_current_dir().map_err(|e| anyhow!("failed to read working directory: {e}"))?;
    if let Some(dir) = dir {
        session
            .change_dir(dir)
            .map_err(|e| anyhow!("--dir {}: {e}", dir.display()))?;
    }
    Ok(session)
}

fn build_shell() -> Result<Shell> {
    parley_nl::build_shell().map_err(|e| anyhow!("failed to compile phrase table: {e}"))
}

fn resolve_listen(flag: Option<SocketAddr>) -> Result<SocketAddr> {
    if let Some(addr) = flag {
        return Ok(addr);
    }
    let raw = env::var(LISTEN_ENV).unwrap_or_else(|_| DEFAULT_LISTEN.to_string());
    raw.parse()
        .map_err(|e| anyhow!("invalid listen address `{raw}` (from {LISTEN_ENV}): {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let shell = build_shell()?;
    let session = initial_session(cli.dir.as_ref())?;
    tracing::debug!(commands = shell.registry().len(), cwd = %session.cwd().display(), "shell ready");

    match cli.command.unwrap_or(Commands::Repl {
        autocomplete: false,
    }) {
        Commands::Repl { autocomplete } => {
            let mut session = session;
            session.completion_enabled = autocomplete;
            repl::cmd_repl(shell, session)?;
        }
        Commands::Exec {
            script,
            cmd,
            continue_on_error,
            quiet,
        } => {
            repl::cmd_exec(&shell, session, script.as_ref(), &cmd, continue_on_error, quiet)?;
        }
        Commands::Serve(args) => {
            let config = server::ServerConfig {
                listen: resolve_listen(args.listen)?,
                ready_file: args.ready_file,
                max_sessions: args.max_sessions.max(1),
                start_dir: session.cwd().to_path_buf(),
            };
            server::cmd_serve(shell, config)?;
        }
    }

    Ok(())
}
