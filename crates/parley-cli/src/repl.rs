//! The interactive shell and the non-interactive script runner.
//!
//! By default we use `rustyline` for line editing and tab completion.
//! A minimal stdin-based fallback exists behind `--no-default-features`.

use std::fs;
use std::io::{self, Read};
#[cfg(not(feature = "repl-rustyline"))]
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use colored::Colorize;
use parley_shell::{Output, Session, Shell};

#[cfg(feature = "repl-rustyline")]
const INTERRUPT_HINT: &str = "Use 'exit' to quit the terminal.";
#[cfg(not(feature = "repl-rustyline"))]
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

enum ReplControl {
    Continue,
    Clear,
    Exit,
}

/// Print a command's output and tell the loop what to do next.
fn present(output: Output) -> ReplControl {
    match output {
        Output::Exit => ReplControl::Exit,
        Output::Clear => ReplControl::Clear,
        Output::Text(text) => {
            if !text.is_empty() {
                println!("{text}");
            }
            ReplControl::Continue
        }
    }
}

fn banner() {
    println!("{}", "Parley Terminal".green().bold());
    println!(
        "Type 'help' for a list of commands, 'nlp help' for natural language examples, 'exit' to quit.\n"
    );
}

pub fn cmd_repl(shell: Shell, session: Session) -> Result<()> {
    #[cfg(feature = "repl-rustyline")]
    {
        cmd_repl_rustyline(shell, session)
    }
    #[cfg(not(feature = "repl-rustyline"))]
    {
        cmd_repl_simple(shell, session)
    }
}

/// Read script lines (from a file or `-` for stdin) followed by the `-c`
/// lines, and run them in order.
pub fn cmd_exec(
    shell: &Shell,
    mut session: Session,
    script: Option<&PathBuf>,
    commands: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(script_path) = script {
        let read = if script_path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        } else {
            fs::read_to_string(script_path)
        };
        match read {
            Ok(text) => lines.extend(text.lines().map(str::to_string)),
            Err(e) if continue_on_error => {
                eprintln!(
                    "{} cannot read script {}: {e}",
                    "error:".red().bold(),
                    script_path.display()
                );
            }
            Err(e) => {
                return Err(anyhow!("cannot read script {}: {e}", script_path.display()));
            }
        }
    }

    lines.extend(commands.iter().cloned());

    for raw_line in &lines {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !quiet {
            println!("parley> {line}");
        }
        match present(shell.execute_line(&mut session, line)) {
            ReplControl::Continue | ReplControl::Clear => {}
            ReplControl::Exit => break,
        }
    }

    Ok(())
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_repl_simple(shell: Shell, mut session: Session) -> Result<()> {
    banner();

    let stdin = io::stdin();
    loop {
        print!("{}", session.prompt());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            println!("\nGoodbye!");
            break;
        }

        match present(shell.execute_line(&mut session, line.trim_end_matches(['\r', '\n']))) {
            ReplControl::Continue => {}
            ReplControl::Clear => {
                print!("{CLEAR_SCREEN}");
                io::stdout().flush()?;
            }
            ReplControl::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_repl_rustyline(shell: Shell, mut session: Session) -> Result<()> {
    use std::sync::{Arc, RwLock};

    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    banner();

    let shell = Arc::new(shell);
    let view = Arc::new(RwLock::new(CompletionView::of(&session)));
    let helper = ReplLineHelper::new(shell.clone(), view.clone());
    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(helper));

    loop {
        // `cd` and `autocomplete` change what completion should offer.
        if let Ok(mut guard) = view.write() {
            *guard = CompletionView::of(&session);
        }

        let line = match rl.readline(&session.prompt()) {
            Ok(l) => l,
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(ReadlineError::Interrupted) => {
                println!("\n{INTERRUPT_HINT}");
                continue;
            }
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        if !line.trim().is_empty() {
            rl.add_history_entry(line.as_str())
                .map_err(|e| anyhow!("failed to record history: {e}"))?;
        }

        match present(shell.execute_line(&mut session, &line)) {
            ReplControl::Continue => {}
            ReplControl::Clear => {
                if let Err(e) = rl.clear_screen() {
                    eprintln!("{} {e}", "error:".red().bold());
                }
            }
            ReplControl::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}

/// The parts of a session that completion looks at, copied out after every
/// command so the helper never borrows the live session.
#[cfg(feature = "repl-rustyline")]
#[derive(Debug, Clone)]
struct CompletionView {
    cwd: PathBuf,
    enabled: bool,
}

#[cfg(feature = "repl-rustyline")]
impl CompletionView {
    fn of(session: &Session) -> Self {
        Self {
            cwd: session.cwd().to_path_buf(),
            enabled: session.completion_enabled,
        }
    }

    fn session(&self) -> Session {
        let mut session = Session::new(&self.cwd);
        session.completion_enabled = self.enabled;
        session
    }
}

#[cfg(feature = "repl-rustyline")]
struct ReplLineHelper {
    shell: std::sync::Arc<Shell>,
    view: std::sync::Arc<std::sync::RwLock<CompletionView>>,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new(
        shell: std::sync::Arc<Shell>,
        view: std::sync::Arc<std::sync::RwLock<CompletionView>>,
    ) -> Self {
        Self { shell, view }
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::Helper for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::highlight::Highlighter for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::hint::Hinter for ReplLineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::validate::Validator for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);

        let Ok(view) = self.view.read() else {
            return Ok((start, Vec::new()));
        };
        let session = view.session();
        let pairs = parley_shell::completion::complete(&self.shell, &session, before)
            .into_iter()
            .map(|candidate| rustyline::completion::Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}
