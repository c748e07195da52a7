use crate::command::{Command, CommandContext, Output};

pub struct History;

impl Command for History {
    fn name(&self) -> &str {
        "history"
    }

    fn description(&self) -> &str {
        "Display command history"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let history = ctx.session.history();
        let skip = args
            .first()
            .and_then(|a| a.parse::<usize>().ok())
            .map_or(0, |n| history.len().saturating_sub(n));
        let lines: Vec<String> = history
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, line)| format!("{:4}  {line}", i + 1))
            .collect();
        Output::Text(lines.join("\n"))
    }
}

pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &str {
        "clear"
    }

    fn description(&self) -> &str {
        "Clear the terminal screen"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &[String]) -> Output {
        Output::Clear
    }
}

pub struct Exit;

impl Command for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    fn description(&self) -> &str {
        "Exit the terminal"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &[String]) -> Output {
        Output::Exit
    }
}

pub struct Help;

impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Display help information for commands"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let registry = ctx.shell.registry();
        match args.first() {
            None => {
                let mut text = String::from("Available commands:\n");
                for name in registry.names() {
                    text.push_str("  ");
                    text.push_str(name);
                    text.push('\n');
                }
                text.push_str("\nType 'help <command>' for more information on a specific command.");
                Output::Text(text)
            }
            Some(name) => match registry.get(name) {
                Some(command) => Output::Text(command.help()),
                None => Output::Text(format!("Unknown command: {name}")),
            },
        }
    }
}

pub struct Autocomplete;

impl Command for Autocomplete {
    fn name(&self) -> &str {
        "autocomplete"
    }

    fn description(&self) -> &str {
        "Toggle auto-completion functionality"
    }

    fn help(&self) -> String {
        "autocomplete: Toggle auto-completion functionality. Usage: autocomplete [on|off]"
            .to_string()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let enabled = match args.first().map(|a| a.to_lowercase()) {
            None => !ctx.session.completion_enabled,
            Some(arg) => match arg.as_str() {
                "on" | "enable" | "true" | "1" => true,
                "off" | "disable" | "false" | "0" => false,
                _ => return Output::text("Invalid argument. Use 'on' or 'off'."),
            },
        };
        ctx.session.completion_enabled = enabled;
        let state = if enabled { "enabled" } else { "disabled" };
        Output::Text(format!("Auto-completion is now {state}"))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Output, Session, Shell};

    #[test]
    fn history_is_numbered_and_can_be_limited() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        shell.execute_line(&mut session, "echo one");
        shell.execute_line(&mut session, "echo two");

        assert_eq!(
            shell.execute_line(&mut session, "history"),
            Output::text("   1  echo one\n   2  echo two\n   3  history")
        );
        assert_eq!(
            shell.execute_line(&mut session, "history 2"),
            Output::text("   3  history\n   4  history 2")
        );
    }

    #[test]
    fn signals_are_variants() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        assert_eq!(shell.execute_line(&mut session, "exit"), Output::Exit);
        assert_eq!(shell.execute_line(&mut session, "clear"), Output::Clear);
    }

    #[test]
    fn help_lists_sorted_names_or_one_command() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        let listing = shell.execute_line(&mut session, "help");
        let text = listing.as_text().unwrap_or_default();
        assert!(text.starts_with("Available commands:\n  autocomplete\n  cat\n"));
        assert!(text.ends_with("for more information on a specific command."));

        assert_eq!(
            shell.execute_line(&mut session, "help mkdir"),
            Output::text("mkdir: Create new directories")
        );
        assert_eq!(
            shell.execute_line(&mut session, "help frob"),
            Output::text("Unknown command: frob")
        );
    }

    #[test]
    fn autocomplete_toggles_the_session_flag() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        assert_eq!(
            shell.execute_line(&mut session, "autocomplete"),
            Output::text("Auto-completion is now enabled")
        );
        assert!(session.completion_enabled);
        assert_eq!(
            shell.execute_line(&mut session, "autocomplete OFF"),
            Output::text("Auto-completion is now disabled")
        );
        assert!(!session.completion_enabled);
        assert_eq!(
            shell.execute_line(&mut session, "autocomplete maybe"),
            Output::text("Invalid argument. Use 'on' or 'off'.")
        );
    }
}
