//! The standard English phrasings and what they mean.

use std::fmt;

use crate::table::PatternTable;
use crate::template::PatternError;

/// What a recognized utterance asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    CreateDirectory,
    CreateFile,
    ListDirectory,
    ShowFile,
    Remove,
    Move,
    Rename,
    Copy,
    ChangeDirectory,
    ListProcesses,
    ResourceUsage,
    DiskUsage,
    CurrentDirectory,
    History,
    ListCommands,
    CommandHelp,
    Exit,
    Clear,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::CreateDirectory => "create-directory",
            Intent::CreateFile => "create-file",
            Intent::ListDirectory => "list-directory",
            Intent::ShowFile => "show-file",
            Intent::Remove => "remove",
            Intent::Move => "move",
            Intent::Rename => "rename",
            Intent::Copy => "copy",
            Intent::ChangeDirectory => "change-directory",
            Intent::ListProcesses => "list-processes",
            Intent::ResourceUsage => "resource-usage",
            Intent::DiskUsage => "disk-usage",
            Intent::CurrentDirectory => "current-directory",
            Intent::History => "history",
            Intent::ListCommands => "list-commands",
            Intent::CommandHelp => "command-help",
            Intent::Exit => "exit",
            Intent::Clear => "clear",
        }
    }

    /// Slots this intent cannot act without, in template order.
    pub fn required_slots(self) -> &'static [&'static str] {
        match self {
            Intent::CreateDirectory | Intent::CreateFile => &["name"],
            Intent::ShowFile => &["file"],
            Intent::Remove => &["target"],
            Intent::Move | Intent::Rename | Intent::Copy => &["source", "destination"],
            Intent::ChangeDirectory => &["directory"],
            _ => &[],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration order matters: the first match wins, so the system family
/// sits ahead of the broad `display {file}` phrasing and the "current
/// directory" listing ahead of the general listing.
const STANDARD_PATTERNS: &[(&str, Intent)] = &[
    // files and directories
    ("(create|make) [a] [new] (directory|folder) [called|named] {name}", Intent::CreateDirectory),
    ("(create|touch) [a] [new] [empty] file [called|named] {name}", Intent::CreateFile),
    ("(show|list) [the] (files|contents) [in|of] [the] current (directory|folder)", Intent::ListDirectory),
    ("(show|list) [the] (files|contents) [in|of] [the] [directory|folder] {directory?}", Intent::ListDirectory),
    ("what (files|directories) are (in|inside) {directory?}", Intent::ListDirectory),
    // system
    ("(show|display|list) [running] processes", Intent::ListProcesses),
    ("(show|display) [system] [resource] usage", Intent::ResourceUsage),
    ("(show|display) (disk|storage) (usage|space|info)", Intent::DiskUsage),
    ("(what|where) is [my] current (directory|folder|location)", Intent::CurrentDirectory),
    ("(show|display) [command] history", Intent::History),
    ("(show|list|display) [available] commands", Intent::ListCommands),
    // file contents and manipulation
    ("show [me] [the] (content|contents) of [file] {file}", Intent::ShowFile),
    ("(read|cat|display|print) [file] {file}", Intent::ShowFile),
    ("(delete|remove) [file|directory|folder] {target}", Intent::Remove),
    ("move [file|directory|folder] {source} to [directory|folder] {destination}", Intent::Move),
    ("rename [file|directory|folder] {source} to {destination}", Intent::Rename),
    ("copy [file|directory|folder] {source} to [directory|folder] {destination}", Intent::Copy),
    // navigation
    ("change [to] (directory|folder|dir) {directory}", Intent::ChangeDirectory),
    ("(go|navigate) to [directory|folder|dir] {directory}", Intent::ChangeDirectory),
    ("cd [to] {directory}", Intent::ChangeDirectory),
    // terminal
    ("(how to|help with|help) {topic*}", Intent::CommandHelp),
    ("(exit|quit|close) (terminal|program|application)", Intent::Exit),
    ("clear [the] (screen|terminal)", Intent::Clear),
];

pub const EXAMPLES: &[&str] = &[
    "create a new folder called Projects",
    "make a new directory named Backup",
    "create a new file called notes.txt",
    "show files in Downloads",
    "list contents of the current directory",
    "what files are in Documents",
    "show content of file.txt",
    "read config.ini",
    "delete file temp.txt",
    "remove directory OldStuff",
    "move file report.pdf to Documents",
    "rename file old.txt to new.txt",
    "copy file important.docx to Backup",
    "change to directory Projects",
    "go to Documents",
    "show running processes",
    "display system usage",
    "show disk space",
    "where is my current location",
    "show command history",
    "list available commands",
    "how to use mkdir",
    "clear the screen",
    "exit terminal",
];

/// The built-in table, compiled.
pub fn standard_table() -> Result<PatternTable<Intent>, PatternError> {
    let mut table = PatternTable::new();
    for (template, intent) in STANDARD_PATTERNS {
        table.register(template, *intent)?;
    }
    Ok(table)
}

pub fn examples_text() -> String {
    let mut text = String::from("Natural Language Command Examples:");
    for example in EXAMPLES {
        text.push_str("\n  - ");
        text.push_str(example);
    }
    text
}
