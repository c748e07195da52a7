use std::collections::BTreeMap;

use crate::command::Command;

/// Name → command mapping. Keys are unique; registering an existing name
/// replaces the previous command.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its own name, returning the command it replaced.
    pub fn register(&mut self, command: Box<dyn Command>) -> Option<Box<dyn Command>> {
        let name = command.name().to_string();
        tracing::debug!(command = %name, "registering command");
        self.commands.insert(name, command)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
