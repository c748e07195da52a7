use parley_shell::{Command, CommandContext, Output};

use crate::adapters;
use crate::engine::{Resolution, Resolver};
use crate::intents::{examples_text, standard_table, Intent};
use crate::table::PatternTable;
use crate::template::PatternError;

/// The `nlp` command: resolve the arguments as one English sentence.
pub struct NlCommand {
    resolver: Resolver<Intent>,
}

impl NlCommand {
    pub const NAME: &'static str = "nlp";

    /// With the standard phrasings.
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_table(standard_table()?))
    }

    pub fn with_table(table: PatternTable<Intent>) -> Self {
        Self {
            resolver: Resolver::new(table),
        }
    }

    pub fn resolver(&self) -> &Resolver<Intent> {
        &self.resolver
    }
}

impl Command for NlCommand {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Process natural language commands"
    }

    fn help(&self) -> String {
        "nlp: Process natural language commands. Type 'nlp help' for examples.".to_string()
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let utterance = args.join(" ");
        match self.resolver.resolve(&utterance) {
            Resolution::Examples => Output::Text(examples_text()),
            Resolution::Matched(hit) => {
                let action = adapters::plan(*hit.handler, &hit.slots, ctx.shell, ctx.session);
                tracing::debug!(intent = %hit.handler, ?action, "planned");
                adapters::perform(action, ctx)
            }
            other => Output::Text(other.message().unwrap_or_default()),
        }
    }
}
