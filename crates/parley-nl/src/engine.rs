use crate::table::{Match, PatternTable};

/// Utterances that bring up the examples listing instead of the table.
pub const HELP_KEYWORDS: &[&str] = &["help", "examples"];

pub const NEED_INPUT: &str =
    "Please enter a natural language command. Type 'nlp help' for examples.";

pub fn not_understood(utterance: &str) -> String {
    format!("I don't understand '{utterance}'. Type 'nlp help' for examples of commands I understand.")
}

/// Outcome of resolving one utterance. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'t, H> {
    NeedInput,
    Examples,
    Matched(Match<'t, H>),
    NotUnderstood(String),
}

impl<H> Resolution<'_, H> {
    /// Text for the outcomes that do not involve a handler.
    pub fn message(&self) -> Option<String> {
        match self {
            Resolution::NeedInput => Some(NEED_INPUT.to_string()),
            Resolution::NotUnderstood(utterance) => Some(not_understood(utterance)),
            Resolution::Examples | Resolution::Matched(_) => None,
        }
    }
}

/// Resolves free text against a fixed pattern table.
///
/// The resolver does no I/O; it only decides which handler applies and with
/// which slot values.
#[derive(Debug, Clone)]
pub struct Resolver<H> {
    table: PatternTable<H>,
}

impl<H> Resolver<H> {
    pub fn new(table: PatternTable<H>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PatternTable<H> {
        &self.table
    }

    pub fn resolve(&self, utterance: &str) -> Resolution<'_, H> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Resolution::NeedInput;
        }
        if HELP_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(utterance)) {
            return Resolution::Examples;
        }
        match self.table.find(utterance) {
            Some(hit) => {
                tracing::debug!(
                    pattern = hit.index,
                    template = %self.table.patterns()[hit.index].template(),
                    slots = ?hit.slots,
                    "resolved utterance"
                );
                Resolution::Matched(hit)
            }
            None => {
                tracing::debug!(%utterance, "no pattern matched");
                Resolution::NotUnderstood(utterance.to_string())
            }
        }
    }
}
