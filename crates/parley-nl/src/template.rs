//! The phrase template language.
//!
//! A template is a sequence of whitespace-separated items:
//!
//! | item          | meaning                                        |
//! |---------------|------------------------------------------------|
//! | `word`        | literal word                                   |
//! | `(a\|b c)`    | one of the phrases (required)                  |
//! | `[a\|b]`      | one of the phrases, or nothing                 |
//! | `{name}`      | slot: words, dots, slashes, dashes (non-empty) |
//! | `{name?}`     | same, may be empty                             |
//! | `{name*}`     | free text, anything to the end                 |
//!
//! Templates compile to one case-insensitive regular expression that is
//! searched for anywhere in the utterance. Each item after the first owns
//! the single space in front of it, so an absent optional item leaves no
//! gap behind.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

/// Characters a path-like slot may contain.
const SLOT_CLASS: &str = r"[\w\s./\\-]";

pub const MAX_SLOTS: usize = 2;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("unbalanced '{bracket}' in pattern '{template}'")]
    Unbalanced { template: String, bracket: char },

    #[error("empty alternative in pattern '{0}'")]
    EmptyAlternative(String),

    #[error("invalid slot '{{{slot}}}' in pattern '{template}'")]
    UnknownSlot { template: String, slot: String },

    #[error("pattern '{template}' has {count} slots (at most 2 allowed)")]
    TooManySlots { template: String, count: usize },

    #[error("pattern regex failed to build: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Required,
    Optional,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Word(String),
    Choice { phrases: Vec<String>, optional: bool },
    Slot { name: String, kind: SlotKind },
}

impl Item {
    fn fragment(&self, first: bool) -> String {
        let sep = if first { "" } else { " " };
        match self {
            Item::Word(word) => format!("{sep}{}", regex::escape(word)),
            Item::Choice { phrases, optional } => {
                let alts = phrases
                    .iter()
                    .map(|p| regex::escape(p))
                    .collect::<Vec<_>>()
                    .join("|");
                if *optional {
                    format!("(?:{sep}(?:{alts}))?")
                } else {
                    format!("{sep}(?:{alts})")
                }
            }
            Item::Slot { kind, .. } => match kind {
                SlotKind::Required => format!("{sep}({SLOT_CLASS}+)"),
                SlotKind::Optional if first => format!("({SLOT_CLASS}*)"),
                SlotKind::Optional => format!(" ?({SLOT_CLASS}*)"),
                SlotKind::FreeText => format!("{sep}(.*)"),
            },
        }
    }
}

/// A compiled phrase template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    slots: Vec<(String, SlotKind)>,
    regex: Regex,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let items = parse_items(source)?;
        if items.is_empty() {
            return Err(PatternError::Empty);
        }

        let slots: Vec<(String, SlotKind)> = items
            .iter()
            .filter_map(|item| match item {
                Item::Slot { name, kind } => Some((name.clone(), *kind)),
                _ => None,
            })
            .collect();
        if slots.len() > MAX_SLOTS {
            return Err(PatternError::TooManySlots {
                template: source.to_string(),
                count: slots.len(),
            });
        }

        let mut pattern = String::from("(?i)");
        for (i, item) in items.iter().enumerate() {
            pattern.push_str(&item.fragment(i == 0));
        }
        let regex = Regex::new(&pattern)?;

        Ok(Self {
            source: source.to_string(),
            slots,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of slots (0, 1 or 2).
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    pub fn slot_kinds(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.slots.iter().map(|(_, kind)| *kind)
    }

    /// The generated regular expression, for diagnostics.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Slot values left to right if the template occurs anywhere in `text`.
    /// A slot that took part in no match is returned as `""`.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        Some(
            (1..=self.arity())
                .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

impl FromStr for Template {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_items(source: &str) -> Result<Vec<Item>, PatternError> {
    let unbalanced = |bracket| PatternError::Unbalanced {
        template: source.to_string(),
        bracket,
    };

    let mut items = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | '[' | '{' => {
                let close = match c {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                };
                chars.next();
                let mut body = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == close {
                        closed = true;
                        break;
                    }
                    if matches!(inner, '(' | '[' | '{' | ')' | ']' | '}') {
                        return Err(unbalanced(inner));
                    }
                    body.push(inner);
                }
                if !closed {
                    return Err(unbalanced(c));
                }
                items.push(if c == '{' {
                    parse_slot(source, &body)?
                } else {
                    parse_choice(source, &body, c == '[')?
                });
            }
            ')' | ']' | '}' => return Err(unbalanced(c)),
            _ => {
                let mut end = start;
                while let Some(&(idx, w)) = chars.peek() {
                    if w.is_whitespace() || "()[]{}".contains(w) {
                        break;
                    }
                    end = idx + w.len_utf8();
                    chars.next();
                }
                items.push(Item::Word(source[start..end].to_string()));
            }
        }
    }
    Ok(items)
}

fn parse_choice(source: &str, body: &str, optional: bool) -> Result<Item, PatternError> {
    let phrases: Vec<String> = body
        .split('|')
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    if phrases.iter().any(String::is_empty) {
        return Err(PatternError::EmptyAlternative(source.to_string()));
    }
    Ok(Item::Choice { phrases, optional })
}

fn parse_slot(source: &str, body: &str) -> Result<Item, PatternError> {
    let (name, kind) = match body.strip_suffix('?') {
        Some(name) => (name, SlotKind::Optional),
        None => match body.strip_suffix('*') {
            Some(name) => (name, SlotKind::FreeText),
            None => (body, SlotKind::Required),
        },
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PatternError::UnknownSlot {
            template: source.to_string(),
            slot: body.to_string(),
        });
    }
    Ok(Item::Slot {
        name: name.to_string(),
        kind,
    })
}
