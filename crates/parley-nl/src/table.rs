use crate::template::{PatternError, Template};

/// One registered template and the handler it is bound to.
#[derive(Debug, Clone)]
pub struct Pattern<H> {
    template: Template,
    handler: H,
}

impl<H> Pattern<H> {
    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn arity(&self) -> usize {
        self.template.arity()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// The result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t, H> {
    /// Position of the pattern in registration order.
    pub index: usize,
    pub handler: &'t H,
    /// Extracted slot values, left to right.
    pub slots: Vec<String>,
}

/// An ordered list of patterns. The first pattern that matches wins.
///
/// Registration only appends: there is no deduplication and no conflict
/// detection. A pattern placed after a broader one that accepts the same
/// input is unreachable for that input, so narrower phrasings go first.
#[derive(Debug, Clone)]
pub struct PatternTable<H> {
    patterns: Vec<Pattern<H>>,
}

impl<H> Default for PatternTable<H> {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }
}

impl<H> PatternTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `template` and append it, bound to `handler`.
    pub fn register(&mut self, template: &str, handler: H) -> Result<&mut Self, PatternError> {
        let template = Template::compile(template)?;
        self.patterns.push(Pattern { template, handler });
        Ok(self)
    }

    pub fn find(&self, utterance: &str) -> Option<Match<'_, H>> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(index, pattern)| {
                pattern.template.captures(utterance).map(|slots| Match {
                    index,
                    handler: &pattern.handler,
                    slots,
                })
            })
    }

    pub fn patterns(&self) -> &[Pattern<H>] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
