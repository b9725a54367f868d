//! Language resolution for run blocks.
//!
//! A run block has no language of its own. Each [`ShellResolver`] watches for
//! one language's declaration values; the declaration must have been seen in
//! the same step before the run block's header. Declarations are kept in a
//! side table keyed by the owning step and dropped when that step closes.

use std::collections::HashMap;

use crate::grammar::{EmbedRule, ShellLanguage};

use super::{
    context::ContextId,
    types::{BlockClaim, Embedding},
};

/// A `shell:` (or equivalent) value seen inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub line: usize,
    pub value: String,
}

/// Most recent declaration per open step.
#[derive(Debug, Default)]
pub struct PendingDeclarations {
    by_step: HashMap<ContextId, Declaration>,
}

impl PendingDeclarations {
    /// Records a declaration; a later one in the same step replaces it.
    pub fn record(&mut self, step: ContextId, declaration: Declaration) {
        self.by_step.insert(step, declaration);
    }

    pub fn get(&self, step: ContextId) -> Option<&Declaration> {
        self.by_step.get(&step)
    }

    pub fn clear(&mut self, step: ContextId) {
        self.by_step.remove(&step);
    }

}

/// Claims run blocks for one candidate language.
#[derive(Debug, Clone, Copy)]
pub struct ShellResolver<'g> {
    language: &'g ShellLanguage,
}

impl<'g> ShellResolver<'g> {
    pub fn new(language: &'g ShellLanguage) -> Self {
        Self { language }
    }

    /// One resolver per configured language; none for fixed-key rules.
    pub fn for_rule(rule: &'g EmbedRule) -> Vec<Self> {
        match rule {
            EmbedRule::ShellDeclared { languages, .. } => languages.iter().map(Self::new).collect(),
            EmbedRule::FixedKey { .. } => Vec::new(),
        }
    }

    /// Exact, case-sensitive match against the accepted values.
    pub fn accepts(&self, value: &str) -> bool {
        self.language.shells.iter().any(|s| s == value)
    }

    pub fn claim(&self, declaration: &Declaration) -> Option<Embedding> {
        if !self.accepts(&declaration.value) {
            return None;
        }
        Some(Embedding {
            language: self.language.language.clone(),
            claim: BlockClaim::Declaration {
                resolver: self.language.name.clone(),
                shell: declaration.value.clone(),
                line: declaration.line,
            },
        })
    }
}

/// The first resolver that accepts the declaration wins. With disjoint value
/// sets at most one can.
pub fn resolve(
    resolvers: &[ShellResolver<'_>],
    declaration: Option<&Declaration>,
) -> Option<Embedding> {
    let declaration = declaration?;
    resolvers.iter().find_map(|r| r.claim(declaration))
}
