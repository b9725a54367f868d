use log::{debug, trace};

use crate::{
    document::LineRange,
    grammar::{EmbedRule, Grammar},
};

use super::{
    classify::LineClass,
    context::{
        BlockContext, Context, ContextStack, NestedKeyContext, Qualification, StepContext,
        Terminator,
    },
    kinds::{ActionRef, BlockScalarHeader, read_scalar, scalar::strip_comment},
    resolver::{Declaration, PendingDeclarations, ShellResolver, resolve},
    types::{BlockClaim, EmbeddedBlock, Embedding, NestedKeyFact, ScanReport, StepFact},
};

/// Key holding a step's action reference.
pub const USES_KEY: &str = "uses";

/// Drives one pass over a document for one grammar.
///
/// Each line is offered to the innermost open context first, then to the
/// closing conditions of its parents, then to the matchers that may open new
/// contexts, in nesting order.
pub struct RegionBuilder<'g> {
    grammar: &'g Grammar,
    resolvers: Vec<ShellResolver<'g>>,
    stack: ContextStack,
    pending: PendingDeclarations,
    out: ScanReport,
}

impl<'g> RegionBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            resolvers: ShellResolver::for_rule(&grammar.embed),
            stack: ContextStack::default(),
            pending: PendingDeclarations::default(),
            out: ScanReport::default(),
        }
    }

    pub fn push(&mut self, c: &LineClass<'_>) {
        if let Some(block) = self.stack.block_mut()
            && !block.terminator.ends(c)
        {
            block.absorb(c.number);
            return;
        }

        if let Some(depth) = self.outermost_ended(c) {
            self.close_to(depth);
        }

        if self.stack.is_empty() {
            self.try_open_step(c);
        }
        if self.stack.step().is_none() {
            return;
        }

        self.note_sibling_key(c);
        if self.try_open_nested_key(c) {
            return;
        }
        self.try_open_block(c);
    }

    pub fn finish(mut self) -> ScanReport {
        // EOF: unterminated contexts extend to the last line.
        self.close_to(0);
        debug!(
            "{}: {} qualifying steps, {} embedded blocks",
            self.grammar.name,
            self.out.steps.len(),
            self.out.blocks.len()
        );
        self.out
    }

    /// Depth of the outermost context whose closing condition matches.
    fn outermost_ended(&self, c: &LineClass<'_>) -> Option<usize> {
        (0..self.stack.depth()).find(|&depth| {
            self.stack
                .frame(depth)
                .is_some_and(|f| f.terminator().ends(c))
        })
    }

    /// Closes contexts innermost first until `depth` remain.
    fn close_to(&mut self, depth: usize) {
        while self.stack.depth() > depth {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let Some(ctx) = self.stack.pop() else {
            return;
        };
        match ctx {
            Context::EmbeddedBlock(block) => self.emit_block(block),
            Context::NestedKey(nested) => {
                trace!("nested key {} closed", nested.id);
            }
            Context::Step(step) => {
                self.pending.clear(step.id);
                trace!("step {} closed", step.id);
            }
        }
    }

    fn emit_block(&mut self, block: BlockContext) {
        let Some(embedding) = block.embedding else {
            trace!("opaque block at line {} closed", block.header_line);
            return;
        };
        let body = match (block.first_body_line, block.last_body_line) {
            (Some(first), Some(last)) => Some(LineRange { first, last }),
            _ => None,
        };
        self.out.blocks.push(EmbeddedBlock {
            header_line: block.header_line,
            body,
            header: block.header,
            embedding,
        });
    }

    fn try_open_step(&mut self, c: &LineClass<'_>) {
        let Some(key) = c.key.filter(|k| k.list_item) else {
            return;
        };
        let qualification = if self.grammar.action.is_some() {
            Qualification::Pending
        } else {
            Qualification::Unconditional
        };
        let id = self.stack.allocate_id();
        trace!("step {id} opened at line {}", c.number);
        self.stack.push(Context::Step(StepContext {
            id,
            opened_at: c.number,
            terminator: Terminator::new(key.indent, c.number),
            content_column: key.key_column,
            qualification,
        }));
    }

    /// Handles keys that sit directly in the step mapping: the action
    /// reference, read only from the step's opening line, and the shell
    /// declaration.
    fn note_sibling_key(&mut self, c: &LineClass<'_>) {
        let Some(key) = c.key else {
            return;
        };
        let grammar = self.grammar;
        let Some(step) = self.stack.step_mut() else {
            return;
        };
        if key.key_column != step.content_column {
            return;
        }

        if let Some(target) = grammar.action.as_deref()
            && c.number == step.opened_at
            && matches!(step.qualification, Qualification::Pending)
            && key.key == USES_KEY
            && let Some(action) = ActionRef::parse(key.value)
            && action.is(target)
        {
            debug!("line {}: step qualifies via {action}", c.number);
            self.out.steps.push(StepFact {
                line: c.number,
                action: action.clone(),
            });
            step.qualification = Qualification::Qualified {
                line: c.number,
                action,
            };
        }

        if let EmbedRule::ShellDeclared {
            declaration_key, ..
        } = &grammar.embed
            && key.key == declaration_key.as_str()
        {
            let value = read_scalar(key.value)
                .map_or_else(|| key.value.trim().to_string(), |s| s.text.to_string());
            trace!("line {}: step {} declares '{value}'", c.number, step.id);
            self.pending.record(
                step.id,
                Declaration {
                    line: c.number,
                    value,
                },
            );
        }
    }

    fn try_open_nested_key(&mut self, c: &LineClass<'_>) -> bool {
        let Some(nested) = self.grammar.nested_key.as_deref() else {
            return false;
        };
        let Some((column, qualifies)) = self
            .stack
            .step()
            .map(|s| (s.content_column, s.qualifies()))
        else {
            return false;
        };
        if !qualifies || self.stack.in_nested_key() {
            return false;
        }
        let Some(key) = c.key_named(nested) else {
            return false;
        };
        // Only a mapping value opens the nested level.
        if key.key_column != column || !strip_comment(key.value).trim().is_empty() {
            return false;
        }

        let id = self.stack.allocate_id();
        self.stack.push(Context::NestedKey(NestedKeyContext {
            id,
            opened_at: c.number,
            terminator: Terminator::at_key(key, c.number),
        }));
        self.out.nested_keys.push(NestedKeyFact {
            line: c.number,
            key: nested.to_string(),
        });
        true
    }

    fn try_open_block(&mut self, c: &LineClass<'_>) {
        let Some((step_id, column, qualifies)) = self
            .stack
            .step()
            .map(|s| (s.id, s.content_column, s.qualifies()))
        else {
            return;
        };
        if !qualifies {
            return;
        }
        let rule = &self.grammar.embed;
        let Some(key) = c.key_named(rule.key()) else {
            return;
        };

        let placed = if self.grammar.nested_key.is_some() {
            matches!(self.stack.top(), Some(Context::NestedKey(_)))
        } else {
            match rule {
                EmbedRule::FixedKey { .. } => true,
                EmbedRule::ShellDeclared { .. } => key.key_column == column,
            }
        };
        if !placed {
            return;
        }
        let Some(header) = BlockScalarHeader::parse(key.value, rule.indent_digits()) else {
            return;
        };

        let embedding = match rule {
            EmbedRule::FixedKey {
                key: name,
                language,
                ..
            } => Some(Embedding {
                language: language.clone(),
                claim: BlockClaim::Key { key: name.clone() },
            }),
            EmbedRule::ShellDeclared { .. } => {
                resolve(&self.resolvers, self.pending.get(step_id))
            }
        };
        match &embedding {
            Some(e) => debug!("line {}: {} block embeds {}", c.number, key.key, e.language),
            None => debug!("line {}: {} block left unclaimed", c.number, key.key),
        }

        let id = self.stack.allocate_id();
        self.stack.push(Context::EmbeddedBlock(BlockContext {
            id,
            header_line: c.number,
            terminator: Terminator::at_key(key, c.number),
            header,
            embedding,
            first_body_line: None,
            last_body_line: None,
        }));
    }
}
