use super::{
    classify::{KeyLine, LineClass},
    kinds::{ActionRef, BlockScalarHeader},
    types::Embedding,
};

/// Identity of one context activation, unique within a scan.
pub type ContextId = usize;

/// Closing condition of a context, built once from the indentation captured
/// on its opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminator {
    indent: String,
    opened_at: usize,
}

impl Terminator {
    pub fn new(indent: &str, opened_at: usize) -> Self {
        Self {
            indent: indent.to_string(),
            opened_at,
        }
    }

    /// Closing condition for a context opened by `key`. On a `- key:` line
    /// the key's column counts, not the dash's.
    pub fn at_key(key: &KeyLine<'_>, opened_at: usize) -> Self {
        if !key.list_item {
            return Self::new(key.indent, opened_at);
        }
        let mut indent = key.indent.to_string();
        indent.extend(std::iter::repeat_n(' ', key.key_column - key.indent.len()));
        Self { indent, opened_at }
    }

    /// A line ends the context when it is not blank and is not indented
    /// deeper than the captured indentation. The opening line never ends its
    /// own context.
    pub fn ends(&self, line: &LineClass<'_>) -> bool {
        if line.number == self.opened_at || line.is_blank {
            return false;
        }
        !deeper_than(line.text, &self.indent)
    }
}

fn deeper_than(text: &str, indent: &str) -> bool {
    text.strip_prefix(indent)
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

/// Whether child matchers may run inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualification {
    /// The grammar names an action and no matching `uses:` has been seen.
    Pending,
    Qualified { line: usize, action: ActionRef },
    /// The grammar has no action filter.
    Unconditional,
}

#[derive(Debug, Clone)]
pub struct StepContext {
    pub id: ContextId,
    pub opened_at: usize,
    pub terminator: Terminator,
    /// Column of the first key after `- `; sibling keys start here.
    pub content_column: usize,
    pub qualification: Qualification,
}

impl StepContext {
    pub fn qualifies(&self) -> bool {
        !matches!(self.qualification, Qualification::Pending)
    }
}

#[derive(Debug, Clone)]
pub struct NestedKeyContext {
    pub id: ContextId,
    pub opened_at: usize,
    pub terminator: Terminator,
}

#[derive(Debug, Clone)]
pub struct BlockContext {
    pub id: ContextId,
    pub header_line: usize,
    pub terminator: Terminator,
    pub header: BlockScalarHeader,
    /// `None` for an opaque block whose language could not be resolved.
    pub embedding: Option<Embedding>,
    pub first_body_line: Option<usize>,
    pub last_body_line: Option<usize>,
}

impl BlockContext {
    pub fn absorb(&mut self, line: usize) {
        self.first_body_line.get_or_insert(line);
        self.last_body_line = Some(line);
    }
}

/// One active matcher. Nesting is Step > NestedKey > EmbeddedBlock, with the
/// middle level optional.
#[derive(Debug, Clone)]
pub enum Context {
    Step(StepContext),
    NestedKey(NestedKeyContext),
    EmbeddedBlock(BlockContext),
}

impl Context {
    pub fn id(&self) -> ContextId {
        match self {
            Context::Step(s) => s.id,
            Context::NestedKey(n) => n.id,
            Context::EmbeddedBlock(b) => b.id,
        }
    }

    pub fn terminator(&self) -> &Terminator {
        match self {
            Context::Step(s) => &s.terminator,
            Context::NestedKey(n) => &n.terminator,
            Context::EmbeddedBlock(b) => &b.terminator,
        }
    }
}

/// The stack of active contexts, outermost first.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Context>,
    next_id: ContextId,
}

impl ContextStack {
    pub fn allocate_id(&mut self) -> ContextId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether `ctx` may be pushed on top of the current frames.
    pub fn can_hold(&self, ctx: &Context) -> bool {
        match (self.frames.last(), ctx) {
            (None, Context::Step(_)) => true,
            (Some(Context::Step(_)), Context::NestedKey(_)) => true,
            (Some(Context::Step(_) | Context::NestedKey(_)), Context::EmbeddedBlock(_)) => true,
            _ => false,
        }
    }

    pub fn push(&mut self, ctx: Context) {
        debug_assert!(self.can_hold(&ctx), "invalid context nesting: {ctx:?}");
        self.frames.push(ctx);
    }

    pub fn pop(&mut self) -> Option<Context> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Context> {
        self.frames.last()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frame at `depth`, counting the outermost as 0.
    pub fn frame(&self, depth: usize) -> Option<&Context> {
        self.frames.get(depth)
    }

    pub fn step(&self) -> Option<&StepContext> {
        match self.frames.first() {
            Some(Context::Step(s)) => Some(s),
            _ => None,
        }
    }

    pub fn step_mut(&mut self) -> Option<&mut StepContext> {
        match self.frames.first_mut() {
            Some(Context::Step(s)) => Some(s),
            _ => None,
        }
    }

    pub fn in_nested_key(&self) -> bool {
        self.frames
            .iter()
            .any(|f| matches!(f, Context::NestedKey(_)))
    }

    pub fn block_mut(&mut self) -> Option<&mut BlockContext> {
        match self.frames.last_mut() {
            Some(Context::EmbeddedBlock(b)) => Some(b),
            _ => None,
        }
    }
}
