//! Tree builder: reads the rendered notation back into a component tree.
//!
//! `Branch(Branch(Leaf+Leaf)+Branch(Leaf))` builds a composite with two
//! composite children. Whitespace between tokens is ignored.

use tracing::{debug, instrument};

use crate::domain::arena::{ComponentArena, NodeId};
use crate::domain::entities::Labels;
use crate::domain::error::{DomainError, DomainResult};

/// Parsed notation, materialized into an arena only once the whole input
/// has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Leaf,
    Branch(Vec<Shape>),
}

/// Deepest composite nesting `TreeBuilder` accepts by default.
pub const MAX_NESTING: usize = 256;

/// Constructs component trees from their textual notation.
pub struct TreeBuilder {
    labels: Labels,
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(Labels::default())
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> DomainError {
        DomainError::Parse {
            position: self.pos,
            message: message.into(),
        }
    }
}

impl TreeBuilder {
    pub fn new(labels: Labels) -> Self {
        Self {
            labels,
            max_depth: MAX_NESTING,
        }
    }

    /// Limit composite nesting to `max_depth` levels.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse `notation` and insert the described tree into `arena`.
    /// On a parse error the arena is left untouched.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn build(&self, arena: &mut ComponentArena, notation: &str) -> DomainResult<NodeId> {
        let mut cursor = Cursor {
            input: notation,
            pos: 0,
            depth: 0,
        };

        cursor.skip_ws();
        if cursor.at_end() {
            return Err(cursor.error("empty notation"));
        }
        let shape = self.parse_node(&mut cursor)?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(cursor.error(format!("unexpected trailing input '{}'", cursor.rest())));
        }

        let root = Self::materialize(arena, &shape)?;
        debug!("built {} from notation", root);
        Ok(root)
    }

    fn parse_node(&self, cursor: &mut Cursor<'_>) -> DomainResult<Shape> {
        cursor.skip_ws();
        let start = cursor.pos;

        // Labels match trimmed; whitespace around tokens is insignificant
        if cursor.eat(self.labels.branch.trim()) {
            cursor.skip_ws();
            if cursor.eat("(") {
                if cursor.depth >= self.max_depth {
                    return Err(cursor.error("nesting too deep"));
                }
                cursor.depth += 1;
                let children = self.parse_children(cursor)?;
                cursor.depth -= 1;
                return Ok(Shape::Branch(children));
            }
            // Not a branch after all; the leaf label may share a prefix
            cursor.pos = start;
        }
        let leaf = self.labels.leaf.trim();
        if !leaf.is_empty() && cursor.eat(leaf) {
            return Ok(Shape::Leaf);
        }

        Err(cursor.error(format!(
            "expected '{}' or '{}('",
            self.labels.leaf, self.labels.branch
        )))
    }

    fn parse_children(&self, cursor: &mut Cursor<'_>) -> DomainResult<Vec<Shape>> {
        let mut children = Vec::new();

        cursor.skip_ws();
        if cursor.eat(")") {
            return Ok(children);
        }

        loop {
            children.push(self.parse_node(cursor)?);
            cursor.skip_ws();
            if cursor.eat(")") {
                return Ok(children);
            }
            if !cursor.eat(self.labels.separator.trim()) {
                return Err(cursor.error(format!(
                    "expected '{}' or ')'",
                    self.labels.separator
                )));
            }
        }
    }

    fn materialize(arena: &mut ComponentArena, shape: &Shape) -> DomainResult<NodeId> {
        match shape {
            Shape::Leaf => Ok(arena.new_leaf().id()),
            Shape::Branch(children) => {
                let composite = arena.new_composite();
                for child in children {
                    let child_id = Self::materialize(arena, child)?;
                    arena.add(composite, child_id)?;
                }
                Ok(composite.id())
            }
        }
    }
}
