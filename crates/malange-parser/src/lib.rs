//! Malange Parser
//!
//! Builds a tree from the token stream produced by `malange-lexer`.
//! The tree is an arena of named nodes and token leaves, edited through a
//! [`Cursor`] that keeps a per-depth history of where it has been.

pub mod cursor;
pub mod node;
pub mod parser;

pub use cursor::{Cursor, Down, Pointer};
pub use node::{Item, Node, NodeId, Tree};
pub use parser::{Document, Parser};

use malange_lexer::LexerError;

/// Tree navigation failure. These are ordinary control-flow signals for code that
/// probes the tree's boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("The focused node has no parent.")]
    NoParent,
    #[error("There is no item at the pointer.")]
    EmptyNode,
    #[error("The pointer would leave the node's children.")]
    OutOfBounds,
}

impl TreeError {
    pub fn component(&self) -> &'static str {
        match self {
            TreeError::NoParent => "internal.tree.noparent",
            TreeError::EmptyNode => "internal.tree.emptynode",
            TreeError::OutOfBounds => "internal.tree.outofbounds",
        }
    }
}

/// Parser error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexerError),
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("Parse error at offset {offset}: expected {expected}")]
    Expected { expected: &'static str, offset: usize },
}

impl ParseError {
    pub fn component(&self) -> &'static str {
        match self {
            ParseError::Lex(err) => err.component(),
            ParseError::Tree(err) => err.component(),
            ParseError::Expected { .. } => "syntax.parse.expected",
        }
    }
}
