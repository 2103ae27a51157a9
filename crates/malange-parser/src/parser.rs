//! Document parser for Malange.
//!
//! Lexes a template and folds the flat token stream into a [`Tree`] of tokens.
//! Every tag becomes a node named after its keyword whose first leaf is the tag's
//! attribute text. Tags that open a scope stay open until their close tag; all
//! other tags are closed as soon as they are built. Text, injections, comments,
//! embedded bodies and component references become leaves.

use crate::cursor::Cursor;
use crate::node::Tree;
use crate::ParseError;
use malange_lexer::{Lexer, TagFamily, Token, TokenKind};
use tracing::{debug, trace};

/// Name of the tree's root node.
pub const ROOT: &str = "root";

/// A parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub tree: Tree<Token>,
    /// Tokens of the `[script/]` body.
    pub script_tokens: Vec<Token>,
    /// Concatenated `<style>` bodies.
    pub style: String,
}

/// Malange document parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser for the given tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse source code into a document.
    pub fn parse(source: &str) -> Result<Document, ParseError> {
        Parser::parse_named(source, "<input>")
    }

    /// Parse source code, using `name` in diagnostics.
    pub fn parse_named(source: &str, name: &str) -> Result<Document, ParseError> {
        let output = Lexer::new(source).with_name(name).run()?;
        let tree = Parser::new(output.tokens).build_tree()?;
        Ok(Document {
            tree,
            script_tokens: output.script_tokens,
            style: output.style,
        })
    }

    /// Fold the token stream into a tree.
    pub fn build_tree(mut self) -> Result<Tree<Token>, ParseError> {
        let mut tree = Tree::new(ROOT);
        {
            let mut cursor = Cursor::new(&mut tree);
            while let Some(token) = self.advance() {
                match token.kind {
                    TokenKind::BlockOpen => self.open_tag(&mut cursor, TagFamily::Block)?,
                    TokenKind::ElementOpen => self.open_tag(&mut cursor, TagFamily::Element)?,
                    TokenKind::BlockMid | TokenKind::ElementMid => self.close_tag(&mut cursor)?,
                    TokenKind::InjectionOpen
                    | TokenKind::InjectionClose
                    | TokenKind::CommentOpen
                    | TokenKind::CommentClose => {}
                    _ => cursor.add(token),
                }
            }
            debug!(depth = cursor.depth(), "tree built");
        }
        Ok(tree)
    }

    fn open_tag(&mut self, cursor: &mut Cursor<'_, Token>, family: TagFamily) -> Result<(), ParseError> {
        let (keyword_kind, attr_kind) = match family {
            TagFamily::Block => (TokenKind::BlockKeyword, TokenKind::BlockAttr),
            TagFamily::Element => (TokenKind::ElementKeyword, TokenKind::ElementAttr),
        };
        let keyword = self.expect(keyword_kind, "tag keyword")?;
        let attr = self.expect(attr_kind, "attribute text")?;
        let self_closing = self.expect_terminator()?;

        trace!(keyword = %keyword.text, depth = cursor.depth(), "nest");
        cursor.nest(keyword.text.as_str());
        cursor.add(attr);
        if !family.opens_scope(&keyword.text, self_closing) {
            cursor.up()?;
        }
        Ok(())
    }

    fn close_tag(&mut self, cursor: &mut Cursor<'_, Token>) -> Result<(), ParseError> {
        let Some(name) = self.advance() else {
            return Err(self.expected("tag keyword"));
        };
        match name.kind {
            TokenKind::Component => {
                self.expect_terminator()?;
                cursor.add(name);
            }
            TokenKind::BlockKeyword | TokenKind::ElementKeyword => {
                self.expect_terminator()?;
                trace!(keyword = %name.text, depth = cursor.depth(), "up");
                cursor.up()?;
            }
            _ => {
                return Err(ParseError::Expected {
                    expected: "tag keyword",
                    offset: name.offset,
                })
            }
        }
        Ok(())
    }

    /// Consume a tag terminator, returning whether it self-closes.
    fn expect_terminator(&mut self) -> Result<bool, ParseError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::BlockClose | TokenKind::ElementClose) => {
                self.pos += 1;
                Ok(false)
            }
            Some(TokenKind::BlockSelfClose | TokenKind::ElementSelfClose) => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.expected("tag terminator")),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.expected(expected)),
        }
    }

    fn expected(&self, expected: &'static str) -> ParseError {
        let offset = self
            .peek()
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.offset);
        ParseError::Expected { expected, offset }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}
