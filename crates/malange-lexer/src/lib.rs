//! Malange Lexer
//!
//! Tokenizes `.mala` template sources into a stream of tokens.
//! Handles markup elements (`<p>`), block tags (`[for x in y/]`), inline
//! injections (`{expr}`), comments, and the three embedded bodies: the single
//! `[script/]` scripting-dialect block, `<script>` client scripts and `<style>`
//! sheets. The lexer is fail-fast: the first error aborts the run.
//!
//! # Example
//!
//! ```
//! use malange_lexer::{Lexer, TokenKind};
//!
//! let output = Lexer::tokenize("<p>hi</p>").unwrap();
//! assert_eq!(output.tokens[0].kind, TokenKind::ElementOpen);
//! ```

pub mod embedded;
pub mod scanner;
pub mod script;
pub mod tag;
pub mod token;

pub use embedded::{scan_body, BodyKind, BodyScan};
pub use scanner::{LexOutput, Lexer, Mode};
pub use script::tokenize_script;
pub use tag::{TagFamily, TagScan, TagScanner};
pub use token::{Token, TokenKind};

/// What went wrong during lexing. Every kind maps to a stable dotted component id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    EmptyKeyword(TagFamily),
    InvalidKeywordChar(TagFamily),
    InvalidComponent,
    ContinuationOnClose,
    AttributesOnClose(TagFamily),
    UnterminatedTag(TagFamily),
    DuplicateScript,
    InvalidBodyClose(BodyKind),
    MismatchedClose,
    UnmatchedClose,
    UnclosedTag,
    UnterminatedString(BodyKind),
    UnterminatedRegion(Mode),
}

impl LexErrorKind {
    /// Stable identifier that downstream tooling matches on instead of the message.
    pub fn component(&self) -> &'static str {
        match self {
            LexErrorKind::EmptyKeyword(TagFamily::Block) => "syntax.block.emptykeyword",
            LexErrorKind::EmptyKeyword(TagFamily::Element) => "syntax.element.emptykeyword",
            LexErrorKind::InvalidKeywordChar(TagFamily::Block) => "syntax.block.invalidkeyword",
            LexErrorKind::InvalidKeywordChar(TagFamily::Element) => {
                "syntax.element.invalidkeyword"
            }
            LexErrorKind::InvalidComponent => "syntax.block.invalidcomponent",
            LexErrorKind::ContinuationOnClose => "syntax.block.invalidclosekeyword",
            LexErrorKind::AttributesOnClose(TagFamily::Block) => "syntax.block.invalidendtag",
            LexErrorKind::AttributesOnClose(TagFamily::Element) => "syntax.element.invalidendtag",
            LexErrorKind::UnterminatedTag(TagFamily::Block) => "syntax.block.unterminated",
            LexErrorKind::UnterminatedTag(TagFamily::Element) => "syntax.element.unterminated",
            LexErrorKind::DuplicateScript => "syntax.block.multiplescript",
            LexErrorKind::InvalidBodyClose(BodyKind::Script) => "syntax.script.invalidclose",
            LexErrorKind::InvalidBodyClose(BodyKind::ClientScript) => {
                "syntax.clientscript.invalidclose"
            }
            LexErrorKind::InvalidBodyClose(BodyKind::Style) => "syntax.style.invalidclose",
            LexErrorKind::MismatchedClose => "syntax.pairing.mismatch",
            LexErrorKind::UnmatchedClose => "syntax.pairing.unmatched",
            LexErrorKind::UnclosedTag => "syntax.pairing.unclosed",
            LexErrorKind::UnterminatedString(BodyKind::Script) => {
                "syntax.script.unterminatedstring"
            }
            LexErrorKind::UnterminatedString(BodyKind::ClientScript) => {
                "syntax.clientscript.unterminatedstring"
            }
            LexErrorKind::UnterminatedString(BodyKind::Style) => "syntax.style.unterminatedstring",
            LexErrorKind::UnterminatedRegion(mode) => mode.unterminated_component(),
        }
    }
}

/// Lexer error with the absolute source offset of the failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at offset {offset} ({}): {message}", .kind.component())]
pub struct LexerError {
    pub kind: LexErrorKind,
    pub message: String,
    pub offset: usize,
}

impl LexerError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }

    /// Shorthand for `self.kind.component()`.
    pub fn component(&self) -> &'static str {
        self.kind.component()
    }
}
