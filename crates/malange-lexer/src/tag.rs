//! Tag scanning shared by block tags (`[for x in y/]`, `[/for]`) and element tags
//! (`<p class="x">`, `</p>`).
//!
//! One routine serves both families; the family supplies its markers, its keyword
//! denylist and its reserved keyword set. The scanner also owns the pairing stack
//! and the single-shot `[script/]` flag, so it lives for a whole lexing run.

use crate::embedded::BodyKind;
use crate::token::{is_void_element, Token, TokenKind};
use crate::{LexErrorKind, LexerError};
use tracing::trace;

/// Block keywords with a fixed meaning. Any other block keyword is a component reference.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "script", "for", "while", "if", "elif", "else", "switch", "case", "default",
];

/// Reserved keywords that continue an enclosing block rather than opening one.
pub const CONTINUATION_KEYWORDS: &[&str] = &["elif", "else", "case", "default"];

/// The block keyword declaring the scripting-dialect body.
pub const SCRIPT_KEYWORD: &str = "script";

const BLOCK_FORBIDDEN: &[char] = &[
    '=', '"', '\'', '[', '`', '\\', '$', '%', '@', '#', '!', '^', '&', '*', '(', ')', '-', '+',
    ':', ';', '{', '}', '|', '<', '>', '?',
];

const ELEMENT_FORBIDDEN: &[char] = &['=', '"', '\'', '<', '`', '\\'];

/// Which of the two tag syntaxes is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    /// `[...]` control tags.
    Block,
    /// `<...>` markup tags.
    Element,
}

/// Token kinds a family emits, in tag order.
struct Markers {
    open: TokenKind,
    mid: TokenKind,
    close: TokenKind,
    self_close: TokenKind,
    keyword: TokenKind,
    attr: TokenKind,
}

impl TagFamily {
    pub fn name(self) -> &'static str {
        match self {
            TagFamily::Block => "block",
            TagFamily::Element => "element",
        }
    }

    pub fn open_marker(self) -> &'static str {
        match self {
            TagFamily::Block => "[",
            TagFamily::Element => "<",
        }
    }

    pub fn mid_marker(self) -> &'static str {
        match self {
            TagFamily::Block => "[/",
            TagFamily::Element => "</",
        }
    }

    pub fn close_char(self) -> char {
        match self {
            TagFamily::Block => ']',
            TagFamily::Element => '>',
        }
    }

    pub fn self_close_marker(self) -> &'static str {
        match self {
            TagFamily::Block => "/]",
            TagFamily::Element => "/>",
        }
    }

    fn forbidden(self) -> &'static [char] {
        match self {
            TagFamily::Block => BLOCK_FORBIDDEN,
            TagFamily::Element => ELEMENT_FORBIDDEN,
        }
    }

    fn markers(self) -> Markers {
        match self {
            TagFamily::Block => Markers {
                open: TokenKind::BlockOpen,
                mid: TokenKind::BlockMid,
                close: TokenKind::BlockClose,
                self_close: TokenKind::BlockSelfClose,
                keyword: TokenKind::BlockKeyword,
                attr: TokenKind::BlockAttr,
            },
            TagFamily::Element => Markers {
                open: TokenKind::ElementOpen,
                mid: TokenKind::ElementMid,
                close: TokenKind::ElementClose,
                self_close: TokenKind::ElementSelfClose,
                keyword: TokenKind::ElementKeyword,
                attr: TokenKind::ElementAttr,
            },
        }
    }

    /// Whether `keyword` belongs to the family's reserved set. Elements have none.
    pub fn is_reserved(self, keyword: &str) -> bool {
        match self {
            TagFamily::Block => RESERVED_KEYWORDS.contains(&keyword),
            TagFamily::Element => false,
        }
    }

    /// Whether an open tag with this keyword starts a scope that a close tag must end.
    ///
    /// Block tags open a scope for every reserved, non-continuation keyword, whichever
    /// terminator they use (`[for x in y/]` is closed by `[/for]`). Elements open one
    /// unless they self-close, are void (`<br>`), or are declarations (`<!DOCTYPE html>`).
    pub fn opens_scope(self, keyword: &str, self_closing: bool) -> bool {
        match self {
            TagFamily::Block => {
                RESERVED_KEYWORDS.contains(&keyword) && !CONTINUATION_KEYWORDS.contains(&keyword)
            }
            TagFamily::Element => {
                !self_closing && !is_void_element(keyword) && !keyword.starts_with('!')
            }
        }
    }

    fn same_keyword(self, a: &str, b: &str) -> bool {
        match self {
            TagFamily::Block => a == b,
            TagFamily::Element => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Result of scanning one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagScan {
    pub tokens: Vec<Token>,
    /// Absolute offset just past the terminator.
    pub end: usize,
    pub keyword: String,
    pub closing: bool,
    pub self_closing: bool,
    /// Embedded body the tag opens, if any.
    pub body: Option<BodyKind>,
}

/// An entry on the pairing stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub family: TagFamily,
    pub keyword: String,
    pub offset: usize,
}

/// Scans tags and validates their pairing across a lexing run.
#[derive(Debug, Default)]
pub struct TagScanner {
    stack: Vec<OpenTag>,
    script_declared: bool,
}

impl TagScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags opened and not yet closed, innermost last.
    pub fn open_tags(&self) -> &[OpenTag] {
        &self.stack
    }

    pub fn script_declared(&self) -> bool {
        self.script_declared
    }

    /// Scan one tag.
    ///
    /// `input` starts just after the opening `[` or `<`; `origin` is the absolute
    /// offset of that opening character. Offsets of everything in `input` are
    /// computed from `origin`, so callers may pass any sub-slice of the source.
    pub fn scan(
        &mut self,
        family: TagFamily,
        input: &[char],
        origin: usize,
    ) -> Result<TagScan, LexerError> {
        let markers = family.markers();
        let close = family.close_char();
        let at = |i: usize| origin + 1 + i;
        let unterminated = || {
            LexerError::new(
                LexErrorKind::UnterminatedTag(family),
                format!("The {} tag is never terminated.", family.name()),
                origin,
            )
        };

        let mut tokens = Vec::new();
        let closing = input.first() == Some(&'/');
        let mut i = 0;
        if closing {
            tokens.push(Token::new(markers.mid, family.mid_marker(), origin));
            i = 1;
        } else {
            tokens.push(Token::new(markers.open, family.open_marker(), origin));
        }

        // Keyword
        let keyword_start = i;
        let mut keyword = String::new();
        loop {
            let Some(&c) = input.get(i) else {
                return Err(unterminated());
            };
            if c.is_whitespace() || c == close || is_self_close(input, i, close) {
                break;
            }
            if family.forbidden().contains(&c) {
                return Err(LexerError::new(
                    LexErrorKind::InvalidKeywordChar(family),
                    format!("A {} keyword cannot contain '{c}'.", family.name()),
                    at(i),
                ));
            }
            keyword.push(c);
            i += 1;
        }
        if keyword.is_empty() {
            return Err(LexerError::new(
                LexErrorKind::EmptyKeyword(family),
                "Keyword is required.",
                at(keyword_start),
            ));
        }

        let reserved = family.is_reserved(&keyword);
        let component = family == TagFamily::Block && !reserved;
        match family {
            TagFamily::Block if reserved => {
                if closing && CONTINUATION_KEYWORDS.contains(&keyword.as_str()) {
                    return Err(LexerError::new(
                        LexErrorKind::ContinuationOnClose,
                        format!("'{keyword}' is only used in a begin tag."),
                        at(keyword_start),
                    ));
                }
                if !closing && keyword == SCRIPT_KEYWORD {
                    if self.script_declared {
                        return Err(LexerError::new(
                            LexErrorKind::DuplicateScript,
                            "There can be only one [script/].",
                            origin,
                        ));
                    }
                    self.script_declared = true;
                }
                tokens.push(Token::new(markers.keyword, keyword.clone(), at(keyword_start)));
            }
            TagFamily::Block => {
                if !closing {
                    return Err(LexerError::new(
                        LexErrorKind::InvalidComponent,
                        format!(
                            "'{keyword}' is not a block keyword; a component reference is written [/{keyword}/]."
                        ),
                        at(keyword_start),
                    ));
                }
                tokens.push(Token::new(TokenKind::Component, keyword.clone(), at(keyword_start)));
            }
            TagFamily::Element => {
                tokens.push(Token::new(markers.keyword, keyword.clone(), at(keyword_start)));
            }
        }

        // Attributes (open tags) or trailing whitespace (close tags), then the terminator
        let self_closing = if closing {
            loop {
                let Some(&c) = input.get(i) else {
                    return Err(unterminated());
                };
                if c == close {
                    break false;
                }
                if is_self_close(input, i, close) {
                    break true;
                }
                if !c.is_whitespace() {
                    return Err(LexerError::new(
                        LexErrorKind::AttributesOnClose(family),
                        format!(
                            "A {} end tag cannot contain anything other than its keyword.",
                            family.name()
                        ),
                        at(i),
                    ));
                }
                i += 1;
            }
        } else {
            let mut attr = String::new();
            let mut attr_start = None;
            let mut quote: Option<char> = None;
            let self_closing = loop {
                let Some(&c) = input.get(i) else {
                    return Err(unterminated());
                };
                if quote.is_none() {
                    if c == close {
                        break false;
                    }
                    if is_self_close(input, i, close) {
                        break true;
                    }
                }
                attr_start.get_or_insert(at(i));
                match quote {
                    Some(q) if q == c => quote = None,
                    None if c == '"' || c == '\'' => quote = Some(c),
                    _ => {}
                }
                attr.push(c);
                i += 1;
            };
            tokens.push(Token::new(markers.attr, attr, attr_start.unwrap_or(at(i))));
            self_closing
        };

        if closing {
            match family {
                TagFamily::Block if component && !self_closing => {
                    return Err(LexerError::new(
                        LexErrorKind::InvalidComponent,
                        format!("A component reference is written [/{keyword}/]."),
                        at(i),
                    ));
                }
                TagFamily::Block if !component && self_closing => {
                    return Err(LexerError::new(
                        LexErrorKind::InvalidComponent,
                        format!("'{keyword}' is a keyword and cannot be used as a component reference."),
                        at(i),
                    ));
                }
                TagFamily::Element if self_closing => {
                    return Err(LexerError::new(
                        LexErrorKind::AttributesOnClose(family),
                        "An element end tag must end with '>'.",
                        at(i),
                    ));
                }
                _ => {}
            }
        }

        let terminator = if self_closing {
            Token::new(markers.self_close, family.self_close_marker(), at(i))
        } else {
            Token::new(markers.close, close.to_string(), at(i))
        };
        let end = at(i) + terminator.text.chars().count();
        tokens.push(terminator);

        if closing {
            if !component {
                self.pop(family, &keyword, origin)?;
            }
        } else if family.opens_scope(&keyword, self_closing) {
            trace!(family = family.name(), keyword = %keyword, offset = origin, "open tag pushed");
            self.stack.push(OpenTag {
                family,
                keyword: keyword.clone(),
                offset: origin,
            });
        }

        let body = match family {
            TagFamily::Block if !closing && keyword == SCRIPT_KEYWORD => Some(BodyKind::Script),
            TagFamily::Element if !closing && !self_closing => body_for_element(&keyword),
            _ => None,
        };

        Ok(TagScan {
            tokens,
            end,
            keyword,
            closing,
            self_closing,
            body,
        })
    }

    /// Check that every opened tag was closed.
    pub fn finish(&self) -> Result<(), LexerError> {
        match self.stack.last() {
            Some(open) => Err(LexerError::new(
                LexErrorKind::UnclosedTag,
                format!("The {} tag '{}' is never closed.", open.family.name(), open.keyword),
                open.offset,
            )),
            None => Ok(()),
        }
    }

    fn pop(&mut self, family: TagFamily, keyword: &str, offset: usize) -> Result<(), LexerError> {
        let Some(open) = self.stack.pop() else {
            return Err(LexerError::new(
                LexErrorKind::UnmatchedClose,
                format!("The end tag '{keyword}' has no matching begin tag."),
                offset,
            ));
        };
        if open.family != family || !family.same_keyword(&open.keyword, keyword) {
            return Err(LexerError::new(
                LexErrorKind::MismatchedClose,
                format!(
                    "The {} end tag '{keyword}' does not match the {} tag '{}' opened at offset {}.",
                    family.name(),
                    open.family.name(),
                    open.keyword,
                    open.offset
                ),
                offset,
            ));
        }
        trace!(family = family.name(), keyword, offset, "open tag popped");
        Ok(())
    }
}

fn is_self_close(input: &[char], i: usize, close: char) -> bool {
    input.get(i) == Some(&'/') && input.get(i + 1) == Some(&close)
}

fn body_for_element(keyword: &str) -> Option<BodyKind> {
    if keyword.eq_ignore_ascii_case("script") {
        Some(BodyKind::ClientScript)
    } else if keyword.eq_ignore_ascii_case("style") {
        Some(BodyKind::Style)
    } else {
        None
    }
}
