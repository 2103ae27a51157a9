//! Embedded body scanning.
//!
//! A body runs from the end of its declaring tag to the first close-tag marker
//! (`[/` for the scripting dialect, `</` for client scripts and styles) that is not
//! inside a comment or a string literal. The body text is kept raw; only the
//! boundary is computed here.

use crate::scanner::Mode;
use crate::tag::TagFamily;
use crate::token::TokenKind;
use crate::{LexErrorKind, LexerError};

/// The three kinds of embedded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// The `[script/]` scripting-dialect block.
    Script,
    /// A `<script>` element.
    ClientScript,
    /// A `<style>` element.
    Style,
}

impl BodyKind {
    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Script => "script",
            BodyKind::ClientScript => "client script",
            BodyKind::Style => "style",
        }
    }

    /// Family of the tag that must end the body.
    pub fn family(self) -> TagFamily {
        match self {
            BodyKind::Script => TagFamily::Block,
            BodyKind::ClientScript | BodyKind::Style => TagFamily::Element,
        }
    }

    /// Keyword the ending tag must carry.
    pub fn keyword(self) -> &'static str {
        match self {
            BodyKind::Script | BodyKind::ClientScript => "script",
            BodyKind::Style => "style",
        }
    }

    /// Kind of the token carrying the raw body text.
    pub fn token_kind(self) -> TokenKind {
        match self {
            BodyKind::Script => TokenKind::ScriptBody,
            BodyKind::ClientScript => TokenKind::ClientScriptBody,
            BodyKind::Style => TokenKind::StyleBody,
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            BodyKind::Script => "[/script]",
            BodyKind::ClientScript => "</script>",
            BodyKind::Style => "</style>",
        }
    }
}

/// Raw body text and the absolute offset of the close-tag marker that ends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyScan {
    pub text: String,
    pub end: usize,
}

/// Find the end of an embedded body.
///
/// `input` starts at the first body character and `origin` is its absolute offset.
pub fn scan_body(kind: BodyKind, input: &[char], origin: usize) -> Result<BodyScan, LexerError> {
    let found = match kind {
        BodyKind::Script => scan_script(input, origin)?,
        BodyKind::ClientScript => scan_c_style(kind, input, origin, true)?,
        BodyKind::Style => scan_c_style(kind, input, origin, false)?,
    };
    let Some(index) = found else {
        return Err(LexerError::new(
            LexErrorKind::UnterminatedRegion(Mode::from(kind)),
            format!("Expected {} to close the {} body.", kind.close_tag(), kind.name()),
            origin + input.len(),
        ));
    };
    Ok(BodyScan {
        text: input[..index].iter().collect(),
        end: origin + index,
    })
}

fn scan_script(input: &[char], origin: usize) -> Result<Option<usize>, LexerError> {
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            '[' if input.get(i + 1) == Some(&'/') => return Ok(Some(i)),
            '#' => {
                while i < input.len() && input[i] != '\n' && input[i] != '\r' {
                    i += 1;
                }
            }
            '\'' | '"' => {
                let raw = has_raw_prefix(input, i);
                i = script_string_end(input, i, raw, origin)?;
            }
            _ => i += 1,
        }
    }
    Ok(None)
}

/// Length of the quote that opens a string at `start`: 3 for a triple quote, 1 otherwise.
pub(crate) fn quote_len(input: &[char], start: usize) -> usize {
    let quote = input[start];
    if input.get(start + 1) == Some(&quote) && input.get(start + 2) == Some(&quote) {
        3
    } else {
        1
    }
}

/// Whether the string opened at `quote_index` carries an `r`/`R` prefix (`r'..'`, `Rb".."`).
pub(crate) fn has_raw_prefix(input: &[char], quote_index: usize) -> bool {
    let mut start = quote_index;
    while start > 0
        && quote_index - start < 2
        && matches!(input[start - 1], 'r' | 'R' | 'f' | 'F' | 'b' | 'B' | 'u' | 'U')
    {
        start -= 1;
    }
    if start > 0 && (input[start - 1].is_alphanumeric() || input[start - 1] == '_') {
        return false;
    }
    input[start..quote_index].iter().any(|c| matches!(c, 'r' | 'R'))
}

/// Index just past the closing quote of the scripting-dialect string opened at `start`.
///
/// The closing quote must match the opening one in both character and tripleness.
/// A backslash before a line break continues a single-quoted string onto the next
/// line; a bare line break ends it with an error. In raw strings a backslash does
/// not escape the quote.
pub(crate) fn script_string_end(
    input: &[char],
    start: usize,
    raw: bool,
    origin: usize,
) -> Result<usize, LexerError> {
    let quote = input[start];
    let triple = quote_len(input, start) == 3;
    let unterminated = || {
        LexerError::new(
            LexErrorKind::UnterminatedString(BodyKind::Script),
            "String literal is never closed.",
            origin + start,
        )
    };

    let mut i = start + if triple { 3 } else { 1 };
    while i < input.len() {
        let c = input[i];
        if c == '\\' {
            match input.get(i + 1) {
                Some('\r') if input.get(i + 2) == Some(&'\n') => i += 3,
                Some('\n') | Some('\r') => i += 2,
                Some(_) if !raw => i += 2,
                _ => i += 1,
            }
            continue;
        }
        if c == quote {
            if !triple {
                return Ok(i + 1);
            }
            if input.get(i + 1) == Some(&quote) && input.get(i + 2) == Some(&quote) {
                return Ok(i + 3);
            }
        }
        if !triple && (c == '\n' || c == '\r') {
            return Err(unterminated());
        }
        i += 1;
    }
    Err(unterminated())
}

/// Client scripts and style sheets share one scanner; only JavaScript has `//`
/// comments and backtick strings.
fn scan_c_style(
    kind: BodyKind,
    input: &[char],
    origin: usize,
    javascript: bool,
) -> Result<Option<usize>, LexerError> {
    let mut i = 0;
    while i < input.len() {
        let next = input.get(i + 1).copied();
        match input[i] {
            '<' if next == Some('/') => return Ok(Some(i)),
            '/' if javascript && next == Some('/') => {
                while i < input.len() && input[i] != '\n' {
                    i += 1;
                }
            }
            '/' if next == Some('*') => {
                i += 2;
                loop {
                    if i >= input.len() {
                        return Ok(None);
                    }
                    if input[i] == '*' && input.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            '\'' | '"' => i = c_string_end(kind, input, i, origin)?,
            '`' if javascript => i = c_string_end(kind, input, i, origin)?,
            _ => i += 1,
        }
    }
    Ok(None)
}

fn c_string_end(
    kind: BodyKind,
    input: &[char],
    start: usize,
    origin: usize,
) -> Result<usize, LexerError> {
    let quote = input[start];
    let unterminated = || {
        LexerError::new(
            LexErrorKind::UnterminatedString(kind),
            "String literal is never closed.",
            origin + start,
        )
    };

    let mut i = start + 1;
    while i < input.len() {
        match input[i] {
            '\\' => i += 2,
            c if c == quote => return Ok(i + 1),
            '\n' | '\r' if quote != '`' => return Err(unterminated()),
            _ => i += 1,
        }
    }
    Err(unterminated())
}
