//! Tokenizer for the scripting dialect inside `[script/]`.
//!
//! Produces the secondary token list. Every character of the input lands in exactly
//! one token, so concatenating the token texts gives back the script.

use crate::embedded::{has_raw_prefix, quote_len, script_string_end};
use crate::token::{Token, TokenKind};
use crate::LexerError;
use tracing::trace;

/// Operators and punctuation, longest first so the first prefix match wins.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("**=", TokenKind::DoubleStarAssign),
    ("//=", TokenKind::DoubleSlashAssign),
    ("<<=", TokenKind::ShiftLeftAssign),
    (">>=", TokenKind::ShiftRightAssign),
    ("**", TokenKind::DoubleStar),
    ("//", TokenKind::DoubleSlash),
    ("<<", TokenKind::ShiftLeft),
    (">>", TokenKind::ShiftRight),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
    ("~=", TokenKind::TildeAssign),
    ("^=", TokenKind::CaretAssign),
    ("&=", TokenKind::AmpersandAssign),
    ("`=", TokenKind::GraveAssign),
    ("%=", TokenKind::PercentAssign),
    ("==", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("->", TokenKind::Arrow),
    ("::", TokenKind::DoubleColon),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("~", TokenKind::Tilde),
    ("^", TokenKind::Caret),
    ("&", TokenKind::Ampersand),
    ("`", TokenKind::Grave),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Assign),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    ("$", TokenKind::Reactive),
    ("@", TokenKind::Decorator),
    ("|", TokenKind::Pipe),
];

/// Tokenize scripting-dialect source.
///
/// `origin` is the absolute offset of the first character, so tokens taken from a
/// `[script/]` body point into the enclosing template.
pub fn tokenize_script(text: &str, origin: usize) -> Result<Vec<Token>, LexerError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let c = chars[i];
        match c {
            '\n' => {
                tokens.push(Token::new(TokenKind::Newline, "\n", origin + start));
                i += 1;
            }
            '\r' => {
                i += if chars.get(i + 1) == Some(&'\n') { 2 } else { 1 };
                tokens.push(Token::new(TokenKind::Newline, collect(&chars[start..i]), origin + start));
            }
            c if c.is_whitespace() => {
                while i < chars.len() && chars[i].is_whitespace() && !matches!(chars[i], '\n' | '\r') {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Whitespace, collect(&chars[start..i]), origin + start));
            }
            '#' => {
                while i < chars.len() && !matches!(chars[i], '\n' | '\r') {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::ScriptComment, collect(&chars[start..i]), origin + start));
            }
            '\\' => {
                tokens.push(Token::new(TokenKind::Continuation, "\\", origin + start));
                i += 1;
            }
            '\'' | '"' => {
                let width = quote_len(&chars, start);
                let raw = has_raw_prefix(&chars, start);
                let end = script_string_end(&chars, start, raw, origin)?;
                let kind = if width == 3 {
                    TokenKind::DocString
                } else {
                    TokenKind::Quote
                };
                let quote = collect(&chars[start..start + width]);
                tokens.push(Token::new(kind, quote.clone(), origin + start));
                let content = &chars[start + width..end - width];
                if !content.is_empty() {
                    tokens.push(Token::new(TokenKind::StringLit, collect(content), origin + start + width));
                }
                tokens.push(Token::new(kind, quote, origin + end - width));
                i = end;
            }
            c if c.is_alphanumeric() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Literal, collect(&chars[start..i]), origin + start));
            }
            _ => {
                let (text, kind) = match_operator(&chars[start..])
                    .map(|(op, kind)| (op.to_string(), kind))
                    .unwrap_or_else(|| (c.to_string(), TokenKind::ScriptOther));
                i += text.chars().count();
                tokens.push(Token::new(kind, text, origin + start));
            }
        }
    }

    trace!(count = tokens.len(), origin, "script tokenized");
    Ok(tokens)
}

fn match_operator(rest: &[char]) -> Option<(&'static str, TokenKind)> {
    OPERATORS.iter().copied().find(|(op, _)| {
        let len = op.chars().count();
        rest.len() >= len && op.chars().zip(rest).all(|(a, b)| a == *b)
    })
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}
