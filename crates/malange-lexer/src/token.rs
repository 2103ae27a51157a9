use std::fmt;

/// Token classification for Malange source.
///
/// The enumeration is flat: every token carries its raw text separately, and no
/// variant nests another. Variants are grouped by the grammar that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Block tags
    BlockOpen,      // [
    BlockMid,       // [/
    BlockClose,     // ]
    BlockSelfClose, // /]
    BlockKeyword,
    BlockAttr,
    /// Name of a component reference (`[/Card/]`).
    Component,

    // Element tags
    ElementOpen,      // <
    ElementMid,       // </
    ElementClose,     // >
    ElementSelfClose, // />
    ElementKeyword,
    ElementAttr,

    // Markup content
    Text,
    InjectionOpen, // {
    Injection,
    InjectionClose, // }
    CommentOpen,    // <!--
    Comment,
    CommentClose, // -->

    // Embedded bodies (raw text between the declaring tag and its close tag)
    ScriptBody,
    ClientScriptBody,
    StyleBody,

    // Scripting dialect: whitespace and specials
    Whitespace,
    Newline,
    ScriptComment,
    Continuation, // \
    Quote,        // " '
    DocString,    // """ '''
    StringLit,
    Literal,
    Reactive,  // $
    Arrow,     // ->
    Decorator, // @
    Pipe,      // |

    // Scripting dialect: punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    Comma,
    Colon,
    DoubleColon,
    Semicolon,

    // Scripting dialect: operators
    Plus,
    Minus,
    Star,
    Slash,
    DoubleStar,
    DoubleSlash,
    Tilde,
    Caret,
    Ampersand,
    Grave,
    ShiftLeft,
    ShiftRight,
    Percent,

    // Scripting dialect: assignment
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    DoubleStarAssign,
    DoubleSlashAssign,
    TildeAssign,
    CaretAssign,
    AmpersandAssign,
    GraveAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    PercentAssign,

    // Scripting dialect: comparison
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,

    /// Any scripting-dialect character with no dedicated kind.
    ScriptOther,
}

impl TokenKind {
    /// Tag markers are the fixed delimiters of block and element tags.
    pub fn is_tag_marker(self) -> bool {
        matches!(
            self,
            TokenKind::BlockOpen
                | TokenKind::BlockMid
                | TokenKind::BlockClose
                | TokenKind::BlockSelfClose
                | TokenKind::ElementOpen
                | TokenKind::ElementMid
                | TokenKind::ElementClose
                | TokenKind::ElementSelfClose
        )
    }
}

/// A token produced by the Malange lexer.
///
/// `offset` is the absolute position (in characters) of the token's first character
/// in the template source, even for tokens produced from an embedded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [{}] : '{}'",
            self.kind,
            self.offset,
            escape_control(&self.text)
        )
    }
}

/// Escape control characters so a token's text fits on one line.
pub fn escape_control(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

/// HTML5 void elements (no children, no closing tag).
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check if a tag name is an HTML5 void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}
