use crate::embedded::{scan_body, BodyKind};
use crate::script::tokenize_script;
use crate::tag::{TagFamily, TagScanner};
use crate::token::{Token, TokenKind};
use crate::{LexErrorKind, LexerError};
use tracing::{debug, debug_span, trace};

/// Lexer mode decides which grammar applies to the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Markup text, tags, injections and comments.
    Normal,
    /// Inside `{ ... }`.
    InjectionCapture,
    /// Inside `<!-- ... -->`.
    CommentSkip,
    /// Inside the `[script/]` body.
    ScriptDialectBody,
    /// Inside a `<script>` element.
    ClientScriptBody,
    /// Inside a `<style>` element.
    StyleBody,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::InjectionCapture => "injection",
            Mode::CommentSkip => "comment",
            Mode::ScriptDialectBody => "script",
            Mode::ClientScriptBody => "clientscript",
            Mode::StyleBody => "style",
        }
    }

    /// Component id reported when input ends while still in this mode.
    ///
    /// Ending in `Normal` is not an error, so `Lexer::run` never reports its id.
    pub fn unterminated_component(self) -> &'static str {
        match self {
            Mode::Normal => "syntax.normal.unterminated",
            Mode::InjectionCapture => "syntax.injection.unterminated",
            Mode::CommentSkip => "syntax.comment.unterminated",
            Mode::ScriptDialectBody => "syntax.script.unterminated",
            Mode::ClientScriptBody => "syntax.clientscript.unterminated",
            Mode::StyleBody => "syntax.style.unterminated",
        }
    }

    fn expected_close(self) -> &'static str {
        match self {
            // unreachable from `run`
            Mode::Normal => "",
            Mode::InjectionCapture => "}",
            Mode::CommentSkip => "-->",
            Mode::ScriptDialectBody => BodyKind::Script.close_tag(),
            Mode::ClientScriptBody => BodyKind::ClientScript.close_tag(),
            Mode::StyleBody => BodyKind::Style.close_tag(),
        }
    }
}

impl From<BodyKind> for Mode {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Script => Mode::ScriptDialectBody,
            BodyKind::ClientScript => Mode::ClientScriptBody,
            BodyKind::Style => Mode::StyleBody,
        }
    }
}

/// Everything one lexing run produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexOutput {
    /// The template token stream.
    pub tokens: Vec<Token>,
    /// Tokens of the `[script/]` body, empty when there is none.
    pub script_tokens: Vec<Token>,
    /// Concatenated text of every `<style>` body.
    pub style: String,
}

/// Malange template lexer.
///
/// Scans the source in a single forward loop. Each region (tag, injection,
/// comment, embedded body) is consumed by its own step, which leaves `pos` just
/// past the region and hands control back to the loop through `mode`.
pub struct Lexer {
    name: String,
    chars: Vec<char>,
    pos: usize,
    mode: Mode,
    tokens: Vec<Token>,
    script_tokens: Vec<Token>,
    style: String,
    text: String,
    text_start: usize,
    tags: TagScanner,
}

impl Lexer {
    /// Create a new lexer for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            name: String::from("<input>"),
            chars: source.chars().collect(),
            pos: 0,
            mode: Mode::Normal,
            tokens: Vec::new(),
            script_tokens: Vec::new(),
            style: String::new(),
            text: String::new(),
            text_start: 0,
            tags: TagScanner::new(),
        }
    }

    /// Set the display name used in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Tokenize the entire source.
    pub fn tokenize(source: &str) -> Result<LexOutput, LexerError> {
        Lexer::new(source).run()
    }

    /// Run the lexer to the end of input.
    pub fn run(mut self) -> Result<LexOutput, LexerError> {
        let span = debug_span!("lex", file = %self.name);
        let _guard = span.enter();

        while self.pos < self.chars.len() {
            match self.mode {
                Mode::Normal => self.scan_normal()?,
                Mode::InjectionCapture => self.scan_injection(),
                Mode::CommentSkip => self.scan_comment(),
                Mode::ScriptDialectBody => self.scan_embedded(BodyKind::Script)?,
                Mode::ClientScriptBody => self.scan_embedded(BodyKind::ClientScript)?,
                Mode::StyleBody => self.scan_embedded(BodyKind::Style)?,
            }
        }

        if self.mode != Mode::Normal {
            return Err(LexerError::new(
                LexErrorKind::UnterminatedRegion(self.mode),
                format!(
                    "Input ended inside the {} region; expected '{}'.",
                    self.mode.name(),
                    self.mode.expected_close()
                ),
                self.chars.len(),
            ));
        }
        self.flush_text();
        self.tags.finish()?;

        debug!(
            tokens = self.tokens.len(),
            script_tokens = self.script_tokens.len(),
            "lexing finished"
        );
        Ok(LexOutput {
            tokens: self.tokens,
            script_tokens: self.script_tokens,
            style: self.style,
        })
    }

    /// One step in normal mode: a tag, a region opener, or one text character.
    fn scan_normal(&mut self) -> Result<(), LexerError> {
        let ch = self.chars[self.pos];
        match ch {
            // Escaped structural character
            '\\' if matches!(self.peek_next(), Some('[' | '<' | '{' | '}')) => {
                let escaped = self.chars[self.pos + 1];
                self.push_text(escaped, self.pos + 1);
                self.pos += 2;
            }
            '[' => self.scan_tag(TagFamily::Block)?,
            '<' if self.starts_with("<!--") => {
                self.flush_text();
                self.emit(TokenKind::CommentOpen, "<!--", self.pos);
                self.pos += 4;
                self.set_mode(Mode::CommentSkip);
            }
            '<' => self.scan_tag(TagFamily::Element)?,
            '{' => {
                self.flush_text();
                self.emit(TokenKind::InjectionOpen, "{", self.pos);
                self.pos += 1;
                self.set_mode(Mode::InjectionCapture);
            }
            _ => {
                self.push_text(ch, self.pos);
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn scan_tag(&mut self, family: TagFamily) -> Result<(), LexerError> {
        self.flush_text();
        let origin = self.pos;
        let scan = self.tags.scan(family, &self.chars[origin + 1..], origin)?;
        trace!(
            family = family.name(),
            keyword = %scan.keyword,
            closing = scan.closing,
            offset = origin,
            "tag scanned"
        );
        self.pos = scan.end;
        self.tokens.extend(scan.tokens);
        if let Some(body) = scan.body {
            self.set_mode(Mode::from(body));
        }
        Ok(())
    }

    /// Capture an injection expression up to its matching `}`.
    ///
    /// Nested braces and quoted strings inside the expression are skipped over.
    /// Running out of input leaves the mode unchanged so `run` reports it.
    fn scan_injection(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut i = start;
        while i < self.chars.len() {
            let c = self.chars[i];
            match quote {
                Some(_) if c == '\\' => i += 1,
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None => match c {
                    '"' | '\'' | '`' => quote = Some(c),
                    '{' => depth += 1,
                    '}' if depth == 0 => {
                        let expr: String = self.chars[start..i].iter().collect();
                        self.emit(TokenKind::Injection, expr, start);
                        self.emit(TokenKind::InjectionClose, "}", i);
                        self.pos = i + 1;
                        self.set_mode(Mode::Normal);
                        return;
                    }
                    '}' => depth -= 1,
                    _ => {}
                },
            }
            i += 1;
        }
        self.pos = self.chars.len();
    }

    /// Skip to the end of an HTML comment, keeping its text.
    fn scan_comment(&mut self) {
        let start = self.pos;
        let mut i = start;
        while i < self.chars.len() {
            if self.starts_with_at(i, "-->") {
                if i > start {
                    let text: String = self.chars[start..i].iter().collect();
                    self.emit(TokenKind::Comment, text, start);
                }
                self.emit(TokenKind::CommentClose, "-->", i);
                self.pos = i + 3;
                self.set_mode(Mode::Normal);
                return;
            }
            i += 1;
        }
        self.pos = self.chars.len();
    }

    /// Consume an embedded body and the close tag that ends it.
    fn scan_embedded(&mut self, kind: BodyKind) -> Result<(), LexerError> {
        let start = self.pos;
        let body = scan_body(kind, &self.chars[start..], start)?;
        debug!(body = kind.name(), start, end = body.end, "embedded body");

        if !body.text.is_empty() {
            match kind {
                BodyKind::Script => {
                    let script = tokenize_script(&body.text, start)?;
                    self.script_tokens.extend(script);
                }
                BodyKind::Style => self.style.push_str(&body.text),
                BodyKind::ClientScript => {}
            }
            self.emit(kind.token_kind(), body.text, start);
        }

        let family = kind.family();
        let origin = body.end;
        let scan = self.tags.scan(family, &self.chars[origin + 1..], origin)?;
        let keyword_matches = match family {
            TagFamily::Block => scan.keyword == kind.keyword(),
            TagFamily::Element => scan.keyword.eq_ignore_ascii_case(kind.keyword()),
        };
        if !scan.closing || !keyword_matches {
            return Err(LexerError::new(
                LexErrorKind::InvalidBodyClose(kind),
                format!(
                    "The {} body must be closed with {}, found '{}'.",
                    kind.name(),
                    kind.close_tag(),
                    scan.keyword
                ),
                origin,
            ));
        }
        self.pos = scan.end;
        self.tokens.extend(scan.tokens);
        self.set_mode(Mode::Normal);
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!(from = self.mode.name(), to = mode.name(), offset = self.pos, "mode transition");
            self.mode = mode;
        }
    }

    fn push_text(&mut self, ch: char, offset: usize) {
        if self.text.is_empty() {
            self.text_start = offset;
        }
        self.text.push(ch);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.emit(TokenKind::Text, text, self.text_start);
        }
    }

    fn emit(&mut self, kind: TokenKind, text: impl Into<String>, offset: usize) {
        self.tokens.push(Token::new(kind, text, offset));
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.starts_with_at(self.pos, pattern)
    }

    fn starts_with_at(&self, at: usize, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(k, p)| self.chars.get(at + k) == Some(&p))
    }
}
