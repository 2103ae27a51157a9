//! End-to-end lexing of whole templates.

use malange_lexer::{BodyKind, LexErrorKind, Lexer, TagFamily, Token, TokenKind};
use pretty_assertions::assert_eq;

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_loop_block_with_body_text() {
    let output = Lexer::tokenize("[for x in y/]body[/for]").unwrap();
    assert_eq!(
        output.tokens,
        vec![
            Token::new(TokenKind::BlockOpen, "[", 0),
            Token::new(TokenKind::BlockKeyword, "for", 1),
            Token::new(TokenKind::BlockAttr, " x in y", 4),
            Token::new(TokenKind::BlockSelfClose, "/]", 11),
            Token::new(TokenKind::Text, "body", 13),
            Token::new(TokenKind::BlockMid, "[/", 17),
            Token::new(TokenKind::BlockKeyword, "for", 19),
            Token::new(TokenKind::BlockClose, "]", 22),
        ]
    );
}

#[test]
fn test_script_string_continues_across_line() {
    let output = Lexer::tokenize("[script/]\nx = \"abc\\\ndef\"\n[/script]").unwrap();
    let strings: Vec<&Token> = output
        .script_tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLit)
        .collect();
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[0].text, "abc\\\ndef");
    assert_eq!(strings[0].offset, 15);
}

#[test]
fn test_paragraph() {
    let output = Lexer::tokenize("<p>hello</p>").unwrap();
    assert_eq!(
        kinds(&output.tokens),
        vec![
            TokenKind::ElementOpen,
            TokenKind::ElementKeyword,
            TokenKind::ElementAttr,
            TokenKind::ElementClose,
            TokenKind::Text,
            TokenKind::ElementMid,
            TokenKind::ElementKeyword,
            TokenKind::ElementClose,
        ]
    );
    assert_eq!(output.tokens[2].text, "");
    assert_eq!(output.tokens[4].text, "hello");
}

#[test]
fn test_second_script_declaration_is_fatal() {
    let err = Lexer::tokenize("[script/]\nx = 1\n[/script]\n<p>{x}</p>\n[script/]y = 2[/script]")
        .unwrap_err();
    assert_eq!(err.kind, LexErrorKind::DuplicateScript);
    assert_eq!(err.component(), "syntax.block.multiplescript");
    assert_eq!(err.offset, 37);
}

#[test]
fn test_full_page() {
    let source = r#"[script/]
@page
title = "Shop"
items = ['a', 'b']
[/script]
<!DOCTYPE html>
<html>
<head><style>h1 { color: red; }</style></head>
<body>
  <h1>{title}</h1>
  <!-- list -->
  [for item in items/]
    [if item == "a"/]<b>{item}</b>[else/]<i>{item}</i>[/if]
  [/for]
  [/Footer/]
  <script>console.log("</ok>");</script>
</body>
</html>
"#;
    let output = Lexer::tokenize(source).unwrap();
    assert_eq!(output.style, "h1 { color: red; }");
    assert!(output
        .script_tokens
        .iter()
        .any(|t| t.kind == TokenKind::Decorator));
    assert_eq!(
        output
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Component)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>(),
        vec!["Footer"]
    );
    assert!(output
        .tokens
        .iter()
        .any(|t| t.kind == TokenKind::ClientScriptBody && t.text == "console.log(\"</ok>\");"));
    let rebuilt: String = output.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_error_components() {
    let cases = [
        ("<p", "syntax.element.unterminated"),
        ("[/p x]", "syntax.block.invalidendtag"),
        ("<div></span>", "syntax.pairing.mismatch"),
        ("</div>", "syntax.pairing.unmatched"),
        ("[if a/]", "syntax.pairing.unclosed"),
        ("[Card/]", "syntax.block.invalidcomponent"),
        ("[/case]", "syntax.block.invalidclosekeyword"),
        ("<a=b>", "syntax.element.invalidkeyword"),
        ("[script/]s = 'x\n'[/script]", "syntax.script.unterminatedstring"),
        ("<style>a", "syntax.style.unterminated"),
    ];
    for (source, component) in cases {
        let err = Lexer::tokenize(source).unwrap_err();
        assert_eq!(err.component(), component, "source: {source:?}");
    }
}

#[test]
fn test_error_kind_carries_family() {
    let err = Lexer::tokenize("<>").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::EmptyKeyword(TagFamily::Element));
    let err = Lexer::tokenize("<script>'a\n'</script>").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString(BodyKind::ClientScript));
}
