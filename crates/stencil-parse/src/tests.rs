use expect_test::{Expect, expect};
use stencil_syntax::SyntaxKind::*;
use stencil_syntax::{GreenToken, SyntaxNode};
use text_size::TextSize;

use crate::parse;

fn tree(text: &str) -> SyntaxNode {
    SyntaxNode::new_root(parse(text))
}

fn check(text: &str, expect: Expect) {
    let root = tree(text);
    assert_eq!(root.full_text(), text);
    expect.assert_eq(&root.debug_dump());
}

fn diagnostics(text: &str) -> Vec<String> {
    tree(text)
        .diagnostics()
        .iter()
        .map(|diagnostic| format!("{:?} {}", diagnostic.range(), diagnostic.message()))
        .collect()
}

#[test]
fn element_with_text() {
    check(
        "<div>Hi</div>",
        expect![[r#"
            DOCUMENT@0..13
              MARKUP_ELEMENT@0..13
                START_TAG@0..5
                  OPEN_ANGLE@0..1 "<"
                  NAME@1..4 "div"
                  CLOSE_ANGLE@4..5 ">"
                TEXT_LITERAL@5..7
                  TEXT@5..7 "Hi"
                END_TAG@7..13
                  OPEN_ANGLE@7..8 "<"
                  FORWARD_SLASH@8..9 "/"
                  NAME@9..12 "div"
                  CLOSE_ANGLE@12..13 ">"
              EOF@13..13 ""
        "#]],
    );
}

#[test]
fn self_closing_element_and_implicit_expression() {
    check(
        "<br/>@user.Name!",
        expect![[r#"
            DOCUMENT@0..16
              LIST@0..16
                MARKUP_ELEMENT@0..5
                  START_TAG@0..5
                    OPEN_ANGLE@0..1 "<"
                    NAME@1..3 "br"
                    FORWARD_SLASH@3..4 "/"
                    CLOSE_ANGLE@4..5 ">"
                IMPLICIT_EXPRESSION@5..15
                  TRANSITION@5..6 "@"
                  LIST@6..15
                    IDENT@6..10 "user"
                    DOT@10..11 "."
                    IDENT@11..15 "Name"
                TEXT_LITERAL@15..16
                  TEXT@15..16 "!"
              EOF@16..16 ""
        "#]],
    );
}

#[test]
fn code_block_tokens_carry_trivia() {
    check(
        "@{ var x = 1; }\n",
        expect![[r#"
            DOCUMENT@0..16
              LIST@0..16
                CODE_BLOCK@0..15
                  TRANSITION@0..1 "@"
                  LEFT_BRACE@1..2 "{"
                  LIST@2..14
                    IDENT@2..7 " var "
                    IDENT@7..9 "x "
                    PUNCT@9..11 "= "
                    NUMBER@11..12 "1"
                    PUNCT@12..14 "; "
                  RIGHT_BRACE@14..15 "}"
                TEXT_LITERAL@15..16
                  NEWLINE@15..16 "\n"
              EOF@16..16 ""
        "#]],
    );
}

#[test]
fn attributes() {
    check(
        r#"<a href="/x" hidden>"#,
        expect![[r#"
            DOCUMENT@0..20
              MARKUP_ELEMENT@0..20
                START_TAG@0..20
                  OPEN_ANGLE@0..1 "<"
                  NAME@1..2 "a"
                  LIST@2..19
                    ATTRIBUTE@2..12
                      WHITESPACE@2..3 " "
                      NAME@3..7 "href"
                      EQUALS@7..8 "="
                      ATTRIBUTE_VALUE@8..12
                        DOUBLE_QUOTE@8..9 "\""
                        TEXT@9..11 "/x"
                        DOUBLE_QUOTE@11..12 "\""
                    ATTRIBUTE@12..19
                      WHITESPACE@12..13 " "
                      NAME@13..19 "hidden"
                  CLOSE_ANGLE@19..20 ">"
                END_TAG@20..20
                  OPEN_ANGLE@20..20 (missing)
              EOF@20..20 ""
        "#]],
    );
    assert_eq!(diagnostics(r#"<a href="/x" hidden>"#), ["20..20 missing end tag for `<a>`"]);
}

#[test]
fn comments_and_escapes() {
    check(
        "a@b.c @@ @* hi *@",
        expect![[r#"
            DOCUMENT@0..17
              LIST@0..17
                TEXT_LITERAL@0..9
                  LIST@0..9
                    TEXT@0..1 "a"
                    TEXT@1..2 "@"
                    TEXT@2..5 "b.c"
                    WHITESPACE@5..6 " "
                    TEXT@6..8 "@@"
                    WHITESPACE@8..9 " "
                COMMENT@9..17
                  COMMENT_START@9..11 "@*"
                  COMMENT_TEXT@11..15 " hi "
                  COMMENT_END@15..17 "*@"
              EOF@17..17 ""
        "#]],
    );
}

#[test]
fn mismatched_end_tags() {
    check(
        "<div><p>x</div></span>",
        expect![[r#"
            DOCUMENT@0..22
              LIST@0..22
                MARKUP_ELEMENT@0..15
                  START_TAG@0..5
                    OPEN_ANGLE@0..1 "<"
                    NAME@1..4 "div"
                    CLOSE_ANGLE@4..5 ">"
                  MARKUP_ELEMENT@5..9
                    START_TAG@5..8
                      OPEN_ANGLE@5..6 "<"
                      NAME@6..7 "p"
                      CLOSE_ANGLE@7..8 ">"
                    TEXT_LITERAL@8..9
                      TEXT@8..9 "x"
                    END_TAG@9..9
                      OPEN_ANGLE@9..9 (missing)
                  END_TAG@9..15
                    OPEN_ANGLE@9..10 "<"
                    FORWARD_SLASH@10..11 "/"
                    NAME@11..14 "div"
                    CLOSE_ANGLE@14..15 ">"
                ERROR@15..22
                  END_TAG@15..22
                    OPEN_ANGLE@15..16 "<"
                    FORWARD_SLASH@16..17 "/"
                    NAME@17..21 "span"
                    CLOSE_ANGLE@21..22 ">"
              EOF@22..22 ""
        "#]],
    );
    assert_eq!(
        diagnostics("<div><p>x</div></span>"),
        ["9..9 missing end tag for `<p>`", "15..22 end tag has no matching start tag"]
    );
}

#[test]
fn unterminated_constructs_report_missing_tokens() {
    assert_eq!(diagnostics("@(a"), ["3..3 expected `)`"]);
    assert_eq!(diagnostics("@{ x"), ["4..4 expected `}`"]);
    assert_eq!(diagnostics("@ x"), ["1..1 expected identifier, `{` or `(` after `@`"]);
    assert_eq!(diagnostics("@* x"), ["4..4 unterminated comment"]);
    assert_eq!(
        diagnostics("<a b='x"),
        [
            "7..7 unterminated attribute value",
            "7..7 expected `>`",
            "7..7 missing end tag for `<a>`",
        ]
    );
}

#[test]
fn void_elements_have_no_body() {
    let root = tree("<img src=x><p>y</p>");
    let image = root.child_node(0).and_then(|list| list.child_node(0)).unwrap();
    assert_eq!(image.kind(), MARKUP_ELEMENT);
    assert_eq!(image.full_text(), "<img src=x>");
    assert!(root.diagnostics().is_empty());
}

#[test]
fn malformed_input_round_trips() {
    let inputs = [
        "",
        "<",
        "</",
        "<a",
        "@",
        "@{",
        "@{ if (a) { b(); } }",
        "@(a(b)c)",
        "@foo.",
        "@foo.bar(1, (2))",
        "x@",
        "a < b",
        "<a b=",
        "<a b=\"@c d\">",
        "<a></b></a>",
        "<p>\r\n  text\r\n</p>",
        "@{ // comment }\n}",
    ];
    for input in inputs {
        assert_eq!(tree(input).full_text(), input, "{input:?}");
    }
}

#[test]
fn find_token_in_parsed_tree() {
    let root = tree("<p>a \n b</p>");

    assert_eq!(root.find_token(4.into(), true).unwrap().kind(), WHITESPACE);
    assert_eq!(root.find_token(4.into(), false).unwrap().text(), "a");
    assert_eq!(root.find_token(6.into(), false).unwrap().text(), "b");
    assert_eq!(root.find_token(12.into(), false).unwrap().kind(), EOF);
}

#[test]
fn replacing_a_token_shares_the_rest() {
    let root = tree("<div>Hi</div>");
    let text = root.find_token(5.into(), false).unwrap();

    let new_root = text.replace_with(GreenToken::new(TEXT, "Bye")).unwrap();
    assert_eq!(new_root.full_text(), "<div>Bye</div>");

    let old_element = root.child_node(0).unwrap();
    let new_element = new_root.child_node(0).unwrap();
    for slot in [0, 2] {
        let old = old_element.child_node(slot).unwrap();
        let new = new_element.child_node(slot).unwrap();
        assert!(old.green().ptr_eq(new.green()));
    }
    assert_eq!(new_element.child_node(2).unwrap().offset(), TextSize::new(8));
}

#[test]
fn deep_nesting_is_flattened() {
    let text = "<a>".repeat(5_000);
    let root = tree(&text);
    assert_eq!(root.full_text(), text);

    let mut depth = 0;
    let mut element = root.child_node(0);
    while let Some(node) = element.filter(|node| node.kind() == MARKUP_ELEMENT) {
        depth += 1;
        element = node.child_node(1);
    }
    assert_eq!(depth, 512);

    let diagnostics = root.diagnostics();
    let count = |message: &str| {
        diagnostics.iter().filter(|diagnostic| diagnostic.message().starts_with(message)).count()
    };
    assert_eq!(count("missing end tag"), 512);
    assert_eq!(count("elements nested too deeply"), 5_000 - 512);
}
