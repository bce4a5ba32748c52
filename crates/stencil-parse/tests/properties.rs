//! Structural properties of parsed trees over generated templates.

use proptest::prelude::*;
use stencil_parse::parse;
use stencil_syntax::SyntaxKind::TEXT;
use stencil_syntax::{GreenToken, NodeOrToken, SyntaxNode};
use text_size::{TextRange, TextSize};

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9.,!]{1,6}",
        "[ \t]{1,3}",
        "\r?\n",
        "<(div|p|a|br|img|DIV)( [a-z]{1,4}(=(\"[a-z @.]{0,4}\"|'[a-z]{0,3}'|[a-z]{1,3}))?){0,2} ?/?>",
        "</(div|p|a|span) ?>",
        "@[a-zA-Z]{1,4}(\\.[a-z]{1,3}){0,2}(\\([a-z0-9, ()]{0,6}\\))?",
        "@\\{[a-z0-9 =;(){}\n]{0,8}\\}?",
        "@\\([a-z0-9 +()]{0,6}\\)?",
        "@@",
        "@\\*[a-z @]{0,5}(\\*@)?",
        "[<>@*/={}()\"' ]",
    ]
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..48).prop_map(|fragments| fragments.concat())
}

fn tree(text: &str) -> SyntaxNode {
    SyntaxNode::new_root(parse(text))
}

proptest! {
    #[test]
    fn tree_covers_the_text(text in template()) {
        let root = tree(&text);
        prop_assert_eq!(&root.full_text(), &text);
        prop_assert_eq!(root.full_span(), TextRange::up_to(TextSize::of(text.as_str())));
    }

    #[test]
    fn siblings_are_contiguous(text in template()) {
        let root = tree(&text);
        for node in root.descendant_nodes() {
            let mut expected = node.offset();
            for child in node.children() {
                prop_assert_eq!(child.offset(), expected, "{:?} in {:?}", child, node);
                expected = child.end();
            }
            prop_assert_eq!(expected, node.end());
        }
    }

    #[test]
    fn find_token_without_whitespace(text in template()) {
        let root = tree(&text);
        for position in 0..=text.len() as u32 {
            let position = TextSize::new(position);

            let token = root.find_token(position, true).unwrap();
            prop_assert!(token.full_span().contains(position) || position == root.end());

            if let Ok(token) = root.find_token(position, false) {
                prop_assert!(!token.kind().is_whitespace_like(), "{:?} at {:?}", token, position);
            }
        }
    }

    #[test]
    fn replacing_a_token_shares_everything_off_its_path(
        text in template(),
        pick in any::<prop::sample::Index>(),
    ) {
        let root = tree(&text);
        let tokens: Vec<_> = root.descendant_tokens().collect();
        let token = pick.get(&tokens);

        let new_root = token.replace_with(GreenToken::new(TEXT, "x")).unwrap();
        let mut expected = text.clone();
        expected.replace_range(std::ops::Range::<usize>::from(token.full_span()), "x");
        prop_assert_eq!(new_root.full_text(), expected);

        let mut path = vec![token.index()];
        path.extend(token.ancestors().filter(|node| !node.is_root()).map(|node| node.index()));
        path.reverse();

        let (mut old, mut new) = (root.green().clone(), new_root.green().clone());
        for (depth, &index) in path.iter().enumerate() {
            prop_assert_eq!(old.slots().len(), new.slots().len());
            for (slot, (before, after)) in old.slots().iter().zip(new.slots()).enumerate() {
                if slot == index {
                    continue;
                }
                match (before, after) {
                    (Some(before), Some(after)) => prop_assert!(before.ptr_eq(after)),
                    (before, after) => prop_assert!(before.is_none() && after.is_none()),
                }
            }
            if depth + 1 < path.len() {
                old = old.slot(index).and_then(NodeOrToken::as_node).cloned().unwrap();
                new = new.slot(index).and_then(NodeOrToken::as_node).cloned().unwrap();
            }
        }
    }
}
