//! End-to-end conversion tests: parse real sources, build the tree, and
//! check named children, trivia attachment, and fault behavior.

use styler_common::deadline::Deadline;
use styler_common::version::LanguageVersion;
use styler_tree::{build_tree, ConvertError, NodeData, Tree};

fn tree_for(source: &str) -> Tree {
    let output =
        styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
    build_tree(source, &output, Deadline::never()).unwrap()
}

#[test]
fn class_members_have_named_children() {
    let tree = tree_for(
        "package app;\n\nimport java.util.List;\n\npublic class Widget {\n    private int count;\n\n    public int count() {\n        return count;\n    }\n}\n",
    );

    let NodeData::CompilationUnit {
        package,
        imports,
        declarations,
    } = tree.root().data()
    else {
        panic!("root is not a compilation unit");
    };
    assert!(package.is_some());
    assert_eq!(imports.len(), 1);
    assert_eq!(declarations.len(), 1);

    let NodeData::TypeDecl(class) = declarations[0].data() else {
        panic!("expected a type declaration");
    };
    assert_eq!(class.name, "Widget");
    assert_eq!(class.members.len(), 2);

    let NodeData::FieldDecl { declarators, .. } = class.members[0].data() else {
        panic!("expected a field");
    };
    assert_eq!(declarators[0].name, "count");

    let NodeData::Callable(method) = class.members[1].data() else {
        panic!("expected a method");
    };
    assert_eq!(method.name, "count");
    assert!(method.return_type.is_some());
    assert!(method.body.is_some());
}

#[test]
fn method_structure_carries_parameters_and_throws() {
    let tree = tree_for(
        "class S {\n    <T> T pick(List<T> items, int index) throws java.io.IOException {\n        return items.get(index);\n    }\n}\n",
    );
    let NodeData::CompilationUnit { declarations, .. } = tree.root().data() else {
        panic!("no unit");
    };
    let NodeData::TypeDecl(class) = declarations[0].data() else {
        panic!("no class");
    };
    let NodeData::Callable(method) = class.members[0].data() else {
        panic!("no method");
    };
    assert_eq!(method.type_parameters.len(), 1);
    assert_eq!(method.parameters.len(), 2);
    assert_eq!(method.throws.len(), 1);
}

#[test]
fn control_flow_statements_convert_with_roles() {
    let tree = tree_for(
        "class T {\n    int run(int[] xs) {\n        int total = 0;\n        for (int i = 0; i < xs.length; i++) {\n            total += xs[i];\n        }\n        for (;;) {\n            break;\n        }\n        if (total > 10) {\n            total = 10;\n        } else {\n            total++;\n        }\n        while (total > 0) {\n            total--;\n        }\n        try {\n            check(total);\n        } catch (RuntimeException e) {\n            throw e;\n        } finally {\n            done();\n        }\n        return total;\n    }\n}\n",
    );

    let mut plain_for = 0;
    let mut bare_for = 0;
    for node in tree.preorder() {
        if let NodeData::For {
            init,
            condition,
            update,
            ..
        } = node.data()
        {
            if condition.is_some() {
                plain_for += 1;
                assert_eq!(init.len(), 1);
                assert_eq!(update.len(), 1);
            } else {
                bare_for += 1;
                assert!(init.is_empty());
                assert!(update.is_empty());
            }
        }
    }
    assert_eq!(plain_for, 1);
    assert_eq!(bare_for, 1);

    let kinds: Vec<_> = tree.preorder().iter().map(|n| n.kind()).collect();
    use styler_arena::NodeKind;
    for expected in [
        NodeKind::IfStmt,
        NodeKind::WhileStmt,
        NodeKind::TryStmt,
        NodeKind::CatchClause,
        NodeKind::FinallyClause,
        NodeKind::BreakStmt,
        NodeKind::ReturnStmt,
        NodeKind::PostfixExpr,
        NodeKind::ArrayAccessExpr,
    ] {
        assert!(kinds.contains(&expected), "missing {expected:?}");
    }
}

#[test]
fn binary_operator_text_is_recovered() {
    let tree = tree_for("class T { int v = 6 % 4; }");
    let mut found = None;
    for node in tree.preorder() {
        if let NodeData::Binary { operator, .. } = node.data() {
            found = Some(operator.clone());
        }
    }
    assert_eq!(found.as_deref(), Some("%"));
}

#[test]
fn leading_comment_attaches_to_declaration() {
    let tree = tree_for("class T {\n    // counts invocations\n    int hits;\n}\n");
    let mut attached = false;
    for node in tree.preorder() {
        if matches!(node.data(), NodeData::FieldDecl { .. }) {
            attached = node
                .leading_trivia()
                .iter()
                .any(|t| t.text.contains("counts invocations"));
        }
    }
    assert!(attached, "comment was not attached to the field");
}

#[test]
fn trailing_comment_attaches_to_statement() {
    let tree = tree_for("class T { void f() {\n    int x = 1; // seed\n    int y = 2;\n} }");
    let mut attached = false;
    for node in tree.preorder() {
        if let NodeData::LocalVarDecl { declarators, .. } = node.data() {
            if declarators[0].name == "x" {
                attached = node.trailing_trivia().iter().any(|t| t.text == "// seed");
            }
        }
    }
    assert!(attached, "trailing comment was not attached");
}

#[test]
fn parent_table_tracks_preorder_indices() {
    let tree = tree_for("class T { int x; }");
    let nodes = tree.preorder();
    // Root has no parent.
    assert_eq!(tree.parent_of(0), None);
    // Every other node's parent index points at an earlier node.
    for index in 1..nodes.len() {
        let parent = tree.parent_of(index).expect("non-root node has a parent");
        assert!(parent < index);
    }
}

#[test]
fn tree_ranges_nest() {
    let tree = tree_for(
        "class T { void f(int n) { if (n > 0) { f(n - 1); } } }",
    );
    fn check(node: &styler_tree::Node) {
        for child in node.children() {
            assert!(
                node.range().contains(child.range()),
                "{:?} escapes {:?}",
                child.kind(),
                node.kind()
            );
            check(child);
        }
    }
    check(tree.root());
}

#[test]
fn conversion_after_close_is_an_arena_closed_fault() {
    let source = "class T {}";
    let mut output =
        styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
    output.arena.close();
    let result = build_tree(source, &output, Deadline::never());
    assert_eq!(result.err(), Some(ConvertError::ArenaClosed));
}

#[test]
fn tree_outlives_parse_output() {
    let source = "class T { String s = \"text\"; }".to_string();
    let tree = {
        let output =
            styler_parser::parse(&source, LanguageVersion::latest(), Deadline::never()).unwrap();
        build_tree(&source, &output, Deadline::never()).unwrap()
        // `output` (and its arena) drop here; the tree owns its strings.
    };
    let NodeData::CompilationUnit { declarations, .. } = tree.root().data() else {
        panic!("no unit");
    };
    assert!(!declarations.is_empty());
    assert_eq!(tree.source(), source);
}

#[test]
fn trees_are_shareable_across_threads() {
    let tree = std::sync::Arc::new(tree_for("class T { int x; }"));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let shared = std::sync::Arc::clone(&tree);
            std::thread::spawn(move || shared.preorder().len())
        })
        .collect();
    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts[0], counts[1]);
}

#[test]
fn structural_equality_between_identical_parses() {
    let source = "class T { int x = 1; }";
    let first = tree_for(source);
    let second = tree_for(source);
    assert_eq!(first.root(), second.root());
}
