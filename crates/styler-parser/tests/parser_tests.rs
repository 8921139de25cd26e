//! Parser integration tests: whole-unit parses checked against the arena
//! tree structure, recorded attributes, and diagnostics.

use styler_arena::{NodeArena, NodeId, NodeKind};
use styler_common::deadline::Deadline;
use styler_common::version::LanguageVersion;
use styler_parser::{parse, parse_module_info, ParseOutput};

fn parse_with(source: &str, version: u32) -> ParseOutput {
    parse(
        source,
        LanguageVersion::new(version).unwrap(),
        Deadline::never(),
    )
    .expect("deadline never expires")
}

fn parse_latest(source: &str) -> ParseOutput {
    parse_with(source, 25)
}

fn parse_clean(source: &str) -> ParseOutput {
    let output = parse_latest(source);
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
    output
}

/// Pre-order walk collecting every node kind under `id`.
fn collect_kinds(arena: &NodeArena, id: NodeId, out: &mut Vec<NodeKind>) {
    out.push(arena.kind_of(id).unwrap());
    let children: Vec<NodeId> = arena.children_of(id).unwrap().to_vec();
    for child in children {
        collect_kinds(arena, child, out);
    }
}

fn kinds_of(output: &ParseOutput) -> Vec<NodeKind> {
    let mut kinds = Vec::new();
    collect_kinds(&output.arena, output.root, &mut kinds);
    kinds
}

/// Find every node of one kind, in pre-order.
fn find_all(output: &ParseOutput, kind: NodeKind) -> Vec<NodeId> {
    let mut kinds = Vec::new();
    fn walk(arena: &NodeArena, id: NodeId, kind: NodeKind, out: &mut Vec<NodeId>) {
        if arena.kind_of(id).unwrap() == kind {
            out.push(id);
        }
        let children: Vec<NodeId> = arena.children_of(id).unwrap().to_vec();
        for child in children {
            walk(arena, child, kind, out);
        }
    }
    walk(&output.arena, output.root, kind, &mut kinds);
    kinds
}

/// Child ranges must nest inside parents and appear in source order.
fn assert_well_formed(output: &ParseOutput) {
    fn walk(arena: &NodeArena, id: NodeId) {
        let range = arena.range_of(id).unwrap();
        let children: Vec<NodeId> = arena.children_of(id).unwrap().to_vec();
        let mut last_start = range.start;
        for child in children {
            let child_range = arena.range_of(child).unwrap();
            assert!(
                range.contains(child_range),
                "child {child:?} ({child_range:?}) escapes parent {id:?} ({range:?})"
            );
            assert!(
                child_range.start >= last_start,
                "children of {id:?} out of source order"
            );
            last_start = child_range.start;
            walk(arena, child);
        }
    }
    walk(&output.arena, output.root);
}

// ── Compilation units ──────────────────────────────────────────────────

#[test]
fn empty_source_produces_a_compilation_unit() {
    let output = parse_clean("");
    assert_eq!(
        output.arena.kind_of(output.root).unwrap(),
        NodeKind::CompilationUnit
    );
    assert!(output.arena.children_of(output.root).unwrap().is_empty());
}

#[test]
fn package_imports_and_class() {
    let output = parse_clean(
        "package com.example.app;\n\
         \n\
         import java.util.List;\n\
         import static java.lang.Math.max;\n\
         \n\
         public final class Widget {\n\
             private final List<String> names;\n\
         \n\
             public Widget(List<String> names) {\n\
                 this.names = names;\n\
             }\n\
         \n\
             public int count() {\n\
                 return names.size();\n\
             }\n\
         }\n",
    );
    assert_well_formed(&output);

    let kinds = kinds_of(&output);
    assert!(kinds.contains(&NodeKind::PackageDecl));
    assert_eq!(find_all(&output, NodeKind::ImportDecl).len(), 2);
    assert_eq!(find_all(&output, NodeKind::ClassDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::FieldDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::ConstructorDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::MethodDecl).len(), 1);

    let class = find_all(&output, NodeKind::ClassDecl)[0];
    assert_eq!(output.arena.attributes().type_name(class), Some("Widget"));
}

#[test]
fn import_attributes_record_static_and_wildcard() {
    let output = parse_clean(
        "import java.util.List;\nimport java.io.*;\nimport static java.lang.Math.abs;\n\nclass T {}\n",
    );
    let imports = find_all(&output, NodeKind::ImportDecl);
    assert_eq!(imports.len(), 3);

    let attrs = output.arena.attributes();
    let first = attrs.import(imports[0]).unwrap();
    assert_eq!(first.qualified_name, "java.util.List");
    assert!(!first.is_static);
    assert!(!first.is_wildcard);

    let second = attrs.import(imports[1]).unwrap();
    assert_eq!(second.qualified_name, "java.io.*");
    assert!(second.is_wildcard);

    let third = attrs.import(imports[2]).unwrap();
    assert_eq!(third.qualified_name, "java.lang.Math.abs");
    assert!(third.is_static);
}

#[test]
fn module_import_declaration() {
    let output = parse_clean("import module java.base;\n\nclass T {}\n");
    let imports = find_all(&output, NodeKind::ImportDecl);
    assert_eq!(imports.len(), 1);
    let attr = output.arena.attributes().module_import(imports[0]).unwrap();
    assert_eq!(attr.module_name, "java.base");
    // A module import carries no type-import attribute.
    assert!(output.arena.attributes().import(imports[0]).is_none());
}

#[test]
fn module_import_below_version_25_reports_and_parses() {
    let output = parse_with("import module java.base;\nclass T {}\n", 21);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics[0].message.contains("25"));
    assert_eq!(find_all(&output, NodeKind::ImportDecl).len(), 1);
}

// ── Members and generics ───────────────────────────────────────────────

#[test]
fn nested_generics_close_with_split_gt() {
    let output = parse_clean("class T { Map<String, List<Integer>> index; }");
    assert_well_formed(&output);
    assert_eq!(find_all(&output, NodeKind::ParameterizedType).len(), 2);
    assert_eq!(find_all(&output, NodeKind::FieldDecl).len(), 1);
}

#[test]
fn generic_method_with_intersection_bound() {
    let output = parse_clean(
        "class T { <E extends Comparable<E> & Cloneable> E max(List<E> items) { return items.get(0); } }",
    );
    assert_eq!(find_all(&output, NodeKind::TypeParameter).len(), 1);
    assert_eq!(find_all(&output, NodeKind::IntersectionType).len(), 1);
}

#[test]
fn varargs_and_receiver_parameters() {
    let output = parse_clean("class T { void log(T this, final String fmt, Object... args) {} }");
    let params = find_all(&output, NodeKind::Parameter);
    assert_eq!(params.len(), 3);
    let attrs = output.arena.attributes();
    assert!(attrs.parameter(params[0]).unwrap().is_receiver);
    assert!(attrs.parameter(params[1]).unwrap().is_final);
    assert!(attrs.parameter(params[2]).unwrap().is_varargs);
    assert_eq!(attrs.parameter(params[2]).unwrap().name, "args");
}

#[test]
fn record_with_compact_constructor() {
    let output = parse_clean(
        "record Range(int lo, int hi) {\n    Range {\n        if (lo > hi) throw new IllegalArgumentException();\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::RecordDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::RecordComponent).len(), 2);
    assert_eq!(find_all(&output, NodeKind::CompactConstructorDecl).len(), 1);
}

#[test]
fn record_below_version_16_reports_and_parses() {
    let output = parse_with("record Point(int x, int y) {}", 8);
    assert!(!output.diagnostics.is_empty());
    assert!(output.diagnostics[0].message.contains("16"));
    assert_eq!(find_all(&output, NodeKind::RecordDecl).len(), 1);
}

#[test]
fn sealed_interface_with_permits() {
    let output = parse_clean(
        "public sealed interface Shape permits Circle, Square {}\nfinal class Circle implements Shape {}\nnon-sealed class Square implements Shape {}\n",
    );
    assert_eq!(find_all(&output, NodeKind::InterfaceDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::ClassDecl).len(), 2);
}

#[test]
fn enum_with_constants_and_members() {
    let output = parse_clean(
        "enum Planet {\n    EARTH(5.97), MARS(0.64);\n\n    private final double mass;\n\n    Planet(double mass) { this.mass = mass; }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::EnumDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::EnumConstant).len(), 2);
    assert_eq!(find_all(&output, NodeKind::ConstructorDecl).len(), 1);
}

#[test]
fn annotation_type_with_default() {
    let output = parse_clean(
        "@interface Retry {\n    int attempts() default 3;\n    String label();\n}",
    );
    assert_eq!(find_all(&output, NodeKind::AnnotationDecl).len(), 1);
    assert_eq!(find_all(&output, NodeKind::AnnotationElement).len(), 2);
}

// ── Statements and expressions ─────────────────────────────────────────

#[test]
fn statement_forms_parse() {
    let output = parse_clean(
        "class T {\n    void run(int[] xs) {\n        int total = 0;\n        for (int i = 0; i < xs.length; i++) { total += xs[i]; }\n        for (int x : xs) { total -= x; }\n        while (total > 0) { total--; }\n        do { total++; } while (total < 10);\n        if (total % 2 == 0) { total = 0; } else { total = 1; }\n        synchronized (this) { total |= 8; }\n        assert total >= 0 : \"negative\";\n        outer: for (;;) { break outer; }\n        ;\n    }\n}",
    );
    assert_well_formed(&output);
    let kinds = kinds_of(&output);
    for expected in [
        NodeKind::LocalVarDecl,
        NodeKind::ForStmt,
        NodeKind::EnhancedForStmt,
        NodeKind::WhileStmt,
        NodeKind::DoWhileStmt,
        NodeKind::IfStmt,
        NodeKind::SynchronizedStmt,
        NodeKind::AssertStmt,
        NodeKind::LabeledStmt,
        NodeKind::BreakStmt,
        NodeKind::EmptyStmt,
    ] {
        assert!(kinds.contains(&expected), "missing {expected:?}");
    }
}

#[test]
fn try_with_resources_and_multi_catch() {
    let output = parse_clean(
        "class T {\n    void io() {\n        try (var in = open(); var out = create()) {\n            copy(in, out);\n        } catch (java.io.IOException | RuntimeException e) {\n            throw new IllegalStateException(e);\n        } finally {\n            done();\n        }\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::TryStmt).len(), 1);
    assert_eq!(find_all(&output, NodeKind::Resource).len(), 2);
    assert_eq!(find_all(&output, NodeKind::CatchClause).len(), 1);
    assert_eq!(find_all(&output, NodeKind::UnionType).len(), 1);
    assert_eq!(find_all(&output, NodeKind::FinallyClause).len(), 1);
}

#[test]
fn precedence_shapes_the_binary_tree() {
    let output = parse_clean("class T { int v = 1 + 2 * 3; }");
    // The root binary expression is `+` with a nested `*` on the right.
    let binaries = find_all(&output, NodeKind::BinaryExpr);
    assert_eq!(binaries.len(), 2);
    let outer = binaries[0];
    let inner = binaries[1];
    let outer_range = output.arena.range_of(outer).unwrap();
    let inner_range = output.arena.range_of(inner).unwrap();
    assert!(outer_range.contains(inner_range));
}

#[test]
fn lambda_and_method_reference() {
    let output = parse_clean(
        "class T { void wire(List<String> names) { names.forEach(n -> sink(n)); names.forEach(this::sink); } }",
    );
    assert_eq!(find_all(&output, NodeKind::LambdaExpr).len(), 1);
    assert_eq!(find_all(&output, NodeKind::MethodRefExpr).len(), 1);
}

#[test]
fn cast_conditional_and_instanceof_pattern() {
    let output = parse_clean(
        "class T { String f(Object o) { return o instanceof String s ? s : (String) fallback(); } }",
    );
    assert_eq!(find_all(&output, NodeKind::InstanceofExpr).len(), 1);
    assert_eq!(find_all(&output, NodeKind::TypePattern).len(), 1);
    assert_eq!(find_all(&output, NodeKind::CastExpr).len(), 1);
    assert_eq!(find_all(&output, NodeKind::ConditionalExpr).len(), 1);
}

#[test]
fn switch_expression_with_patterns_and_guard() {
    let output = parse_clean(
        "class T {\n    int area(Object shape) {\n        return switch (shape) {\n            case Circle c when c.r() > 0 -> 1;\n            case Rect(int w, int h) -> w * h;\n            case null, default -> 0;\n        };\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::SwitchExpr).len(), 1);
    assert_eq!(find_all(&output, NodeKind::GuardedPattern).len(), 1);
    assert_eq!(find_all(&output, NodeKind::RecordPattern).len(), 1);
    assert_eq!(find_all(&output, NodeKind::SwitchCase).len(), 3);
}

#[test]
fn switch_statement_with_colon_cases_and_yield_expression() {
    let output = parse_clean(
        "class T {\n    int pick(int k) {\n        switch (k) {\n            case 0:\n                return 1;\n            default:\n                break;\n        }\n        return switch (k) { case 1 -> 9; default -> { yield k * 2; } };\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::SwitchStmt).len(), 1);
    assert_eq!(find_all(&output, NodeKind::SwitchExpr).len(), 1);
    assert_eq!(find_all(&output, NodeKind::YieldStmt).len(), 1);
}

#[test]
fn object_and_array_creation() {
    let output = parse_clean(
        "class T {\n    Object[] build() {\n        var buf = new StringBuilder(16);\n        int[][] grid = new int[3][4];\n        int[] seeded = new int[] {1, 2, 3};\n        Runnable r = new Runnable() { public void run() {} };\n        return new Object[] {buf, grid, seeded, r};\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::ObjectCreationExpr).len(), 2);
    assert_eq!(find_all(&output, NodeKind::ArrayCreationExpr).len(), 3);
    assert!(!find_all(&output, NodeKind::ArrayInitializer).is_empty());
}

#[test]
fn text_block_and_class_literal() {
    let output = parse_clean(
        "class T { String q = \"\"\"\n  select 1\n  \"\"\"; Class<?> c = String.class; }",
    );
    assert_eq!(find_all(&output, NodeKind::ClassLiteralExpr).len(), 1);
    assert!(!find_all(&output, NodeKind::LiteralExpr).is_empty());
}

// ── Compact source files and flexible constructors ─────────────────────

#[test]
fn compact_source_file_with_instance_main() {
    let output = parse_clean("void main() {\n    greet(\"world\");\n}\n\nvoid greet(String who) {}\n");
    assert_eq!(find_all(&output, NodeKind::MethodDecl).len(), 2);
    assert_eq!(find_all(&output, NodeKind::ClassDecl).len(), 0);
}

#[test]
fn compact_source_file_below_version_25_reports() {
    let output = parse_with("void main() {}\n", 21);
    assert!(!output.diagnostics.is_empty());
    assert!(output.diagnostics[0].message.contains("compact source files"));
    assert_eq!(find_all(&output, NodeKind::MethodDecl).len(), 1);
}

#[test]
fn flexible_constructor_body_is_clean_on_25() {
    let output = parse_clean(
        "class T extends Base {\n    T(int v) {\n        int checked = check(v);\n        super(checked);\n    }\n}",
    );
    assert_eq!(find_all(&output, NodeKind::ConstructorDecl).len(), 1);
}

#[test]
fn flexible_constructor_body_below_version_25_reports() {
    let output = parse_with(
        "class T extends Base {\n    T(int v) {\n        int checked = check(v);\n        super(checked);\n    }\n}",
        21,
    );
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics[0]
        .message
        .contains("explicit constructor invocation"));
}

#[test]
fn leading_constructor_invocation_needs_no_gate() {
    let output = parse_with(
        "class T extends Base {\n    T(int v) {\n        super(v);\n        init();\n    }\n}",
        11,
    );
    assert!(output.diagnostics.is_empty());
}

// ── module-info ────────────────────────────────────────────────────────

#[test]
fn module_info_directives_record_attributes() {
    let output = parse_module_info(
        "open module com.example.app {\n    requires transitive java.sql;\n    requires static java.compiler;\n    exports com.example.api;\n    opens com.example.internal to com.example.test, com.example.bench;\n    uses com.example.spi.Codec;\n    provides com.example.spi.Codec with com.example.impl.JsonCodec, com.example.impl.XmlCodec;\n}\n",
        LanguageVersion::latest(),
        Deadline::never(),
    )
    .expect("deadline never expires");
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );

    let arena = &output.arena;
    assert_eq!(arena.kind_of(output.root).unwrap(), NodeKind::ModuleDecl);
    let module = arena.attributes().module_decl(output.root).unwrap();
    assert_eq!(module.name, "com.example.app");
    assert!(module.is_open);

    let requires = find_all(&output, NodeKind::RequiresDirective);
    assert_eq!(requires.len(), 2);
    let first = arena.attributes().requires(requires[0]).unwrap();
    assert_eq!(first.module_name, "java.sql");
    assert!(first.is_transitive);
    assert!(!first.is_static);
    let second = arena.attributes().requires(requires[1]).unwrap();
    assert_eq!(second.module_name, "java.compiler");
    assert!(second.is_static);

    let exports = find_all(&output, NodeKind::ExportsDirective);
    assert_eq!(
        arena.attributes().exports(exports[0]).unwrap().package_name,
        "com.example.api"
    );

    let opens = find_all(&output, NodeKind::OpensDirective);
    let opens_attr = arena.attributes().opens(opens[0]).unwrap();
    assert_eq!(opens_attr.package_name, "com.example.internal");
    assert_eq!(
        opens_attr.targets,
        vec!["com.example.test".to_string(), "com.example.bench".to_string()]
    );

    let uses = find_all(&output, NodeKind::UsesDirective);
    assert_eq!(
        arena.attributes().uses(uses[0]).unwrap().service,
        "com.example.spi.Codec"
    );

    let provides = find_all(&output, NodeKind::ProvidesDirective);
    let provides_attr = arena.attributes().provides(provides[0]).unwrap();
    assert_eq!(provides_attr.service, "com.example.spi.Codec");
    assert_eq!(provides_attr.implementations.len(), 2);
}

// ── Error recovery ─────────────────────────────────────────────────────

#[test]
fn missing_semicolon_recovers_with_diagnostic() {
    let output = parse_latest("class T { int a = 1\n int b = 2; }");
    assert!(!output.diagnostics.is_empty());
    // Both fields survive in the tree.
    assert_eq!(find_all(&output, NodeKind::FieldDecl).len(), 2);
    assert_well_formed(&output);
}

#[test]
fn diagnostics_carry_line_and_column() {
    let output = parse_latest("class T {\n    int a = ;\n}");
    assert!(!output.diagnostics.is_empty());
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.line, 2);
    assert!(diagnostic.column > 1);
    insta::assert_snapshot!(
        diagnostic.to_string(),
        @r#"ParseError[line=2, column=13, position=22, message="expected an expression, found ;"]"#
    );
}

#[test]
fn diagnostics_serialize_for_tooling() {
    let output = parse_latest("class T {\n    int a = ;\n}");
    let json = serde_json::to_value(&output.diagnostics).unwrap();
    assert_eq!(json[0]["line"], 2);
    assert_eq!(json[0]["position"], 22);
}

#[test]
fn garbage_between_members_synchronizes() {
    let output = parse_latest("class T { ??? int ok; }");
    assert!(!output.diagnostics.is_empty());
    assert_eq!(find_all(&output, NodeKind::FieldDecl).len(), 1);
}

#[test]
fn unclosed_brace_still_yields_tree() {
    let output = parse_latest("class T { void f() {");
    assert!(!output.diagnostics.is_empty());
    assert_eq!(find_all(&output, NodeKind::MethodDecl).len(), 1);
    assert_well_formed(&output);
}
