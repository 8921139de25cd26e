//! Declaration parsing: packages, imports, type declarations, and members.
//!
//! Every parse function allocates its node up front, attaches children in
//! source order, and finalizes the node range with [`Parser::complete`].
//! Modifier lists parsed ahead of a dispatch decision travel through the
//! parser's pending-modifier stash so they end up as the declaration's
//! first children.

use styler_arena::{ImportAttr, ModuleImportAttr, NodeId, NodeKind, ParameterAttr};
use styler_common::token::TokenKind;

use super::{expressions, statements, types, Parser, Phase};

// ── Names ──────────────────────────────────────────────────────────────

/// Parse a dotted qualified name into a single `Name` node, returning the
/// node and the normalized dotted text.
pub(crate) fn parse_qualified_name(p: &mut Parser) -> (NodeId, String) {
    let start = p.offset();
    let node = p.node(NodeKind::Name);
    let mut text = String::new();

    if p.at_identifier() {
        text.push_str(p.current_text());
        p.advance();
        while p.at(TokenKind::Dot) && p.nth(1).can_be_identifier() {
            p.advance(); // .
            text.push('.');
            text.push_str(p.current_text());
            p.advance();
        }
    } else {
        p.error("expected a name");
    }

    p.complete(node, start);
    (node, text)
}

/// Parse a single identifier into a `Name` node.
pub(crate) fn parse_name(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Name);
    // On mismatch the zero-length node stands in as the placeholder.
    let _ = p.expect_identifier();
    p.complete(node, start);
    node
}

// ── Annotations and modifiers ──────────────────────────────────────────

/// Parse zero or more annotations (`@Name`, `@Name(...)`).
///
/// Stops at `@interface`, which begins an annotation type declaration.
pub(crate) fn parse_annotation_list(p: &mut Parser) -> Vec<NodeId> {
    let mut annotations = Vec::new();
    while p.at(TokenKind::At) && p.nth(1) != TokenKind::Interface {
        annotations.push(parse_annotation(p));
    }
    annotations
}

/// Parse one annotation. Element values are attached as children: a
/// `Name` child followed by its value for named pairs, bare values
/// otherwise.
pub(crate) fn parse_annotation(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Annotation);
    p.expect(TokenKind::At);
    let (name, _) = parse_qualified_name(p);
    p.attach(node, name);

    if p.eat(TokenKind::LParen) {
        while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
            if p.at_identifier() && p.nth(1) == TokenKind::Assign {
                let key = parse_name(p);
                p.attach(node, key);
                p.advance(); // =
            }
            let value = parse_element_value(p);
            p.attach(node, value);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RParen);
    }

    p.complete(node, start);
    node
}

/// An annotation element value: nested annotation, array initializer, or a
/// conditional expression.
fn parse_element_value(p: &mut Parser) -> NodeId {
    match p.current() {
        TokenKind::At => parse_annotation(p),
        TokenKind::LBrace => {
            let start = p.offset();
            let node = p.node(NodeKind::ArrayInitializer);
            p.advance(); // {
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                let value = parse_element_value(p);
                p.attach(node, value);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::RBrace);
            p.complete(node, start);
            node
        }
        _ => expressions::parse_conditional_expr(p),
    }
}

/// Whether `sealed`/`non-sealed` at the current position is a modifier
/// rather than an identifier. `sealed` was a legal identifier before the
/// keyword existed, so it only reads as a modifier ahead of a declaration.
fn contextual_modifier_applies(p: &Parser) -> bool {
    matches!(
        p.nth(1),
        TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Record
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Static
            | TokenKind::Public
            | TokenKind::Protected
            | TokenKind::Private
            | TokenKind::Strictfp
            | TokenKind::Sealed
            | TokenKind::NonSealed
    )
}

/// Parse zero or more modifiers and annotations, in source order.
pub(crate) fn parse_modifier_list(p: &mut Parser) -> Vec<NodeId> {
    let mut modifiers = Vec::new();
    loop {
        match p.current() {
            TokenKind::At if p.nth(1) != TokenKind::Interface => {
                modifiers.push(parse_annotation(p));
            }
            TokenKind::Sealed | TokenKind::NonSealed => {
                if !contextual_modifier_applies(p) {
                    break;
                }
                if !p.version().supports_sealed_types() {
                    p.feature_error("sealed types", 17);
                }
                modifiers.push(parse_modifier(p));
            }
            kind if kind.is_modifier() => {
                modifiers.push(parse_modifier(p));
            }
            _ => break,
        }
    }
    modifiers
}

fn parse_modifier(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Modifier);
    p.advance();
    p.complete(node, start);
    node
}

// ── Package and imports ────────────────────────────────────────────────

pub(crate) fn parse_package_decl(p: &mut Parser, annotations: Vec<NodeId>) -> NodeId {
    let start = declaration_start(p, &annotations);
    let node = p.node(NodeKind::PackageDecl);
    for annotation in annotations {
        p.attach(node, annotation);
    }
    p.expect(TokenKind::Package);
    let (name, _) = parse_qualified_name(p);
    p.attach(node, name);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

/// Parse any import form. Module imports are recognized through the
/// strategy registry; below version 25 they are parsed anyway after a
/// version diagnostic.
pub(crate) fn parse_import_decl(p: &mut Parser) -> NodeId {
    let registry = p.registry();
    if let Some(strategy) = registry.claim("module-import", p.version(), Phase::TopLevel, p) {
        return strategy.parse_construct(p);
    }
    if p.nth(1) == TokenKind::Module && p.nth(2).can_be_identifier() {
        p.feature_error("module import declarations", 25);
        return parse_module_import_decl(p);
    }

    let start = p.offset();
    let node = p.node(NodeKind::ImportDecl);
    p.expect(TokenKind::Import);
    let is_static = p.eat(TokenKind::Static);

    let (name, mut qualified_name) = parse_qualified_name(p);
    p.attach(node, name);

    let mut is_wildcard = false;
    if p.at(TokenKind::Dot) && p.nth(1) == TokenKind::Star {
        p.advance(); // .
        p.advance(); // *
        qualified_name.push_str(".*");
        is_wildcard = true;
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);

    p.attrs(node).set_import(
        node,
        ImportAttr {
            qualified_name,
            is_static,
            is_wildcard,
        },
    );
    node
}

/// `import module NAME;`
pub(crate) fn parse_module_import_decl(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ImportDecl);
    p.expect(TokenKind::Import);
    p.expect(TokenKind::Module);
    let (name, module_name) = parse_qualified_name(p);
    p.attach(node, name);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);

    p.attrs(node)
        .set_module_import(node, ModuleImportAttr { module_name });
    node
}

// ── Type declarations ──────────────────────────────────────────────────

/// Whether the current token opens a type declaration (after modifiers).
pub(crate) fn at_type_declaration_keyword(p: &Parser) -> bool {
    match p.current() {
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum => true,
        TokenKind::At => p.nth(1) == TokenKind::Interface,
        TokenKind::Record => p.nth(1).can_be_identifier(),
        _ => false,
    }
}

/// Parse a top-level declaration: a type declaration, or (in compact source
/// files) a bare member admitted through the strategy registry.
pub(crate) fn parse_top_level_declaration(p: &mut Parser, pending: Vec<NodeId>) -> NodeId {
    let mut modifiers = pending;
    modifiers.extend(parse_modifier_list(p));
    p.set_pending_modifiers(modifiers);

    if at_type_declaration_keyword(p) {
        return parse_type_declaration(p);
    }

    let registry = p.registry();
    if let Some(strategy) = registry.claim("compact-source-file", p.version(), Phase::TopLevel, p)
    {
        return strategy.parse_construct(p);
    }

    if at_member_start(p) {
        p.feature_error("compact source files", 25);
        return parse_member(p);
    }

    p.error_and_bump(format!(
        "expected a declaration, found `{}`",
        p.current_text()
    ));
    p.synchronize();
    let node = p.missing();
    p.take_pending_modifiers();
    node
}

/// Rough check for something that could begin a member declaration.
fn at_member_start(p: &Parser) -> bool {
    let kind = p.current();
    kind.is_primitive_type()
        || kind.can_be_identifier()
        || matches!(
            kind,
            TokenKind::Void | TokenKind::Lt | TokenKind::LBrace | TokenKind::At
        )
}

/// Dispatch a type declaration on the keyword after modifiers. Records go
/// through the strategy registry; under older versions a diagnostic is
/// recorded and the record is parsed anyway.
pub(crate) fn parse_type_declaration(p: &mut Parser) -> NodeId {
    match p.current() {
        TokenKind::Class => parse_class_decl(p),
        TokenKind::Interface => parse_interface_decl(p),
        TokenKind::Enum => parse_enum_decl(p),
        TokenKind::At => parse_annotation_type_decl(p),
        TokenKind::Record => {
            let registry = p.registry();
            if let Some(strategy) =
                registry.claim("record-declaration", p.version(), p.phase(), p)
            {
                return strategy.parse_construct(p);
            }
            p.feature_error("record declarations", 16);
            parse_record_decl(p)
        }
        _ => {
            p.error_and_bump("expected a type declaration");
            p.take_pending_modifiers();
            p.missing()
        }
    }
}

/// A declaration's range starts at its first modifier when present.
fn declaration_start(p: &Parser, modifiers: &[NodeId]) -> u32 {
    modifiers
        .first()
        .map(|&m| p.range_of(m).start)
        .unwrap_or_else(|| p.offset())
}

pub(crate) fn parse_class_decl(p: &mut Parser) -> NodeId {
    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let node = p.node(NodeKind::ClassDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.expect(TokenKind::Class);
    if let Some(span) = p.current_span_if_identifier() {
        let name_text = p.text_of(span).to_string();
        p.attrs(node).set_type_name(node, name_text);
    }
    let name = parse_name(p);
    p.attach(node, name);

    parse_type_params_into(p, node);

    if p.eat(TokenKind::Extends) {
        let supertype = types::parse_type(p);
        p.attach(node, supertype);
    }
    if p.eat(TokenKind::Implements) {
        parse_type_list_into(p, node);
    }
    parse_permits_clause(p, node);

    parse_type_body(p, node);
    p.complete(node, start);
    node
}

pub(crate) fn parse_interface_decl(p: &mut Parser) -> NodeId {
    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let node = p.node(NodeKind::InterfaceDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.expect(TokenKind::Interface);
    if let Some(span) = p.current_span_if_identifier() {
        let name_text = p.text_of(span).to_string();
        p.attrs(node).set_type_name(node, name_text);
    }
    let name = parse_name(p);
    p.attach(node, name);

    parse_type_params_into(p, node);

    if p.eat(TokenKind::Extends) {
        parse_type_list_into(p, node);
    }
    parse_permits_clause(p, node);

    parse_type_body(p, node);
    p.complete(node, start);
    node
}

pub(crate) fn parse_enum_decl(p: &mut Parser) -> NodeId {
    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let node = p.node(NodeKind::EnumDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.expect(TokenKind::Enum);
    if let Some(span) = p.current_span_if_identifier() {
        let name_text = p.text_of(span).to_string();
        p.attrs(node).set_type_name(node, name_text);
    }
    let name = parse_name(p);
    p.attach(node, name);

    if p.eat(TokenKind::Implements) {
        parse_type_list_into(p, node);
    }

    p.expect(TokenKind::LBrace);
    p.with_phase(Phase::TypeBody, |p| {
        // Constants first, then an optional `;` and ordinary members.
        while p.at_identifier() || p.at(TokenKind::At) {
            let constant = parse_enum_constant(p);
            p.attach(node, constant);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        if p.eat(TokenKind::Semicolon) {
            parse_members_until_rbrace(p, node);
        }
    });
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

fn parse_enum_constant(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::EnumConstant);
    let annotations = parse_annotation_list(p);
    for annotation in annotations {
        p.attach(node, annotation);
    }
    let name = parse_name(p);
    p.attach(node, name);
    if p.at(TokenKind::LParen) {
        expressions::parse_argument_list_into(p, node);
    }
    if p.at(TokenKind::LBrace) {
        // Constant with a class body.
        parse_anonymous_body(p, node);
    }
    p.complete(node, start);
    node
}

pub(crate) fn parse_record_decl(p: &mut Parser) -> NodeId {
    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let node = p.node(NodeKind::RecordDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.expect(TokenKind::Record);
    if let Some(span) = p.current_span_if_identifier() {
        let name_text = p.text_of(span).to_string();
        p.attrs(node).set_type_name(node, name_text);
    }
    let name = parse_name(p);
    p.attach(node, name);

    parse_type_params_into(p, node);

    p.expect(TokenKind::LParen);
    while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
        let component = parse_record_component(p);
        p.attach(node, component);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RParen);

    if p.eat(TokenKind::Implements) {
        parse_type_list_into(p, node);
    }

    parse_type_body(p, node);
    p.complete(node, start);
    node
}

fn parse_record_component(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::RecordComponent);
    let annotations = parse_annotation_list(p);
    for annotation in annotations {
        p.attach(node, annotation);
    }
    let ty = types::parse_type(p);
    p.attach(node, ty);
    p.eat(TokenKind::Ellipsis); // varargs component
    let name = parse_name(p);
    p.attach(node, name);
    p.complete(node, start);
    node
}

pub(crate) fn parse_annotation_type_decl(p: &mut Parser) -> NodeId {
    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let node = p.node(NodeKind::AnnotationDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.expect(TokenKind::At);
    p.expect(TokenKind::Interface);
    if let Some(span) = p.current_span_if_identifier() {
        let name_text = p.text_of(span).to_string();
        p.attrs(node).set_type_name(node, name_text);
    }
    let name = parse_name(p);
    p.attach(node, name);

    p.expect(TokenKind::LBrace);
    p.with_phase(Phase::TypeBody, |p| {
        while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
            if p.deadline_exceeded() {
                break;
            }
            if p.eat(TokenKind::Semicolon) {
                continue;
            }
            let member = parse_annotation_member(p);
            p.attach(node, member);
        }
    });
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

/// Annotation type member: an element (`type name() default ...;`), a
/// constant field, or a nested type declaration.
fn parse_annotation_member(p: &mut Parser) -> NodeId {
    let modifiers = parse_modifier_list(p);
    p.set_pending_modifiers(modifiers);

    if at_type_declaration_keyword(p) {
        return parse_type_declaration(p);
    }

    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);
    let ty = types::parse_type(p);

    if p.at_identifier() && p.nth(1) == TokenKind::LParen {
        let node = p.node(NodeKind::AnnotationElement);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        p.attach(node, ty);
        let name = parse_name(p);
        p.attach(node, name);
        p.expect(TokenKind::LParen);
        p.expect(TokenKind::RParen);
        if p.eat(TokenKind::Default) {
            let value = parse_element_value(p);
            p.attach(node, value);
        }
        p.expect(TokenKind::Semicolon);
        p.complete(node, start);
        node
    } else {
        parse_field_rest(p, modifiers, ty, start)
    }
}

fn parse_permits_clause(p: &mut Parser, node: NodeId) {
    if p.at(TokenKind::Permits) && p.nth(1).can_be_identifier() {
        if !p.version().supports_sealed_types() {
            p.feature_error("sealed types", 17);
        }
        p.advance(); // permits
        parse_type_list_into(p, node);
    }
}

fn parse_type_list_into(p: &mut Parser, node: NodeId) {
    loop {
        let ty = types::parse_type(p);
        p.attach(node, ty);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
}

/// Parse `<T extends A & B, ...>` into `TypeParameter` children.
fn parse_type_params_into(p: &mut Parser, node: NodeId) {
    if !p.at(TokenKind::Lt) {
        return;
    }
    p.advance(); // <
    loop {
        let start = p.offset();
        let param = p.node(NodeKind::TypeParameter);
        let annotations = parse_annotation_list(p);
        for annotation in annotations {
            p.attach(param, annotation);
        }
        let name = parse_name(p);
        p.attach(param, name);
        if p.eat(TokenKind::Extends) {
            // Bounded, possibly an intersection: `T extends A & B`.
            let bound = types::parse_intersection_type(p);
            p.attach(param, bound);
        }
        p.complete(param, start);
        p.attach(node, param);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    if !p.consume_single_gt() {
        p.synchronize();
    }
}

// ── Type bodies and members ────────────────────────────────────────────

fn parse_type_body(p: &mut Parser, node: NodeId) {
    p.expect(TokenKind::LBrace);
    p.with_phase(Phase::TypeBody, |p| {
        parse_members_until_rbrace(p, node);
    });
    p.expect(TokenKind::RBrace);
}

fn parse_members_until_rbrace(p: &mut Parser, node: NodeId) {
    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
        if p.deadline_exceeded() {
            break;
        }
        if p.eat(TokenKind::Semicolon) {
            continue;
        }
        let member = parse_member(p);
        p.attach(node, member);
    }
}

/// Anonymous class body (also used for enum constant bodies).
pub(crate) fn parse_anonymous_body(p: &mut Parser, node: NodeId) {
    parse_type_body(p, node);
}

/// Parse one member of a type body (or, for compact source files, of the
/// compilation unit).
pub(crate) fn parse_member(p: &mut Parser) -> NodeId {
    let mut modifiers = p.take_pending_modifiers();
    modifiers.extend(parse_modifier_list(p));
    p.set_pending_modifiers(modifiers);

    if at_type_declaration_keyword(p) {
        return parse_type_declaration(p);
    }

    let modifiers = p.take_pending_modifiers();
    let start = declaration_start(p, &modifiers);

    // Initializer block, `static { ... }` or `{ ... }`.
    if p.at(TokenKind::LBrace) {
        let node = p.node(NodeKind::InitializerBlock);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        let block = statements::parse_block(p, Phase::MethodBody);
        p.attach(node, block);
        p.complete(node, start);
        return node;
    }

    // Generic method: `<T> T identity(T value) { ... }`.
    if p.at(TokenKind::Lt) {
        let node = p.node(NodeKind::MethodDecl);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        parse_type_params_into(p, node);
        let return_type = parse_return_type(p);
        p.attach(node, return_type);
        let name = parse_name(p);
        p.attach(node, name);
        parse_method_rest(p, node);
        p.complete(node, start);
        return node;
    }

    // Constructor: `Name(...) { ... }`.
    if p.at_identifier() && p.nth(1) == TokenKind::LParen {
        let node = p.node(NodeKind::ConstructorDecl);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        let name = parse_name(p);
        p.attach(node, name);
        parse_parameter_list_into(p, node);
        parse_throws_clause(p, node);
        let body = statements::parse_constructor_body(p);
        p.attach(node, body);
        p.complete(node, start);
        return node;
    }

    // Record compact constructor: `Name { ... }`.
    if p.at_identifier() && p.nth(1) == TokenKind::LBrace {
        let node = p.node(NodeKind::CompactConstructorDecl);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        let name = parse_name(p);
        p.attach(node, name);
        let body = statements::parse_constructor_body(p);
        p.attach(node, body);
        p.complete(node, start);
        return node;
    }

    // Method or field: return type / field type first.
    let ty = parse_return_type(p);

    if p.at_identifier() && p.nth(1) == TokenKind::LParen {
        let node = p.node(NodeKind::MethodDecl);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        p.attach(node, ty);
        let name = parse_name(p);
        p.attach(node, name);
        parse_method_rest(p, node);
        p.complete(node, start);
        return node;
    }

    if p.at_identifier() {
        return parse_field_rest(p, modifiers, ty, start);
    }

    p.error_and_bump(format!(
        "expected a member declaration, found `{}`",
        p.current_text()
    ));
    p.synchronize();
    p.missing()
}

fn parse_return_type(p: &mut Parser) -> NodeId {
    if p.at(TokenKind::Void) {
        let start = p.offset();
        let node = p.node(NodeKind::PrimitiveType);
        p.advance();
        p.complete(node, start);
        node
    } else {
        types::parse_type(p)
    }
}

/// Parameters, C-style dimensions, throws clause, and body or `;`.
fn parse_method_rest(p: &mut Parser, node: NodeId) {
    parse_parameter_list_into(p, node);
    consume_extra_dims(p);
    parse_throws_clause(p, node);
    if p.at(TokenKind::LBrace) {
        let body = statements::parse_block(p, Phase::MethodBody);
        p.attach(node, body);
    } else if p.eat(TokenKind::Default) {
        // Annotation elements route elsewhere; `default` here is an
        // interface method modifier misplacement, tolerated for recovery.
        let value = parse_element_value(p);
        p.attach(node, value);
        p.expect(TokenKind::Semicolon);
    } else {
        p.expect(TokenKind::Semicolon);
    }
}

fn parse_throws_clause(p: &mut Parser, node: NodeId) {
    if p.eat(TokenKind::Throws) {
        parse_type_list_into(p, node);
    }
}

/// `int x[]` / `String f()[]` legacy array dimensions; consumed without
/// extra structure.
fn consume_extra_dims(p: &mut Parser) {
    while p.at(TokenKind::LBracket) && p.nth(1) == TokenKind::RBracket {
        p.advance();
        p.advance();
    }
}

pub(crate) fn parse_parameter_list_into(p: &mut Parser, node: NodeId) {
    p.expect(TokenKind::LParen);
    while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
        let parameter = parse_parameter(p);
        p.attach(node, parameter);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RParen);
}

fn parse_parameter(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Parameter);

    let mut is_final = false;
    loop {
        if p.at(TokenKind::At) && p.nth(1) != TokenKind::Interface {
            let annotation = parse_annotation(p);
            p.attach(node, annotation);
        } else if p.at(TokenKind::Final) {
            is_final = true;
            let modifier = parse_modifier(p);
            p.attach(node, modifier);
        } else {
            break;
        }
    }

    let ty = types::parse_type(p);
    p.attach(node, ty);

    let is_varargs = p.eat(TokenKind::Ellipsis);

    // Receiver parameter: `ClassName this`.
    let is_receiver = p.at(TokenKind::This);
    let name_text;
    if is_receiver {
        name_text = "this".to_string();
        p.advance();
    } else if p.at_identifier() {
        name_text = p.current_text().to_string();
        let name = parse_name(p);
        p.attach(node, name);
        consume_extra_dims(p);
    } else {
        name_text = String::new();
        p.error("expected a parameter name");
    }

    p.complete(node, start);
    p.attrs(node).set_parameter(
        node,
        ParameterAttr {
            name: name_text,
            is_varargs,
            is_final,
            is_receiver,
        },
    );
    node
}

/// Field declarators after the type: `a = 1, b, c[] = ...;`.
fn parse_field_rest(
    p: &mut Parser,
    modifiers: Vec<NodeId>,
    ty: NodeId,
    start: u32,
) -> NodeId {
    let node = p.node(NodeKind::FieldDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.attach(node, ty);

    loop {
        let name = parse_name(p);
        p.attach(node, name);
        consume_extra_dims(p);
        if p.eat(TokenKind::Assign) {
            let init = expressions::parse_variable_initializer(p);
            p.attach(node, init);
        }
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}
