//! Module declaration parsing: `module-info` units and the five directive
//! forms. Each directive records its structured attribute on the allocated
//! node.

use styler_arena::{
    ModuleDeclAttr, NodeId, NodeKind, PackageDirectiveAttr, ProvidesAttr, RequiresAttr, UsesAttr,
};
use styler_common::token::TokenKind;

use super::{declarations, Parser};

/// Parse a `module-info` unit: leading imports and annotations followed by
/// `open? module NAME { directives }`. Returns the module declaration node;
/// leading imports attach to it in source order and its range covers them.
pub(crate) fn parse_module_unit(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ModuleDecl);

    while p.at(TokenKind::Import) {
        let import = declarations::parse_import_decl(p);
        p.attach(node, import);
    }
    let annotations = declarations::parse_annotation_list(p);
    for annotation in annotations {
        p.attach(node, annotation);
    }

    let is_open = p.eat(TokenKind::Open);
    p.expect(TokenKind::Module);
    let (name, name_text) = declarations::parse_qualified_name(p);
    p.attach(node, name);
    p.attrs(node).set_module_decl(
        node,
        ModuleDeclAttr {
            name: name_text,
            is_open,
        },
    );

    p.expect(TokenKind::LBrace);
    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
        if p.deadline_exceeded() {
            break;
        }
        let before = p.cursor();
        match p.current() {
            TokenKind::Semicolon => {
                p.advance();
                continue;
            }
            TokenKind::Requires => {
                let directive = parse_requires_directive(p);
                p.attach(node, directive);
            }
            TokenKind::Exports => {
                let directive = parse_package_directive(p, NodeKind::ExportsDirective);
                p.attach(node, directive);
            }
            TokenKind::Opens => {
                let directive = parse_package_directive(p, NodeKind::OpensDirective);
                p.attach(node, directive);
            }
            TokenKind::Provides => {
                let directive = parse_provides_directive(p);
                p.attach(node, directive);
            }
            TokenKind::Uses => {
                let directive = parse_uses_directive(p);
                p.attach(node, directive);
            }
            _ => {
                p.error(format!(
                    "expected a module directive, found `{}`",
                    p.current_text()
                ));
                p.synchronize();
            }
        }
        if p.cursor() == before {
            p.error_and_bump("unexpected token in module body");
        }
    }
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

/// `requires [transitive] [static] NAME;`
fn parse_requires_directive(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::RequiresDirective);
    p.expect(TokenKind::Requires);

    let mut is_transitive = false;
    let mut is_static = false;
    loop {
        // `transitive` can itself be a module name (`requires transitive;`),
        // so only read it as a modifier when a name still follows.
        if p.at(TokenKind::Transitive) && p.nth(1) != TokenKind::Semicolon {
            is_transitive = true;
            p.advance();
        } else if p.at(TokenKind::Static) {
            is_static = true;
            p.advance();
        } else {
            break;
        }
    }

    let (name, module_name) = declarations::parse_qualified_name(p);
    p.attach(node, name);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    p.attrs(node).set_requires(
        node,
        RequiresAttr {
            module_name,
            is_transitive,
            is_static,
        },
    );
    node
}

/// `exports PKG [to NAMES];` / `opens PKG [to NAMES];`
fn parse_package_directive(p: &mut Parser, kind: NodeKind) -> NodeId {
    let start = p.offset();
    let node = p.node(kind);
    p.advance(); // exports / opens

    let (name, package_name) = declarations::parse_qualified_name(p);
    p.attach(node, name);

    let mut targets = Vec::new();
    if p.eat(TokenKind::To) {
        loop {
            let (target, target_name) = declarations::parse_qualified_name(p);
            p.attach(node, target);
            targets.push(target_name);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);

    let attr = PackageDirectiveAttr {
        package_name,
        targets,
    };
    if kind == NodeKind::ExportsDirective {
        p.attrs(node).set_exports(node, attr);
    } else {
        p.attrs(node).set_opens(node, attr);
    }
    node
}

/// `provides SERVICE with IMPLS;`
fn parse_provides_directive(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ProvidesDirective);
    p.expect(TokenKind::Provides);

    let (service_node, service) = declarations::parse_qualified_name(p);
    p.attach(node, service_node);

    let mut implementations = Vec::new();
    p.expect(TokenKind::With);
    loop {
        let (impl_node, impl_name) = declarations::parse_qualified_name(p);
        p.attach(node, impl_node);
        implementations.push(impl_name);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    p.attrs(node).set_provides(
        node,
        ProvidesAttr {
            service,
            implementations,
        },
    );
    node
}

/// `uses SERVICE;`
fn parse_uses_directive(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::UsesDirective);
    p.expect(TokenKind::Uses);
    let (service_node, service) = declarations::parse_qualified_name(p);
    p.attach(node, service_node);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    p.attrs(node).set_uses(node, UsesAttr { service });
    node
}
