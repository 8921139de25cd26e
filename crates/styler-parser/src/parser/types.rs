//! Type reference parsing: primitives, class types, generics, arrays,
//! wildcards, unions, and intersections.
//!
//! Closing `>` tokens inside type arguments go through
//! [`Parser::consume_single_gt`], which splits the lexer's maximally-munched
//! shift and comparison operators.

use styler_arena::{NodeId, NodeKind};
use styler_common::token::TokenKind;

use super::{declarations, Parser};

/// Parse a type reference, including trailing array dimensions.
pub(crate) fn parse_type(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let annotations = declarations::parse_annotation_list(p);
    let mut ty = parse_base_type(p, start, annotations);

    while p.at(TokenKind::LBracket) && p.nth(1) == TokenKind::RBracket {
        let array = p.node(NodeKind::ArrayType);
        p.attach(array, ty);
        p.advance(); // [
        p.advance(); // ]
        p.complete(array, start);
        ty = array;
    }
    ty
}

fn parse_base_type(p: &mut Parser, start: u32, annotations: Vec<NodeId>) -> NodeId {
    match p.current() {
        kind if kind.is_primitive_type() => {
            let node = p.node(NodeKind::PrimitiveType);
            for annotation in annotations {
                p.attach(node, annotation);
            }
            p.advance();
            p.complete(node, start);
            node
        }
        TokenKind::Var if p.version().supports_var() => {
            let node = p.node(NodeKind::VarType);
            for annotation in annotations {
                p.attach(node, annotation);
            }
            p.advance();
            p.complete(node, start);
            node
        }
        kind if kind.can_be_identifier() => {
            let node = p.node(NodeKind::ClassType);
            for annotation in annotations {
                p.attach(node, annotation);
            }
            let (name, _) = declarations::parse_qualified_name(p);
            p.attach(node, name);
            p.complete(node, start);

            if !p.at(TokenKind::Lt) {
                return node;
            }

            // Generic arguments promote the class type to a parameterized
            // type; `Outer<A>.Inner<B>` chains extra segments onto it.
            let parameterized = p.node(NodeKind::ParameterizedType);
            p.attach(parameterized, node);
            parse_type_args_into(p, parameterized);
            loop {
                if p.at(TokenKind::Dot) && p.nth(1).can_be_identifier() {
                    p.advance(); // .
                    let segment = declarations::parse_name(p);
                    p.attach(parameterized, segment);
                    if p.at(TokenKind::Lt) {
                        parse_type_args_into(p, parameterized);
                    }
                } else {
                    break;
                }
            }
            p.complete(parameterized, start);
            parameterized
        }
        _ => {
            p.error(format!("expected a type, found `{}`", p.current_text()));
            p.missing()
        }
    }
}

/// Parse `<...>` type arguments into `node`. The diamond form `<>`
/// contributes no argument children.
pub(crate) fn parse_type_args_into(p: &mut Parser, node: NodeId) {
    p.expect(TokenKind::Lt);
    if p.current().starts_with_gt() {
        let _ = p.consume_single_gt();
        return;
    }
    loop {
        let argument = parse_type_argument(p);
        p.attach(node, argument);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    let _ = p.consume_single_gt();
}

fn parse_type_argument(p: &mut Parser) -> NodeId {
    if p.at(TokenKind::Question) {
        let start = p.offset();
        let node = p.node(NodeKind::WildcardType);
        p.advance(); // ?
        if p.eat(TokenKind::Extends) || p.eat(TokenKind::Super) {
            let bound = parse_type(p);
            p.attach(node, bound);
        }
        p.complete(node, start);
        node
    } else {
        parse_type(p)
    }
}

/// `A & B & C` intersection bound; a single type stays unwrapped.
pub(crate) fn parse_intersection_type(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let first = parse_type(p);
    if !p.at(TokenKind::Amp) {
        return first;
    }
    let node = p.node(NodeKind::IntersectionType);
    p.attach(node, first);
    while p.eat(TokenKind::Amp) {
        let next = parse_type(p);
        p.attach(node, next);
    }
    p.complete(node, start);
    node
}

/// `A | B | C` multi-catch union; a single type stays unwrapped.
pub(crate) fn parse_union_type(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let first = parse_type(p);
    if !p.at(TokenKind::Pipe) {
        return first;
    }
    let node = p.node(NodeKind::UnionType);
    p.attach(node, first);
    while p.eat(TokenKind::Pipe) {
        let next = parse_type(p);
        p.attach(node, next);
    }
    p.complete(node, start);
    node
}
