//! Expression parsing: a binding-power ladder from assignment down to
//! postfix, plus lambdas, method references, creation expressions, switch
//! expressions, and patterns.

use styler_arena::{NodeId, NodeKind, ParameterAttr};
use styler_common::token::TokenKind;

use super::{declarations, statements, types, Parser};

/// Parse a full expression (assignment level, right-associative).
pub(crate) fn parse_expression(p: &mut Parser) -> NodeId {
    if at_lambda(p) {
        return parse_lambda(p);
    }

    let start = p.offset();
    let left = parse_conditional_expr(p);

    if is_assignment_op(p.current()) {
        let node = p.node(NodeKind::AssignmentExpr);
        p.attach(node, left);
        p.advance(); // operator
        let value = parse_expression(p);
        p.attach(node, value);
        p.complete(node, start);
        return node;
    }
    left
}

fn is_assignment_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign
            | TokenKind::AmpAssign
            | TokenKind::PipeAssign
            | TokenKind::CaretAssign
            | TokenKind::PercentAssign
            | TokenKind::ShlAssign
            | TokenKind::ShrAssign
            | TokenKind::UShrAssign
    )
}

/// Conditional (`?:`) and below.
pub(crate) fn parse_conditional_expr(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let condition = parse_binary_expr(p, 1);
    if !p.at(TokenKind::Question) {
        return condition;
    }
    let node = p.node(NodeKind::ConditionalExpr);
    p.attach(node, condition);
    p.advance(); // ?
    let then_branch = parse_expression(p);
    p.attach(node, then_branch);
    p.expect(TokenKind::Colon);
    let else_branch = parse_conditional_expr(p);
    p.attach(node, else_branch);
    p.complete(node, start);
    node
}

/// Binding power for the binary operator ladder: logical-or at the bottom,
/// multiplicative at the top. `instanceof` sits at relational level.
fn binding_power(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::PipePipe => 1,
        TokenKind::AmpAmp => 2,
        TokenKind::Pipe => 3,
        TokenKind::Caret => 4,
        TokenKind::Amp => 5,
        TokenKind::EqEq | TokenKind::NotEq => 6,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => 7,
        TokenKind::Shl | TokenKind::Shr | TokenKind::UShr => 8,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        _ => return None,
    })
}

const RELATIONAL_POWER: u8 = 7;

fn parse_binary_expr(p: &mut Parser, min_power: u8) -> NodeId {
    let start = p.offset();
    let mut left = parse_unary_expr(p);

    loop {
        if p.at(TokenKind::Instanceof) && RELATIONAL_POWER >= min_power {
            left = parse_instanceof_rest(p, left, start);
            continue;
        }
        let Some(power) = binding_power(p.current()) else {
            break;
        };
        if power < min_power {
            break;
        }
        let node = p.node(NodeKind::BinaryExpr);
        p.attach(node, left);
        p.advance(); // operator
        let right = parse_binary_expr(p, power + 1);
        p.attach(node, right);
        p.complete(node, start);
        left = node;
    }
    left
}

/// `expr instanceof Type`, `expr instanceof Type binding`, or a record /
/// primitive pattern. Pattern availability goes through the strategy
/// registry; below the gate the pattern is parsed after a diagnostic.
fn parse_instanceof_rest(p: &mut Parser, left: NodeId, start: u32) -> NodeId {
    let node = p.node(NodeKind::InstanceofExpr);
    p.attach(node, left);
    p.advance(); // instanceof

    let registry = p.registry();
    let rhs = if let Some(strategy) =
        registry.claim("instanceof-pattern", p.version(), p.phase(), p)
    {
        strategy.parse_construct(p)
    } else if at_pattern_start(p) {
        p.feature_error("patterns in `instanceof`", 16);
        parse_pattern(p)
    } else {
        types::parse_type(p)
    };
    p.attach(node, rhs);
    p.complete(node, start);
    node
}

// ── Unary and cast ─────────────────────────────────────────────────────

fn parse_unary_expr(p: &mut Parser) -> NodeId {
    match p.current() {
        TokenKind::PlusPlus
        | TokenKind::MinusMinus
        | TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Bang
        | TokenKind::Tilde => {
            let start = p.offset();
            let node = p.node(NodeKind::UnaryExpr);
            p.advance(); // operator
            let operand = parse_unary_expr(p);
            p.attach(node, operand);
            p.complete(node, start);
            node
        }
        TokenKind::LParen if cast_lookahead(p) => {
            let start = p.offset();
            let node = p.node(NodeKind::CastExpr);
            p.advance(); // (
            let target = types::parse_intersection_type(p);
            p.attach(node, target);
            p.expect(TokenKind::RParen);
            let operand = parse_unary_expr(p);
            p.attach(node, operand);
            p.complete(node, start);
            node
        }
        _ => parse_postfix_expr(p),
    }
}

/// Whether `(` begins a cast rather than a parenthesized expression.
///
/// Primitive casts are unambiguous. Reference casts are recognized when the
/// parenthesized tokens form a type shape and the token after `)` can begin
/// an operand.
fn cast_lookahead(p: &Parser) -> bool {
    if p.nth(1).is_primitive_type() {
        let mut i = 2;
        while p.nth(i) == TokenKind::LBracket && p.nth(i + 1) == TokenKind::RBracket {
            i += 2;
        }
        return p.nth(i) == TokenKind::RParen;
    }

    let Some(mut i) = type_shape_end(p, 1) else {
        return false;
    };
    // Intersection casts: `(A & B) value`.
    while p.nth(i) == TokenKind::Amp {
        match type_shape_end(p, i + 1) {
            Some(next) => i = next,
            None => return false,
        }
    }
    if p.nth(i) != TokenKind::RParen {
        return false;
    }
    matches!(
        p.nth(i + 1),
        TokenKind::Identifier
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::LParen
            | TokenKind::IntLiteral
            | TokenKind::LongLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::TextBlock
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Switch
    ) || p.nth(i + 1).can_be_identifier()
}

/// Scan a reference-type shape starting at lookahead index `i`; returns the
/// index just past it, or `None` if the tokens cannot be a type.
fn type_shape_end(p: &Parser, mut i: usize) -> Option<usize> {
    if p.nth(i).is_primitive_type() {
        i += 1;
    } else if p.nth(i).can_be_identifier() {
        i += 1;
        loop {
            if p.nth(i) == TokenKind::Dot && p.nth(i + 1).can_be_identifier() {
                i += 2;
            } else if p.nth(i) == TokenKind::Lt {
                // Skip balanced type arguments, honoring composite `>` forms.
                let mut depth: i32 = 0;
                loop {
                    match p.nth(i) {
                        TokenKind::Lt => depth += 1,
                        TokenKind::Gt => depth -= 1,
                        TokenKind::Shr => depth -= 2,
                        TokenKind::UShr => depth -= 3,
                        TokenKind::Eof
                        | TokenKind::Semicolon
                        | TokenKind::LBrace
                        | TokenKind::RBrace => return None,
                        _ => {}
                    }
                    i += 1;
                    if depth <= 0 {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    } else {
        return None;
    }
    while p.nth(i) == TokenKind::LBracket && p.nth(i + 1) == TokenKind::RBracket {
        i += 2;
    }
    Some(i)
}

// ── Postfix ────────────────────────────────────────────────────────────

fn parse_postfix_expr(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let mut left = parse_primary_expr(p);

    loop {
        match p.current() {
            TokenKind::Dot => match p.nth(1) {
                TokenKind::Class => {
                    let node = p.node(NodeKind::ClassLiteralExpr);
                    p.attach(node, left);
                    p.advance(); // .
                    p.advance(); // class
                    p.complete(node, start);
                    left = node;
                }
                TokenKind::StringLiteral | TokenKind::TextBlock => {
                    // Template processor form: `STR."..."`.
                    if !p.version().supports_string_templates() {
                        p.feature_error("string templates", 22);
                    }
                    let node = p.node(NodeKind::TemplateExpr);
                    p.attach(node, left);
                    p.advance(); // .
                    let literal = parse_literal(p);
                    p.attach(node, literal);
                    p.complete(node, start);
                    left = node;
                }
                TokenKind::New => {
                    // Qualified creation: `outer.new Inner(...)`.
                    p.advance(); // .
                    let node = parse_new_expr(p, start, Some(left));
                    left = node;
                }
                TokenKind::This => {
                    let node = p.node(NodeKind::FieldAccessExpr);
                    p.attach(node, left);
                    p.advance(); // .
                    let name = p.node(NodeKind::Name);
                    let name_start = p.offset();
                    p.advance(); // this
                    p.complete(name, name_start);
                    p.attach(node, name);
                    p.complete(node, start);
                    left = node;
                }
                TokenKind::Lt => {
                    // Explicit type arguments: `target.<T>method(args)`.
                    let node = p.node(NodeKind::MethodCallExpr);
                    p.attach(node, left);
                    p.advance(); // .
                    types::parse_type_args_into(p, node);
                    let name = declarations::parse_name(p);
                    p.attach(node, name);
                    parse_argument_list_into(p, node);
                    p.complete(node, start);
                    left = node;
                }
                kind if kind.can_be_identifier() => {
                    p.advance(); // .
                    let name = declarations::parse_name(p);
                    let node = if p.at(TokenKind::LParen) {
                        let node = p.node_at(NodeKind::MethodCallExpr, start);
                        p.attach(node, left);
                        p.attach(node, name);
                        parse_argument_list_into(p, node);
                        node
                    } else {
                        let node = p.node_at(NodeKind::FieldAccessExpr, start);
                        p.attach(node, left);
                        p.attach(node, name);
                        node
                    };
                    p.complete(node, start);
                    left = node;
                }
                _ => {
                    p.error_and_bump("expected a member name after `.`");
                    break;
                }
            },
            TokenKind::LParen => {
                // Call on a bare name: `f(x)`.
                let node = p.node(NodeKind::MethodCallExpr);
                p.attach(node, left);
                parse_argument_list_into(p, node);
                p.complete(node, start);
                left = node;
            }
            TokenKind::LBracket => {
                let node = p.node(NodeKind::ArrayAccessExpr);
                p.attach(node, left);
                p.advance(); // [
                let index = parse_expression(p);
                p.attach(node, index);
                p.expect(TokenKind::RBracket);
                p.complete(node, start);
                left = node;
            }
            TokenKind::ColonColon => {
                let node = p.node(NodeKind::MethodRefExpr);
                p.attach(node, left);
                p.advance(); // ::
                if p.at(TokenKind::Lt) {
                    types::parse_type_args_into(p, node);
                }
                if p.at(TokenKind::New) {
                    let name = p.node(NodeKind::Name);
                    let name_start = p.offset();
                    p.advance(); // new
                    p.complete(name, name_start);
                    p.attach(node, name);
                } else {
                    let name = declarations::parse_name(p);
                    p.attach(node, name);
                }
                p.complete(node, start);
                left = node;
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let node = p.node(NodeKind::PostfixExpr);
                p.attach(node, left);
                p.advance(); // operator
                p.complete(node, start);
                left = node;
            }
            _ => break,
        }
    }
    left
}

// ── Primary ────────────────────────────────────────────────────────────

fn parse_primary_expr(p: &mut Parser) -> NodeId {
    // Lambdas can appear anywhere a primary can, e.g. as a cast operand.
    if at_lambda(p) {
        return parse_lambda(p);
    }
    let start = p.offset();
    match p.current() {
        kind if kind.is_literal() => parse_literal(p),
        TokenKind::This => {
            let node = p.node(NodeKind::ThisExpr);
            p.advance();
            p.complete(node, start);
            node
        }
        TokenKind::Super => {
            let node = p.node(NodeKind::SuperExpr);
            p.advance();
            p.complete(node, start);
            node
        }
        TokenKind::LParen => {
            let node = p.node(NodeKind::ParenExpr);
            p.advance(); // (
            let inner = parse_expression(p);
            p.attach(node, inner);
            p.expect(TokenKind::RParen);
            p.complete(node, start);
            node
        }
        TokenKind::New => parse_new_expr(p, start, None),
        TokenKind::Switch => {
            let registry = p.registry();
            if let Some(strategy) =
                registry.claim("switch-expression", p.version(), p.phase(), p)
            {
                strategy.parse_construct(p)
            } else {
                p.feature_error("switch expressions", 14);
                parse_switch_expr(p)
            }
        }
        // `int.class`, `int[].class`.
        kind if kind.is_primitive_type() => types::parse_type(p),
        kind if kind.can_be_identifier() => {
            let node = p.node(NodeKind::IdentifierExpr);
            p.advance();
            p.complete(node, start);
            node
        }
        TokenKind::Semicolon
        | TokenKind::RBrace
        | TokenKind::RParen
        | TokenKind::RBracket
        | TokenKind::Comma
        | TokenKind::Eof => {
            p.error(format!(
                "expected an expression, found {}",
                if p.at(TokenKind::Eof) { "end of input" } else { p.current_text() }
            ));
            p.missing()
        }
        _ => {
            p.error_and_bump(format!(
                "expected an expression, found `{}`",
                p.current_text()
            ));
            p.missing()
        }
    }
}

fn parse_literal(p: &mut Parser) -> NodeId {
    let start = p.offset();
    if p.at(TokenKind::TextBlock) && !p.version().supports_text_blocks() {
        p.feature_error("text blocks", 15);
    }
    let node = p.node(NodeKind::LiteralExpr);
    p.advance();
    p.complete(node, start);
    node
}

/// `new` object or array creation. `qualifier` carries the outer instance
/// of a qualified `outer.new Inner()` form.
fn parse_new_expr(p: &mut Parser, start: u32, qualifier: Option<NodeId>) -> NodeId {
    p.expect(TokenKind::New);
    let ty = types::parse_type(p);

    // `new int[]{...}` arrives here with the empty dimensions already part
    // of the parsed type, so a `{` also marks array creation.
    if p.at(TokenKind::LBracket) || p.at(TokenKind::LBrace) {
        let node = p.node(NodeKind::ArrayCreationExpr);
        if let Some(outer) = qualifier {
            p.attach(node, outer);
        }
        p.attach(node, ty);
        while p.eat(TokenKind::LBracket) {
            if !p.at(TokenKind::RBracket) {
                let dimension = parse_expression(p);
                p.attach(node, dimension);
            }
            p.expect(TokenKind::RBracket);
        }
        if p.at(TokenKind::LBrace) {
            let init = parse_array_initializer(p);
            p.attach(node, init);
        }
        p.complete(node, start);
        return node;
    }

    let node = p.node(NodeKind::ObjectCreationExpr);
    if let Some(outer) = qualifier {
        p.attach(node, outer);
    }
    p.attach(node, ty);
    if p.at(TokenKind::LParen) {
        parse_argument_list_into(p, node);
    } else {
        p.error("expected `(` after the created type");
    }
    if p.at(TokenKind::LBrace) {
        // Anonymous class body.
        declarations::parse_anonymous_body(p, node);
    }
    p.complete(node, start);
    node
}

/// `{ a, b, }` array initializer; elements are expressions or nested
/// initializers.
pub(crate) fn parse_array_initializer(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ArrayInitializer);
    p.expect(TokenKind::LBrace);
    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
        let element = parse_variable_initializer(p);
        p.attach(node, element);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

/// A variable initializer: an array initializer or an expression.
pub(crate) fn parse_variable_initializer(p: &mut Parser) -> NodeId {
    if p.at(TokenKind::LBrace) {
        parse_array_initializer(p)
    } else {
        parse_expression(p)
    }
}

/// `( expr, ... )` attached directly to the owning node.
pub(crate) fn parse_argument_list_into(p: &mut Parser, node: NodeId) {
    p.expect(TokenKind::LParen);
    while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
        let argument = parse_expression(p);
        p.attach(node, argument);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RParen);
}

// ── Lambdas ────────────────────────────────────────────────────────────

/// Whether the current position begins a lambda expression.
fn at_lambda(p: &Parser) -> bool {
    if p.at_identifier() && p.nth(1) == TokenKind::Arrow {
        return true;
    }
    if !p.at(TokenKind::LParen) {
        return false;
    }
    // Scan to the matching `)` and check for `->`.
    let mut depth = 1;
    let mut i = 1;
    loop {
        match p.nth(i) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return p.nth(i + 1) == TokenKind::Arrow;
                }
            }
            TokenKind::Eof => return false,
            _ => {}
        }
        i += 1;
    }
}

fn parse_lambda(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::LambdaExpr);

    if p.at_identifier() {
        let parameter = parse_untyped_lambda_parameter(p);
        p.attach(node, parameter);
    } else {
        p.expect(TokenKind::LParen);
        while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
            let parameter = if p.at_identifier()
                && matches!(p.nth(1), TokenKind::Comma | TokenKind::RParen)
            {
                parse_untyped_lambda_parameter(p)
            } else {
                parse_typed_lambda_parameter(p)
            };
            p.attach(node, parameter);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RParen);
    }

    p.expect(TokenKind::Arrow);

    let body = if p.at(TokenKind::LBrace) {
        statements::parse_block(p, super::Phase::MethodBody)
    } else {
        parse_expression(p)
    };
    p.attach(node, body);
    p.complete(node, start);
    node
}

fn parse_untyped_lambda_parameter(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Parameter);
    let name_text = p.current_text().to_string();
    let name = declarations::parse_name(p);
    p.attach(node, name);
    p.complete(node, start);
    p.attrs(node).set_parameter(
        node,
        ParameterAttr {
            name: name_text,
            is_varargs: false,
            is_final: false,
            is_receiver: false,
        },
    );
    node
}

fn parse_typed_lambda_parameter(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Parameter);
    let mut is_final = false;
    while p.at(TokenKind::Final) {
        is_final = true;
        p.advance();
    }
    let ty = types::parse_type(p);
    p.attach(node, ty);
    let is_varargs = p.eat(TokenKind::Ellipsis);
    let name_text = if p.at_identifier() {
        p.current_text().to_string()
    } else {
        String::new()
    };
    let name = declarations::parse_name(p);
    p.attach(node, name);
    p.complete(node, start);
    p.attrs(node).set_parameter(
        node,
        ParameterAttr {
            name: name_text,
            is_varargs,
            is_final,
            is_receiver: false,
        },
    );
    node
}

// ── Switch expressions ─────────────────────────────────────────────────

/// `switch (selector) { cases }` in expression position.
pub(crate) fn parse_switch_expr(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::SwitchExpr);
    p.expect(TokenKind::Switch);
    p.expect(TokenKind::LParen);
    let selector = parse_expression(p);
    p.attach(node, selector);
    p.expect(TokenKind::RParen);
    statements::parse_switch_block_into(p, node);
    p.complete(node, start);
    node
}

// ── Patterns ───────────────────────────────────────────────────────────

/// Whether the lookahead reads as a pattern: a type shape followed by a
/// binding name or a record component list.
pub(crate) fn at_pattern_start(p: &Parser) -> bool {
    if p.at(TokenKind::Final) {
        return true;
    }
    let Some(i) = type_shape_end(p, 0) else {
        return false;
    };
    p.nth(i).can_be_identifier() || p.nth(i) == TokenKind::LParen
}

/// Parse a type, record, or primitive pattern.
pub(crate) fn parse_pattern(p: &mut Parser) -> NodeId {
    let start = p.offset();

    let mut modifiers = Vec::new();
    while p.at(TokenKind::Final) {
        let modifier_start = p.offset();
        let modifier = p.node(NodeKind::Modifier);
        p.advance();
        p.complete(modifier, modifier_start);
        modifiers.push(modifier);
    }

    let is_primitive = p.current().is_primitive_type();
    let ty = types::parse_type(p);

    if p.at(TokenKind::LParen) {
        if !p.version().supports_switch_patterns() {
            p.feature_error("record patterns", 21);
        }
        let node = p.node(NodeKind::RecordPattern);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        p.attach(node, ty);
        p.advance(); // (
        while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
            let component = parse_pattern(p);
            p.attach(node, component);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RParen);
        p.complete(node, start);
        return node;
    }

    let kind = if is_primitive {
        if !p.version().supports_primitive_patterns() {
            p.feature_error("primitive patterns", 23);
        }
        NodeKind::PrimitivePattern
    } else {
        NodeKind::TypePattern
    };
    let node = p.node(kind);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    p.attach(node, ty);
    if p.at_identifier() {
        let name = declarations::parse_name(p);
        p.attach(node, name);
    }
    p.complete(node, start);
    node
}

/// Wrap a pattern in a `GuardedPattern` when a `when` clause follows.
/// Used by switch case labels.
pub(crate) fn parse_guarded_pattern(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let pattern = parse_pattern(p);
    if !p.at(TokenKind::When) {
        return pattern;
    }
    let node = p.node(NodeKind::GuardedPattern);
    p.attach(node, pattern);
    p.advance(); // when
    let guard = parse_expression(p);
    p.attach(node, guard);
    p.complete(node, start);
    node
}
