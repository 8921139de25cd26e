//! Statement parsing: blocks, control flow, local declarations, switch
//! bodies, and constructor bodies.
//!
//! Constructor bodies run in their own phase so the flexible-constructor-
//! body strategy can gate `super(...)`/`this(...)` calls appearing after
//! other statements.

use styler_arena::{NodeId, NodeKind};
use styler_common::token::TokenKind;

use super::{declarations, expressions, types, Parser, Phase};

/// Parse `{ ... }` as a block in the given phase.
pub(crate) fn parse_block(p: &mut Parser, phase: Phase) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Block);
    p.expect(TokenKind::LBrace);
    p.with_phase(phase, |p| {
        parse_statements_until_rbrace(p, node);
    });
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

fn parse_statements_until_rbrace(p: &mut Parser, node: NodeId) {
    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
        if p.deadline_exceeded() {
            break;
        }
        let before = p.cursor();
        let statement = parse_statement(p);
        p.attach(node, statement);
        if p.cursor() == before {
            // A statement that consumed nothing means recovery stalled.
            p.error_and_bump("unexpected token in block");
        }
    }
}

/// Constructor body: a block in [`Phase::ConstructorBody`] where
/// `super(...)`/`this(...)` after the first statement is admitted only by
/// the flexible-constructor-body strategy.
pub(crate) fn parse_constructor_body(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Block);
    p.expect(TokenKind::LBrace);
    p.with_phase(Phase::ConstructorBody, |p| {
        let mut index = 0usize;
        while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
            if p.deadline_exceeded() {
                break;
            }
            let before = p.cursor();
            let statement = if at_constructor_invocation(p) {
                if index == 0 {
                    parse_constructor_invocation(p)
                } else {
                    let registry = p.registry();
                    if let Some(strategy) = registry.claim(
                        "flexible-constructor-body",
                        p.version(),
                        p.phase(),
                        p,
                    ) {
                        strategy.parse_construct(p)
                    } else {
                        p.feature_error("statements before an explicit constructor invocation", 25);
                        parse_constructor_invocation(p)
                    }
                }
            } else {
                parse_statement(p)
            };
            p.attach(node, statement);
            index += 1;
            if p.cursor() == before {
                p.error_and_bump("unexpected token in constructor body");
            }
        }
    });
    p.expect(TokenKind::RBrace);
    p.complete(node, start);
    node
}

/// Whether the current tokens begin `super(...)` or `this(...)`.
pub(crate) fn at_constructor_invocation(p: &Parser) -> bool {
    matches!(p.current(), TokenKind::Super | TokenKind::This) && p.nth(1) == TokenKind::LParen
}

/// Parse an explicit constructor invocation statement.
pub(crate) fn parse_constructor_invocation(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ExprStmt);
    let call = p.node(NodeKind::MethodCallExpr);
    let target_kind = if p.at(TokenKind::This) {
        NodeKind::ThisExpr
    } else {
        NodeKind::SuperExpr
    };
    let target_start = p.offset();
    let target = p.node(target_kind);
    p.advance(); // this / super
    p.complete(target, target_start);
    p.attach(call, target);
    expressions::parse_argument_list_into(p, call);
    p.complete(call, start);
    p.attach(node, call);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

// ── Statement dispatch ─────────────────────────────────────────────────

pub(crate) fn parse_statement(p: &mut Parser) -> NodeId {
    match p.current() {
        TokenKind::LBrace => parse_block(p, Phase::MethodBody),
        TokenKind::If => parse_if_stmt(p),
        TokenKind::While => parse_while_stmt(p),
        TokenKind::Do => parse_do_while_stmt(p),
        TokenKind::For => parse_for_stmt(p),
        TokenKind::Switch => parse_switch_stmt(p),
        TokenKind::Try => parse_try_stmt(p),
        TokenKind::Return => parse_return_stmt(p),
        TokenKind::Throw => parse_throw_stmt(p),
        TokenKind::Break => parse_break_stmt(p),
        TokenKind::Continue => parse_continue_stmt(p),
        TokenKind::Synchronized => parse_synchronized_stmt(p),
        TokenKind::Assert => parse_assert_stmt(p),
        TokenKind::Semicolon => {
            let start = p.offset();
            let node = p.node(NodeKind::EmptyStmt);
            p.advance();
            p.complete(node, start);
            node
        }
        TokenKind::Yield if starts_yield_statement(p) => parse_yield_stmt(p),
        kind if kind.can_be_identifier() && p.nth(1) == TokenKind::Colon => {
            parse_labeled_stmt(p)
        }
        _ if at_local_declaration(p) => parse_local_declaration(p),
        _ => parse_expression_stmt(p),
    }
}

/// `yield` reads as a statement when an expression can follow; otherwise
/// it is an ordinary identifier (`yield = 3;`, `yield.run();`).
fn starts_yield_statement(p: &Parser) -> bool {
    !matches!(
        p.nth(1),
        TokenKind::Assign
            | TokenKind::Dot
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::ColonColon
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
    )
}

fn parse_if_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::IfStmt);
    p.expect(TokenKind::If);
    p.expect(TokenKind::LParen);
    let condition = expressions::parse_expression(p);
    p.attach(node, condition);
    p.expect(TokenKind::RParen);
    let then_branch = parse_statement(p);
    p.attach(node, then_branch);
    if p.eat(TokenKind::Else) {
        let else_branch = parse_statement(p);
        p.attach(node, else_branch);
    }
    p.complete(node, start);
    node
}

fn parse_while_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::WhileStmt);
    p.expect(TokenKind::While);
    p.expect(TokenKind::LParen);
    let condition = expressions::parse_expression(p);
    p.attach(node, condition);
    p.expect(TokenKind::RParen);
    let body = parse_statement(p);
    p.attach(node, body);
    p.complete(node, start);
    node
}

fn parse_do_while_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::DoWhileStmt);
    p.expect(TokenKind::Do);
    let body = parse_statement(p);
    p.attach(node, body);
    p.expect(TokenKind::While);
    p.expect(TokenKind::LParen);
    let condition = expressions::parse_expression(p);
    p.attach(node, condition);
    p.expect(TokenKind::RParen);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

/// Classic vs enhanced `for`: a `:` at parenthesis depth one before any
/// `;` marks the enhanced form.
fn for_is_enhanced(p: &Parser) -> bool {
    let mut depth = 0usize;
    let mut i = 1; // past `for`
    loop {
        match p.nth(i) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                if depth <= 1 {
                    return false;
                }
                depth -= 1;
            }
            TokenKind::Colon if depth == 1 => return true,
            TokenKind::Semicolon if depth == 1 => return false,
            TokenKind::Eof => return false,
            _ => {}
        }
        i += 1;
    }
}

fn parse_for_stmt(p: &mut Parser) -> NodeId {
    if for_is_enhanced(p) {
        return parse_enhanced_for_stmt(p);
    }
    let start = p.offset();
    let node = p.node(NodeKind::ForStmt);
    p.expect(TokenKind::For);
    p.expect(TokenKind::LParen);

    // Children carry fixed roles for conversion: initializer statements,
    // then the condition expression (placeholder when absent), then update
    // statements, then the body. Initializer and update expressions are
    // wrapped as expression statements to keep the roles distinguishable.
    if !p.at(TokenKind::Semicolon) {
        if at_local_declaration(p) {
            let init = parse_local_declaration(p);
            p.attach(node, init);
        } else {
            loop {
                let init = wrap_expr_stmt(p);
                p.attach(node, init);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::Semicolon);
        }
    } else {
        p.advance(); // ;
    }

    if !p.at(TokenKind::Semicolon) {
        let condition = expressions::parse_expression(p);
        p.attach(node, condition);
    } else {
        let placeholder = p.missing();
        p.attach(node, placeholder);
    }
    p.expect(TokenKind::Semicolon);

    if !p.at(TokenKind::RParen) {
        loop {
            let update = wrap_expr_stmt(p);
            p.attach(node, update);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen);

    let body = parse_statement(p);
    p.attach(node, body);
    p.complete(node, start);
    node
}

/// An expression wrapped in an `ExprStmt` node, for `for`-header sections.
fn wrap_expr_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ExprStmt);
    let expression = expressions::parse_expression(p);
    p.attach(node, expression);
    p.complete(node, start);
    node
}

fn parse_enhanced_for_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::EnhancedForStmt);
    p.expect(TokenKind::For);
    p.expect(TokenKind::LParen);

    let variable = parse_loop_variable(p);
    p.attach(node, variable);
    p.expect(TokenKind::Colon);
    let iterable = expressions::parse_expression(p);
    p.attach(node, iterable);
    p.expect(TokenKind::RParen);

    let body = parse_statement(p);
    p.attach(node, body);
    p.complete(node, start);
    node
}

/// The `[final] Type name` declaration of an enhanced-for header.
fn parse_loop_variable(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::LocalVarDecl);
    let modifiers = declarations::parse_modifier_list(p);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    let ty = types::parse_type(p);
    p.attach(node, ty);
    let name = declarations::parse_name(p);
    p.attach(node, name);
    p.complete(node, start);
    node
}

fn parse_switch_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::SwitchStmt);
    p.expect(TokenKind::Switch);
    p.expect(TokenKind::LParen);
    let selector = expressions::parse_expression(p);
    p.attach(node, selector);
    p.expect(TokenKind::RParen);
    parse_switch_block_into(p, node);
    p.complete(node, start);
    node
}

/// `{ case ... }` shared by switch statements and switch expressions.
pub(crate) fn parse_switch_block_into(p: &mut Parser, node: NodeId) {
    p.expect(TokenKind::LBrace);
    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
        if p.deadline_exceeded() {
            break;
        }
        let before = p.cursor();
        let case = parse_switch_case(p);
        p.attach(node, case);
        if p.cursor() == before {
            p.error_and_bump("unexpected token in switch body");
        }
    }
    p.expect(TokenKind::RBrace);
}

/// One case group: labels, then an arrow body or colon-form statements.
fn parse_switch_case(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::SwitchCase);

    match p.current() {
        TokenKind::Case => {
            p.advance();
            loop {
                let label = parse_case_label(p);
                p.attach(node, label);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
                // `case null, default` carries a trailing default label.
                if p.eat(TokenKind::Default) {
                    break;
                }
            }
        }
        TokenKind::Default => {
            p.advance();
        }
        _ => {
            p.error("expected `case` or `default`");
        }
    }

    if p.eat(TokenKind::Arrow) {
        // Arrow body: expression statement, block, or throw.
        match p.current() {
            TokenKind::LBrace => {
                let body = parse_block(p, Phase::MethodBody);
                p.attach(node, body);
            }
            TokenKind::Throw => {
                let body = parse_throw_stmt(p);
                p.attach(node, body);
            }
            _ => {
                let body = parse_expression_stmt(p);
                p.attach(node, body);
            }
        }
    } else {
        p.expect(TokenKind::Colon);
        while !p.at_any(&[
            TokenKind::Case,
            TokenKind::Default,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]) {
            let before = p.cursor();
            let statement = parse_statement(p);
            p.attach(node, statement);
            if p.cursor() == before {
                p.error_and_bump("unexpected token in switch case");
            }
        }
    }
    p.complete(node, start);
    node
}

/// A case label: a pattern (with optional `when` guard) or a constant
/// expression.
fn parse_case_label(p: &mut Parser) -> NodeId {
    if expressions::at_pattern_start(p) && !p.at(TokenKind::Null) {
        if !p.version().supports_switch_patterns() {
            p.feature_error("patterns in switch cases", 21);
        }
        expressions::parse_guarded_pattern(p)
    } else {
        expressions::parse_conditional_expr(p)
    }
}

fn parse_try_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::TryStmt);
    p.expect(TokenKind::Try);

    if p.at(TokenKind::LParen) {
        p.advance();
        while !p.at(TokenKind::RParen) && !p.at(TokenKind::Eof) {
            let resource = parse_resource(p);
            p.attach(node, resource);
            if !p.eat(TokenKind::Semicolon) {
                break;
            }
        }
        p.expect(TokenKind::RParen);
    }

    let body = parse_block(p, Phase::MethodBody);
    p.attach(node, body);

    while p.at(TokenKind::Catch) {
        let clause = parse_catch_clause(p);
        p.attach(node, clause);
    }
    if p.at(TokenKind::Finally) {
        let clause_start = p.offset();
        let clause = p.node(NodeKind::FinallyClause);
        p.advance(); // finally
        let block = parse_block(p, Phase::MethodBody);
        p.attach(clause, block);
        p.complete(clause, clause_start);
        p.attach(node, clause);
    }
    p.complete(node, start);
    node
}

/// One try-with-resources resource: a declaration or an existing variable.
fn parse_resource(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::Resource);
    if at_local_declaration(p) {
        let modifiers = declarations::parse_modifier_list(p);
        for modifier in modifiers {
            p.attach(node, modifier);
        }
        let ty = types::parse_type(p);
        p.attach(node, ty);
        let name = declarations::parse_name(p);
        p.attach(node, name);
        p.expect(TokenKind::Assign);
        let value = expressions::parse_expression(p);
        p.attach(node, value);
    } else {
        let value = expressions::parse_expression(p);
        p.attach(node, value);
    }
    p.complete(node, start);
    node
}

fn parse_catch_clause(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::CatchClause);
    p.expect(TokenKind::Catch);
    p.expect(TokenKind::LParen);
    let modifiers = declarations::parse_modifier_list(p);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    let ty = types::parse_union_type(p);
    p.attach(node, ty);
    let name = declarations::parse_name(p);
    p.attach(node, name);
    p.expect(TokenKind::RParen);
    let body = parse_block(p, Phase::MethodBody);
    p.attach(node, body);
    p.complete(node, start);
    node
}

fn parse_return_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ReturnStmt);
    p.expect(TokenKind::Return);
    if !p.at(TokenKind::Semicolon) {
        let value = expressions::parse_expression(p);
        p.attach(node, value);
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_throw_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ThrowStmt);
    p.expect(TokenKind::Throw);
    let value = expressions::parse_expression(p);
    p.attach(node, value);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_break_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::BreakStmt);
    p.expect(TokenKind::Break);
    if p.at_identifier() {
        let label = declarations::parse_name(p);
        p.attach(node, label);
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_continue_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ContinueStmt);
    p.expect(TokenKind::Continue);
    if p.at_identifier() {
        let label = declarations::parse_name(p);
        p.attach(node, label);
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_synchronized_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::SynchronizedStmt);
    p.expect(TokenKind::Synchronized);
    p.expect(TokenKind::LParen);
    let monitor = expressions::parse_expression(p);
    p.attach(node, monitor);
    p.expect(TokenKind::RParen);
    let body = parse_block(p, Phase::MethodBody);
    p.attach(node, body);
    p.complete(node, start);
    node
}

fn parse_assert_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::AssertStmt);
    p.expect(TokenKind::Assert);
    let condition = expressions::parse_expression(p);
    p.attach(node, condition);
    if p.eat(TokenKind::Colon) {
        let message = expressions::parse_expression(p);
        p.attach(node, message);
    }
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_yield_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::YieldStmt);
    if !p.version().supports_switch_expressions() {
        p.feature_error("`yield` statements", 14);
    }
    p.expect(TokenKind::Yield);
    let value = expressions::parse_expression(p);
    p.attach(node, value);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

fn parse_labeled_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::LabeledStmt);
    let label = declarations::parse_name(p);
    p.attach(node, label);
    p.expect(TokenKind::Colon);
    let statement = parse_statement(p);
    p.attach(node, statement);
    p.complete(node, start);
    node
}

fn parse_expression_stmt(p: &mut Parser) -> NodeId {
    let start = p.offset();
    let node = p.node(NodeKind::ExprStmt);
    let expression = expressions::parse_expression(p);
    p.attach(node, expression);
    p.expect(TokenKind::Semicolon);
    p.complete(node, start);
    node
}

// ── Local declarations ─────────────────────────────────────────────────

/// Whether the statement position holds a local declaration (variable or
/// local type) rather than an expression.
fn at_local_declaration(p: &Parser) -> bool {
    match p.current() {
        TokenKind::Final => true,
        TokenKind::At if p.nth(1) != TokenKind::Interface => true,
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum => true,
        TokenKind::Static | TokenKind::Abstract => true,
        TokenKind::Record => p.nth(1).can_be_identifier(),
        TokenKind::Var => p.nth(1).can_be_identifier(),
        kind if kind.is_primitive_type() => p.nth(1) != TokenKind::Dot,
        kind if kind.can_be_identifier() => {
            let Some(i) = type_shape_end_local(p) else {
                return false;
            };
            p.nth(i).can_be_identifier()
                && matches!(
                    p.nth(i + 1),
                    TokenKind::Assign
                        | TokenKind::Semicolon
                        | TokenKind::Comma
                        | TokenKind::LBracket
                        | TokenKind::Colon
                )
        }
        _ => false,
    }
}

/// Type-shape scan for declaration detection, mirroring the expression
/// module's cast lookahead.
fn type_shape_end_local(p: &Parser) -> Option<usize> {
    let mut i = 0;
    if p.nth(i).is_primitive_type() {
        i += 1;
    } else if p.nth(i).can_be_identifier() {
        i += 1;
        loop {
            if p.nth(i) == TokenKind::Dot && p.nth(i + 1).can_be_identifier() {
                i += 2;
            } else if p.nth(i) == TokenKind::Lt {
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

/// Parse a local declaration: a local type declaration or a local variable
/// declaration with declarators.
fn parse_local_declaration(p: &mut Parser) -> NodeId {
    let modifiers = declarations::parse_modifier_list(p);

    if declarations::at_type_declaration_keyword(p) {
        p.set_pending_modifiers(modifiers);
        return declarations::parse_type_declaration(p);
    }

    let start = modifiers
        .first()
        .map(|&m| p.range_of(m).start)
        .unwrap_or_else(|| p.offset());
    let node = p.node(NodeKind::LocalVarDecl);
    for modifier in modifiers {
        p.attach(node, modifier);
    }
    let ty = types::parse_type(p);
    p.attach(node, ty);

    loop {
        let name = declarations::parse_name(p);
        p.attach(node, name);
        while p.at(TokenKind::LBracket) && p.nth(1) == TokenKind::RBracket {
            p.advance();
            p.advance();
        }
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
