//! The immutable tree node: a tagged variant keyed by the arena's
//! [`NodeKind`], with named children and copied-out strings.
//!
//! Several arena kinds share a payload shape and differ only in `kind`
//! (the five type-declaration forms all carry [`TypeDeclData`], switch
//! statements and switch expressions both carry `Switch`, and so on).
//! [`Node::children`] enumerates every child in source order through one
//! exhaustive match, which is also what keeps the visitor walk total.

use styler_arena::NodeKind;
use styler_common::span::Span;

use crate::trivia::Trivia;

/// One node of the converted tree.
///
/// Nodes are deeply immutable: fields are private, every accessor returns a
/// value or a read-only view, and equality is structural over kind, payload,
/// and range (trivia is excluded).
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    range: Span,
    leading_trivia: Vec<Trivia>,
    trailing_trivia: Vec<Trivia>,
    data: NodeData,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, range: Span, data: NodeData) -> Self {
        Self {
            kind,
            range,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            data,
        }
    }

    pub(crate) fn set_trivia(&mut self, leading: Vec<Trivia>, trailing: Vec<Trivia>) {
        self.leading_trivia = leading;
        self.trailing_trivia = trailing;
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn range(&self) -> Span {
        self.range
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    /// All child nodes in source order.
    pub fn children(&self) -> Vec<&Node> {
        self.data.children()
    }
}

impl PartialEq for Node {
    /// Structural equality over kind + payload + range; trivia does not
    /// participate.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.range == other.range && self.data == other.data
    }
}

/// One `name [= initializer]` declarator of a field or local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub initializer: Option<Node>,
}

/// One `name = value` (or bare value) argument of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArgument {
    pub name: Option<String>,
    pub value: Node,
}

/// Shared payload of the five type-declaration kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclData {
    pub modifiers: Vec<Node>,
    pub name: String,
    pub type_parameters: Vec<Node>,
    /// Extends / implements / permits types, in source order.
    pub supertypes: Vec<Node>,
    /// Record components; empty for non-records.
    pub components: Vec<Node>,
    pub members: Vec<Node>,
}

/// Shared payload of methods, constructors, and compact constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableData {
    pub modifiers: Vec<Node>,
    pub type_parameters: Vec<Node>,
    /// Absent for constructors.
    pub return_type: Option<Box<Node>>,
    pub name: String,
    pub parameters: Vec<Node>,
    pub throws: Vec<Node>,
    /// Absent for abstract and native methods.
    pub body: Option<Box<Node>>,
}

/// Refined literal category, discriminated from the lexeme at conversion
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralCategory {
    String,
    TextBlock,
    Char,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Null,
}

/// Kind-specific payload with named children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    CompilationUnit {
        package: Option<Box<Node>>,
        imports: Vec<Node>,
        declarations: Vec<Node>,
    },
    PackageDecl {
        annotations: Vec<Node>,
        name: String,
    },
    ImportDecl {
        /// Dotted name as written, `.*` included for wildcards. For module
        /// imports this is the module name.
        qualified_name: String,
        is_static: bool,
        is_wildcard: bool,
        is_module: bool,
    },
    TypeDecl(TypeDeclData),
    Callable(CallableData),
    FieldDecl {
        modifiers: Vec<Node>,
        field_type: Box<Node>,
        declarators: Vec<Declarator>,
    },
    Parameter {
        modifiers: Vec<Node>,
        param_type: Option<Box<Node>>,
        name: String,
        is_varargs: bool,
        is_final: bool,
        is_receiver: bool,
    },
    LocalVarDecl {
        modifiers: Vec<Node>,
        var_type: Box<Node>,
        declarators: Vec<Declarator>,
    },
    InitializerBlock {
        is_static: bool,
        body: Box<Node>,
    },
    EnumConstant {
        annotations: Vec<Node>,
        name: String,
        arguments: Vec<Node>,
        members: Vec<Node>,
    },
    RecordComponent {
        annotations: Vec<Node>,
        component_type: Box<Node>,
        name: String,
    },
    AnnotationElement {
        modifiers: Vec<Node>,
        element_type: Box<Node>,
        name: String,
        default_value: Option<Box<Node>>,
    },
    TypeParameter {
        annotations: Vec<Node>,
        name: String,
        bound: Option<Box<Node>>,
    },

    // ── Statements ─────────────────────────────────────────────────────
    Block {
        statements: Vec<Node>,
    },
    If {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        condition: Box<Node>,
    },
    For {
        init: Vec<Node>,
        condition: Option<Box<Node>>,
        update: Vec<Node>,
        body: Box<Node>,
    },
    EnhancedFor {
        variable: Box<Node>,
        iterable: Box<Node>,
        body: Box<Node>,
    },
    /// Shared by switch statements and switch expressions.
    Switch {
        selector: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        /// Empty for a `default` case.
        labels: Vec<Node>,
        body: Vec<Node>,
    },
    Try {
        resources: Vec<Node>,
        body: Box<Node>,
        catches: Vec<Node>,
        finally_clause: Option<Box<Node>>,
    },
    CatchClause {
        modifiers: Vec<Node>,
        exception_type: Box<Node>,
        name: String,
        body: Box<Node>,
    },
    FinallyClause {
        body: Box<Node>,
    },
    Resource {
        modifiers: Vec<Node>,
        resource_type: Option<Box<Node>>,
        name: Option<String>,
        value: Box<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    Throw {
        value: Box<Node>,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Synchronized {
        monitor: Box<Node>,
        body: Box<Node>,
    },
    Yield {
        value: Box<Node>,
    },
    ExprStmt {
        expression: Box<Node>,
    },
    Assert {
        condition: Box<Node>,
        message: Option<Box<Node>>,
    },
    Empty,
    Labeled {
        label: String,
        statement: Box<Node>,
    },

    // ── Expressions ────────────────────────────────────────────────────
    Literal {
        category: LiteralCategory,
        lexeme: String,
    },
    Identifier {
        name: String,
    },
    MethodCall {
        target: Box<Node>,
        /// Absent when the target itself names the method (`f(x)`).
        name: Option<String>,
        arguments: Vec<Node>,
    },
    FieldAccess {
        target: Box<Node>,
        name: String,
    },
    ArrayAccess {
        array: Box<Node>,
        index: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        operator: String,
        value: Box<Node>,
    },
    Binary {
        left: Box<Node>,
        operator: String,
        right: Box<Node>,
    },
    Unary {
        operator: String,
        operand: Box<Node>,
    },
    Postfix {
        operand: Box<Node>,
        operator: String,
    },
    Conditional {
        condition: Box<Node>,
        then_value: Box<Node>,
        else_value: Box<Node>,
    },
    Instanceof {
        value: Box<Node>,
        /// A type, or a pattern when pattern matching applies.
        target: Box<Node>,
    },
    Cast {
        target_type: Box<Node>,
        operand: Box<Node>,
    },
    Lambda {
        parameters: Vec<Node>,
        body: Box<Node>,
    },
    MethodRef {
        target: Box<Node>,
        name: String,
    },
    ObjectCreation {
        qualifier: Option<Box<Node>>,
        created_type: Box<Node>,
        arguments: Vec<Node>,
        /// Anonymous class members.
        members: Vec<Node>,
    },
    ArrayCreation {
        element_type: Box<Node>,
        dimensions: Vec<Node>,
        initializer: Option<Box<Node>>,
    },
    ArrayInitializer {
        elements: Vec<Node>,
    },
    Paren {
        inner: Box<Node>,
    },
    This,
    Super,
    ClassLiteral {
        target_type: Box<Node>,
    },
    Template {
        processor: Box<Node>,
        literal: Box<Node>,
    },

    // ── Patterns ───────────────────────────────────────────────────────
    /// Shared by type patterns and primitive patterns.
    TypePattern {
        modifiers: Vec<Node>,
        pattern_type: Box<Node>,
        name: Option<String>,
    },
    RecordPattern {
        modifiers: Vec<Node>,
        pattern_type: Box<Node>,
        components: Vec<Node>,
    },
    GuardedPattern {
        pattern: Box<Node>,
        guard: Box<Node>,
    },

    // ── Types ──────────────────────────────────────────────────────────
    PrimitiveType {
        name: String,
    },
    ClassType {
        annotations: Vec<Node>,
        name: String,
    },
    ArrayType {
        element_type: Box<Node>,
    },
    ParameterizedType {
        base: Box<Node>,
        arguments: Vec<Node>,
        /// Inner-class segments after the argument list.
        segments: Vec<Node>,
    },
    WildcardType {
        /// `Some(true)` for `? extends`, `Some(false)` for `? super`.
        is_upper_bound: Option<bool>,
        bound: Option<Box<Node>>,
    },
    UnionType {
        alternatives: Vec<Node>,
    },
    IntersectionType {
        bounds: Vec<Node>,
    },
    VarType,

    // ── Modifiers and annotations ──────────────────────────────────────
    Modifier {
        text: String,
    },
    Annotation {
        name: String,
        arguments: Vec<AnnotationArgument>,
    },

    // ── Modules ────────────────────────────────────────────────────────
    ModuleDecl {
        imports: Vec<Node>,
        annotations: Vec<Node>,
        name: String,
        is_open: bool,
        directives: Vec<Node>,
    },
    Requires {
        module_name: String,
        is_transitive: bool,
        is_static: bool,
    },
    /// Shared by exports and opens directives.
    PackageDirective {
        package_name: String,
        targets: Vec<String>,
    },
    Provides {
        service: String,
        implementations: Vec<String>,
    },
    Uses {
        service: String,
    },

    // ── Structural ─────────────────────────────────────────────────────
    Name {
        text: String,
    },
    /// Placeholder for a child lost to a parse error; rules treat it as a
    /// no-op region.
    Missing,
}

impl NodeData {
    /// Child nodes in source order. The match is exhaustive on purpose: a
    /// new variant fails compilation here until its children are listed.
    pub fn children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match self {
            NodeData::CompilationUnit {
                package,
                imports,
                declarations,
            } => {
                out.extend(package.as_deref());
                out.extend(imports);
                out.extend(declarations);
            }
            NodeData::PackageDecl { annotations, .. } => out.extend(annotations),
            NodeData::ImportDecl { .. } => {}
            NodeData::TypeDecl(data) => {
                out.extend(&data.modifiers);
                out.extend(&data.type_parameters);
                out.extend(&data.supertypes);
                out.extend(&data.components);
                out.extend(&data.members);
            }
            NodeData::Callable(data) => {
                out.extend(&data.modifiers);
                out.extend(&data.type_parameters);
                out.extend(data.return_type.as_deref());
                out.extend(&data.parameters);
                out.extend(&data.throws);
                out.extend(data.body.as_deref());
            }
            NodeData::FieldDecl {
                modifiers,
                field_type,
                declarators,
            }
            | NodeData::LocalVarDecl {
                modifiers,
                var_type: field_type,
                declarators,
            } => {
                out.extend(modifiers);
                out.push(field_type);
                for declarator in declarators {
                    out.extend(declarator.initializer.as_ref());
                }
            }
            NodeData::Parameter {
                modifiers,
                param_type,
                ..
            } => {
                out.extend(modifiers);
                out.extend(param_type.as_deref());
            }
            NodeData::InitializerBlock { body, .. } => out.push(body),
            NodeData::EnumConstant {
                annotations,
                arguments,
                members,
                ..
            } => {
                out.extend(annotations);
                out.extend(arguments);
                out.extend(members);
            }
            NodeData::RecordComponent {
                annotations,
                component_type,
                ..
            } => {
                out.extend(annotations);
                out.push(component_type);
            }
            NodeData::AnnotationElement {
                modifiers,
                element_type,
                default_value,
                ..
            } => {
                out.extend(modifiers);
                out.push(element_type);
                out.extend(default_value.as_deref());
            }
            NodeData::TypeParameter {
                annotations, bound, ..
            } => {
                out.extend(annotations);
                out.extend(bound.as_deref());
            }
            NodeData::Block { statements } => out.extend(statements),
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(condition);
                out.push(then_branch);
                out.extend(else_branch.as_deref());
            }
            NodeData::While { condition, body } => {
                out.push(condition);
                out.push(body);
            }
            NodeData::DoWhile { body, condition } => {
                out.push(body);
                out.push(condition);
            }
            NodeData::For {
                init,
                condition,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(condition.as_deref());
                out.extend(update);
                out.push(body);
            }
            NodeData::EnhancedFor {
                variable,
                iterable,
                body,
            } => {
                out.push(variable);
                out.push(iterable);
                out.push(body);
            }
            NodeData::Switch { selector, cases } => {
                out.push(selector);
                out.extend(cases);
            }
            NodeData::SwitchCase { labels, body } => {
                out.extend(labels);
                out.extend(body);
            }
            NodeData::Try {
                resources,
                body,
                catches,
                finally_clause,
            } => {
                out.extend(resources);
                out.push(body);
                out.extend(catches);
                out.extend(finally_clause.as_deref());
            }
            NodeData::CatchClause {
                modifiers,
                exception_type,
                body,
                ..
            } => {
                out.extend(modifiers);
                out.push(exception_type);
                out.push(body);
            }
            NodeData::FinallyClause { body } => out.push(body),
            NodeData::Resource {
                modifiers,
                resource_type,
                value,
                ..
            } => {
                out.extend(modifiers);
                out.extend(resource_type.as_deref());
                out.push(value);
            }
            NodeData::Return { value } => out.extend(value.as_deref()),
            NodeData::Throw { value } | NodeData::Yield { value } => out.push(value),
            NodeData::Break { .. } | NodeData::Continue { .. } => {}
            NodeData::Synchronized { monitor, body } => {
                out.push(monitor);
                out.push(body);
            }
            NodeData::ExprStmt { expression } => out.push(expression),
            NodeData::Assert { condition, message } => {
                out.push(condition);
                out.extend(message.as_deref());
            }
            NodeData::Empty => {}
            NodeData::Labeled { statement, .. } => out.push(statement),
            NodeData::Literal { .. } | NodeData::Identifier { .. } => {}
            NodeData::MethodCall {
                target, arguments, ..
            } => {
                out.push(target);
                out.extend(arguments);
            }
            NodeData::FieldAccess { target, .. } => out.push(target),
            NodeData::ArrayAccess { array, index } => {
                out.push(array);
                out.push(index);
            }
            NodeData::Assignment { target, value, .. } => {
                out.push(target);
                out.push(value);
            }
            NodeData::Binary { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeData::Unary { operand, .. } | NodeData::Postfix { operand, .. } => {
                out.push(operand)
            }
            NodeData::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                out.push(condition);
                out.push(then_value);
                out.push(else_value);
            }
            NodeData::Instanceof { value, target } => {
                out.push(value);
                out.push(target);
            }
            NodeData::Cast {
                target_type,
                operand,
            } => {
                out.push(target_type);
                out.push(operand);
            }
            NodeData::Lambda { parameters, body } => {
                out.extend(parameters);
                out.push(body);
            }
            NodeData::MethodRef { target, .. } => out.push(target),
            NodeData::ObjectCreation {
                qualifier,
                created_type,
                arguments,
                members,
            } => {
                out.extend(qualifier.as_deref());
                out.push(created_type);
                out.extend(arguments);
                out.extend(members);
            }
            NodeData::ArrayCreation {
                element_type,
                dimensions,
                initializer,
            } => {
                out.push(element_type);
                out.extend(dimensions);
                out.extend(initializer.as_deref());
            }
            NodeData::ArrayInitializer { elements } => out.extend(elements),
            NodeData::Paren { inner } => out.push(inner),
            NodeData::This | NodeData::Super => {}
            NodeData::ClassLiteral { target_type } => out.push(target_type),
            NodeData::Template { processor, literal } => {
                out.push(processor);
                out.push(literal);
            }
            NodeData::TypePattern {
                modifiers,
                pattern_type,
                ..
            } => {
                out.extend(modifiers);
                out.push(pattern_type);
            }
            NodeData::RecordPattern {
                modifiers,
                pattern_type,
                components,
            } => {
                out.extend(modifiers);
                out.push(pattern_type);
                out.extend(components);
            }
            NodeData::GuardedPattern { pattern, guard } => {
                out.push(pattern);
                out.push(guard);
            }
            NodeData::PrimitiveType { .. } => {}
            NodeData::ClassType { annotations, .. } => out.extend(annotations),
            NodeData::ArrayType { element_type } => out.push(element_type),
            NodeData::ParameterizedType {
                base,
                arguments,
                segments,
            } => {
                out.push(base);
                out.extend(arguments);
                out.extend(segments);
            }
            NodeData::WildcardType { bound, .. } => out.extend(bound.as_deref()),
            NodeData::UnionType { alternatives } => out.extend(alternatives),
            NodeData::IntersectionType { bounds } => out.extend(bounds),
            NodeData::VarType => {}
            NodeData::Modifier { .. } => {}
            NodeData::Annotation { arguments, .. } => {
                for argument in arguments {
                    out.push(&argument.value);
                }
            }
            NodeData::ModuleDecl {
                imports,
                annotations,
                directives,
                ..
            } => {
                out.extend(imports);
                out.extend(annotations);
                out.extend(directives);
            }
            NodeData::Requires { .. }
            | NodeData::PackageDirective { .. }
            | NodeData::Provides { .. }
            | NodeData::Uses { .. } => {}
            NodeData::Name { .. } => {}
            NodeData::Missing => {}
        }
        out
    }
}
