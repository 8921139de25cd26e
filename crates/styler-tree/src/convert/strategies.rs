//! The standard conversion strategies, one registration per arena kind.
//!
//! Strategies reconstruct named children from the arena's flat child lists
//! using kind categories and source order; the layouts they rely on are the
//! ones the parser produces. Kinds that share a payload shape share a
//! parameterized strategy type registered once per kind.

use styler_arena::{NodeId, NodeKind};
use styler_common::span::Span;

use crate::node::{
    AnnotationArgument, CallableData, Declarator, LiteralCategory, Node, NodeData, TypeDeclData,
};

use super::{ConversionRegistry, ConversionStrategy, ConvertError, Converter};

/// Build the registry covering every kind the parser emits.
pub(super) fn standard_registry() -> ConversionRegistry {
    let builder = ConversionRegistry::builder()
        .register(Box::new(CompilationUnitStrategy))
        .register(Box::new(PackageStrategy))
        .register(Box::new(ImportStrategy))
        .register(Box::new(TypeDeclStrategy(NodeKind::ClassDecl)))
        .register(Box::new(TypeDeclStrategy(NodeKind::InterfaceDecl)))
        .register(Box::new(TypeDeclStrategy(NodeKind::EnumDecl)))
        .register(Box::new(TypeDeclStrategy(NodeKind::RecordDecl)))
        .register(Box::new(TypeDeclStrategy(NodeKind::AnnotationDecl)))
        .register(Box::new(CallableStrategy(NodeKind::MethodDecl)))
        .register(Box::new(CallableStrategy(NodeKind::ConstructorDecl)))
        .register(Box::new(CallableStrategy(NodeKind::CompactConstructorDecl)))
        .register(Box::new(VariableDeclStrategy(NodeKind::FieldDecl)))
        .register(Box::new(VariableDeclStrategy(NodeKind::LocalVarDecl)))
        .register(Box::new(ParameterStrategy))
        .register(Box::new(InitializerStrategy))
        .register(Box::new(EnumConstantStrategy))
        .register(Box::new(RecordComponentStrategy))
        .register(Box::new(AnnotationElementStrategy))
        .register(Box::new(TypeParameterStrategy))
        .register(Box::new(BlockStrategy))
        .register(Box::new(IfStrategy))
        .register(Box::new(WhileStrategy))
        .register(Box::new(DoWhileStrategy))
        .register(Box::new(ForStrategy))
        .register(Box::new(EnhancedForStrategy))
        .register(Box::new(SwitchStrategy(NodeKind::SwitchStmt)))
        .register(Box::new(SwitchStrategy(NodeKind::SwitchExpr)))
        .register(Box::new(SwitchCaseStrategy))
        .register(Box::new(TryStrategy))
        .register(Box::new(CatchStrategy))
        .register(Box::new(FinallyStrategy))
        .register(Box::new(ResourceStrategy))
        .register(Box::new(ReturnStrategy))
        .register(Box::new(ThrowStrategy))
        .register(Box::new(JumpStrategy(NodeKind::BreakStmt)))
        .register(Box::new(JumpStrategy(NodeKind::ContinueStmt)))
        .register(Box::new(SynchronizedStrategy))
        .register(Box::new(YieldStrategy))
        .register(Box::new(ExprStmtStrategy))
        .register(Box::new(AssertStrategy))
        .register(Box::new(EmptyStrategy))
        .register(Box::new(LabeledStrategy))
        .register(Box::new(LiteralStrategy))
        .register(Box::new(IdentifierStrategy))
        .register(Box::new(MethodCallStrategy))
        .register(Box::new(FieldAccessStrategy))
        .register(Box::new(ArrayAccessStrategy))
        .register(Box::new(AssignmentStrategy))
        .register(Box::new(BinaryStrategy))
        .register(Box::new(UnaryStrategy))
        .register(Box::new(PostfixStrategy))
        .register(Box::new(ConditionalStrategy))
        .register(Box::new(InstanceofStrategy))
        .register(Box::new(CastStrategy))
        .register(Box::new(LambdaStrategy))
        .register(Box::new(MethodRefStrategy))
        .register(Box::new(ObjectCreationStrategy))
        .register(Box::new(ArrayCreationStrategy))
        .register(Box::new(ArrayInitializerStrategy))
        .register(Box::new(ParenStrategy))
        .register(Box::new(KeywordExprStrategy(NodeKind::ThisExpr)))
        .register(Box::new(KeywordExprStrategy(NodeKind::SuperExpr)))
        .register(Box::new(ClassLiteralStrategy))
        .register(Box::new(TemplateStrategy))
        .register(Box::new(TypePatternStrategy(NodeKind::TypePattern)))
        .register(Box::new(TypePatternStrategy(NodeKind::PrimitivePattern)))
        .register(Box::new(RecordPatternStrategy))
        .register(Box::new(GuardedPatternStrategy))
        .register(Box::new(PrimitiveTypeStrategy))
        .register(Box::new(ClassTypeStrategy))
        .register(Box::new(ArrayTypeStrategy))
        .register(Box::new(ParameterizedTypeStrategy))
        .register(Box::new(WildcardStrategy))
        .register(Box::new(UnionTypeStrategy))
        .register(Box::new(IntersectionTypeStrategy))
        .register(Box::new(VarTypeStrategy))
        .register(Box::new(ModifierStrategy))
        .register(Box::new(AnnotationStrategy))
        .register(Box::new(ModuleDeclStrategy))
        .register(Box::new(RequiresStrategy))
        .register(Box::new(PackageDirectiveStrategy(NodeKind::ExportsDirective)))
        .register(Box::new(PackageDirectiveStrategy(NodeKind::OpensDirective)))
        .register(Box::new(ProvidesStrategy))
        .register(Box::new(UsesStrategy))
        .register(Box::new(NameStrategy))
        .register(Box::new(MissingStrategy));
    builder
        .build()
        .expect("the standard registry has no duplicate kinds")
}

// ── Shared helpers ─────────────────────────────────────────────────────

fn is_modifierish(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Modifier | NodeKind::Annotation)
}

fn is_type_like(kind: NodeKind) -> bool {
    kind.is_type()
}

fn convert_all(cx: &Converter<'_>, ids: &[NodeId]) -> Result<Vec<Node>, ConvertError> {
    ids.iter().map(|&id| cx.convert_node(id)).collect()
}

/// Source text of a `Name` node, trimmed.
fn name_text(cx: &Converter<'_>, id: NodeId) -> Result<String, ConvertError> {
    Ok(cx.text_of(id)?.trim().to_string())
}

/// Operator text between two byte offsets, trimmed of whitespace.
fn operator_between(cx: &Converter<'_>, from: u32, to: u32) -> String {
    cx.source_text(Span::new(from, to)).trim().to_string()
}

/// Split leading modifiers/annotations off a child list.
fn split_modifiers(
    cx: &Converter<'_>,
    children: &[NodeId],
) -> Result<(Vec<Node>, Vec<NodeId>), ConvertError> {
    let mut modifiers = Vec::new();
    let mut rest = Vec::new();
    let mut in_prefix = true;
    for &child in children {
        if in_prefix && is_modifierish(cx.kind(child)?) {
            modifiers.push(cx.convert_node(child)?);
        } else {
            in_prefix = false;
            rest.push(child);
        }
    }
    Ok((modifiers, rest))
}

// ── Compilation unit ───────────────────────────────────────────────────

struct CompilationUnitStrategy;

impl ConversionStrategy for CompilationUnitStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::CompilationUnit
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut declarations = Vec::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::PackageDecl => package = Some(Box::new(cx.convert_node(child)?)),
                NodeKind::ImportDecl => imports.push(cx.convert_node(child)?),
                _ => declarations.push(cx.convert_node(child)?),
            }
        }
        Ok(Node::new(
            NodeKind::CompilationUnit,
            cx.range(id)?,
            NodeData::CompilationUnit {
                package,
                imports,
                declarations,
            },
        ))
    }
}

struct PackageStrategy;

impl ConversionStrategy for PackageStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::PackageDecl
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut annotations = Vec::new();
        let mut name = String::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => name = name_text(cx, child)?,
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in package declaration"),
                    ))
                }
            }
        }
        Ok(Node::new(
            NodeKind::PackageDecl,
            cx.range(id)?,
            NodeData::PackageDecl { annotations, name },
        ))
    }
}

struct ImportStrategy;

impl ConversionStrategy for ImportStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ImportDecl
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let data = if let Some(attr) = cx.attrs().module_import(id) {
            NodeData::ImportDecl {
                qualified_name: attr.module_name.clone(),
                is_static: false,
                is_wildcard: false,
                is_module: true,
            }
        } else if let Some(attr) = cx.attrs().import(id) {
            NodeData::ImportDecl {
                qualified_name: attr.qualified_name.clone(),
                is_static: attr.is_static,
                is_wildcard: attr.is_wildcard,
                is_module: false,
            }
        } else {
            return Err(cx.structure_error(id, "import node without an import attribute"));
        };
        Ok(Node::new(NodeKind::ImportDecl, cx.range(id)?, data))
    }
}

// ── Declarations ───────────────────────────────────────────────────────

struct TypeDeclStrategy(NodeKind);

impl ConversionStrategy for TypeDeclStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut name = cx.attrs().type_name(id).unwrap_or_default().to_string();
        let mut type_parameters = Vec::new();
        let mut supertypes = Vec::new();
        let mut components = Vec::new();
        let mut members = Vec::new();

        for child in rest {
            match cx.kind(child)? {
                NodeKind::Name => {
                    if name.is_empty() {
                        name = name_text(cx, child)?;
                    }
                }
                NodeKind::TypeParameter => type_parameters.push(cx.convert_node(child)?),
                NodeKind::RecordComponent => components.push(cx.convert_node(child)?),
                kind if is_type_like(kind) => supertypes.push(cx.convert_node(child)?),
                _ => members.push(cx.convert_node(child)?),
            }
        }

        Ok(Node::new(
            self.0,
            cx.range(id)?,
            NodeData::TypeDecl(TypeDeclData {
                modifiers,
                name,
                type_parameters,
                supertypes,
                components,
                members,
            }),
        ))
    }
}

struct CallableStrategy(NodeKind);

impl ConversionStrategy for CallableStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut type_parameters = Vec::new();
        let mut return_type = None;
        let mut name = String::new();
        let mut seen_name = false;
        let mut parameters = Vec::new();
        let mut throws = Vec::new();
        let mut body = None;

        for child in rest {
            match cx.kind(child)? {
                NodeKind::TypeParameter => type_parameters.push(cx.convert_node(child)?),
                NodeKind::Name => {
                    name = name_text(cx, child)?;
                    seen_name = true;
                }
                NodeKind::Parameter => parameters.push(cx.convert_node(child)?),
                NodeKind::Block => body = Some(Box::new(cx.convert_node(child)?)),
                kind if is_type_like(kind) => {
                    if seen_name {
                        throws.push(cx.convert_node(child)?);
                    } else {
                        return_type = Some(Box::new(cx.convert_node(child)?));
                    }
                }
                // Recovery artifacts from broken members are no-op regions.
                kind if kind == NodeKind::Missing
                    || kind == NodeKind::Annotation
                    || kind == NodeKind::ArrayInitializer
                    || kind.is_expression() => {}
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in callable declaration"),
                    ))
                }
            }
        }

        Ok(Node::new(
            self.0,
            cx.range(id)?,
            NodeData::Callable(CallableData {
                modifiers,
                type_parameters,
                return_type,
                name,
                parameters,
                throws,
                body,
            }),
        ))
    }
}

struct VariableDeclStrategy(NodeKind);

impl ConversionStrategy for VariableDeclStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut rest_iter = rest.into_iter();
        let ty = rest_iter
            .next()
            .ok_or_else(|| cx.structure_error(id, "variable declaration without a type"))?;
        let ty = Box::new(cx.convert_node(ty)?);

        let mut declarators: Vec<Declarator> = Vec::new();
        for child in rest_iter {
            match cx.kind(child)? {
                NodeKind::Name => declarators.push(Declarator {
                    name: name_text(cx, child)?,
                    initializer: None,
                }),
                _ => {
                    let value = cx.convert_node(child)?;
                    match declarators.last_mut() {
                        Some(declarator) => declarator.initializer = Some(value),
                        None => {
                            return Err(cx
                                .structure_error(id, "initializer before any declarator name"))
                        }
                    }
                }
            }
        }

        let data = if self.0 == NodeKind::FieldDecl {
            NodeData::FieldDecl {
                modifiers,
                field_type: ty,
                declarators,
            }
        } else {
            NodeData::LocalVarDecl {
                modifiers,
                var_type: ty,
                declarators,
            }
        };
        Ok(Node::new(self.0, cx.range(id)?, data))
    }
}

struct ParameterStrategy;

impl ConversionStrategy for ParameterStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Parameter
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = cx
            .attrs()
            .parameter(id)
            .ok_or_else(|| cx.structure_error(id, "parameter node without parameter metadata"))?
            .clone();
        let mut modifiers = Vec::new();
        let mut param_type = None;
        for child in cx.children(id)? {
            match cx.kind(child)? {
                kind if is_modifierish(kind) => modifiers.push(cx.convert_node(child)?),
                NodeKind::Name => {}
                _ => param_type = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        Ok(Node::new(
            NodeKind::Parameter,
            cx.range(id)?,
            NodeData::Parameter {
                modifiers,
                param_type,
                name: attr.name,
                is_varargs: attr.is_varargs,
                is_final: attr.is_final,
                is_receiver: attr.is_receiver,
            },
        ))
    }
}

struct InitializerStrategy;

impl ConversionStrategy for InitializerStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::InitializerBlock
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut is_static = false;
        let mut body = None;
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Modifier => {
                    is_static |= cx.text_of(child)? == "static";
                }
                NodeKind::Annotation => {}
                NodeKind::Block => body = Some(Box::new(cx.convert_node(child)?)),
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in initializer block"),
                    ))
                }
            }
        }
        let body =
            body.ok_or_else(|| cx.structure_error(id, "initializer block without a body"))?;
        Ok(Node::new(
            NodeKind::InitializerBlock,
            cx.range(id)?,
            NodeData::InitializerBlock { is_static, body },
        ))
    }
}

struct EnumConstantStrategy;

impl ConversionStrategy for EnumConstantStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::EnumConstant
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut annotations = Vec::new();
        let mut name = String::new();
        let mut arguments = Vec::new();
        let mut members = Vec::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => name = name_text(cx, child)?,
                kind if kind.is_expression() => arguments.push(cx.convert_node(child)?),
                _ => members.push(cx.convert_node(child)?),
            }
        }
        Ok(Node::new(
            NodeKind::EnumConstant,
            cx.range(id)?,
            NodeData::EnumConstant {
                annotations,
                name,
                arguments,
                members,
            },
        ))
    }
}

struct RecordComponentStrategy;

impl ConversionStrategy for RecordComponentStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::RecordComponent
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut annotations = Vec::new();
        let mut component_type = None;
        let mut name = String::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => name = name_text(cx, child)?,
                _ => component_type = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        let component_type = component_type
            .ok_or_else(|| cx.structure_error(id, "record component without a type"))?;
        Ok(Node::new(
            NodeKind::RecordComponent,
            cx.range(id)?,
            NodeData::RecordComponent {
                annotations,
                component_type,
                name,
            },
        ))
    }
}

struct AnnotationElementStrategy;

impl ConversionStrategy for AnnotationElementStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::AnnotationElement
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut element_type = None;
        let mut name = String::new();
        let mut default_value = None;
        for child in rest {
            match cx.kind(child)? {
                NodeKind::Name => name = name_text(cx, child)?,
                kind if is_type_like(kind) && element_type.is_none() => {
                    element_type = Some(Box::new(cx.convert_node(child)?));
                }
                _ => default_value = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        let element_type = element_type
            .ok_or_else(|| cx.structure_error(id, "annotation element without a type"))?;
        Ok(Node::new(
            NodeKind::AnnotationElement,
            cx.range(id)?,
            NodeData::AnnotationElement {
                modifiers,
                element_type,
                name,
                default_value,
            },
        ))
    }
}

struct TypeParameterStrategy;

impl ConversionStrategy for TypeParameterStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::TypeParameter
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut annotations = Vec::new();
        let mut name = String::new();
        let mut bound = None;
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => name = name_text(cx, child)?,
                _ => bound = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        Ok(Node::new(
            NodeKind::TypeParameter,
            cx.range(id)?,
            NodeData::TypeParameter {
                annotations,
                name,
                bound,
            },
        ))
    }
}

// ── Statements ─────────────────────────────────────────────────────────

/// Positional child access with a structural fault on underflow.
fn child_at(
    cx: &Converter<'_>,
    id: NodeId,
    children: &[NodeId],
    index: usize,
    what: &str,
) -> Result<Node, ConvertError> {
    match children.get(index) {
        Some(&child) => cx.convert_node(child),
        None => Err(cx.structure_error(id, format!("missing {what}"))),
    }
}

struct BlockStrategy;

impl ConversionStrategy for BlockStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let statements = convert_all(cx, &cx.children(id)?)?;
        Ok(Node::new(
            NodeKind::Block,
            cx.range(id)?,
            NodeData::Block { statements },
        ))
    }
}

struct IfStrategy;

impl ConversionStrategy for IfStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::IfStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let condition = Box::new(child_at(cx, id, &children, 0, "if condition")?);
        let then_branch = Box::new(child_at(cx, id, &children, 1, "if body")?);
        let else_branch = match children.get(2) {
            Some(&child) => Some(Box::new(cx.convert_node(child)?)),
            None => None,
        };
        Ok(Node::new(
            NodeKind::IfStmt,
            cx.range(id)?,
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            },
        ))
    }
}

struct WhileStrategy;

impl ConversionStrategy for WhileStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::WhileStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::WhileStmt,
            cx.range(id)?,
            NodeData::While {
                condition: Box::new(child_at(cx, id, &children, 0, "while condition")?),
                body: Box::new(child_at(cx, id, &children, 1, "while body")?),
            },
        ))
    }
}

struct DoWhileStrategy;

impl ConversionStrategy for DoWhileStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::DoWhileStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::DoWhileStmt,
            cx.range(id)?,
            NodeData::DoWhile {
                body: Box::new(child_at(cx, id, &children, 0, "do-while body")?),
                condition: Box::new(child_at(cx, id, &children, 1, "do-while condition")?),
            },
        ))
    }
}

struct ForStrategy;

impl ConversionStrategy for ForStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ForStmt
    }

    /// Children carry fixed roles: initializer statements, the condition
    /// slot (a `Missing` placeholder when absent), update statements, body.
    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        if children.len() < 2 {
            return Err(cx.structure_error(id, "for statement without condition and body"));
        }
        let condition_index = {
            let mut found = None;
            for (i, &child) in children.iter().enumerate() {
                let kind = cx.kind(child)?;
                if kind.is_expression() || kind == NodeKind::Missing {
                    found = Some(i);
                    break;
                }
            }
            found.ok_or_else(|| cx.structure_error(id, "for statement without a condition slot"))?
        };

        let init = convert_all(cx, &children[..condition_index])?;
        let condition = {
            let child = children[condition_index];
            if cx.kind(child)? == NodeKind::Missing {
                None
            } else {
                Some(Box::new(cx.convert_node(child)?))
            }
        };
        let body_index = children.len() - 1;
        let update = convert_all(cx, &children[condition_index + 1..body_index])?;
        let body = Box::new(child_at(cx, id, &children, body_index, "for body")?);

        Ok(Node::new(
            NodeKind::ForStmt,
            cx.range(id)?,
            NodeData::For {
                init,
                condition,
                update,
                body,
            },
        ))
    }
}

struct EnhancedForStrategy;

impl ConversionStrategy for EnhancedForStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::EnhancedForStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::EnhancedForStmt,
            cx.range(id)?,
            NodeData::EnhancedFor {
                variable: Box::new(child_at(cx, id, &children, 0, "loop variable")?),
                iterable: Box::new(child_at(cx, id, &children, 1, "loop iterable")?),
                body: Box::new(child_at(cx, id, &children, 2, "loop body")?),
            },
        ))
    }
}

struct SwitchStrategy(NodeKind);

impl ConversionStrategy for SwitchStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let selector = Box::new(child_at(cx, id, &children, 0, "switch selector")?);
        let cases = convert_all(cx, children.get(1..).unwrap_or_default())?;
        Ok(Node::new(
            self.0,
            cx.range(id)?,
            NodeData::Switch { selector, cases },
        ))
    }
}

struct SwitchCaseStrategy;

impl ConversionStrategy for SwitchCaseStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::SwitchCase
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut labels = Vec::new();
        let mut body = Vec::new();
        for child in cx.children(id)? {
            let kind = cx.kind(child)?;
            if kind.is_expression() || kind.is_pattern() {
                labels.push(cx.convert_node(child)?);
            } else {
                body.push(cx.convert_node(child)?);
            }
        }
        Ok(Node::new(
            NodeKind::SwitchCase,
            cx.range(id)?,
            NodeData::SwitchCase { labels, body },
        ))
    }
}

struct TryStrategy;

impl ConversionStrategy for TryStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::TryStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut resources = Vec::new();
        let mut body = None;
        let mut catches = Vec::new();
        let mut finally_clause = None;
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Resource => resources.push(cx.convert_node(child)?),
                NodeKind::Block if body.is_none() => {
                    body = Some(Box::new(cx.convert_node(child)?));
                }
                NodeKind::CatchClause => catches.push(cx.convert_node(child)?),
                NodeKind::FinallyClause => {
                    finally_clause = Some(Box::new(cx.convert_node(child)?));
                }
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in try statement"),
                    ))
                }
            }
        }
        let body = body.ok_or_else(|| cx.structure_error(id, "try statement without a body"))?;
        Ok(Node::new(
            NodeKind::TryStmt,
            cx.range(id)?,
            NodeData::Try {
                resources,
                body,
                catches,
                finally_clause,
            },
        ))
    }
}

struct CatchStrategy;

impl ConversionStrategy for CatchStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::CatchClause
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut exception_type = None;
        let mut name = String::new();
        let mut body = None;
        for child in rest {
            match cx.kind(child)? {
                NodeKind::Name => name = name_text(cx, child)?,
                NodeKind::Block => body = Some(Box::new(cx.convert_node(child)?)),
                _ => exception_type = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        let exception_type = exception_type
            .ok_or_else(|| cx.structure_error(id, "catch clause without an exception type"))?;
        let body = body.ok_or_else(|| cx.structure_error(id, "catch clause without a body"))?;
        Ok(Node::new(
            NodeKind::CatchClause,
            cx.range(id)?,
            NodeData::CatchClause {
                modifiers,
                exception_type,
                name,
                body,
            },
        ))
    }
}

struct FinallyStrategy;

impl ConversionStrategy for FinallyStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::FinallyClause
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::FinallyClause,
            cx.range(id)?,
            NodeData::FinallyClause {
                body: Box::new(child_at(cx, id, &children, 0, "finally body")?),
            },
        ))
    }
}

struct ResourceStrategy;

impl ConversionStrategy for ResourceStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Resource
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut resource_type = None;
        let mut name = None;
        let mut value = None;
        for child in rest {
            match cx.kind(child)? {
                NodeKind::Name => name = Some(name_text(cx, child)?),
                kind if is_type_like(kind) => {
                    resource_type = Some(Box::new(cx.convert_node(child)?));
                }
                _ => value = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        let value = value.ok_or_else(|| cx.structure_error(id, "resource without a value"))?;
        Ok(Node::new(
            NodeKind::Resource,
            cx.range(id)?,
            NodeData::Resource {
                modifiers,
                resource_type,
                name,
                value,
            },
        ))
    }
}

struct ReturnStrategy;

impl ConversionStrategy for ReturnStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ReturnStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let value = match children.first() {
            Some(&child) => Some(Box::new(cx.convert_node(child)?)),
            None => None,
        };
        Ok(Node::new(
            NodeKind::ReturnStmt,
            cx.range(id)?,
            NodeData::Return { value },
        ))
    }
}

struct ThrowStrategy;

impl ConversionStrategy for ThrowStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ThrowStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ThrowStmt,
            cx.range(id)?,
            NodeData::Throw {
                value: Box::new(child_at(cx, id, &children, 0, "thrown value")?),
            },
        ))
    }
}

struct JumpStrategy(NodeKind);

impl ConversionStrategy for JumpStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let label = match children.first() {
            Some(&child) => Some(name_text(cx, child)?),
            None => None,
        };
        let data = if self.0 == NodeKind::BreakStmt {
            NodeData::Break { label }
        } else {
            NodeData::Continue { label }
        };
        Ok(Node::new(self.0, cx.range(id)?, data))
    }
}

struct SynchronizedStrategy;

impl ConversionStrategy for SynchronizedStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::SynchronizedStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::SynchronizedStmt,
            cx.range(id)?,
            NodeData::Synchronized {
                monitor: Box::new(child_at(cx, id, &children, 0, "monitor expression")?),
                body: Box::new(child_at(cx, id, &children, 1, "synchronized body")?),
            },
        ))
    }
}

struct YieldStrategy;

impl ConversionStrategy for YieldStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::YieldStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::YieldStmt,
            cx.range(id)?,
            NodeData::Yield {
                value: Box::new(child_at(cx, id, &children, 0, "yielded value")?),
            },
        ))
    }
}

struct ExprStmtStrategy;

impl ConversionStrategy for ExprStmtStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ExprStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ExprStmt,
            cx.range(id)?,
            NodeData::ExprStmt {
                expression: Box::new(child_at(cx, id, &children, 0, "statement expression")?),
            },
        ))
    }
}

struct AssertStrategy;

impl ConversionStrategy for AssertStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::AssertStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let condition = Box::new(child_at(cx, id, &children, 0, "assert condition")?);
        let message = match children.get(1) {
            Some(&child) => Some(Box::new(cx.convert_node(child)?)),
            None => None,
        };
        Ok(Node::new(
            NodeKind::AssertStmt,
            cx.range(id)?,
            NodeData::Assert { condition, message },
        ))
    }
}

struct EmptyStrategy;

impl ConversionStrategy for EmptyStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::EmptyStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(NodeKind::EmptyStmt, cx.range(id)?, NodeData::Empty))
    }
}

struct LabeledStrategy;

impl ConversionStrategy for LabeledStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::LabeledStmt
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let label = match children.first() {
            Some(&child) => name_text(cx, child)?,
            None => return Err(cx.structure_error(id, "labeled statement without a label")),
        };
        Ok(Node::new(
            NodeKind::LabeledStmt,
            cx.range(id)?,
            NodeData::Labeled {
                label,
                statement: Box::new(child_at(cx, id, &children, 1, "labeled statement body")?),
            },
        ))
    }
}

// ── Expressions ────────────────────────────────────────────────────────

struct LiteralStrategy;

impl ConversionStrategy for LiteralStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::LiteralExpr
    }

    /// The single literal kind is refined here by lexeme inspection; this
    /// is the canonical one-kind-one-strategy mapping with a second-pass
    /// discrimination on the source text.
    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let lexeme = cx.text_of(id)?.to_string();
        let category = classify_literal(&lexeme);
        Ok(Node::new(
            NodeKind::LiteralExpr,
            cx.range(id)?,
            NodeData::Literal { category, lexeme },
        ))
    }
}

fn classify_literal(lexeme: &str) -> LiteralCategory {
    if lexeme.starts_with("\"\"\"") {
        return LiteralCategory::TextBlock;
    }
    if lexeme.starts_with('"') {
        return LiteralCategory::String;
    }
    if lexeme.starts_with('\'') {
        return LiteralCategory::Char;
    }
    match lexeme {
        "true" | "false" => return LiteralCategory::Boolean,
        "null" => return LiteralCategory::Null,
        _ => {}
    }
    if lexeme.starts_with("0x") || lexeme.starts_with("0X") || lexeme.starts_with("0b")
        || lexeme.starts_with("0B")
    {
        if lexeme.ends_with('l') || lexeme.ends_with('L') {
            return LiteralCategory::Long;
        }
        return LiteralCategory::Int;
    }
    if lexeme.ends_with('f') || lexeme.ends_with('F') {
        return LiteralCategory::Float;
    }
    if lexeme.ends_with('d') || lexeme.ends_with('D') {
        return LiteralCategory::Double;
    }
    if lexeme.ends_with('l') || lexeme.ends_with('L') {
        return LiteralCategory::Long;
    }
    if lexeme.contains('.') || lexeme.contains('e') || lexeme.contains('E') {
        return LiteralCategory::Double;
    }
    LiteralCategory::Int
}

struct IdentifierStrategy;

impl ConversionStrategy for IdentifierStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::IdentifierExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(
            NodeKind::IdentifierExpr,
            cx.range(id)?,
            NodeData::Identifier {
                name: cx.text_of(id)?.to_string(),
            },
        ))
    }
}

struct MethodCallStrategy;

impl ConversionStrategy for MethodCallStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::MethodCallExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let mut iter = children.iter();
        let target = match iter.next() {
            Some(&child) => Box::new(cx.convert_node(child)?),
            None => return Err(cx.structure_error(id, "method call without a target")),
        };
        let mut name = None;
        let mut arguments = Vec::new();
        for &child in iter {
            match cx.kind(child)? {
                NodeKind::Name => name = Some(name_text(cx, child)?),
                // Explicit type arguments are not interesting to rules.
                kind if is_type_like(kind) => {}
                _ => arguments.push(cx.convert_node(child)?),
            }
        }
        Ok(Node::new(
            NodeKind::MethodCallExpr,
            cx.range(id)?,
            NodeData::MethodCall {
                target,
                name,
                arguments,
            },
        ))
    }
}

struct FieldAccessStrategy;

impl ConversionStrategy for FieldAccessStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::FieldAccessExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let target = Box::new(child_at(cx, id, &children, 0, "field access target")?);
        let name = match children.get(1) {
            Some(&child) => name_text(cx, child)?,
            None => return Err(cx.structure_error(id, "field access without a member name")),
        };
        Ok(Node::new(
            NodeKind::FieldAccessExpr,
            cx.range(id)?,
            NodeData::FieldAccess { target, name },
        ))
    }
}

struct ArrayAccessStrategy;

impl ConversionStrategy for ArrayAccessStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayAccessExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ArrayAccessExpr,
            cx.range(id)?,
            NodeData::ArrayAccess {
                array: Box::new(child_at(cx, id, &children, 0, "array expression")?),
                index: Box::new(child_at(cx, id, &children, 1, "index expression")?),
            },
        ))
    }
}

struct AssignmentStrategy;

impl ConversionStrategy for AssignmentStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::AssignmentExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let target = child_at(cx, id, &children, 0, "assignment target")?;
        let value = child_at(cx, id, &children, 1, "assignment value")?;
        let operator = operator_between(cx, target.range().end, value.range().start);
        Ok(Node::new(
            NodeKind::AssignmentExpr,
            cx.range(id)?,
            NodeData::Assignment {
                target: Box::new(target),
                operator,
                value: Box::new(value),
            },
        ))
    }
}

struct BinaryStrategy;

impl ConversionStrategy for BinaryStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::BinaryExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let left = child_at(cx, id, &children, 0, "left operand")?;
        let right = child_at(cx, id, &children, 1, "right operand")?;
        let operator = operator_between(cx, left.range().end, right.range().start);
        Ok(Node::new(
            NodeKind::BinaryExpr,
            cx.range(id)?,
            NodeData::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
        ))
    }
}

struct UnaryStrategy;

impl ConversionStrategy for UnaryStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::UnaryExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let range = cx.range(id)?;
        let children = cx.children(id)?;
        let operand = child_at(cx, id, &children, 0, "unary operand")?;
        let operator = operator_between(cx, range.start, operand.range().start);
        Ok(Node::new(
            NodeKind::UnaryExpr,
            range,
            NodeData::Unary {
                operator,
                operand: Box::new(operand),
            },
        ))
    }
}

struct PostfixStrategy;

impl ConversionStrategy for PostfixStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::PostfixExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let range = cx.range(id)?;
        let children = cx.children(id)?;
        let operand = child_at(cx, id, &children, 0, "postfix operand")?;
        let operator = operator_between(cx, operand.range().end, range.end);
        Ok(Node::new(
            NodeKind::PostfixExpr,
            range,
            NodeData::Postfix {
                operand: Box::new(operand),
                operator,
            },
        ))
    }
}

struct ConditionalStrategy;

impl ConversionStrategy for ConditionalStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ConditionalExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ConditionalExpr,
            cx.range(id)?,
            NodeData::Conditional {
                condition: Box::new(child_at(cx, id, &children, 0, "condition")?),
                then_value: Box::new(child_at(cx, id, &children, 1, "then value")?),
                else_value: Box::new(child_at(cx, id, &children, 2, "else value")?),
            },
        ))
    }
}

struct InstanceofStrategy;

impl ConversionStrategy for InstanceofStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::InstanceofExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::InstanceofExpr,
            cx.range(id)?,
            NodeData::Instanceof {
                value: Box::new(child_at(cx, id, &children, 0, "tested value")?),
                target: Box::new(child_at(cx, id, &children, 1, "type or pattern")?),
            },
        ))
    }
}

struct CastStrategy;

impl ConversionStrategy for CastStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::CastExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::CastExpr,
            cx.range(id)?,
            NodeData::Cast {
                target_type: Box::new(child_at(cx, id, &children, 0, "cast type")?),
                operand: Box::new(child_at(cx, id, &children, 1, "cast operand")?),
            },
        ))
    }
}

struct LambdaStrategy;

impl ConversionStrategy for LambdaStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::LambdaExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        if children.is_empty() {
            return Err(cx.structure_error(id, "lambda without a body"));
        }
        let (parameter_ids, body_id) = children.split_at(children.len() - 1);
        let parameters = convert_all(cx, parameter_ids)?;
        let body = Box::new(cx.convert_node(body_id[0])?);
        Ok(Node::new(
            NodeKind::LambdaExpr,
            cx.range(id)?,
            NodeData::Lambda { parameters, body },
        ))
    }
}

struct MethodRefStrategy;

impl ConversionStrategy for MethodRefStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::MethodRefExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let target = Box::new(child_at(cx, id, &children, 0, "method reference target")?);
        let mut name = String::new();
        for &child in children.get(1..).unwrap_or_default() {
            if cx.kind(child)? == NodeKind::Name {
                name = name_text(cx, child)?;
            }
        }
        Ok(Node::new(
            NodeKind::MethodRefExpr,
            cx.range(id)?,
            NodeData::MethodRef { target, name },
        ))
    }
}

struct ObjectCreationStrategy;

impl ConversionStrategy for ObjectCreationStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ObjectCreationExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut qualifier = None;
        let mut created_type = None;
        let mut arguments = Vec::new();
        let mut members = Vec::new();
        for child in cx.children(id)? {
            let kind = cx.kind(child)?;
            if is_type_like(kind) && created_type.is_none() {
                created_type = Some(Box::new(cx.convert_node(child)?));
            } else if created_type.is_none() {
                qualifier = Some(Box::new(cx.convert_node(child)?));
            } else if kind.is_expression() || kind == NodeKind::Missing {
                arguments.push(cx.convert_node(child)?);
            } else {
                members.push(cx.convert_node(child)?);
            }
        }
        let created_type = created_type
            .ok_or_else(|| cx.structure_error(id, "object creation without a type"))?;
        Ok(Node::new(
            NodeKind::ObjectCreationExpr,
            cx.range(id)?,
            NodeData::ObjectCreation {
                qualifier,
                created_type,
                arguments,
                members,
            },
        ))
    }
}

struct ArrayCreationStrategy;

impl ConversionStrategy for ArrayCreationStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayCreationExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut element_type = None;
        let mut dimensions = Vec::new();
        let mut initializer = None;
        for child in cx.children(id)? {
            match cx.kind(child)? {
                kind if is_type_like(kind) && element_type.is_none() => {
                    element_type = Some(Box::new(cx.convert_node(child)?));
                }
                NodeKind::ArrayInitializer => {
                    initializer = Some(Box::new(cx.convert_node(child)?));
                }
                kind if kind.is_expression() => {
                    if element_type.is_some() {
                        dimensions.push(cx.convert_node(child)?);
                    }
                    // A leading expression is the qualifier of a qualified
                    // creation; array creation has no use for it.
                }
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in array creation"),
                    ))
                }
            }
        }
        let element_type = element_type
            .ok_or_else(|| cx.structure_error(id, "array creation without an element type"))?;
        Ok(Node::new(
            NodeKind::ArrayCreationExpr,
            cx.range(id)?,
            NodeData::ArrayCreation {
                element_type,
                dimensions,
                initializer,
            },
        ))
    }
}

struct ArrayInitializerStrategy;

impl ConversionStrategy for ArrayInitializerStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayInitializer
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let elements = convert_all(cx, &cx.children(id)?)?;
        Ok(Node::new(
            NodeKind::ArrayInitializer,
            cx.range(id)?,
            NodeData::ArrayInitializer { elements },
        ))
    }
}

struct ParenStrategy;

impl ConversionStrategy for ParenStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ParenExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ParenExpr,
            cx.range(id)?,
            NodeData::Paren {
                inner: Box::new(child_at(cx, id, &children, 0, "parenthesized expression")?),
            },
        ))
    }
}

struct KeywordExprStrategy(NodeKind);

impl ConversionStrategy for KeywordExprStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let data = if self.0 == NodeKind::ThisExpr {
            NodeData::This
        } else {
            NodeData::Super
        };
        Ok(Node::new(self.0, cx.range(id)?, data))
    }
}

struct ClassLiteralStrategy;

impl ConversionStrategy for ClassLiteralStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ClassLiteralExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ClassLiteralExpr,
            cx.range(id)?,
            NodeData::ClassLiteral {
                target_type: Box::new(child_at(cx, id, &children, 0, "class literal target")?),
            },
        ))
    }
}

struct TemplateStrategy;

impl ConversionStrategy for TemplateStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::TemplateExpr
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::TemplateExpr,
            cx.range(id)?,
            NodeData::Template {
                processor: Box::new(child_at(cx, id, &children, 0, "template processor")?),
                literal: Box::new(child_at(cx, id, &children, 1, "template literal")?),
            },
        ))
    }
}

// ── Patterns ───────────────────────────────────────────────────────────

struct TypePatternStrategy(NodeKind);

impl ConversionStrategy for TypePatternStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut pattern_type = None;
        let mut name = None;
        for child in rest {
            match cx.kind(child)? {
                NodeKind::Name => name = Some(name_text(cx, child)?),
                _ => pattern_type = Some(Box::new(cx.convert_node(child)?)),
            }
        }
        let pattern_type =
            pattern_type.ok_or_else(|| cx.structure_error(id, "pattern without a type"))?;
        Ok(Node::new(
            self.0,
            cx.range(id)?,
            NodeData::TypePattern {
                modifiers,
                pattern_type,
                name,
            },
        ))
    }
}

struct RecordPatternStrategy;

impl ConversionStrategy for RecordPatternStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::RecordPattern
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let (modifiers, rest) = split_modifiers(cx, &cx.children(id)?)?;
        let mut rest_iter = rest.into_iter();
        let pattern_type = match rest_iter.next() {
            Some(child) => Box::new(cx.convert_node(child)?),
            None => return Err(cx.structure_error(id, "record pattern without a type")),
        };
        let components = rest_iter
            .map(|child| cx.convert_node(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::new(
            NodeKind::RecordPattern,
            cx.range(id)?,
            NodeData::RecordPattern {
                modifiers,
                pattern_type,
                components,
            },
        ))
    }
}

struct GuardedPatternStrategy;

impl ConversionStrategy for GuardedPatternStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::GuardedPattern
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::GuardedPattern,
            cx.range(id)?,
            NodeData::GuardedPattern {
                pattern: Box::new(child_at(cx, id, &children, 0, "guarded pattern")?),
                guard: Box::new(child_at(cx, id, &children, 1, "guard expression")?),
            },
        ))
    }
}

// ── Types ──────────────────────────────────────────────────────────────

struct PrimitiveTypeStrategy;

impl ConversionStrategy for PrimitiveTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::PrimitiveType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let range = cx.range(id)?;
        let children = cx.children(id)?;
        // Type-use annotations precede the keyword inside the range.
        let name_start = children
            .last()
            .map(|&child| cx.range(child))
            .transpose()?
            .map(|span| span.end)
            .unwrap_or(range.start);
        let name = cx
            .source_text(Span::new(name_start, range.end))
            .trim()
            .to_string();
        Ok(Node::new(
            NodeKind::PrimitiveType,
            range,
            NodeData::PrimitiveType { name },
        ))
    }
}

struct ClassTypeStrategy;

impl ConversionStrategy for ClassTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ClassType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let mut annotations = Vec::new();
        let mut name = String::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => name = name_text(cx, child)?,
                other => {
                    return Err(cx
                        .structure_error(id, format!("unexpected {other:?} child in class type")))
                }
            }
        }
        Ok(Node::new(
            NodeKind::ClassType,
            cx.range(id)?,
            NodeData::ClassType { annotations, name },
        ))
    }
}

struct ArrayTypeStrategy;

impl ConversionStrategy for ArrayTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ArrayType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        Ok(Node::new(
            NodeKind::ArrayType,
            cx.range(id)?,
            NodeData::ArrayType {
                element_type: Box::new(child_at(cx, id, &children, 0, "array element type")?),
            },
        ))
    }
}

struct ParameterizedTypeStrategy;

impl ConversionStrategy for ParameterizedTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ParameterizedType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let mut iter = children.iter();
        let base = match iter.next() {
            Some(&child) => Box::new(cx.convert_node(child)?),
            None => return Err(cx.structure_error(id, "parameterized type without a base")),
        };
        let mut arguments = Vec::new();
        let mut segments = Vec::new();
        for &child in iter {
            if cx.kind(child)? == NodeKind::Name {
                segments.push(cx.convert_node(child)?);
            } else {
                arguments.push(cx.convert_node(child)?);
            }
        }
        Ok(Node::new(
            NodeKind::ParameterizedType,
            cx.range(id)?,
            NodeData::ParameterizedType {
                base,
                arguments,
                segments,
            },
        ))
    }
}

struct WildcardStrategy;

impl ConversionStrategy for WildcardStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::WildcardType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let range = cx.range(id)?;
        let children = cx.children(id)?;
        let bound = match children.first() {
            Some(&child) => Some(Box::new(cx.convert_node(child)?)),
            None => None,
        };
        let is_upper_bound = bound.as_ref().map(|bound_node| {
            let between = cx.source_text(Span::new(range.start, bound_node.range().start));
            between.contains("extends")
        });
        Ok(Node::new(
            NodeKind::WildcardType,
            range,
            NodeData::WildcardType {
                is_upper_bound,
                bound,
            },
        ))
    }
}

struct UnionTypeStrategy;

impl ConversionStrategy for UnionTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::UnionType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let alternatives = convert_all(cx, &cx.children(id)?)?;
        Ok(Node::new(
            NodeKind::UnionType,
            cx.range(id)?,
            NodeData::UnionType { alternatives },
        ))
    }
}

struct IntersectionTypeStrategy;

impl ConversionStrategy for IntersectionTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::IntersectionType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let bounds = convert_all(cx, &cx.children(id)?)?;
        Ok(Node::new(
            NodeKind::IntersectionType,
            cx.range(id)?,
            NodeData::IntersectionType { bounds },
        ))
    }
}

struct VarTypeStrategy;

impl ConversionStrategy for VarTypeStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::VarType
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(NodeKind::VarType, cx.range(id)?, NodeData::VarType))
    }
}

// ── Modifiers and annotations ──────────────────────────────────────────

struct ModifierStrategy;

impl ConversionStrategy for ModifierStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Modifier
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(
            NodeKind::Modifier,
            cx.range(id)?,
            NodeData::Modifier {
                text: cx.text_of(id)?.to_string(),
            },
        ))
    }
}

struct AnnotationStrategy;

impl ConversionStrategy for AnnotationStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Annotation
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let children = cx.children(id)?;
        let mut iter = children.iter();
        let name = match iter.next() {
            Some(&child) => name_text(cx, child)?,
            None => return Err(cx.structure_error(id, "annotation without a name")),
        };
        let mut arguments = Vec::new();
        let mut pending_key: Option<String> = None;
        for &child in iter {
            if cx.kind(child)? == NodeKind::Name {
                pending_key = Some(name_text(cx, child)?);
            } else {
                arguments.push(AnnotationArgument {
                    name: pending_key.take(),
                    value: cx.convert_node(child)?,
                });
            }
        }
        Ok(Node::new(
            NodeKind::Annotation,
            cx.range(id)?,
            NodeData::Annotation { name, arguments },
        ))
    }
}

// ── Modules ────────────────────────────────────────────────────────────

struct ModuleDeclStrategy;

impl ConversionStrategy for ModuleDeclStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ModuleDecl
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = cx
            .attrs()
            .module_decl(id)
            .ok_or_else(|| cx.structure_error(id, "module declaration without metadata"))?
            .clone();
        let mut imports = Vec::new();
        let mut annotations = Vec::new();
        let mut directives = Vec::new();
        for child in cx.children(id)? {
            match cx.kind(child)? {
                NodeKind::ImportDecl => imports.push(cx.convert_node(child)?),
                NodeKind::Annotation => annotations.push(cx.convert_node(child)?),
                NodeKind::Name => {}
                kind if kind.is_module_directive() => directives.push(cx.convert_node(child)?),
                other => {
                    return Err(cx.structure_error(
                        id,
                        format!("unexpected {other:?} child in module declaration"),
                    ))
                }
            }
        }
        Ok(Node::new(
            NodeKind::ModuleDecl,
            cx.range(id)?,
            NodeData::ModuleDecl {
                imports,
                annotations,
                name: attr.name,
                is_open: attr.is_open,
                directives,
            },
        ))
    }
}

struct RequiresStrategy;

impl ConversionStrategy for RequiresStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::RequiresDirective
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = cx
            .attrs()
            .requires(id)
            .ok_or_else(|| cx.structure_error(id, "requires directive without metadata"))?
            .clone();
        Ok(Node::new(
            NodeKind::RequiresDirective,
            cx.range(id)?,
            NodeData::Requires {
                module_name: attr.module_name,
                is_transitive: attr.is_transitive,
                is_static: attr.is_static,
            },
        ))
    }
}

struct PackageDirectiveStrategy(NodeKind);

impl ConversionStrategy for PackageDirectiveStrategy {
    fn kind(&self) -> NodeKind {
        self.0
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = if self.0 == NodeKind::ExportsDirective {
            cx.attrs().exports(id)
        } else {
            cx.attrs().opens(id)
        };
        let attr = attr
            .ok_or_else(|| cx.structure_error(id, "package directive without metadata"))?
            .clone();
        Ok(Node::new(
            self.0,
            cx.range(id)?,
            NodeData::PackageDirective {
                package_name: attr.package_name,
                targets: attr.targets,
            },
        ))
    }
}

struct ProvidesStrategy;

impl ConversionStrategy for ProvidesStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::ProvidesDirective
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = cx
            .attrs()
            .provides(id)
            .ok_or_else(|| cx.structure_error(id, "provides directive without metadata"))?
            .clone();
        Ok(Node::new(
            NodeKind::ProvidesDirective,
            cx.range(id)?,
            NodeData::Provides {
                service: attr.service,
                implementations: attr.implementations,
            },
        ))
    }
}

struct UsesStrategy;

impl ConversionStrategy for UsesStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::UsesDirective
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        let attr = cx
            .attrs()
            .uses(id)
            .ok_or_else(|| cx.structure_error(id, "uses directive without metadata"))?
            .clone();
        Ok(Node::new(
            NodeKind::UsesDirective,
            cx.range(id)?,
            NodeData::Uses {
                service: attr.service,
            },
        ))
    }
}

// ── Structural ─────────────────────────────────────────────────────────

struct NameStrategy;

impl ConversionStrategy for NameStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Name
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(
            NodeKind::Name,
            cx.range(id)?,
            NodeData::Name {
                text: cx.text_of(id)?.trim().to_string(),
            },
        ))
    }
}

struct MissingStrategy;

impl ConversionStrategy for MissingStrategy {
    fn kind(&self) -> NodeKind {
        NodeKind::Missing
    }

    fn convert(&self, id: NodeId, cx: &Converter<'_>) -> Result<Node, ConvertError> {
        Ok(Node::new(NodeKind::Missing, cx.range(id)?, NodeData::Missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_classification() {
        assert_eq!(classify_literal("\"hi\""), LiteralCategory::String);
        assert_eq!(classify_literal("\"\"\"\nx\"\"\""), LiteralCategory::TextBlock);
        assert_eq!(classify_literal("'a'"), LiteralCategory::Char);
        assert_eq!(classify_literal("true"), LiteralCategory::Boolean);
        assert_eq!(classify_literal("null"), LiteralCategory::Null);
        assert_eq!(classify_literal("42"), LiteralCategory::Int);
        assert_eq!(classify_literal("42L"), LiteralCategory::Long);
        assert_eq!(classify_literal("3.5"), LiteralCategory::Double);
        assert_eq!(classify_literal("3.5f"), LiteralCategory::Float);
        assert_eq!(classify_literal("2d"), LiteralCategory::Double);
        assert_eq!(classify_literal("1e9"), LiteralCategory::Double);
        // Hex digits must not read as float suffixes.
        assert_eq!(classify_literal("0xDEAD"), LiteralCategory::Int);
        assert_eq!(classify_literal("0xCAFEL"), LiteralCategory::Long);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = ConversionRegistry::builder()
            .register(Box::new(BlockStrategy))
            .register(Box::new(BlockStrategy))
            .build();
        assert_eq!(
            result.err(),
            Some(ConvertError::DuplicateStrategy(NodeKind::Block))
        );
    }

    #[test]
    fn standard_registry_builds_twice() {
        let first = standard_registry();
        let second = standard_registry();
        assert_eq!(first.len(), second.len());
        assert!(first.get(NodeKind::CompilationUnit).is_some());
        assert!(first.get(NodeKind::UsesDirective).is_some());
        assert!(first.get(NodeKind::LiteralExpr).is_some());
    }
}
