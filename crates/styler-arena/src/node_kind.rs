use serde::Serialize;

/// Every kind of node in the parse tree.
///
/// A closed enumeration grouped by grammatical category. The five category
/// predicates partition the categorized kinds: such a kind is a statement
/// xor an expression xor a type xor a declaration xor trivia. Patterns and
/// module directives answer their own predicates instead, and a small
/// fixed set of structural kinds (`SwitchCase`, `CatchClause`, `Name`,
/// ...) belongs to no category; the partition test pins that set
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum NodeKind {
    // ── Compilation unit ───────────────────────────────────────────────
    CompilationUnit,
    PackageDecl,
    /// Any import form: regular, static, wildcard, or module import.
    /// Structured data lives in the import attribute table.
    ImportDecl,

    // ── Type declarations ──────────────────────────────────────────────
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    RecordDecl,
    AnnotationDecl,

    // ── Members ────────────────────────────────────────────────────────
    MethodDecl,
    ConstructorDecl,
    /// Record compact constructor (no parameter list).
    CompactConstructorDecl,
    FieldDecl,
    Parameter,
    LocalVarDecl,
    /// Static or instance initializer block.
    InitializerBlock,
    EnumConstant,
    RecordComponent,
    /// Annotation type element, possibly with a `default` value.
    AnnotationElement,
    TypeParameter,

    // ── Statements ─────────────────────────────────────────────────────
    Block,
    IfStmt,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    EnhancedForStmt,
    SwitchStmt,
    /// One case group of a switch, colon or arrow form.
    SwitchCase,
    TryStmt,
    CatchClause,
    FinallyClause,
    /// One resource of a try-with-resources header.
    Resource,
    ReturnStmt,
    ThrowStmt,
    BreakStmt,
    ContinueStmt,
    SynchronizedStmt,
    YieldStmt,
    ExprStmt,
    AssertStmt,
    EmptyStmt,
    LabeledStmt,

    // ── Expressions ────────────────────────────────────────────────────
    /// All literal forms share one arena kind; the converter refines the
    /// category from the lexeme.
    LiteralExpr,
    IdentifierExpr,
    MethodCallExpr,
    FieldAccessExpr,
    ArrayAccessExpr,
    AssignmentExpr,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    ConditionalExpr,
    InstanceofExpr,
    CastExpr,
    LambdaExpr,
    MethodRefExpr,
    ObjectCreationExpr,
    ArrayCreationExpr,
    ArrayInitializer,
    SwitchExpr,
    ParenExpr,
    ThisExpr,
    SuperExpr,
    /// `Type.class`
    ClassLiteralExpr,
    /// String template expression.
    TemplateExpr,

    // ── Patterns ───────────────────────────────────────────────────────
    TypePattern,
    RecordPattern,
    /// Pattern with a `when` guard, switch cases only.
    GuardedPattern,
    PrimitivePattern,

    // ── Types ──────────────────────────────────────────────────────────
    PrimitiveType,
    ClassType,
    ArrayType,
    ParameterizedType,
    WildcardType,
    /// Multi-catch union, `A | B`.
    UnionType,
    /// Bounded intersection, `A & B`.
    IntersectionType,
    /// `var` in a local variable declaration.
    VarType,

    // ── Modifiers and annotations ──────────────────────────────────────
    Modifier,
    Annotation,

    // ── Trivia ─────────────────────────────────────────────────────────
    LineCommentTrivia,
    BlockCommentTrivia,
    DocCommentTrivia,
    WhitespaceTrivia,

    // ── Module declarations ────────────────────────────────────────────
    ModuleDecl,
    RequiresDirective,
    ExportsDirective,
    OpensDirective,
    ProvidesDirective,
    UsesDirective,

    // ── Structural ─────────────────────────────────────────────────────
    /// An identifier or dotted qualified name.
    Name,
    /// Zero-length placeholder standing in for a missing child after a
    /// parse error. Downstream stages treat it as a no-op region.
    Missing,
}

impl NodeKind {
    /// Whether this kind declares something: package, import, type, member,
    /// or module declaration.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::PackageDecl
                | NodeKind::ImportDecl
                | NodeKind::ClassDecl
                | NodeKind::InterfaceDecl
                | NodeKind::EnumDecl
                | NodeKind::RecordDecl
                | NodeKind::AnnotationDecl
                | NodeKind::MethodDecl
                | NodeKind::ConstructorDecl
                | NodeKind::CompactConstructorDecl
                | NodeKind::FieldDecl
                | NodeKind::Parameter
                | NodeKind::LocalVarDecl
                | NodeKind::InitializerBlock
                | NodeKind::EnumConstant
                | NodeKind::RecordComponent
                | NodeKind::AnnotationElement
                | NodeKind::TypeParameter
                | NodeKind::ModuleDecl
        )
    }

    /// Whether this kind is a statement.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::IfStmt
                | NodeKind::WhileStmt
                | NodeKind::DoWhileStmt
                | NodeKind::ForStmt
                | NodeKind::EnhancedForStmt
                | NodeKind::SwitchStmt
                | NodeKind::TryStmt
                | NodeKind::ReturnStmt
                | NodeKind::ThrowStmt
                | NodeKind::BreakStmt
                | NodeKind::ContinueStmt
                | NodeKind::SynchronizedStmt
                | NodeKind::YieldStmt
                | NodeKind::ExprStmt
                | NodeKind::AssertStmt
                | NodeKind::EmptyStmt
                | NodeKind::LabeledStmt
        )
    }

    /// Whether this kind is an expression.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::LiteralExpr
                | NodeKind::IdentifierExpr
                | NodeKind::MethodCallExpr
                | NodeKind::FieldAccessExpr
                | NodeKind::ArrayAccessExpr
                | NodeKind::AssignmentExpr
                | NodeKind::BinaryExpr
                | NodeKind::UnaryExpr
                | NodeKind::PostfixExpr
                | NodeKind::ConditionalExpr
                | NodeKind::InstanceofExpr
                | NodeKind::CastExpr
                | NodeKind::LambdaExpr
                | NodeKind::MethodRefExpr
                | NodeKind::ObjectCreationExpr
                | NodeKind::ArrayCreationExpr
                | NodeKind::ArrayInitializer
                | NodeKind::SwitchExpr
                | NodeKind::ParenExpr
                | NodeKind::ThisExpr
                | NodeKind::SuperExpr
                | NodeKind::ClassLiteralExpr
                | NodeKind::TemplateExpr
        )
    }

    /// Whether this kind is a type reference.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::PrimitiveType
                | NodeKind::ClassType
                | NodeKind::ArrayType
                | NodeKind::ParameterizedType
                | NodeKind::WildcardType
                | NodeKind::UnionType
                | NodeKind::IntersectionType
                | NodeKind::VarType
        )
    }

    /// Whether this kind is trivia (comments or whitespace).
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            NodeKind::LineCommentTrivia
                | NodeKind::BlockCommentTrivia
                | NodeKind::DocCommentTrivia
                | NodeKind::WhitespaceTrivia
        )
    }

    /// Whether this kind is a pattern.
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            NodeKind::TypePattern
                | NodeKind::RecordPattern
                | NodeKind::GuardedPattern
                | NodeKind::PrimitivePattern
        )
    }

    /// Whether this kind is a module directive.
    pub fn is_module_directive(self) -> bool {
        matches!(
            self,
            NodeKind::RequiresDirective
                | NodeKind::ExportsDirective
                | NodeKind::OpensDirective
                | NodeKind::ProvidesDirective
                | NodeKind::UsesDirective
        )
    }

    /// All kinds, in declaration order. Used by exhaustiveness tests.
    pub fn all() -> &'static [NodeKind] {
        use NodeKind::*;
        &[
            CompilationUnit,
            PackageDecl,
            ImportDecl,
            ClassDecl,
            InterfaceDecl,
            EnumDecl,
            RecordDecl,
            AnnotationDecl,
            MethodDecl,
            ConstructorDecl,
            CompactConstructorDecl,
            FieldDecl,
            Parameter,
            LocalVarDecl,
            InitializerBlock,
            EnumConstant,
            RecordComponent,
            AnnotationElement,
            TypeParameter,
            Block,
            IfStmt,
            WhileStmt,
            DoWhileStmt,
            ForStmt,
            EnhancedForStmt,
            SwitchStmt,
            SwitchCase,
            TryStmt,
            CatchClause,
            FinallyClause,
            Resource,
            ReturnStmt,
            ThrowStmt,
            BreakStmt,
            ContinueStmt,
            SynchronizedStmt,
            YieldStmt,
            ExprStmt,
            AssertStmt,
            EmptyStmt,
            LabeledStmt,
            LiteralExpr,
            IdentifierExpr,
            MethodCallExpr,
            FieldAccessExpr,
            ArrayAccessExpr,
            AssignmentExpr,
            BinaryExpr,
            UnaryExpr,
            PostfixExpr,
            ConditionalExpr,
            InstanceofExpr,
            CastExpr,
            LambdaExpr,
            MethodRefExpr,
            ObjectCreationExpr,
            ArrayCreationExpr,
            ArrayInitializer,
            SwitchExpr,
            ParenExpr,
            ThisExpr,
            SuperExpr,
            ClassLiteralExpr,
            TemplateExpr,
            TypePattern,
            RecordPattern,
            GuardedPattern,
            PrimitivePattern,
            PrimitiveType,
            ClassType,
            ArrayType,
            ParameterizedType,
            WildcardType,
            UnionType,
            IntersectionType,
            VarType,
            Modifier,
            Annotation,
            LineCommentTrivia,
            BlockCommentTrivia,
            DocCommentTrivia,
            WhitespaceTrivia,
            ModuleDecl,
            RequiresDirective,
            ExportsDirective,
            OpensDirective,
            ProvidesDirective,
            UsesDirective,
            Name,
            Missing,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_predicates_partition_the_kind_set() {
        // Kinds deliberately outside the five categories: patterns and
        // module directives carry their own predicates, and the structural
        // kinds below have no grammatical category. A new kind must either
        // satisfy exactly one of the five predicates or be added here.
        let structural = [
            NodeKind::CompilationUnit,
            NodeKind::SwitchCase,
            NodeKind::CatchClause,
            NodeKind::FinallyClause,
            NodeKind::Resource,
            NodeKind::Modifier,
            NodeKind::Annotation,
            NodeKind::Name,
            NodeKind::Missing,
        ];

        for &kind in NodeKind::all() {
            let buckets = [
                kind.is_declaration(),
                kind.is_statement(),
                kind.is_expression(),
                kind.is_type(),
                kind.is_trivia(),
            ]
            .iter()
            .filter(|&&c| c)
            .count();

            if structural.contains(&kind) || kind.is_pattern() || kind.is_module_directive() {
                assert_eq!(
                    buckets, 0,
                    "{kind:?} must stay outside the five categories"
                );
            } else {
                assert_eq!(
                    buckets, 1,
                    "{kind:?} must belong to exactly one category"
                );
            }
        }
    }

    #[test]
    fn auxiliary_predicates_are_disjoint_from_each_other() {
        for &kind in NodeKind::all() {
            assert!(
                !(kind.is_pattern() && kind.is_module_directive()),
                "{kind:?} answers both auxiliary predicates"
            );
        }
    }

    #[test]
    fn category_sizes() {
        let all = NodeKind::all();
        assert_eq!(all.iter().filter(|k| k.is_statement()).count(), 18);
        assert_eq!(all.iter().filter(|k| k.is_expression()).count(), 23);
        assert_eq!(all.iter().filter(|k| k.is_type()).count(), 8);
        assert_eq!(all.iter().filter(|k| k.is_trivia()).count(), 4);
        assert_eq!(all.iter().filter(|k| k.is_pattern()).count(), 4);
        assert_eq!(all.iter().filter(|k| k.is_module_directive()).count(), 5);
        assert_eq!(all.iter().filter(|k| k.is_declaration()).count(), 19);
    }

    #[test]
    fn all_lists_every_variant_once() {
        let all = NodeKind::all();
        assert_eq!(all.len(), 90);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b, "duplicate entry in NodeKind::all()");
            }
        }
    }
}
