use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::arena::NodeId;

/// Parameter metadata recorded for [`NodeKind::Parameter`] nodes.
///
/// [`NodeKind::Parameter`]: crate::NodeKind::Parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterAttr {
    pub name: String,
    pub is_varargs: bool,
    pub is_final: bool,
    /// Receiver parameter, `ClassName this`.
    pub is_receiver: bool,
}

/// Structured import data recorded for [`NodeKind::ImportDecl`] nodes.
///
/// [`NodeKind::ImportDecl`]: crate::NodeKind::ImportDecl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportAttr {
    /// Dotted name as written, including a trailing `.*` for wildcards.
    pub qualified_name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

/// Module declaration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDeclAttr {
    pub name: String,
    pub is_open: bool,
}

/// `requires [transitive] [static] NAME;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiresAttr {
    pub module_name: String,
    pub is_transitive: bool,
    pub is_static: bool,
}

/// `exports PKG [to NAMES];` and `opens PKG [to NAMES];` share one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDirectiveAttr {
    pub package_name: String,
    /// Target module names; empty for an unqualified directive.
    pub targets: Vec<String>,
}

/// `provides SERVICE with IMPLS;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvidesAttr {
    pub service: String,
    pub implementations: Vec<String>,
}

/// `uses SERVICE;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsesAttr {
    pub service: String,
}

/// `import module NAME;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleImportAttr {
    pub module_name: String,
}

/// Dense side tables for node-kind-specific attributes, keyed by node index.
///
/// One table per attribute schema; a node pays for attribute bytes only when
/// it has the attribute. Ids are validated by the arena before any write
/// reaches these tables.
#[derive(Debug, Default)]
pub struct AttributeTables {
    type_names: FxHashMap<u32, String>,
    parameters: FxHashMap<u32, ParameterAttr>,
    imports: FxHashMap<u32, ImportAttr>,
    module_decls: FxHashMap<u32, ModuleDeclAttr>,
    requires: FxHashMap<u32, RequiresAttr>,
    exports: FxHashMap<u32, PackageDirectiveAttr>,
    opens: FxHashMap<u32, PackageDirectiveAttr>,
    provides: FxHashMap<u32, ProvidesAttr>,
    uses: FxHashMap<u32, UsesAttr>,
    module_imports: FxHashMap<u32, ModuleImportAttr>,
}

impl AttributeTables {
    // ── Type declaration names ─────────────────────────────────────────

    pub fn set_type_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.type_names.insert(id.raw(), name.into());
    }

    pub fn type_name(&self, id: NodeId) -> Option<&str> {
        self.type_names.get(&id.raw()).map(String::as_str)
    }

    // ── Parameters ─────────────────────────────────────────────────────

    pub fn set_parameter(&mut self, id: NodeId, attr: ParameterAttr) {
        self.parameters.insert(id.raw(), attr);
    }

    pub fn parameter(&self, id: NodeId) -> Option<&ParameterAttr> {
        self.parameters.get(&id.raw())
    }

    // ── Imports ────────────────────────────────────────────────────────

    pub fn set_import(&mut self, id: NodeId, attr: ImportAttr) {
        self.imports.insert(id.raw(), attr);
    }

    pub fn import(&self, id: NodeId) -> Option<&ImportAttr> {
        self.imports.get(&id.raw())
    }

    // ── Module declarations and directives ─────────────────────────────

    pub fn set_module_decl(&mut self, id: NodeId, attr: ModuleDeclAttr) {
        self.module_decls.insert(id.raw(), attr);
    }

    pub fn module_decl(&self, id: NodeId) -> Option<&ModuleDeclAttr> {
        self.module_decls.get(&id.raw())
    }

    pub fn set_requires(&mut self, id: NodeId, attr: RequiresAttr) {
        self.requires.insert(id.raw(), attr);
    }

    pub fn requires(&self, id: NodeId) -> Option<&RequiresAttr> {
        self.requires.get(&id.raw())
    }

    pub fn set_exports(&mut self, id: NodeId, attr: PackageDirectiveAttr) {
        self.exports.insert(id.raw(), attr);
    }

    pub fn exports(&self, id: NodeId) -> Option<&PackageDirectiveAttr> {
        self.exports.get(&id.raw())
    }

    pub fn set_opens(&mut self, id: NodeId, attr: PackageDirectiveAttr) {
        self.opens.insert(id.raw(), attr);
    }

    pub fn opens(&self, id: NodeId) -> Option<&PackageDirectiveAttr> {
        self.opens.get(&id.raw())
    }

    pub fn set_provides(&mut self, id: NodeId, attr: ProvidesAttr) {
        self.provides.insert(id.raw(), attr);
    }

    pub fn provides(&self, id: NodeId) -> Option<&ProvidesAttr> {
        self.provides.get(&id.raw())
    }

    pub fn set_uses(&mut self, id: NodeId, attr: UsesAttr) {
        self.uses.insert(id.raw(), attr);
    }

    pub fn uses(&self, id: NodeId) -> Option<&UsesAttr> {
        self.uses.get(&id.raw())
    }

    pub fn set_module_import(&mut self, id: NodeId, attr: ModuleImportAttr) {
        self.module_imports.insert(id.raw(), attr);
    }

    pub fn module_import(&self, id: NodeId) -> Option<&ModuleImportAttr> {
        self.module_imports.get(&id.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use crate::error::ArenaError;
    use crate::node_kind::NodeKind;

    #[test]
    fn attribute_round_trip_through_arena() {
        let mut arena = NodeArena::new();
        let decl = arena.allocate(NodeKind::ClassDecl, 0, 40).unwrap();
        let param = arena.allocate(NodeKind::Parameter, 10, 20).unwrap();

        arena
            .attributes_mut(decl)
            .unwrap()
            .set_type_name(decl, "Widget");
        arena.attributes_mut(param).unwrap().set_parameter(
            param,
            ParameterAttr {
                name: "items".to_string(),
                is_varargs: true,
                is_final: false,
                is_receiver: false,
            },
        );

        assert_eq!(arena.attributes().type_name(decl), Some("Widget"));
        let attr = arena.attributes().parameter(param).unwrap();
        assert_eq!(attr.name, "items");
        assert!(attr.is_varargs);
        // Absent attributes read as None rather than failing.
        assert_eq!(arena.attributes().type_name(param), None);
    }

    #[test]
    fn attribute_write_validates_id() {
        let mut arena = NodeArena::new();
        assert_eq!(
            arena.attributes_mut(NodeId::NULL).err(),
            Some(ArenaError::NullIndex)
        );
        assert_eq!(
            arena.attributes_mut(NodeId::new(9)).err(),
            Some(ArenaError::IndexOutOfBounds(9))
        );
    }

    #[test]
    fn exports_and_opens_are_separate_tables() {
        let mut arena = NodeArena::new();
        let exports = arena.allocate(NodeKind::ExportsDirective, 0, 10).unwrap();
        let opens = arena.allocate(NodeKind::OpensDirective, 11, 20).unwrap();

        arena.attributes_mut(exports).unwrap().set_exports(
            exports,
            PackageDirectiveAttr {
                package_name: "com.example.api".to_string(),
                targets: vec![],
            },
        );
        arena.attributes_mut(opens).unwrap().set_opens(
            opens,
            PackageDirectiveAttr {
                package_name: "com.example.internal".to_string(),
                targets: vec!["com.example.test".to_string()],
            },
        );

        assert_eq!(
            arena.attributes().exports(exports).unwrap().package_name,
            "com.example.api"
        );
        assert_eq!(arena.attributes().exports(opens), None);
        assert_eq!(
            arena.attributes().opens(opens).unwrap().targets,
            vec!["com.example.test".to_string()]
        );
    }
}
