//! Import extraction for rules.
//!
//! The extractor walks the compilation unit's import list in the converted
//! tree, never the raw source, so import-like text inside string literals
//! and comments can never leak in. Module imports bring modules rather than
//! types into scope and are not reported.

use serde::Serialize;

use crate::node::NodeData;
use crate::Tree;

/// One extracted import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    /// Dotted name as written, `.*` included for wildcards.
    pub qualified_name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    /// 1-based line of the declaration.
    pub line_number: u32,
}

/// Extract the unit's imports: regular imports in source order, then
/// static imports in source order (a stable partition by static-ness).
///
/// Returns an empty list for module-info trees.
pub fn extract_imports(tree: &Tree) -> Vec<ImportRecord> {
    let NodeData::CompilationUnit { imports, .. } = tree.root().data() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for import in imports {
        let NodeData::ImportDecl {
            qualified_name,
            is_static,
            is_wildcard,
            is_module,
        } = import.data()
        else {
            continue;
        };
        if *is_module {
            continue;
        }
        records.push(ImportRecord {
            qualified_name: qualified_name.clone(),
            is_static: *is_static,
            is_wildcard: *is_wildcard,
            line_number: tree.line_of(import.range().start),
        });
    }

    let (regular, statics): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| !r.is_static);
    let mut ordered = regular;
    ordered.extend(statics);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_common::deadline::Deadline;
    use styler_common::version::LanguageVersion;

    fn tree_for(source: &str) -> Tree {
        let output =
            styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
        crate::build_tree(source, &output, Deadline::never()).unwrap()
    }

    #[test]
    fn literal_text_is_not_an_import() {
        let tree = tree_for(
            "import java.util.List;\n\nclass Test { String code = \"import foo.bar;\"; List<String> items; }\n",
        );
        let imports = extract_imports(&tree);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].qualified_name, "java.util.List");
        assert!(!imports[0].is_static);
    }

    #[test]
    fn comment_text_is_not_an_import() {
        let tree = tree_for(
            "// import from.line.comment;\n/* import from.block.comment; */\nimport java.io.File;\nclass T {}\n",
        );
        let imports = extract_imports(&tree);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].qualified_name, "java.io.File");
    }

    #[test]
    fn regulars_precede_statics_in_source_order() {
        let tree = tree_for(
            "import java.util.List;\nimport java.util.Map;\nimport static java.lang.Math.abs;\nimport java.io.*;\nclass T {}\n",
        );
        let names: Vec<(String, bool)> = extract_imports(&tree)
            .into_iter()
            .map(|r| (r.qualified_name, r.is_static))
            .collect();
        assert_eq!(
            names,
            vec![
                ("java.util.List".to_string(), false),
                ("java.util.Map".to_string(), false),
                ("java.io.*".to_string(), false),
                ("java.lang.Math.abs".to_string(), true),
            ]
        );
    }

    #[test]
    fn wildcard_and_line_numbers() {
        let tree = tree_for("import java.util.*;\n\nimport java.io.File;\nclass T {}\n");
        let imports = extract_imports(&tree);
        assert_eq!(imports[0].qualified_name, "java.util.*");
        assert!(imports[0].is_wildcard);
        assert_eq!(imports[0].line_number, 1);
        assert_eq!(imports[1].line_number, 3);
    }

    #[test]
    fn records_serialize_for_reporters() {
        let tree = tree_for("import java.util.List;\nclass T {}\n");
        let json = serde_json::to_string(&extract_imports(&tree)).unwrap();
        assert!(json.contains(r#""qualified_name":"java.util.List""#));
        assert!(json.contains(r#""line_number":1"#));
    }

    #[test]
    fn module_imports_are_not_extracted() {
        let tree = tree_for("import module java.base;\nimport java.util.List;\nclass T {}\n");
        let imports = extract_imports(&tree);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].qualified_name, "java.util.List");
    }
}
