//! Reference import organizer: rewrites the import block into configured
//! groups, regular imports before static imports.
//!
//! The rule works from the tree's extracted imports, never from raw text,
//! so import-like content in strings and comments cannot confuse it. When
//! anything other than whitespace sits between import declarations (e.g.
//! comments), the region is left untouched rather than risking data loss.

use styler_common::span::Span;
use styler_tree::{extract_imports, ImportRecord, NodeData, Tree};

use crate::config::{ImportOrganizerConfig, RuleConfig};
use crate::engine::{config_for, Rule, RuleError};
use crate::violation::{Edit, Severity, Violation};

pub struct ImportOrganizerRule;

impl ImportOrganizerRule {
    fn config(&self, configs: &[RuleConfig]) -> ImportOrganizerConfig {
        match config_for(ImportOrganizerConfig::RULE_ID, configs) {
            Some(RuleConfig::ImportOrganizer(config)) => config.clone(),
            _ => ImportOrganizerConfig::default(),
        }
    }
}

impl Rule for ImportOrganizerRule {
    fn id(&self) -> &str {
        ImportOrganizerConfig::RULE_ID
    }

    fn name(&self) -> &str {
        "Import organizer"
    }

    fn description(&self) -> &str {
        "Orders import declarations into configured groups, statics last"
    }

    fn analyze(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<Vec<Violation>, RuleError> {
        let config = self.config(configs);
        let Some(plan) = organize(tree, &config) else {
            return Ok(Vec::new());
        };
        if plan.organized == plan.current {
            return Ok(Vec::new());
        }
        let mut violation = Violation::new(
            self.id(),
            plan.region,
            Severity::Warning,
            "import declarations are not organized",
        );
        if plan.safe {
            violation = violation.with_edit(Edit {
                range: plan.region,
                replacement: plan.organized,
            });
        }
        Ok(vec![violation])
    }

    fn format(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<String, RuleError> {
        let config = self.config(configs);
        let source = tree.source();
        let Some(plan) = organize(tree, &config) else {
            return Ok(source.to_string());
        };
        if !plan.safe || plan.organized == plan.current {
            return Ok(source.to_string());
        }
        let mut out = String::with_capacity(source.len());
        out.push_str(&source[..plan.region.start as usize]);
        out.push_str(&plan.organized);
        out.push_str(&source[plan.region.end as usize..]);
        Ok(out)
    }
}

struct OrganizePlan {
    region: Span,
    current: String,
    organized: String,
    /// False when non-whitespace separates imports; the rule then reports
    /// without offering a rewrite.
    safe: bool,
}

fn organize(tree: &Tree, config: &ImportOrganizerConfig) -> Option<OrganizePlan> {
    let NodeData::CompilationUnit { imports, .. } = tree.root().data() else {
        return None;
    };
    if imports.is_empty() {
        return None;
    }

    let mut ranges: Vec<Span> = imports.iter().map(|import| import.range()).collect();
    ranges.sort_by_key(|range| range.start);
    let region = ranges
        .iter()
        .copied()
        .reduce(Span::merge)
        .expect("at least one import");

    // Only whitespace may sit between the import declarations.
    let source = tree.source();
    let mut safe = true;
    for pair in ranges.windows(2) {
        let gap = &source[pair[0].end as usize..pair[1].start as usize];
        if !gap.trim().is_empty() {
            safe = false;
            break;
        }
    }

    // Module imports keep their own leading group, in source order.
    let module_imports: Vec<String> = imports
        .iter()
        .filter_map(|import| match import.data() {
            NodeData::ImportDecl {
                qualified_name,
                is_module: true,
                ..
            } => Some(format!("import module {qualified_name};")),
            _ => None,
        })
        .collect();

    let records = extract_imports(tree);
    let organized = render_groups(&module_imports, &records, config);
    let current = source[region.start as usize..region.end as usize].to_string();

    Some(OrganizePlan {
        region,
        current,
        organized,
        safe,
    })
}

/// Assign a record to its group name.
fn group_of(record: &ImportRecord, config: &ImportOrganizerConfig) -> String {
    if record.is_static {
        return "static".to_string();
    }
    for custom in &config.custom_groups {
        if custom.pattern.is_match(&record.qualified_name) {
            return custom.name.clone();
        }
    }
    if record.qualified_name.starts_with("java.") {
        "java".to_string()
    } else if record.qualified_name.starts_with("javax.") {
        "javax".to_string()
    } else {
        "other".to_string()
    }
}

/// Effective group sequence: the configured order, then any assignable
/// groups it omits, in a fixed canonical order.
fn effective_order(config: &ImportOrganizerConfig) -> Vec<String> {
    let mut order = config.group_order.clone();
    let mut canonical: Vec<String> = vec!["java".to_string(), "javax".to_string()];
    canonical.extend(config.custom_groups.iter().map(|g| g.name.clone()));
    canonical.push("other".to_string());
    canonical.push("static".to_string());
    for name in canonical {
        if !order.contains(&name) {
            order.push(name);
        }
    }
    order
}

fn render_groups(
    module_imports: &[String],
    records: &[ImportRecord],
    config: &ImportOrganizerConfig,
) -> String {
    let mut blocks: Vec<Vec<String>> = Vec::new();
    if !module_imports.is_empty() {
        blocks.push(module_imports.to_vec());
    }

    for group in effective_order(config) {
        let lines: Vec<String> = records
            .iter()
            .filter(|record| group_of(record, config) == group)
            .map(render_import)
            .collect();
        if !lines.is_empty() {
            blocks.push(lines);
        }
    }

    let separator = if config.blank_line_between_groups {
        "\n\n"
    } else {
        "\n"
    };
    blocks
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join(separator)
}

fn render_import(record: &ImportRecord) -> String {
    if record.is_static {
        format!("import static {};", record.qualified_name)
    } else {
        format!("import {};", record.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_common::deadline::Deadline;
    use styler_common::version::LanguageVersion;

    fn tree_for(source: &str) -> Tree {
        let output =
            styler_parser::parse(source, LanguageVersion::latest(), Deadline::never()).unwrap();
        styler_tree::build_tree(source, &output, Deadline::never()).unwrap()
    }

    fn no_configs() -> Vec<RuleConfig> {
        Vec::new()
    }

    #[test]
    fn groups_and_orders_imports() {
        let source = "import com.example.App;\nimport static java.lang.Math.abs;\nimport java.util.List;\n\nclass T {}\n";
        let tree = tree_for(source);
        let formatted = ImportOrganizerRule.format(&tree, &no_configs()).unwrap();
        assert_eq!(
            formatted,
            "import java.util.List;\n\nimport com.example.App;\n\nimport static java.lang.Math.abs;\n\nclass T {}\n"
        );
    }

    #[test]
    fn format_is_idempotent() {
        let source = "import b.B;\nimport a.A;\nimport static c.C.max;\nclass T {}\n";
        let tree = tree_for(source);
        let once = ImportOrganizerRule.format(&tree, &no_configs()).unwrap();
        let again = ImportOrganizerRule
            .format(&tree_for(&once), &no_configs())
            .unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn ordered_imports_produce_no_violation() {
        let source = "import java.util.List;\n\nimport com.example.App;\nclass T {}\n";
        let tree = tree_for(source);
        let violations = ImportOrganizerRule.analyze(&tree, &no_configs()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn misordered_imports_produce_one_violation_with_edit() {
        let source = "import com.example.App;\nimport java.util.List;\nclass T {}\n";
        let tree = tree_for(source);
        let violations = ImportOrganizerRule.analyze(&tree, &no_configs()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule_id, "import-organizer");
        assert!(violations[0].edit.is_some());
    }

    #[test]
    fn comments_between_imports_block_the_rewrite() {
        let source =
            "import b.B;\n// boundary comment\nimport a.A;\nclass T {}\n";
        let tree = tree_for(source);
        let formatted = ImportOrganizerRule.format(&tree, &no_configs()).unwrap();
        assert_eq!(formatted, source);
        // Analysis still reports, but without a proposed edit.
        let violations = ImportOrganizerRule.analyze(&tree, &no_configs()).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].edit.is_none());
    }

    #[test]
    fn custom_group_pattern_wins_over_builtins() {
        let config = ImportOrganizerConfig::new(
            vec![
                "company".to_string(),
                "java".to_string(),
                "other".to_string(),
            ],
            vec![("company".to_string(), "^com\\.example\\.".to_string())],
            true,
        )
        .unwrap();
        let configs = vec![RuleConfig::ImportOrganizer(config)];
        let source = "import java.util.List;\nimport com.example.App;\nclass T {}\n";
        let tree = tree_for(source);
        let formatted = ImportOrganizerRule.format(&tree, &configs).unwrap();
        assert_eq!(
            formatted,
            "import com.example.App;\n\nimport java.util.List;\nclass T {}\n"
        );
    }

    #[test]
    fn no_imports_means_no_change() {
        let source = "class T {}\n";
        let tree = tree_for(source);
        assert_eq!(
            ImportOrganizerRule.format(&tree, &no_configs()).unwrap(),
            source
        );
        assert!(ImportOrganizerRule
            .analyze(&tree, &no_configs())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn empty_input_stays_empty() {
        let tree = tree_for("");
        assert_eq!(ImportOrganizerRule.format(&tree, &no_configs()).unwrap(), "");
    }
}
