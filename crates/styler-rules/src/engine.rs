//! The rule contract and the engine that runs registered rules.

use std::fmt;

use styler_common::deadline::DeadlineExceeded;
use styler_common::span::Span;
use styler_tree::Tree;

use crate::config::RuleConfig;
use crate::violation::Violation;

/// A rule execution fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A single rule produced overlapping edits in one pass.
    OverlappingEdits {
        rule_id: String,
        first: Span,
        second: Span,
    },
    /// The cooperative deadline expired during rule execution.
    DeadlineExceeded,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverlappingEdits {
                rule_id,
                first,
                second,
            } => write!(
                f,
                "rule `{rule_id}` produced overlapping edits {}..{} and {}..{}",
                first.start, first.end, second.start, second.end
            ),
            Self::DeadlineExceeded => write!(f, "deadline exceeded during rule execution"),
        }
    }
}

impl std::error::Error for RuleError {}

impl From<DeadlineExceeded> for RuleError {
    fn from(_: DeadlineExceeded) -> Self {
        RuleError::DeadlineExceeded
    }
}

/// A formatting rule.
///
/// Rules are pure over their inputs: `analyze` reports violations with
/// optional edits, `format` produces rewritten source. Both take the list
/// form of configurations; a rule selects the entry whose `rule_id()`
/// matches its own id and falls back to its defaults otherwise. For every
/// rule, `format` is idempotent and maps empty input to empty output.
pub trait Rule: Send + Sync {
    /// Stable identifier.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Display description.
    fn description(&self) -> &str;

    fn analyze(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<Vec<Violation>, RuleError>;

    fn format(&self, tree: &Tree, configs: &[RuleConfig]) -> Result<String, RuleError>;
}

/// Select the configuration addressed to a rule. Configurations for other
/// rules are silently ignored.
pub fn config_for<'a>(rule_id: &str, configs: &'a [RuleConfig]) -> Option<&'a RuleConfig> {
    configs.iter().find(|config| config.rule_id() == rule_id)
}

/// The engine: a registry of rules run uniformly by the driver.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// An engine with the reference rules registered.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(crate::rules::IndentationRule));
        engine.register(Box::new(crate::rules::ImportOrganizerRule));
        engine
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .find(|rule| rule.id() == id)
    }

    /// Run every registered rule's `analyze`, enforcing the per-rule
    /// non-overlap guarantee on proposed edits.
    pub fn analyze(
        &self,
        tree: &Tree,
        configs: &[RuleConfig],
    ) -> Result<Vec<Violation>, RuleError> {
        self.analyze_with_deadline(tree, configs, styler_common::deadline::Deadline::never())
    }

    /// Like [`analyze`](Self::analyze), polling the cooperative deadline
    /// before each rule invocation.
    pub fn analyze_with_deadline(
        &self,
        tree: &Tree,
        configs: &[RuleConfig],
        deadline: styler_common::deadline::Deadline,
    ) -> Result<Vec<Violation>, RuleError> {
        let mut all = Vec::new();
        for rule in &self.rules {
            deadline.check()?;
            let violations = rule.analyze(tree, configs)?;
            reject_overlapping_edits(rule.id(), &violations)?;
            all.extend(violations);
        }
        Ok(all)
    }

    /// Configurations addressed to no registered rule; the driver surfaces
    /// these as configuration mistakes.
    pub fn unclaimed_configs<'a>(&self, configs: &'a [RuleConfig]) -> Vec<&'a RuleConfig> {
        configs
            .iter()
            .filter(|config| self.rule(config.rule_id()).is_none())
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Fail if any two edits from one rule's pass overlap.
fn reject_overlapping_edits(rule_id: &str, violations: &[Violation]) -> Result<(), RuleError> {
    let mut ranges: Vec<Span> = violations
        .iter()
        .filter_map(|violation| violation.edit.as_ref())
        .map(|edit| edit.range)
        .collect();
    ranges.sort_by_key(|range| (range.start, range.end));
    for pair in ranges.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(RuleError::OverlappingEdits {
                rule_id: rule_id.to_string(),
                first: pair[0],
                second: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Edit, Severity, Violation};

    #[test]
    fn config_selection_ignores_other_rules() {
        let configs = vec![RuleConfig::Indentation(
            crate::config::IndentationConfig::default(),
        )];
        assert!(config_for("indentation", &configs).is_some());
        assert!(config_for("import-organizer", &configs).is_none());
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let violations = vec![
            Violation::new("x", Span::new(0, 5), Severity::Warning, "a").with_edit(Edit {
                range: Span::new(0, 5),
                replacement: String::new(),
            }),
            Violation::new("x", Span::new(3, 8), Severity::Warning, "b").with_edit(Edit {
                range: Span::new(3, 8),
                replacement: String::new(),
            }),
        ];
        assert!(matches!(
            reject_overlapping_edits("x", &violations),
            Err(RuleError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn touching_edits_do_not_overlap() {
        let violations = vec![
            Violation::new("x", Span::new(0, 5), Severity::Info, "a").with_edit(Edit {
                range: Span::new(0, 5),
                replacement: String::new(),
            }),
            Violation::new("x", Span::new(5, 8), Severity::Info, "b").with_edit(Edit {
                range: Span::new(5, 8),
                replacement: String::new(),
            }),
        ];
        assert!(reject_overlapping_edits("x", &violations).is_ok());
    }

    #[test]
    fn default_engine_registers_reference_rules() {
        let engine = RuleEngine::with_default_rules();
        assert!(engine.rule("indentation").is_some());
        assert!(engine.rule("import-organizer").is_some());
        assert!(engine.rule("missing").is_none());
    }

    #[test]
    fn unclaimed_configs_are_reported() {
        let engine = RuleEngine::new();
        let configs = vec![RuleConfig::Indentation(
            crate::config::IndentationConfig::default(),
        )];
        assert_eq!(engine.unclaimed_configs(&configs).len(), 1);
    }
}
