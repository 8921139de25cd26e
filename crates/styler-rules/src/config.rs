//! Rule configurations: a small closed set of typed records, each
//! validated fully at construction. User-supplied regular expressions are
//! screened for ReDoS-prone shapes before they are ever compiled.

use std::fmt;

use regex::Regex;

/// A configuration construction error. Raised before any rule runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyRuleId,
    /// Indentation width outside the accepted 1..=8 range.
    InvalidIndentWidth(u8),
    EmptyGroupOrder,
    UnknownGroup(String),
    DuplicateGroup(String),
    EmptyPattern,
    /// The pattern contains a nested quantifier or a quantified group with
    /// an inner quantifier, both catastrophic-backtracking shapes.
    SuspiciousPattern(String),
    InvalidPattern(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRuleId => write!(f, "rule id must not be empty"),
            Self::InvalidIndentWidth(width) => {
                write!(f, "indentation width {width} is outside 1..=8")
            }
            Self::EmptyGroupOrder => write!(f, "import group order must not be empty"),
            Self::UnknownGroup(name) => write!(f, "unknown import group `{name}`"),
            Self::DuplicateGroup(name) => write!(f, "duplicate import group `{name}`"),
            Self::EmptyPattern => write!(f, "import group pattern must not be empty"),
            Self::SuspiciousPattern(pattern) => {
                write!(f, "pattern `{pattern}` rejected: nested quantifiers")
            }
            Self::InvalidPattern(pattern) => write!(f, "pattern `{pattern}` failed to compile"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The closed set of per-rule configurations.
#[derive(Debug, Clone)]
pub enum RuleConfig {
    Indentation(IndentationConfig),
    ImportOrganizer(ImportOrganizerConfig),
}

impl RuleConfig {
    /// The id of the rule this configuration belongs to. The engine hands a
    /// rule only configurations whose id matches; others are ignored.
    pub fn rule_id(&self) -> &str {
        match self {
            RuleConfig::Indentation(_) => IndentationConfig::RULE_ID,
            RuleConfig::ImportOrganizer(_) => ImportOrganizerConfig::RULE_ID,
        }
    }
}

/// Indentation character for the indentation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentationMode {
    Spaces,
    Tabs,
}

/// Configuration of the indentation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationConfig {
    pub mode: IndentationMode,
    /// Spaces per level in space mode; tab display width in tab mode.
    pub width: u8,
}

impl IndentationConfig {
    pub const RULE_ID: &'static str = "indentation";

    pub fn new(mode: IndentationMode, width: u8) -> Result<Self, ConfigError> {
        if width == 0 || width > 8 {
            return Err(ConfigError::InvalidIndentWidth(width));
        }
        Ok(Self { mode, width })
    }

    /// One indentation level as text.
    pub fn unit(&self) -> String {
        match self.mode {
            IndentationMode::Spaces => " ".repeat(self.width as usize),
            IndentationMode::Tabs => "\t".to_string(),
        }
    }
}

impl Default for IndentationConfig {
    fn default() -> Self {
        Self {
            mode: IndentationMode::Spaces,
            width: 4,
        }
    }
}

/// A named custom import group backed by a screened, compiled pattern.
#[derive(Debug, Clone)]
pub struct CustomGroup {
    pub name: String,
    pub pattern: Regex,
}

/// Configuration of the import organizer rule.
#[derive(Debug, Clone)]
pub struct ImportOrganizerConfig {
    /// Group names in output order. Built-in groups: `java`, `javax`,
    /// `other`, `static`. Custom group names must be declared in
    /// `custom_groups`.
    pub group_order: Vec<String>,
    pub custom_groups: Vec<CustomGroup>,
    pub blank_line_between_groups: bool,
}

impl ImportOrganizerConfig {
    pub const RULE_ID: &'static str = "import-organizer";

    pub fn new(
        group_order: Vec<String>,
        custom_patterns: Vec<(String, String)>,
        blank_line_between_groups: bool,
    ) -> Result<Self, ConfigError> {
        if group_order.is_empty() {
            return Err(ConfigError::EmptyGroupOrder);
        }

        let mut custom_groups = Vec::new();
        for (name, pattern) in custom_patterns {
            if pattern.is_empty() {
                return Err(ConfigError::EmptyPattern);
            }
            reject_redos(&pattern)?;
            let compiled = Regex::new(&pattern)
                .map_err(|_| ConfigError::InvalidPattern(pattern.clone()))?;
            custom_groups.push(CustomGroup {
                name,
                pattern: compiled,
            });
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in &group_order {
            let known = matches!(name.as_str(), "java" | "javax" | "other" | "static")
                || custom_groups.iter().any(|g| &g.name == name);
            if !known {
                return Err(ConfigError::UnknownGroup(name.clone()));
            }
            if seen.contains(&name.as_str()) {
                return Err(ConfigError::DuplicateGroup(name.clone()));
            }
            seen.push(name.as_str());
        }

        Ok(Self {
            group_order,
            custom_groups,
            blank_line_between_groups,
        })
    }
}

impl Default for ImportOrganizerConfig {
    fn default() -> Self {
        Self {
            group_order: vec![
                "java".to_string(),
                "javax".to_string(),
                "other".to_string(),
                "static".to_string(),
            ],
            custom_groups: Vec::new(),
            blank_line_between_groups: true,
        }
    }
}

/// Reject ReDoS-prone patterns before compilation.
///
/// A group that both contains a quantifier and is itself quantified (the
/// `(X+)+`, `(X*)+`, `(X+)*`, `(.*a)+` family) is refused outright. The
/// screen is a scanner over the pattern text, not a regex parser; erring on
/// the side of rejection is acceptable here.
pub fn reject_redos(pattern: &str) -> Result<(), ConfigError> {
    let bytes = pattern.as_bytes();
    let mut group_starts: Vec<usize> = Vec::new();
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'(' => group_starts.push(i),
            b')' => {
                let Some(start) = group_starts.pop() else {
                    continue;
                };
                let quantified = matches!(bytes.get(i + 1), Some(b'+' | b'*'))
                    || matches!(bytes.get(i + 1), Some(b'{'));
                if !quantified {
                    continue;
                }
                let inner = &pattern[start + 1..i];
                if contains_unescaped_quantifier(inner) {
                    return Err(ConfigError::SuspiciousPattern(pattern.to_string()));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn contains_unescaped_quantifier(fragment: &str) -> bool {
    let bytes = fragment.as_bytes();
    let mut escaped = false;
    for &b in bytes {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'+' | b'*' | b'{' => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_config_validates_width() {
        assert!(IndentationConfig::new(IndentationMode::Spaces, 4).is_ok());
        assert_eq!(
            IndentationConfig::new(IndentationMode::Spaces, 0).err(),
            Some(ConfigError::InvalidIndentWidth(0))
        );
        assert_eq!(
            IndentationConfig::new(IndentationMode::Tabs, 9).err(),
            Some(ConfigError::InvalidIndentWidth(9))
        );
    }

    #[test]
    fn indentation_unit() {
        let spaces = IndentationConfig::new(IndentationMode::Spaces, 2).unwrap();
        assert_eq!(spaces.unit(), "  ");
        let tabs = IndentationConfig::new(IndentationMode::Tabs, 4).unwrap();
        assert_eq!(tabs.unit(), "\t");
    }

    #[test]
    fn group_order_must_be_non_empty_and_known() {
        assert_eq!(
            ImportOrganizerConfig::new(vec![], vec![], true).err(),
            Some(ConfigError::EmptyGroupOrder)
        );
        assert_eq!(
            ImportOrganizerConfig::new(vec!["nope".to_string()], vec![], true).err(),
            Some(ConfigError::UnknownGroup("nope".to_string()))
        );
        assert_eq!(
            ImportOrganizerConfig::new(
                vec!["java".to_string(), "java".to_string()],
                vec![],
                true
            )
            .err(),
            Some(ConfigError::DuplicateGroup("java".to_string()))
        );
        assert!(ImportOrganizerConfig::new(
            vec!["java".to_string(), "other".to_string()],
            vec![],
            true
        )
        .is_ok());
    }

    #[test]
    fn custom_groups_join_the_known_set() {
        let config = ImportOrganizerConfig::new(
            vec!["company".to_string(), "other".to_string()],
            vec![("company".to_string(), "^com\\.example\\.".to_string())],
            false,
        )
        .unwrap();
        assert_eq!(config.custom_groups.len(), 1);
    }

    #[test]
    fn redos_shapes_are_rejected() {
        for pattern in ["(a+)+", "(a*)+", "(a+)*", "(.*a)+", "(x{2,})+"] {
            assert_eq!(
                reject_redos(pattern).err(),
                Some(ConfigError::SuspiciousPattern(pattern.to_string())),
                "{pattern} should be rejected"
            );
        }
    }

    #[test]
    fn benign_patterns_pass_the_screen() {
        for pattern in ["^java\\.", "^com\\.example\\.(api|spi)$", "util", "a+b*"] {
            assert!(reject_redos(pattern).is_ok(), "{pattern} should pass");
        }
    }

    #[test]
    fn escaped_quantifiers_do_not_trip_the_screen() {
        assert!(reject_redos("(a\\+)+").is_ok());
    }

    #[test]
    fn suspicious_custom_pattern_fails_construction() {
        let result = ImportOrganizerConfig::new(
            vec!["company".to_string(), "other".to_string()],
            vec![("company".to_string(), "(com\\.+)+".to_string())],
            true,
        );
        assert!(matches!(
            result.err(),
            Some(ConfigError::SuspiciousPattern(_))
        ));
    }

    #[test]
    fn rule_ids() {
        let indentation = RuleConfig::Indentation(IndentationConfig::default());
        assert_eq!(indentation.rule_id(), "indentation");
        let organizer = RuleConfig::ImportOrganizer(ImportOrganizerConfig::default());
        assert_eq!(organizer.rule_id(), "import-organizer");
    }
}
