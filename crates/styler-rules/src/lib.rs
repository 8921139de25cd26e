//! Rule engine for the Styler formatting core.
//!
//! Defines the uniform [`engine::Rule`] contract every formatting rule
//! implements, the violation/edit model with weighted severities, validated
//! per-rule configurations (including ReDoS screening of user-supplied
//! patterns), and two reference rules: indentation and the import
//! organizer.

pub mod config;
pub mod engine;
pub mod rules;
pub mod violation;

pub use config::{
    ConfigError, CustomGroup, ImportOrganizerConfig, IndentationConfig, IndentationMode,
    RuleConfig,
};
pub use engine::{config_for, Rule, RuleEngine, RuleError};
pub use rules::{ImportOrganizerRule, IndentationRule};
pub use violation::{Edit, Severity, Violation};
