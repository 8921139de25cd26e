use std::fmt;

use serde::Serialize;

/// The configured target language version.
///
/// Version-gated constructs consult these predicates before parsing; a
/// construct seen below its minimum version is reported as a parse
/// diagnostic and parsing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LanguageVersion(u32);

/// Lowest language version the parser accepts.
pub const MIN_VERSION: u32 = 8;

/// Newest language version the parser knows about.
pub const LATEST_VERSION: u32 = 25;

impl LanguageVersion {
    /// Create a version selector. Rejects versions below 8.
    pub fn new(version: u32) -> Result<Self, UnsupportedVersion> {
        if version < MIN_VERSION {
            return Err(UnsupportedVersion(version));
        }
        Ok(Self(version))
    }

    /// The newest known version.
    pub fn latest() -> Self {
        Self(LATEST_VERSION)
    }

    /// The raw version number.
    pub fn value(self) -> u32 {
        self.0
    }

    // ── Feature predicates ─────────────────────────────────────────────

    /// `var` local variable type inference.
    pub fn supports_var(self) -> bool {
        self.0 >= 10
    }

    /// Switch expressions with arrow cases and `yield`.
    pub fn supports_switch_expressions(self) -> bool {
        self.0 >= 14
    }

    /// Text blocks (`"""`).
    pub fn supports_text_blocks(self) -> bool {
        self.0 >= 15
    }

    /// Record declarations.
    pub fn supports_records(self) -> bool {
        self.0 >= 16
    }

    /// Pattern matching in `instanceof`.
    pub fn supports_pattern_instanceof(self) -> bool {
        self.0 >= 16
    }

    /// Sealed types (`sealed`, `non-sealed`, `permits`).
    pub fn supports_sealed_types(self) -> bool {
        self.0 >= 17
    }

    /// Patterns in switch cases, including record patterns.
    pub fn supports_switch_patterns(self) -> bool {
        self.0 >= 21
    }

    /// Unnamed variables and patterns (`_`).
    pub fn supports_unnamed_variables(self) -> bool {
        self.0 >= 22
    }

    /// String templates.
    pub fn supports_string_templates(self) -> bool {
        self.0 >= 22
    }

    /// Primitive types in patterns.
    pub fn supports_primitive_patterns(self) -> bool {
        self.0 >= 23
    }

    /// Module import declarations (`import module M;`).
    pub fn supports_module_imports(self) -> bool {
        self.0 >= 25
    }

    /// Compact source files with top-level methods and instance main.
    pub fn supports_compact_source_files(self) -> bool {
        self.0 >= 25
    }

    /// Statements before `super(...)`/`this(...)` in constructor bodies.
    pub fn supports_flexible_constructor_bodies(self) -> bool {
        self.0 >= 25
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for a version selector below the supported minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedVersion(pub u32);

impl fmt::Display for UnsupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported language version {} (minimum is {MIN_VERSION})",
            self.0
        )
    }
}

impl std::error::Error for UnsupportedVersion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_versions_below_minimum() {
        assert_eq!(LanguageVersion::new(7), Err(UnsupportedVersion(7)));
        assert_eq!(LanguageVersion::new(0), Err(UnsupportedVersion(0)));
        assert!(LanguageVersion::new(8).is_ok());
    }

    #[test]
    fn feature_thresholds() {
        let v8 = LanguageVersion::new(8).unwrap();
        assert!(!v8.supports_var());
        assert!(!v8.supports_records());

        let v16 = LanguageVersion::new(16).unwrap();
        assert!(v16.supports_records());
        assert!(v16.supports_pattern_instanceof());
        assert!(!v16.supports_sealed_types());

        let v21 = LanguageVersion::new(21).unwrap();
        assert!(v21.supports_switch_patterns());
        assert!(!v21.supports_module_imports());

        let latest = LanguageVersion::latest();
        assert!(latest.supports_module_imports());
        assert!(latest.supports_compact_source_files());
        assert!(latest.supports_flexible_constructor_bodies());
    }

    #[test]
    fn default_is_latest() {
        assert_eq!(LanguageVersion::default(), LanguageVersion::latest());
        assert_eq!(LanguageVersion::latest().value(), LATEST_VERSION);
    }
}
