//! Shared leaf types for the Styler formatting core.
//!
//! Every stage of the pipeline (lexer, parser, arena, converter, rules)
//! speaks in terms of the types defined here: byte [`span::Span`]s into the
//! original source, [`token::Token`]s, location-rich [`diagnostics::ParseError`]s,
//! the configured [`version::LanguageVersion`], and the cooperative
//! [`deadline::Deadline`].

pub mod deadline;
pub mod diagnostics;
pub mod span;
pub mod token;
pub mod version;

pub use deadline::{Deadline, DeadlineExceeded};
pub use diagnostics::ParseError;
pub use span::{LineIndex, SourcePosition, Span};
pub use token::{keyword_from_str, Token, TokenKind};
pub use version::LanguageVersion;
