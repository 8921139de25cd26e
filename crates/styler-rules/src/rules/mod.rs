//! Reference rules exercising the engine contract.

mod import_organizer;
mod indentation;

pub use import_organizer::ImportOrganizerRule;
pub use indentation::IndentationRule;
