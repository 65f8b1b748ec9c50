//! Hack VM Translator - Common Types and Utilities
//! 
//! This crate contains shared types used across all components of the
//! translator: source locations and the diagnostic reporter for problems
//! that are tolerated rather than fatal.

pub mod diagnostic;
pub mod source_loc;

pub use diagnostic::{Diagnostic, DiagnosticReporter};
pub use source_loc::SourceLocation;
