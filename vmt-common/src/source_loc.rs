//! Source location tracking for error reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line within a VM module (line is 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub module: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(module: &str, line: u32) -> Self {
        Self {
            module: module.to_string(),
            line,
        }
    }

    /// Create a dummy location for testing and generated code
    pub fn dummy() -> Self {
        Self::new("<unknown>", 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.vm:{}", self.module, self.line)
    }
}
