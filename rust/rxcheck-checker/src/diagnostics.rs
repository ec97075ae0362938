//! Structured findings handed to the reporting layer.

use crate::analysis::error_codes::code_for;
use crate::analysis::errors::{EffectError, EnumError};
use rxcheck_core::Span;
use serde::Serialize;
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumIter};

/// The finding taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, AsRefStr)]
pub enum DiagnosticKind {
    ConflictingEffectAnnotation,
    IncompatibleCapability,
    UnknownCapability,
    InvalidPolymorphismTarget,
    NotAFunctionArgument,
    UnprovableCapabilityImplementation,
    EffectEscalation,
    UnknownCallee,
    MutationNotPermitted,
    UnknownEnumClass,
    DuplicateEnumClass,
    CyclicComposition,
    EnumMemberTypeConflict,
    EnumMemberValueConflict,
    EnumMemberRedeclaration,
    EnumMemberTypeMismatch,
    MissingEnumBase,
    DuplicateCompositionSource,
}

/// A single finding: what went wrong, where, and which declarations are involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub span: Span,
    pub involved: Vec<String>,
}

impl Diagnostic {
    /// Render without colors (for logs and tests)
    pub fn render_plain(&self) -> String {
        let mut out = format!("error[{}]: {}\n", self.code, self.message);
        out.push_str(&format!("  --> {}:{}\n", self.span.line, self.span.col));
        if !self.involved.is_empty() {
            out.push_str(&format!("   = involves: {}\n", self.involved.join(", ")));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.kind, self.message)
    }
}

impl From<&EffectError> for Diagnostic {
    fn from(err: &EffectError) -> Self {
        let kind = err.kind();
        Diagnostic {
            kind,
            code: code_for(kind),
            message: err.to_string(),
            span: err.span(),
            involved: err.involved(),
        }
    }
}

impl From<&EnumError> for Diagnostic {
    fn from(err: &EnumError) -> Self {
        let kind = err.kind();
        Diagnostic {
            kind,
            code: code_for(kind),
            message: err.to_string(),
            span: err.span(),
            involved: err.involved(),
        }
    }
}

impl From<EffectError> for Diagnostic {
    fn from(err: EffectError) -> Self {
        Diagnostic::from(&err)
    }
}

impl From<EnumError> for Diagnostic {
    fn from(err: EnumError) -> Self {
        Diagnostic::from(&err)
    }
}
