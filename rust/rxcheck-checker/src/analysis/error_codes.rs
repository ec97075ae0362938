//! Stable codes for every diagnostic kind.
//!
//! Code ranges:
//!   R0001–R0099  Effect annotations, call sites, and mutations
//!   R0100–R0199  Enum class registration and composition

use crate::diagnostics::DiagnosticKind;

pub fn code_for(kind: DiagnosticKind) -> &'static str {
    match kind {
        // ── Annotations (R0001–R0019) ──────────────────────────────
        DiagnosticKind::ConflictingEffectAnnotation => "R0001",
        DiagnosticKind::IncompatibleCapability => "R0002",
        DiagnosticKind::UnknownCapability => "R0003",
        DiagnosticKind::InvalidPolymorphismTarget => "R0004",
        // ── Call sites (R0020–R0039) ───────────────────────────────
        DiagnosticKind::NotAFunctionArgument => "R0020",
        DiagnosticKind::UnprovableCapabilityImplementation => "R0021",
        DiagnosticKind::EffectEscalation => "R0022",
        DiagnosticKind::UnknownCallee => "R0023",
        // ── Mutations (R0040–R0059) ────────────────────────────────
        DiagnosticKind::MutationNotPermitted => "R0040",
        // ── Enum classes (R0100–R0199) ─────────────────────────────
        DiagnosticKind::UnknownEnumClass => "R0100",
        DiagnosticKind::DuplicateEnumClass => "R0101",
        DiagnosticKind::CyclicComposition => "R0102",
        DiagnosticKind::EnumMemberTypeConflict => "R0103",
        DiagnosticKind::EnumMemberValueConflict => "R0104",
        DiagnosticKind::EnumMemberRedeclaration => "R0105",
        DiagnosticKind::EnumMemberTypeMismatch => "R0106",
        DiagnosticKind::MissingEnumBase => "R0107",
        DiagnosticKind::DuplicateCompositionSource => "R0108",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for kind in DiagnosticKind::iter() {
            assert!(seen.insert(code_for(kind)), "duplicate code for {kind}");
        }
    }
}
