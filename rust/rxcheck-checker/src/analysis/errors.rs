//! Findings of the two checking pipelines.
//!
//! Every finding is non-fatal: passes collect them and keep going.

use crate::analysis::annotations::Capability;
use crate::diagnostics::DiagnosticKind;
use rxcheck_core::{EffectLevel, Span};
use thiserror::Error;

/// A finding of annotation normalization, call-site, or mutation checking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("'{function}' carries conflicting effect annotations {markers} at line {}", .span.line)]
    ConflictingEffectAnnotation { function: String, markers: String, span: Span },
    #[error(
        "capability '{capability}' on '{function}' requires an effect no more permissive than {required}, but '{function}' is {declared} at line {}",
        .span.line
    )]
    IncompatibleCapability {
        function: String,
        capability: Capability,
        required: EffectLevel,
        declared: EffectLevel,
        span: Span,
    },
    #[error("unknown capability '{capability}' on '{function}' at line {}", .span.line)]
    UnknownCapability { function: String, capability: String, span: Span },
    #[error("'{marker}' on {target} of '{function}' is invalid: {reason} at line {}", .span.line)]
    InvalidPolymorphismTarget {
        function: String,
        /// `parameter '$x'`, or `declaration` for function-level markers.
        target: String,
        marker: String,
        reason: String,
        span: Span,
    },
    #[error(
        "argument {index} of call to '{callee}' in '{caller}' must be a function, found {ty} at line {}",
        .span.line
    )]
    NotAFunctionArgument {
        caller: String,
        callee: String,
        index: usize,
        ty: String,
        span: Span,
    },
    #[error(
        "cannot prove that argument {index} ({ty}) of call to '{callee}' in '{caller}' implements '{interface}' at line {}",
        .span.line
    )]
    UnprovableCapabilityImplementation {
        caller: String,
        callee: String,
        index: usize,
        ty: String,
        interface: String,
        span: Span,
    },
    #[error(
        "'{caller}' is {context} and cannot call '{callee}', which is {callee_effect}, at line {}",
        .span.line
    )]
    EffectEscalation {
        caller: String,
        context: EffectLevel,
        callee: String,
        callee_effect: EffectLevel,
        span: Span,
    },
    #[error("call to unknown function '{callee}' in '{caller}' at line {}", .span.line)]
    UnknownCallee { caller: String, callee: String, span: Span },
    #[error(
        "'{function}' is {context} and cannot write {place} without capability '{missing}' at line {}",
        .span.line
    )]
    MutationNotPermitted {
        function: String,
        context: EffectLevel,
        place: String,
        missing: Capability,
        span: Span,
    },
}

impl EffectError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            EffectError::ConflictingEffectAnnotation { .. } => {
                DiagnosticKind::ConflictingEffectAnnotation
            }
            EffectError::IncompatibleCapability { .. } => DiagnosticKind::IncompatibleCapability,
            EffectError::UnknownCapability { .. } => DiagnosticKind::UnknownCapability,
            EffectError::InvalidPolymorphismTarget { .. } => {
                DiagnosticKind::InvalidPolymorphismTarget
            }
            EffectError::NotAFunctionArgument { .. } => DiagnosticKind::NotAFunctionArgument,
            EffectError::UnprovableCapabilityImplementation { .. } => {
                DiagnosticKind::UnprovableCapabilityImplementation
            }
            EffectError::EffectEscalation { .. } => DiagnosticKind::EffectEscalation,
            EffectError::UnknownCallee { .. } => DiagnosticKind::UnknownCallee,
            EffectError::MutationNotPermitted { .. } => DiagnosticKind::MutationNotPermitted,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            EffectError::ConflictingEffectAnnotation { span, .. }
            | EffectError::IncompatibleCapability { span, .. }
            | EffectError::UnknownCapability { span, .. }
            | EffectError::InvalidPolymorphismTarget { span, .. }
            | EffectError::NotAFunctionArgument { span, .. }
            | EffectError::UnprovableCapabilityImplementation { span, .. }
            | EffectError::EffectEscalation { span, .. }
            | EffectError::UnknownCallee { span, .. }
            | EffectError::MutationNotPermitted { span, .. } => *span,
        }
    }

    /// Names of the declarations the finding is about, reporting site first.
    pub fn involved(&self) -> Vec<String> {
        match self {
            EffectError::ConflictingEffectAnnotation { function, .. }
            | EffectError::IncompatibleCapability { function, .. }
            | EffectError::UnknownCapability { function, .. }
            | EffectError::InvalidPolymorphismTarget { function, .. }
            | EffectError::MutationNotPermitted { function, .. } => vec![function.clone()],
            EffectError::NotAFunctionArgument { caller, callee, .. }
            | EffectError::UnprovableCapabilityImplementation { caller, callee, .. }
            | EffectError::EffectEscalation { caller, callee, .. }
            | EffectError::UnknownCallee { caller, callee, .. } => {
                vec![caller.clone(), callee.clone()]
            }
        }
    }
}

/// A finding of enum class registration or composition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumError {
    #[error("unknown enum class '{name}' at line {}", .span.line)]
    UnknownEnumClass {
        name: String,
        referenced_by: Option<String>,
        span: Span,
    },
    #[error("enum class '{name}' is declared more than once at line {}", .span.line)]
    DuplicateEnumClass { name: String, span: Span },
    #[error("enum class '{class}' is part of a composition cycle {cycle} at line {}", .span.line)]
    CyclicComposition { class: String, cycle: String, span: Span },
    #[error(
        "member '{member}' of '{class}' has type {existing_ty} from '{existing_origin}' but {incoming_ty} from '{incoming_origin}' at line {}",
        .span.line
    )]
    EnumMemberTypeConflict {
        class: String,
        member: String,
        existing_ty: String,
        existing_origin: String,
        incoming_ty: String,
        incoming_origin: String,
        span: Span,
    },
    #[error(
        "member '{member}' of '{class}' is {existing_value} from '{existing_origin}' but {incoming_value} from '{incoming_origin}' at line {}",
        .span.line
    )]
    EnumMemberValueConflict {
        class: String,
        member: String,
        existing_value: String,
        existing_origin: String,
        incoming_value: String,
        incoming_origin: String,
        span: Span,
    },
    #[error(
        "'{class}' redeclares member '{member}' already provided by '{previous_origin}' at line {}",
        .span.line
    )]
    EnumMemberRedeclaration {
        class: String,
        member: String,
        previous_origin: String,
        span: Span,
    },
    #[error(
        "member '{member}' of '{class}' has type {ty}, which is not assignable to the base {base} at line {}",
        .span.line
    )]
    EnumMemberTypeMismatch {
        class: String,
        member: String,
        ty: String,
        base: String,
        span: Span,
    },
    #[error("'{class}' does not declare a base type at line {}", .span.line)]
    MissingEnumBase { class: String, span: Span },
    #[error("'{class}' composes '{source_class}' more than once at line {}", .span.line)]
    DuplicateCompositionSource { class: String, source_class: String, span: Span },
}

impl EnumError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            EnumError::UnknownEnumClass { .. } => DiagnosticKind::UnknownEnumClass,
            EnumError::DuplicateEnumClass { .. } => DiagnosticKind::DuplicateEnumClass,
            EnumError::CyclicComposition { .. } => DiagnosticKind::CyclicComposition,
            EnumError::EnumMemberTypeConflict { .. } => DiagnosticKind::EnumMemberTypeConflict,
            EnumError::EnumMemberValueConflict { .. } => DiagnosticKind::EnumMemberValueConflict,
            EnumError::EnumMemberRedeclaration { .. } => DiagnosticKind::EnumMemberRedeclaration,
            EnumError::EnumMemberTypeMismatch { .. } => DiagnosticKind::EnumMemberTypeMismatch,
            EnumError::MissingEnumBase { .. } => DiagnosticKind::MissingEnumBase,
            EnumError::DuplicateCompositionSource { .. } => {
                DiagnosticKind::DuplicateCompositionSource
            }
        }
    }

    pub fn span(&self) -> Span {
        match self {
            EnumError::UnknownEnumClass { span, .. }
            | EnumError::DuplicateEnumClass { span, .. }
            | EnumError::CyclicComposition { span, .. }
            | EnumError::EnumMemberTypeConflict { span, .. }
            | EnumError::EnumMemberValueConflict { span, .. }
            | EnumError::EnumMemberRedeclaration { span, .. }
            | EnumError::EnumMemberTypeMismatch { span, .. }
            | EnumError::MissingEnumBase { span, .. }
            | EnumError::DuplicateCompositionSource { span, .. } => *span,
        }
    }

    pub fn involved(&self) -> Vec<String> {
        match self {
            EnumError::UnknownEnumClass { name, referenced_by, .. } => {
                referenced_by.iter().cloned().chain(std::iter::once(name.clone())).collect()
            }
            EnumError::DuplicateEnumClass { name, .. } => vec![name.clone()],
            EnumError::CyclicComposition { class, .. }
            | EnumError::EnumMemberTypeMismatch { class, .. }
            | EnumError::MissingEnumBase { class, .. } => vec![class.clone()],
            EnumError::EnumMemberTypeConflict {
                class,
                existing_origin,
                incoming_origin,
                ..
            }
            | EnumError::EnumMemberValueConflict {
                class,
                existing_origin,
                incoming_origin,
                ..
            } => {
                vec![class.clone(), existing_origin.clone(), incoming_origin.clone()]
            }
            EnumError::EnumMemberRedeclaration { class, previous_origin, .. } => {
                vec![class.clone(), previous_origin.clone()]
            }
            EnumError::DuplicateCompositionSource { class, source_class, .. } => {
                vec![class.clone(), source_class.clone()]
            }
        }
    }
}
