//! rxcheck checker
//!
//! Checks a resolved declaration table for two families of errors:
//!
//! - **effects**: every call site and every write in a function body must
//!   stay within the function's declared effect and capabilities;
//! - **enum classes**: every enum class must compose into a well-formed
//!   member table.
//!
//! The two pipelines share nothing and run side by side. All findings come
//! back as [`Diagnostic`]s, never as a hard failure.

pub mod analysis;
pub mod diagnostics;

pub use analysis::composition::{MemberEntry, Resolution, ValueConflictPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind};

use analysis::composition::CompositionResolver;
use analysis::effects::{check_effects, EffectReport};
use analysis::enum_registry::EnumRegistry;
use analysis::escape::{AlwaysEscapes, DeclaredEscapes, EscapeOracle};
use analysis::hierarchy::{NominalHierarchy, TypeRelation};
use rxcheck_core::Program;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Check options ───────────────────────────────────────────────────

/// Options controlling the check pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Same-type members with different values from different sources.
    /// Default: `Error`.
    pub value_conflict: ValueConflictPolicy,
    /// Trust the `non_escaping` flag the front end recorded on allocation
    /// sites. When off, every object is assumed to escape. Default: `true`.
    pub trust_declared_escapes: bool,
    /// Run on the rayon pool. Results are identical either way. Default: `true`.
    pub parallel: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            value_conflict: ValueConflictPolicy::default(),
            trust_declared_escapes: true,
            parallel: true,
        }
    }
}

// ── Check report ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Effect findings in declaration order, then enum findings in
    /// declaration order.
    pub diagnostics: Vec<Diagnostic>,
    /// Resolved tables of every registered enum class.
    pub enums: Vec<Arc<Resolution>>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn enum_table(&self, class: &str) -> Option<&Resolution> {
        self.enums.iter().map(|r| r.as_ref()).find(|r| r.class == class)
    }
}

/// Check a program with the builtin type relation and escape oracle.
pub fn check_program(program: &Program, options: &CheckOptions) -> CheckReport {
    let types = NominalHierarchy::new(&program.classes);
    let escape: &dyn EscapeOracle = if options.trust_declared_escapes {
        &DeclaredEscapes
    } else {
        &AlwaysEscapes
    };
    check_program_with(program, options, &types, escape)
}

/// Check a program against injected type and escape facts.
pub fn check_program_with(
    program: &Program,
    options: &CheckOptions,
    types: &dyn TypeRelation,
    escape: &dyn EscapeOracle,
) -> CheckReport {
    tracing::info!(
        functions = program.functions.len(),
        enums = program.enums.len(),
        parallel = options.parallel,
        "checking program"
    );

    let run_effects = || check_effects(&program.functions, types, escape, options.parallel);
    let run_enums = || check_enums(program, options, types);
    let (effects, (enum_diagnostics, enums)) = if options.parallel {
        rayon::join(run_effects, run_enums)
    } else {
        (run_effects(), run_enums())
    };

    let EffectReport { errors, .. } = effects;
    let mut diagnostics: Vec<Diagnostic> = errors.into_iter().map(Diagnostic::from).collect();
    diagnostics.extend(enum_diagnostics);
    tracing::info!(findings = diagnostics.len(), "check finished");
    CheckReport { diagnostics, enums }
}

/// Register and resolve every enum class of `program`.
pub fn check_enums(
    program: &Program,
    options: &CheckOptions,
    types: &dyn TypeRelation,
) -> (Vec<Diagnostic>, Vec<Arc<Resolution>>) {
    let (registry, duplicates) = EnumRegistry::build(&program.enums);
    let resolver = CompositionResolver::new(&registry, types, options.value_conflict);
    let resolutions = resolver.resolve_all(options.parallel);

    let mut diagnostics: Vec<Diagnostic> = duplicates.into_iter().map(Diagnostic::from).collect();
    for resolution in &resolutions {
        diagnostics.extend(resolution.errors.iter().map(Diagnostic::from));
    }
    (diagnostics, resolutions)
}
