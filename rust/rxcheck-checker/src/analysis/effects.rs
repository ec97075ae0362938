//! The effect pipeline: normalize every declaration, then check every body.
//!
//! Normalization never looks at other declarations, so it runs over all of
//! them before any call site is checked. Call sites then read the finished
//! descriptor table without mutating it. Both phases are data parallel.

use crate::analysis::annotations::{normalize, DescriptorTable, Normalized};
use crate::analysis::calls::{check_call, CallContext};
use crate::analysis::errors::EffectError;
use crate::analysis::escape::EscapeOracle;
use crate::analysis::hierarchy::TypeRelation;
use crate::analysis::mutation::{check_mutation, MutationContext};
use rayon::prelude::*;
use rxcheck_core::program::FunctionDecl;
use std::collections::hash_map::Entry;

/// Output of the effect pipeline.
#[derive(Debug, Clone, Default)]
pub struct EffectReport {
    pub descriptors: DescriptorTable,
    /// In declaration order; within a declaration, annotation findings
    /// first, then call sites, then mutations, each in source order.
    pub errors: Vec<EffectError>,
}

/// Order-preserving map, on the rayon pool when `parallel` is set.
pub(crate) fn map_ordered<T, R, F>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

pub fn check_effects(
    functions: &[FunctionDecl],
    types: &dyn TypeRelation,
    escape: &dyn EscapeOracle,
    parallel: bool,
) -> EffectReport {
    let normalized: Vec<Normalized> = map_ordered(functions, parallel, |f| normalize(f, types));

    let mut descriptors = DescriptorTable::with_capacity(functions.len());
    for (decl, n) in functions.iter().zip(&normalized) {
        match descriptors.entry(decl.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(n.descriptor.clone());
            }
            Entry::Occupied(_) => {
                tracing::warn!(function = %decl.name, "duplicate declaration, keeping the first");
            }
        }
    }

    let indexed: Vec<(&FunctionDecl, &Normalized)> = functions.iter().zip(&normalized).collect();
    let per_function = map_ordered(&indexed, parallel, |(decl, n)| {
        let mut errors = n.errors.clone();
        let calls = CallContext {
            caller: decl,
            caller_effect: &n.descriptor,
            descriptors: &descriptors,
            types,
        };
        for call in &decl.calls {
            errors.extend(check_call(&calls, call));
        }
        let mutations = MutationContext { function: decl, descriptor: &n.descriptor, escape };
        errors.extend(decl.mutations.iter().filter_map(|m| check_mutation(&mutations, m)));
        errors
    });

    let errors: Vec<EffectError> = per_function.into_iter().flatten().collect();
    tracing::debug!(functions = functions.len(), findings = errors.len(), "effect checks done");
    EffectReport { descriptors, errors }
}
