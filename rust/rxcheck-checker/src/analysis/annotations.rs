//! Annotation normalization: raw attributes to an effect descriptor.
//!
//! Each declaration is normalized on its own, without looking at any other
//! declaration's effect, so the pass can run over all declarations at once
//! before any call site is checked.
//!
//! ## Markers
//!
//! | attribute            | meaning                                          |
//! |----------------------|--------------------------------------------------|
//! | `__Pure`             | `Pure`                                           |
//! | `__RxShallow`        | `ShallowReactive`                                |
//! | `__Rx`               | `Reactive`                                       |
//! | `__NonRx`            | `Unrestricted`                                   |
//! | `__RxLocal`          | as reactive as the caller; body is `Reactive`    |
//! | `__AtMostRxAsArgs`   | enables the parameter markers below              |
//! | `__AtMostRxAsFunc`   | (parameter) at most as reactive as this function |
//! | `__OnlyRxIfImpl(I)`  | (parameter) reactive only if the argument is an `I` |
//!
//! At most one of the first five may appear on a declaration. Capabilities
//! come from the bracketed context list and are kept apart from the level.

use crate::analysis::errors::EffectError;
use crate::analysis::hierarchy::{canonical_name, TypeRelation};
use rxcheck_core::program::{Attribute, FunctionDecl, Param};
use rxcheck_core::{EffectLevel, Span};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const PURE: &str = "__Pure";
pub const RX_SHALLOW: &str = "__RxShallow";
pub const RX: &str = "__Rx";
pub const NON_RX: &str = "__NonRx";
pub const RX_LOCAL: &str = "__RxLocal";
pub const AT_MOST_RX_AS_ARGS: &str = "__AtMostRxAsArgs";
pub const AT_MOST_RX_AS_FUNC: &str = "__AtMostRxAsFunc";
pub const ONLY_RX_IF_IMPL: &str = "__OnlyRxIfImpl";

// ── Capabilities ────────────────────────────────────────────────────

/// A permission to perform a kind of mutation, orthogonal to the effect level.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Write properties of any object.
    WriteProps,
    /// Write properties of `$this` only.
    WriteThisProps,
}

impl Capability {
    /// The most permissive effect level this capability may be declared with.
    pub fn max_effect(self) -> EffectLevel {
        match self {
            Capability::WriteProps | Capability::WriteThisProps => EffectLevel::Reactive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        use strum::IntoEnumIterator;
        Self(Capability::iter().collect())
    }

    pub fn insert(&mut self, cap: Capability) {
        self.0.insert(cap);
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Effect descriptors ──────────────────────────────────────────────

/// One ceiling contributing to a declaration's effect at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EffectSpec {
    Fixed(EffectLevel),
    /// At most as reactive as the caller.
    AsCaller,
    /// At most as reactive as the function passed as argument `i`.
    AsArgFunction(usize),
    /// At most as reactive as argument `i`, provided it implements the interface.
    AsArgIfImplements(usize, String),
}

/// How a single parameter takes part in argument polymorphism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParamPolymorphism {
    AsFunction,
    IfImplements(String),
}

/// The normalized effect of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectDescriptor {
    /// Effect in force inside the body.
    pub base: EffectLevel,
    /// Ceilings whose join is the effect of a call. Never empty.
    pub specs: Vec<EffectSpec>,
    pub capabilities: CapabilitySet,
    /// Indexed by parameter position.
    pub params: Vec<Option<ParamPolymorphism>>,
}

impl EffectDescriptor {
    pub fn fixed(level: EffectLevel) -> Self {
        Self {
            base: level,
            specs: vec![EffectSpec::Fixed(level)],
            capabilities: CapabilitySet::new(),
            params: Vec::new(),
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        self.specs.iter().any(|s| !matches!(s, EffectSpec::Fixed(_)))
    }

    pub fn param(&self, index: usize) -> Option<&ParamPolymorphism> {
        self.params.get(index).and_then(|p| p.as_ref())
    }

    /// Capabilities usable inside the body. Unrestricted code holds them all.
    pub fn capabilities_in_force(&self) -> CapabilitySet {
        if self.base == EffectLevel::Unrestricted {
            CapabilitySet::all()
        } else {
            self.capabilities.clone()
        }
    }
}

/// Normalized descriptors keyed by qualified declaration name.
pub type DescriptorTable = HashMap<String, EffectDescriptor>;

/// Result of normalizing one declaration. The descriptor is always usable,
/// even when findings were reported.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub descriptor: EffectDescriptor,
    pub errors: Vec<EffectError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Level(EffectLevel),
    AsCaller,
}

fn effect_marker(attr: &Attribute) -> Option<Marker> {
    match attr.name.as_str() {
        PURE => Some(Marker::Level(EffectLevel::Pure)),
        RX_SHALLOW => Some(Marker::Level(EffectLevel::ShallowReactive)),
        RX => Some(Marker::Level(EffectLevel::Reactive)),
        NON_RX => Some(Marker::Level(EffectLevel::Unrestricted)),
        RX_LOCAL => Some(Marker::AsCaller),
        _ => None,
    }
}

/// Normalize a declaration's raw annotations.
pub fn normalize(decl: &FunctionDecl, types: &dyn TypeRelation) -> Normalized {
    let mut errors = Vec::new();

    // 1. The effect level
    let markers: Vec<(&Attribute, Marker)> = decl
        .attributes
        .iter()
        .filter_map(|a| effect_marker(a).map(|m| (a, m)))
        .collect();
    if markers.len() > 1 {
        let names: Vec<&str> = markers.iter().map(|(a, _)| a.name.as_str()).collect();
        errors.push(EffectError::ConflictingEffectAnnotation {
            function: decl.name.clone(),
            markers: names.join(", "),
            span: markers[1].0.span.or(decl.span),
        });
    }
    // On conflict the first marker written wins, so later checks still run.
    let (base, primary) = match markers.first().map(|(_, m)| *m) {
        None => (EffectLevel::Unrestricted, EffectSpec::Fixed(EffectLevel::Unrestricted)),
        Some(Marker::Level(level)) => (level, EffectSpec::Fixed(level)),
        Some(Marker::AsCaller) => (EffectLevel::Reactive, EffectSpec::AsCaller),
    };
    let mut specs = vec![primary];

    // 2. Argument polymorphism
    let anchored = decl.attributes.iter().any(|a| a.name == AT_MOST_RX_AS_ARGS);
    let mut params = Vec::with_capacity(decl.params.len());
    for (index, param) in decl.params.iter().enumerate() {
        let poly = normalize_param(decl, param, anchored, types, &mut errors);
        match &poly {
            Some(ParamPolymorphism::AsFunction) => specs.push(EffectSpec::AsArgFunction(index)),
            Some(ParamPolymorphism::IfImplements(iface)) => {
                specs.push(EffectSpec::AsArgIfImplements(index, iface.clone()))
            }
            None => {}
        }
        params.push(poly);
    }
    if anchored && params.iter().all(Option::is_none) {
        let span = decl
            .attributes
            .iter()
            .find(|a| a.name == AT_MOST_RX_AS_ARGS)
            .map_or(decl.span, |a| a.span.or(decl.span));
        errors.push(EffectError::InvalidPolymorphismTarget {
            function: decl.name.clone(),
            target: "declaration".to_string(),
            marker: AT_MOST_RX_AS_ARGS.to_string(),
            reason: format!(
                "no parameter is marked {} or {}",
                AT_MOST_RX_AS_FUNC, ONLY_RX_IF_IMPL
            ),
            span,
        });
    }

    // 3. Capabilities
    let mut capabilities = CapabilitySet::new();
    for cap_ref in &decl.capabilities {
        let span = cap_ref.span.or(decl.span);
        match Capability::from_str(&cap_ref.name) {
            Ok(cap) if base.leq(cap.max_effect()) => capabilities.insert(cap),
            Ok(cap) => errors.push(EffectError::IncompatibleCapability {
                function: decl.name.clone(),
                capability: cap,
                required: cap.max_effect(),
                declared: base,
                span,
            }),
            Err(_) => errors.push(EffectError::UnknownCapability {
                function: decl.name.clone(),
                capability: cap_ref.name.clone(),
                span,
            }),
        }
    }

    tracing::trace!(function = %decl.name, %base, specs = specs.len(), "normalized");
    Normalized {
        descriptor: EffectDescriptor { base, specs, capabilities, params },
        errors,
    }
}

fn normalize_param(
    decl: &FunctionDecl,
    param: &Param,
    anchored: bool,
    types: &dyn TypeRelation,
    errors: &mut Vec<EffectError>,
) -> Option<ParamPolymorphism> {
    let mut result = None;
    for attr in &param.attributes {
        let invalid = |reason: String| EffectError::InvalidPolymorphismTarget {
            function: decl.name.clone(),
            target: format!("parameter '${}'", param.name),
            marker: attr.name.clone(),
            reason,
            span: attr.span.or(param.span).or(decl.span),
        };
        let candidate = match attr.name.as_str() {
            AT_MOST_RX_AS_FUNC => {
                if !param.ty.is_function() {
                    errors.push(invalid(format!(
                        "declared type {} is not a function type",
                        param.ty
                    )));
                    continue;
                }
                ParamPolymorphism::AsFunction
            }
            ONLY_RX_IF_IMPL => {
                let Some(raw) = attr.args.first() else {
                    errors.push(invalid("missing interface argument".to_string()));
                    continue;
                };
                let iface = canonical_name(raw.trim_end_matches("::class")).to_string();
                if types.is_interface(&iface) == Some(false) {
                    errors.push(invalid(format!("'{}' is a class, not an interface", iface)));
                    continue;
                }
                let declared_interface =
                    param.ty.nominal_name().map(|name| types.is_interface(name));
                if matches!(declared_interface, None | Some(Some(false))) {
                    errors.push(invalid(format!(
                        "declared type {} is not an interface type",
                        param.ty
                    )));
                    continue;
                }
                ParamPolymorphism::IfImplements(iface)
            }
            _ => continue,
        };
        if !anchored {
            errors.push(invalid(format!("the declaration is not marked {}", AT_MOST_RX_AS_ARGS)));
            continue;
        }
        if result.is_some() {
            errors.push(invalid("the parameter already carries a polymorphism marker".to_string()));
            continue;
        }
        result = Some(candidate);
    }
    result
}

/// Prefer `self` unless it is the zero span of a hand-built declaration.
trait SpanOr {
    fn or(self, fallback: Span) -> Span;
}

impl SpanOr for Span {
    fn or(self, fallback: Span) -> Span {
        if self == Span::dummy() {
            fallback
        } else {
            self
        }
    }
}
