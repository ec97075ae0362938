//! Type relations consumed by the checks.
//!
//! General subtyping belongs to the front end's type inference. The checker
//! only asks two questions, through [`TypeRelation`]: does a static type
//! provably implement an interface, and is one type assignable to another.
//! [`NominalHierarchy`] answers them from the program's class table and a
//! small set of builtin facts about Hack's value containers.

use rxcheck_core::program::{ClassDecl, ClassKind};
use rxcheck_core::types::FnTy;
use rxcheck_core::{EffectLevel, Ty};
use std::collections::{HashMap, HashSet};

pub trait TypeRelation: Send + Sync {
    /// True only if `ty` is known to implement `interface`.
    fn implements(&self, ty: &Ty, interface: &str) -> bool;

    /// True only if `sub` is known to be assignable to `sup`.
    fn is_subtype(&self, sub: &Ty, sup: &Ty) -> bool;

    /// `Some(true)` for interfaces, `Some(false)` for classes, `None` if unknown.
    fn is_interface(&self, name: &str) -> Option<bool>;
}

/// Interfaces every `vec`, `dict` and `keyset` implements.
const CONTAINER_INTERFACES: &[&str] = &[
    "Traversable",
    "KeyedTraversable",
    "Container",
    "KeyedContainer",
    "Rx\\Traversable",
    "Rx\\KeyedTraversable",
];

/// `\HH\Rx\Traversable`, `HH\Rx\Traversable` and `Rx\Traversable` all name
/// the same interface.
pub fn canonical_name(name: &str) -> &str {
    let name = name.trim_start_matches('\\');
    name.strip_prefix("HH\\").unwrap_or(name)
}

#[derive(Debug, Clone, Default)]
pub struct NominalHierarchy {
    classes: HashMap<String, ClassDecl>,
}

impl NominalHierarchy {
    pub fn new(classes: &[ClassDecl]) -> Self {
        let mut table = HashMap::new();
        for class in classes {
            table
                .entry(canonical_name(&class.name).to_string())
                .or_insert_with(|| class.clone());
        }
        Self { classes: table }
    }

    /// Every class and interface `name` inherits from, itself excluded.
    pub fn ancestors(&self, name: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack = vec![canonical_name(name).to_string()];
        while let Some(current) = stack.pop() {
            if let Some(decl) = self.classes.get(&current) {
                for parent in decl.extends.iter().chain(decl.implements.iter()) {
                    let parent = canonical_name(parent).to_string();
                    if seen.insert(parent.clone()) {
                        stack.push(parent);
                    }
                }
            }
        }
        seen.remove(canonical_name(name));
        seen
    }

    fn named_subtype(&self, sub: &str, sub_args: &[Ty], sup: &str, sup_args: &[Ty]) -> bool {
        if canonical_name(sub) == canonical_name(sup) {
            return sub_args == sup_args;
        }
        // Instantiations of inherited type parameters are not tracked; an
        // ancestor match is accepted whatever its arguments.
        self.ancestors(sub).contains(canonical_name(sup))
    }

    fn function_subtype(&self, sub: &FnTy, sup: &FnTy) -> bool {
        let sub_effect = sub.effect.unwrap_or(EffectLevel::Unrestricted);
        let sup_effect = sup.effect.unwrap_or(EffectLevel::Unrestricted);
        sub.params.len() == sup.params.len()
            && sup
                .params
                .iter()
                .zip(sub.params.iter())
                .all(|(p_sup, p_sub)| self.is_subtype(p_sup, p_sub))
            && self.is_subtype(&sub.ret, &sup.ret)
            && sub_effect.leq(sup_effect)
    }
}

impl TypeRelation for NominalHierarchy {
    fn implements(&self, ty: &Ty, interface: &str) -> bool {
        let interface = canonical_name(interface);
        match ty {
            Ty::Vec { .. } | Ty::Dict { .. } | Ty::Keyset { .. } => {
                CONTAINER_INTERFACES.contains(&interface)
            }
            Ty::Named { name, .. } => {
                canonical_name(name) == interface || self.ancestors(name).contains(interface)
            }
            _ => false,
        }
    }

    fn is_subtype(&self, sub: &Ty, sup: &Ty) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (_, Ty::Mixed) => true,
            (Ty::Null, Ty::Nullable { .. }) => true,
            (Ty::Nullable { inner: a }, Ty::Nullable { inner: b }) => self.is_subtype(a, b),
            (Ty::Nullable { .. }, _) => false,
            (_, Ty::Nullable { inner }) => self.is_subtype(sub, inner),
            (Ty::Int, Ty::Num) | (Ty::Float, Ty::Num) => true,
            (Ty::Int, Ty::ArrayKey) | (Ty::String, Ty::ArrayKey) => true,
            (Ty::Named { name: a, args: aa }, Ty::Named { name: b, args: ba }) => {
                self.named_subtype(a, aa, b, ba)
            }
            (Ty::Vec { .. } | Ty::Dict { .. } | Ty::Keyset { .. }, Ty::Named { name, .. }) => {
                self.implements(sub, name)
            }
            (Ty::Vec { elem: a }, Ty::Vec { elem: b }) => self.is_subtype(a, b),
            (Ty::Keyset { elem: a }, Ty::Keyset { elem: b }) => self.is_subtype(a, b),
            (Ty::Dict { key: ka, value: va }, Ty::Dict { key: kb, value: vb }) => {
                self.is_subtype(ka, kb) && self.is_subtype(va, vb)
            }
            (Ty::Tuple { elems: a }, Ty::Tuple { elems: b }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.is_subtype(x, y))
            }
            (Ty::Shape { fields: a }, Ty::Shape { fields: b }) => {
                a.len() == b.len()
                    && b.iter().all(|fb| {
                        a.iter()
                            .find(|fa| fa.name == fb.name)
                            .is_some_and(|fa| self.is_subtype(&fa.ty, &fb.ty))
                    })
            }
            (Ty::Function(a), Ty::Function(b)) => self.function_subtype(a, b),
            _ => false,
        }
    }

    fn is_interface(&self, name: &str) -> Option<bool> {
        let name = canonical_name(name);
        if CONTAINER_INTERFACES.contains(&name) {
            return Some(true);
        }
        self.classes.get(name).map(|c| c.kind == ClassKind::Interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> NominalHierarchy {
        NominalHierarchy::new(&[
            ClassDecl::interface("ExBox"),
            ClassDecl::class("Box").implementing("ExBox"),
            ClassDecl::class("IBox").extending("Box"),
        ])
    }

    #[test]
    fn test_ancestors_are_transitive() {
        let h = boxes();
        let ancestors = h.ancestors("IBox");
        assert!(ancestors.contains("Box"));
        assert!(ancestors.contains("ExBox"));
        assert!(!ancestors.contains("IBox"));
    }

    #[test]
    fn test_ancestors_survive_cyclic_class_tables() {
        let h = NominalHierarchy::new(&[
            ClassDecl::class("A").extending("B"),
            ClassDecl::class("B").extending("A"),
        ]);
        assert_eq!(h.ancestors("A").len(), 1);
    }

    #[test]
    fn test_members_assignable_to_enum_base() {
        let h = boxes();
        let base = Ty::named("ExBox");
        assert!(h.is_subtype(&Ty::generic("Box", vec![Ty::String]), &base));
        assert!(h.is_subtype(&Ty::named("IBox"), &base));
        assert!(!h.is_subtype(&Ty::Int, &base));
        assert!(!h.is_subtype(&Ty::named("ExBox"), &Ty::named("IBox")));
    }

    #[test]
    fn test_generic_arguments_are_invariant_on_same_class() {
        let h = boxes();
        assert!(!h.is_subtype(
            &Ty::generic("Box", vec![Ty::Int]),
            &Ty::generic("Box", vec![Ty::String])
        ));
    }

    #[test]
    fn test_containers_implement_rx_traversable() {
        let h = boxes();
        assert!(h.implements(&Ty::vec_of(Ty::Int), "\\HH\\Rx\\Traversable"));
        assert!(h.implements(&Ty::dict_of(Ty::String, Ty::Int), "HH\\KeyedContainer"));
        assert!(!h.implements(&Ty::Int, "Rx\\Traversable"));
        assert_eq!(h.is_interface("\\HH\\Rx\\Traversable"), Some(true));
        assert_eq!(h.is_interface("Box"), Some(false));
        assert_eq!(h.is_interface("Unknown"), None);
    }

    #[test]
    fn test_primitives_and_nullables() {
        let h = NominalHierarchy::default();
        assert!(h.is_subtype(&Ty::Int, &Ty::ArrayKey));
        assert!(h.is_subtype(&Ty::Null, &Ty::Nullable { inner: Box::new(Ty::Int) }));
        assert!(h.is_subtype(&Ty::Int, &Ty::Nullable { inner: Box::new(Ty::Num) }));
        assert!(!h.is_subtype(&Ty::Nullable { inner: Box::new(Ty::Int) }, &Ty::Int));
        assert!(h.is_subtype(&Ty::vec_of(Ty::Int), &Ty::vec_of(Ty::Num)));
    }

    #[test]
    fn test_function_subtyping_respects_effects() {
        let h = NominalHierarchy::default();
        let pure = Ty::function(vec![Ty::Num], Ty::Int, Some(EffectLevel::Pure));
        let rx = Ty::function(vec![Ty::Int], Ty::Num, Some(EffectLevel::Reactive));
        assert!(h.is_subtype(&pure, &rx));
        assert!(!h.is_subtype(&rx, &pure));
    }
}
