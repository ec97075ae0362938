//! Enum class composition.
//!
//! An enum class's final member table is built from its composition sources
//! (the `extends` link, then each `use`, as written), each resolved first,
//! followed by its own members. Resolutions are memoized per class name.
//!
//! Cycles are found once, up front, by a strongly connected components pass
//! over the composition graph. Every class on a cycle resolves to an empty
//! table carrying a `CyclicComposition` finding, so the outcome for a class
//! never depends on which class was resolved first or on which thread.

use crate::analysis::effects::map_ordered;
use crate::analysis::enum_registry::EnumRegistry;
use crate::analysis::errors::EnumError;
use crate::analysis::hierarchy::TypeRelation;
use parking_lot::RwLock;
use rxcheck_core::program::{CompositionRef, EnumClassDecl, MemberValue};
use rxcheck_core::Ty;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// What to do when two sources provide the same member name and type with
/// different values (or from different declarations).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueConflictPolicy {
    /// Report `EnumMemberValueConflict`.
    #[default]
    Error,
    /// Keep the entry composed first.
    FirstWins,
}

/// One member of a resolved table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEntry {
    pub name: String,
    pub ty: Ty,
    pub value: MemberValue,
    /// The enum class that declared the member.
    pub origin: String,
}

/// The resolved member table of one enum class and the findings raised
/// while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub class: String,
    /// Composed members in source order, then own members in declaration order.
    pub table: Vec<MemberEntry>,
    pub errors: Vec<EnumError>,
}

impl Resolution {
    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.table.iter().find(|m| m.name == name)
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.table.iter().map(|m| m.name.as_str()).collect()
    }
}

pub struct CompositionResolver<'a> {
    registry: &'a EnumRegistry,
    types: &'a dyn TypeRelation,
    policy: ValueConflictPolicy,
    /// Class name to its cycle, rotated to start at the smallest name.
    cycles: HashMap<String, Vec<String>>,
    cache: RwLock<HashMap<String, Arc<Resolution>>>,
}

impl<'a> CompositionResolver<'a> {
    pub fn new(
        registry: &'a EnumRegistry,
        types: &'a dyn TypeRelation,
        policy: ValueConflictPolicy,
    ) -> Self {
        let cycles = find_cycles(registry);
        if !cycles.is_empty() {
            tracing::debug!(classes = cycles.len(), "composition cycles found");
        }
        Self { registry, types, policy, cycles, cache: RwLock::new(HashMap::new()) }
    }

    /// The resolved table of `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<Resolution>, EnumError> {
        let decl = self.registry.lookup(name)?;
        Ok(self.resolve_decl(decl))
    }

    /// Resolve every registered class, in registration order.
    pub fn resolve_all(&self, parallel: bool) -> Vec<Arc<Resolution>> {
        let decls: Vec<&EnumClassDecl> = self.registry.iter().collect();
        map_ordered(&decls, parallel, |decl| self.resolve_decl(decl))
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.read().contains_key(name)
    }

    fn resolve_decl(&self, decl: &EnumClassDecl) -> Arc<Resolution> {
        if let Some(hit) = self.cache.read().get(&decl.name) {
            tracing::trace!(class = %decl.name, "composition cache hit");
            return Arc::clone(hit);
        }
        let computed = Arc::new(self.compute(decl));
        // Another thread may have finished the same class first; both
        // computations are identical, keep whichever landed.
        let mut cache = self.cache.write();
        Arc::clone(cache.entry(decl.name.clone()).or_insert(computed))
    }

    fn compute(&self, decl: &EnumClassDecl) -> Resolution {
        if let Some(cycle) = self.cycles.get(&decl.name) {
            let mut path = cycle.clone();
            if let Some(first) = cycle.first() {
                path.push(first.clone());
            }
            return Resolution {
                class: decl.name.clone(),
                table: Vec::new(),
                errors: vec![EnumError::CyclicComposition {
                    class: decl.name.clone(),
                    cycle: path.join(" -> "),
                    span: decl.span,
                }],
            };
        }

        let mut builder = TableBuilder::new(decl, self.policy);
        if decl.base.is_none() {
            builder.errors.push(EnumError::MissingEnumBase {
                class: decl.name.clone(),
                span: decl.span,
            });
        }

        let mut merged: HashSet<&str> = HashSet::new();
        for source in decl.sources() {
            // Reuse is idempotent only across distinct direct sources.
            if !merged.insert(source.name.as_str()) {
                builder.errors.push(EnumError::DuplicateCompositionSource {
                    class: decl.name.clone(),
                    source_class: source.name.clone(),
                    span: source.span,
                });
                continue;
            }
            let Some(source_decl) = self.registry.get(&source.name) else {
                builder.errors.push(EnumError::UnknownEnumClass {
                    name: source.name.clone(),
                    referenced_by: Some(decl.name.clone()),
                    span: source.span,
                });
                continue;
            };
            let resolved = self.resolve_decl(source_decl);
            for entry in &resolved.table {
                builder.compose(source, entry);
            }
        }

        for member in &decl.members {
            let ty = member.ty.clone().or_else(|| decl.base.clone()).unwrap_or(Ty::Mixed);
            if let Some(base) = &decl.base {
                if !self.types.is_subtype(&ty, base) {
                    builder.errors.push(EnumError::EnumMemberTypeMismatch {
                        class: decl.name.clone(),
                        member: member.name.clone(),
                        ty: ty.to_string(),
                        base: base.to_string(),
                        span: member.span,
                    });
                }
            }
            builder.declare(member.name.clone(), ty, member.value.clone(), member.span);
        }

        tracing::trace!(
            class = %decl.name,
            members = builder.table.len(),
            findings = builder.errors.len(),
            "composed"
        );
        Resolution { class: decl.name.clone(), table: builder.table, errors: builder.errors }
    }
}

/// Accumulates one class's table.
struct TableBuilder<'d> {
    class: &'d EnumClassDecl,
    policy: ValueConflictPolicy,
    table: Vec<MemberEntry>,
    index: HashMap<String, usize>,
    errors: Vec<EnumError>,
}

impl<'d> TableBuilder<'d> {
    fn new(class: &'d EnumClassDecl, policy: ValueConflictPolicy) -> Self {
        Self { class, policy, table: Vec::new(), index: HashMap::new(), errors: Vec::new() }
    }

    fn insert(&mut self, entry: MemberEntry) {
        self.index.insert(entry.name.clone(), self.table.len());
        self.table.push(entry);
    }

    /// Merge one member of a composition source.
    fn compose(&mut self, source: &CompositionRef, incoming: &MemberEntry) {
        let Some(&at) = self.index.get(&incoming.name) else {
            self.insert(incoming.clone());
            return;
        };
        let existing = &self.table[at];
        if existing == incoming {
            // the same member reached again through another path
            return;
        }
        if existing.ty != incoming.ty {
            self.errors.push(EnumError::EnumMemberTypeConflict {
                class: self.class.name.clone(),
                member: incoming.name.clone(),
                existing_ty: existing.ty.to_string(),
                existing_origin: existing.origin.clone(),
                incoming_ty: incoming.ty.to_string(),
                incoming_origin: incoming.origin.clone(),
                span: source.span,
            });
            return;
        }
        match self.policy {
            ValueConflictPolicy::Error => self.errors.push(EnumError::EnumMemberValueConflict {
                class: self.class.name.clone(),
                member: incoming.name.clone(),
                existing_value: existing.value.to_string(),
                existing_origin: existing.origin.clone(),
                incoming_value: incoming.value.to_string(),
                incoming_origin: incoming.origin.clone(),
                span: source.span,
            }),
            ValueConflictPolicy::FirstWins => {
                tracing::debug!(
                    class = %self.class.name,
                    member = %incoming.name,
                    kept = %existing.origin,
                    dropped = %incoming.origin,
                    "value conflict resolved by first-wins policy"
                );
            }
        }
    }

    /// Add an own member. Own members never shadow anything.
    fn declare(&mut self, name: String, ty: Ty, value: MemberValue, span: rxcheck_core::Span) {
        if let Some(&at) = self.index.get(&name) {
            self.errors.push(EnumError::EnumMemberRedeclaration {
                class: self.class.name.clone(),
                member: name,
                previous_origin: self.table[at].origin.clone(),
                span,
            });
            return;
        }
        let origin = self.class.name.clone();
        self.insert(MemberEntry { name, ty, value, origin });
    }
}

// ── Cycle detection ─────────────────────────────────────────────────

/// Composition edges of `decl` that point at registered classes, in source order.
fn edges<'r>(registry: &'r EnumRegistry, decl: &'r EnumClassDecl) -> Vec<&'r str> {
    decl.sources()
        .map(|s| s.name.as_str())
        .filter(|name| registry.contains(name))
        .collect()
}

/// Tarjan's strongly connected components over the composition graph.
struct Tarjan<'r> {
    registry: &'r EnumRegistry,
    next: usize,
    index: HashMap<&'r str, usize>,
    low: HashMap<&'r str, usize>,
    stack: Vec<&'r str>,
    on_stack: HashSet<&'r str>,
    components: Vec<Vec<&'r str>>,
}

impl<'r> Tarjan<'r> {
    fn visit(&mut self, name: &'r str) {
        let registry = self.registry;
        let Some(decl) = registry.get(name) else {
            return;
        };
        self.index.insert(name, self.next);
        self.low.insert(name, self.next);
        self.next += 1;
        self.stack.push(name);
        self.on_stack.insert(name);

        for succ in edges(registry, decl) {
            if !self.index.contains_key(succ) {
                self.visit(succ);
                let succ_low = self.low.get(succ).copied().unwrap_or(usize::MAX);
                self.lower(name, succ_low);
            } else if self.on_stack.contains(succ) {
                let succ_index = self.index.get(succ).copied().unwrap_or(usize::MAX);
                self.lower(name, succ_index);
            }
        }

        if self.low.get(name) == self.index.get(name) {
            let mut component = Vec::new();
            while let Some(top) = self.stack.pop() {
                self.on_stack.remove(top);
                component.push(top);
                if top == name {
                    break;
                }
            }
            self.components.push(component);
        }
    }

    fn lower(&mut self, name: &'r str, value: usize) {
        if let Some(low) = self.low.get_mut(name) {
            *low = (*low).min(value);
        }
    }
}

/// Every class that lies on a composition cycle, mapped to the shortest
/// cycle through it, rotated to start at its smallest class name.
pub fn find_cycles(registry: &EnumRegistry) -> HashMap<String, Vec<String>> {
    let mut tarjan = Tarjan {
        registry,
        next: 0,
        index: HashMap::new(),
        low: HashMap::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        components: Vec::new(),
    };
    for name in registry.names() {
        if !tarjan.index.contains_key(name) {
            tarjan.visit(name);
        }
    }

    let mut cycles = HashMap::new();
    for component in &tarjan.components {
        let members: HashSet<&str> = component.iter().copied().collect();
        for &class in component {
            if let Some(cycle) = shortest_cycle(registry, class, &members) {
                cycles.insert(class.to_string(), canonical_rotation(cycle));
            }
        }
    }
    cycles
}

/// Breadth-first search from `start` back to itself inside one component.
fn shortest_cycle(
    registry: &EnumRegistry,
    start: &str,
    members: &HashSet<&str>,
) -> Option<Vec<String>> {
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let decl = registry.get(current)?;
        for succ in edges(registry, decl) {
            if succ == start {
                let mut path = vec![current.to_string()];
                let mut at = current;
                while let Some(&prev) = parent.get(at) {
                    path.push(prev.to_string());
                    at = prev;
                }
                path.reverse();
                return Some(path);
            }
            if members.contains(succ) && !parent.contains_key(succ) {
                parent.insert(succ, current);
                queue.push_back(succ);
            }
        }
    }
    None
}

fn canonical_rotation(mut cycle: Vec<String>) -> Vec<String> {
    let smallest = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(i, _)| i);
    cycle.rotate_left(smallest);
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::hierarchy::NominalHierarchy;
    use rxcheck_core::program::{ClassDecl, MemberDecl};

    fn boxes() -> NominalHierarchy {
        NominalHierarchy::new(&[
            ClassDecl::interface("ExBox"),
            ClassDecl::class("Box").implementing("ExBox"),
            ClassDecl::class("IBox").extending("Box"),
        ])
    }

    fn lit(name: &str, ty: Ty, value: &str) -> MemberDecl {
        MemberDecl::new(name, Some(ty), MemberValue::literal(value))
    }

    fn resolve_in(
        decls: &[EnumClassDecl],
        policy: ValueConflictPolicy,
        name: &str,
    ) -> Arc<Resolution> {
        let (registry, _) = EnumRegistry::build(decls);
        let types = boxes();
        let resolver = CompositionResolver::new(&registry, &types, policy);
        match resolver.resolve(name) {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        }
    }

    fn resolve(decls: &[EnumClassDecl], name: &str) -> Arc<Resolution> {
        resolve_in(decls, ValueConflictPolicy::Error, name)
    }

    fn e_class() -> EnumClassDecl {
        EnumClassDecl::enum_class("E", Ty::named("ExBox"))
            .member(MemberDecl::new(
                "A",
                Some(Ty::generic("Box", vec![Ty::String])),
                MemberValue::new_object("Box", &["'zuck'"]),
            ))
            .member(MemberDecl::new(
                "B",
                Some(Ty::named("IBox")),
                MemberValue::new_object("IBox", &["42"]),
            ))
    }

    #[test]
    fn test_plain_enum_uses_enum_class() {
        let normal = EnumClassDecl::plain_enum("NormalEnum", Ty::Int)
            .using("E")
            .member(MemberDecl::new("Z", None, MemberValue::literal("42")));
        let r = resolve(&[e_class(), normal], "NormalEnum");
        assert!(r.errors.is_empty(), "{:?}", r.errors);
        assert_eq!(r.member_names(), vec!["A", "B", "Z"]);
        assert_eq!(r.member("A").map(|m| m.origin.as_str()), Some("E"));
        assert_eq!(r.member("Z").map(|m| &m.ty), Some(&Ty::Int));
    }

    #[test]
    fn test_diamond_is_idempotent() {
        let left = EnumClassDecl::enum_class("L", Ty::named("ExBox")).using("E");
        let right = EnumClassDecl::enum_class("R", Ty::named("ExBox")).using("E");
        let bottom = EnumClassDecl::enum_class("D", Ty::named("ExBox")).using("L").using("R");
        let r = resolve(&[e_class(), left, right, bottom], "D");
        assert!(r.errors.is_empty(), "{:?}", r.errors);
        assert_eq!(r.member_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_same_source_twice_is_an_error() {
        let a = EnumClassDecl::enum_class("A", Ty::Int).member(lit("K", Ty::Int, "1"));
        let c = EnumClassDecl::enum_class("C", Ty::Int).using("A").using("A");
        let r = resolve(&[a.clone(), c], "C");
        assert!(matches!(
            &r.errors[..],
            [EnumError::DuplicateCompositionSource { class, source_class, .. }]
                if class == "C" && source_class == "A"
        ));
        assert_eq!(r.member_names(), vec!["K"]);

        // extends and use naming the same class
        let d = EnumClassDecl::enum_class("D", Ty::Int).extending("A").using("A");
        let r = resolve(&[a, d], "D");
        assert_eq!(r.errors.len(), 1);
        assert!(matches!(&r.errors[0], EnumError::DuplicateCompositionSource { .. }));
    }

    #[test]
    fn test_extends_composes_first() {
        let base = EnumClassDecl::plain_enum("Base", Ty::Int).member(lit("X", Ty::Int, "1"));
        let other = EnumClassDecl::plain_enum("Other", Ty::Int).member(lit("Y", Ty::Int, "2"));
        let c = EnumClassDecl::plain_enum("C", Ty::Int).using("Other").extending("Base");
        let r = resolve(&[base, other, c], "C");
        assert_eq!(r.member_names(), vec!["X", "Y"]);
    }

    #[test]
    fn test_type_conflict() {
        let a = EnumClassDecl::enum_class("A", Ty::Mixed).member(lit("K", Ty::Int, "1"));
        let b = EnumClassDecl::enum_class("B", Ty::Mixed).member(lit("K", Ty::String, "'1'"));
        let c = EnumClassDecl::enum_class("C", Ty::Mixed).using("A").using("B");
        let r = resolve(&[a, b, c], "C");
        assert!(matches!(
            &r.errors[..],
            [EnumError::EnumMemberTypeConflict { member, existing_origin, incoming_origin, .. }]
                if member == "K" && existing_origin == "A" && incoming_origin == "B"
        ));
        assert_eq!(r.member("K").map(|m| &m.ty), Some(&Ty::Int));
    }

    #[test]
    fn test_value_conflict_follows_policy() {
        let decls = [
            EnumClassDecl::enum_class("A", Ty::Int).member(lit("K", Ty::Int, "1")),
            EnumClassDecl::enum_class("B", Ty::Int).member(lit("K", Ty::Int, "2")),
            EnumClassDecl::enum_class("C", Ty::Int).using("A").using("B"),
        ];
        let strict = resolve_in(&decls, ValueConflictPolicy::Error, "C");
        assert!(matches!(&strict.errors[..], [EnumError::EnumMemberValueConflict { .. }]));

        let lenient = resolve_in(&decls, ValueConflictPolicy::FirstWins, "C");
        assert!(lenient.errors.is_empty());
        assert_eq!(lenient.member("K").map(|m| m.value.to_string()), Some("1".to_string()));
    }

    #[test]
    fn test_same_value_from_different_declarations_is_a_conflict() {
        let decls = [
            EnumClassDecl::enum_class("A", Ty::Int).member(lit("K", Ty::Int, "1")),
            EnumClassDecl::enum_class("B", Ty::Int).member(lit("K", Ty::Int, "1")),
            EnumClassDecl::enum_class("C", Ty::Int).using("A").using("B"),
        ];
        assert_eq!(resolve(&decls, "C").errors.len(), 1);
        assert!(resolve_in(&decls, ValueConflictPolicy::FirstWins, "C").errors.is_empty());
    }

    #[test]
    fn test_own_member_never_shadows() {
        let a = EnumClassDecl::enum_class("A", Ty::Int).member(lit("K", Ty::Int, "1"));
        let c = EnumClassDecl::enum_class("C", Ty::Int)
            .using("A")
            .member(lit("K", Ty::Int, "1"))
            .member(lit("M", Ty::Int, "2"))
            .member(lit("M", Ty::Int, "3"));
        let r = resolve(&[a, c], "C");
        let previous: Vec<&str> = r
            .errors
            .iter()
            .filter_map(|e| match e {
                EnumError::EnumMemberRedeclaration { previous_origin, .. } => {
                    Some(previous_origin.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(previous, vec!["A", "C"]);
        assert_eq!(r.member_names(), vec!["K", "M"]);
    }

    #[test]
    fn test_member_must_fit_base() {
        let e = EnumClassDecl::enum_class("E", Ty::named("ExBox"))
            .member(lit("Bad", Ty::Int, "1"))
            .member(MemberDecl::new(
                "Ok",
                Some(Ty::named("IBox")),
                MemberValue::new_object("IBox", &["1"]),
            ));
        let r = resolve(&[e], "E");
        assert!(matches!(
            &r.errors[..],
            [EnumError::EnumMemberTypeMismatch { member, .. }] if member == "Bad"
        ));
        // the member is still part of the table
        assert_eq!(r.member_names(), vec!["Bad", "Ok"]);
    }

    #[test]
    fn test_missing_base() {
        let mut e = EnumClassDecl::enum_class("E", Ty::Int).member(lit("A", Ty::Int, "1"));
        e.base = None;
        let r = resolve(&[e], "E");
        assert!(matches!(&r.errors[..], [EnumError::MissingEnumBase { .. }]));
    }

    #[test]
    fn test_unknown_source_is_skipped() {
        let c = EnumClassDecl::enum_class("C", Ty::Int)
            .using("Ghost")
            .member(lit("A", Ty::Int, "1"));
        let r = resolve(&[c], "C");
        assert!(matches!(
            &r.errors[..],
            [EnumError::UnknownEnumClass { name, referenced_by: Some(by), .. }]
                if name == "Ghost" && by == "C"
        ));
        assert_eq!(r.member_names(), vec!["A"]);
    }

    #[test]
    fn test_unknown_class_lookup() {
        let (registry, _) = EnumRegistry::build(&[]);
        let types = NominalHierarchy::default();
        let resolver = CompositionResolver::new(&registry, &types, ValueConflictPolicy::Error);
        assert!(matches!(resolver.resolve("Nope"), Err(EnumError::UnknownEnumClass { .. })));
    }

    #[test]
    fn test_two_class_cycle_reported_on_both() {
        let decls = [
            EnumClassDecl::enum_class("Y", Ty::Int).using("X").member(lit("B", Ty::Int, "2")),
            EnumClassDecl::enum_class("X", Ty::Int).using("Y").member(lit("A", Ty::Int, "1")),
        ];
        for name in ["X", "Y"] {
            let r = resolve(&decls, name);
            assert!(r.table.is_empty());
            assert_eq!(
                r.errors,
                vec![EnumError::CyclicComposition {
                    class: name.to_string(),
                    cycle: "X -> Y -> X".to_string(),
                    span: Default::default(),
                }]
            );
        }
    }

    #[test]
    fn test_cycle_through_finished_node_is_found() {
        // W uses A and U; A uses W; U uses A. U lies on U -> A -> W -> U.
        let cycles = find_cycles(
            &EnumRegistry::build(&[
                EnumClassDecl::enum_class("W", Ty::Int).using("A").using("U"),
                EnumClassDecl::enum_class("A", Ty::Int).using("W"),
                EnumClassDecl::enum_class("U", Ty::Int).using("A"),
            ])
            .0,
        );
        assert_eq!(cycles.len(), 3);
        assert_eq!(cycles["U"], vec!["A", "W", "U"]);
        assert_eq!(cycles["A"], vec!["A", "W"]);
    }

    #[test]
    fn test_self_use_is_a_cycle() {
        let r = resolve(&[EnumClassDecl::enum_class("S", Ty::Int).using("S")], "S");
        assert!(matches!(
            &r.errors[..],
            [EnumError::CyclicComposition { cycle, .. }] if cycle == "S -> S"
        ));
    }

    #[test]
    fn test_user_of_cyclic_class_composes_nothing_from_it() {
        let decls = [
            EnumClassDecl::enum_class("X", Ty::Int).using("Y"),
            EnumClassDecl::enum_class("Y", Ty::Int).using("X"),
            EnumClassDecl::enum_class("Z", Ty::Int).using("X").member(lit("C", Ty::Int, "3")),
        ];
        let r = resolve(&decls, "Z");
        assert!(r.errors.is_empty());
        assert_eq!(r.member_names(), vec!["C"]);
    }

    #[test]
    fn test_warm_cache_matches_cold() {
        let decls = [
            e_class(),
            EnumClassDecl::plain_enum("NormalEnum", Ty::Int)
                .using("E")
                .member(MemberDecl::new("Z", None, MemberValue::literal("42"))),
        ];
        let (registry, _) = EnumRegistry::build(&decls);
        let types = boxes();
        let resolver = CompositionResolver::new(&registry, &types, ValueConflictPolicy::Error);
        assert!(!resolver.is_cached("E"));
        let cold = resolver.resolve("NormalEnum").map(|r| (*r).clone());
        assert!(resolver.is_cached("E"));
        let warm = resolver.resolve("NormalEnum").map(|r| (*r).clone());
        assert_eq!(cold, warm);
    }

    #[test]
    fn test_canonical_rotation() {
        let rotated = canonical_rotation(vec!["Y".into(), "Z".into(), "X".into()]);
        assert_eq!(rotated, vec!["X", "Y", "Z"]);
    }
}
