//! Index of enum class declarations by name.

use crate::analysis::errors::EnumError;
use rxcheck_core::program::EnumClassDecl;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    decls: Vec<EnumClassDecl>,
    by_name: HashMap<String, usize>,
}

impl EnumRegistry {
    /// Index `decls`. A name declared twice keeps its first declaration; each
    /// later one is reported.
    pub fn build(decls: &[EnumClassDecl]) -> (Self, Vec<EnumError>) {
        let mut registry = EnumRegistry::default();
        let mut errors = Vec::new();
        for decl in decls {
            if registry.by_name.contains_key(&decl.name) {
                errors.push(EnumError::DuplicateEnumClass {
                    name: decl.name.clone(),
                    span: decl.span,
                });
                continue;
            }
            registry.by_name.insert(decl.name.clone(), registry.decls.len());
            registry.decls.push(decl.clone());
        }
        tracing::debug!(
            classes = registry.decls.len(),
            duplicates = errors.len(),
            "enum registry built"
        );
        (registry, errors)
    }

    pub fn get(&self, name: &str) -> Option<&EnumClassDecl> {
        self.by_name.get(name).map(|&i| &self.decls[i])
    }

    /// Like [`get`](Self::get), reporting an absent name.
    pub fn lookup(&self, name: &str) -> Result<&EnumClassDecl, EnumError> {
        self.get(name).ok_or_else(|| EnumError::UnknownEnumClass {
            name: name.to_string(),
            referenced_by: None,
            span: Default::default(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnumClassDecl> {
        self.decls.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxcheck_core::program::{MemberDecl, MemberValue};
    use rxcheck_core::{Span, Ty};

    #[test]
    fn test_lookup() {
        let (reg, errors) = EnumRegistry::build(&[
            EnumClassDecl::enum_class("E", Ty::named("I")),
            EnumClassDecl::plain_enum("N", Ty::Int),
        ]);
        assert!(errors.is_empty());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.lookup("N").map(|d| d.name.as_str()), Ok("N"));
        assert!(matches!(
            reg.lookup("Nope"),
            Err(EnumError::UnknownEnumClass { name, .. }) if name == "Nope"
        ));
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["E", "N"]);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut second = EnumClassDecl::enum_class("E", Ty::named("I"))
            .member(MemberDecl::new("B", None, MemberValue::literal("2")));
        second.span = Span::line(9);
        let (reg, errors) = EnumRegistry::build(&[
            EnumClassDecl::enum_class("E", Ty::named("I"))
                .member(MemberDecl::new("A", None, MemberValue::literal("1"))),
            second,
        ]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("E").map(|d| d.members[0].name.as_str()), Some("A"));
        assert_eq!(
            errors,
            vec![EnumError::DuplicateEnumClass { name: "E".into(), span: Span::line(9) }]
        );
    }
}
