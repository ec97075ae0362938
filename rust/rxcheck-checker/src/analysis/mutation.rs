//! Mutation legality.
//!
//! Reassigning a local and writing into a value-semantics container (`vec`,
//! `dict`, `keyset`, tuple, shape) only touch the function's own copy, so
//! they are always allowed. Writing a property of an object is observable
//! elsewhere and needs a capability, unless the object was allocated here
//! and provably never escapes.

use crate::analysis::annotations::{Capability, EffectDescriptor};
use crate::analysis::errors::EffectError;
use crate::analysis::escape::EscapeOracle;
use rxcheck_core::program::{FunctionDecl, MutationSite, Place};

/// What a write actually modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget<'a> {
    /// The binding itself: `$x = ...`.
    LocalBinding,
    /// An element of a value container reached from a local or parameter.
    ValueContainerElement,
    /// A property of the object denoted by `object`.
    ObjectProperty { object: &'a Place },
}

pub fn classify(place: &Place) -> MutationTarget<'_> {
    match place {
        Place::Local { .. } | Place::Parameter { .. } | Place::This => MutationTarget::LocalBinding,
        Place::Property { base, .. } => MutationTarget::ObjectProperty { object: &**base },
        Place::Element { base, .. } => {
            let mut current: &Place = &**base;
            while let Place::Element { base, .. } = current {
                current = &**base;
            }
            match current {
                // `$o->items[] = 1` writes the property `items` of `$o`
                Place::Property { base, .. } => MutationTarget::ObjectProperty { object: &**base },
                _ => MutationTarget::ValueContainerElement,
            }
        }
    }
}

pub struct MutationContext<'a> {
    pub function: &'a FunctionDecl,
    pub descriptor: &'a EffectDescriptor,
    pub escape: &'a dyn EscapeOracle,
}

impl MutationContext<'_> {
    fn fresh_local(&self, object: &Place) -> bool {
        let Place::Local { name } = object else {
            return false;
        };
        self.function
            .allocation_for(name)
            .is_some_and(|site| self.escape.does_not_escape(self.function, site))
    }
}

/// Check one write inside the function body.
pub fn check_mutation(ctx: &MutationContext<'_>, site: &MutationSite) -> Option<EffectError> {
    let object = match classify(&site.place) {
        MutationTarget::LocalBinding | MutationTarget::ValueContainerElement => return None,
        MutationTarget::ObjectProperty { object } => object,
    };

    let caps = ctx.descriptor.capabilities_in_force();
    let on_this = matches!(object, Place::This);
    if caps.contains(Capability::WriteProps)
        || (on_this && caps.contains(Capability::WriteThisProps))
    {
        return None;
    }
    if ctx.fresh_local(object) {
        tracing::trace!(
            function = %ctx.function.name,
            place = %site.place,
            "write to non-escaping local object"
        );
        return None;
    }

    Some(EffectError::MutationNotPermitted {
        function: ctx.function.name.clone(),
        context: ctx.descriptor.base,
        place: site.place.to_string(),
        missing: if on_this { Capability::WriteThisProps } else { Capability::WriteProps },
        span: site.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::annotations::{normalize, PURE, RX};
    use crate::analysis::escape::{AlwaysEscapes, DeclaredEscapes};
    use crate::analysis::hierarchy::NominalHierarchy;
    use rxcheck_core::program::{AllocationSite, Attribute};
    use rxcheck_core::types::ContainerKind;
    use rxcheck_core::Span;

    fn check_with(
        decl: &FunctionDecl,
        place: Place,
        escape: &dyn EscapeOracle,
    ) -> Option<EffectError> {
        let descriptor = normalize(decl, &NominalHierarchy::default()).descriptor;
        let ctx = MutationContext { function: decl, descriptor: &descriptor, escape };
        check_mutation(&ctx, &MutationSite { place, span: Span::line(3) })
    }

    fn check(decl: &FunctionDecl, place: Place) -> Option<EffectError> {
        check_with(decl, place, &AlwaysEscapes)
    }

    fn pure_fn() -> FunctionDecl {
        FunctionDecl::new("f").attr(Attribute::new(PURE))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&Place::local("x")), MutationTarget::LocalBinding);
        assert_eq!(
            classify(&Place::param(0).elem(ContainerKind::Vec).elem(ContainerKind::Dict)),
            MutationTarget::ValueContainerElement
        );
        let obj = Place::local("o");
        assert_eq!(
            classify(&obj.clone().prop("items").elem(ContainerKind::Vec)),
            MutationTarget::ObjectProperty { object: &obj }
        );
        let nested = Place::This.prop("a");
        assert_eq!(
            classify(&nested.clone().prop("b")),
            MutationTarget::ObjectProperty { object: &nested }
        );
    }

    #[test]
    fn test_byval_collections_are_mutable_under_pure() {
        let f = pure_fn();
        assert!(check(&f, Place::param(0).elem(ContainerKind::Vec)).is_none());
        assert!(check(&f, Place::local("d").elem(ContainerKind::Dict)).is_none());
        assert!(check(&f, Place::local("s").elem(ContainerKind::Shape)).is_none());
        assert!(check(&f, Place::local("x")).is_none());
    }

    #[test]
    fn test_object_property_needs_capability() {
        let err = check(&pure_fn(), Place::param(0).prop("data"));
        assert!(matches!(
            err,
            Some(EffectError::MutationNotPermitted { missing: Capability::WriteProps, .. })
        ));

        let with_cap = pure_fn().capability("write_props");
        assert!(check(&with_cap, Place::param(0).prop("data")).is_none());
    }

    #[test]
    fn test_element_of_object_property_needs_capability() {
        let err = check(&pure_fn(), Place::param(0).prop("items").elem(ContainerKind::Vec));
        assert!(err.is_some());
    }

    #[test]
    fn test_this_props() {
        let f = FunctionDecl::new("C::set").attr(Attribute::new(RX)).capability("write_this_props");
        assert!(check(&f, Place::This.prop("x")).is_none());
        // only `$this` itself, not objects reached through it
        assert!(matches!(
            check(&f, Place::This.prop("inner").prop("x")),
            Some(EffectError::MutationNotPermitted { missing: Capability::WriteProps, .. })
        ));
        assert!(matches!(
            check(&pure_fn(), Place::This.prop("x")),
            Some(EffectError::MutationNotPermitted { missing: Capability::WriteThisProps, .. })
        ));
    }

    #[test]
    fn test_unrestricted_holds_every_capability() {
        let f = FunctionDecl::new("f");
        assert!(check(&f, Place::param(0).prop("data")).is_none());
    }

    #[test]
    fn test_non_escaping_local_object() {
        let f = pure_fn().alloc(AllocationSite::new("o", "Box", true));
        assert!(check_with(&f, Place::local("o").prop("v"), &DeclaredEscapes).is_none());
        // the stub oracle never proves non-escape
        assert!(check_with(&f, Place::local("o").prop("v"), &AlwaysEscapes).is_some());

        let escaping = pure_fn().alloc(AllocationSite::new("o", "Box", false));
        assert!(check_with(&escaping, Place::local("o").prop("v"), &DeclaredEscapes).is_some());
        // no allocation site for `$p`
        assert!(check_with(&f, Place::local("p").prop("v"), &DeclaredEscapes).is_some());
    }

    #[test]
    fn test_error_reports_place_and_span() {
        let err = check(&pure_fn(), Place::param(0).prop("data"));
        let Some(err) = err else { panic!("expected a finding") };
        assert_eq!(err.span().line, 3);
        assert!(err.to_string().contains("$param#0->data"));
    }
}
