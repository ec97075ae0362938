//! Static types as resolved by the front end's type inference.
//!
//! Only the shapes the effect and enum checks need to look at are modeled in
//! detail (function types, value containers, nominal types); everything else
//! is opaque and compared structurally.

use crate::effect::EffectLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ty {
    Int,
    Float,
    String,
    Bool,
    Num,
    ArrayKey,
    Null,
    Void,
    Mixed,
    /// A class or interface, with its type arguments.
    Named {
        name: String,
        #[serde(default)]
        args: Vec<Ty>,
    },
    Nullable {
        inner: Box<Ty>,
    },
    Function(FnTy),
    Vec {
        elem: Box<Ty>,
    },
    Dict {
        key: Box<Ty>,
        value: Box<Ty>,
    },
    Keyset {
        elem: Box<Ty>,
    },
    Tuple {
        elems: Vec<Ty>,
    },
    Shape {
        fields: Vec<ShapeField>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FnTy {
    pub params: Vec<Ty>,
    pub ret: Box<Ty>,
    /// Declared effect of the function type; absent means unrestricted.
    #[serde(default)]
    pub effect: Option<EffectLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeField {
    pub name: String,
    pub ty: Ty,
}

/// The copy-on-write containers. Writing an element of one of these only
/// changes the local binding that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Vec,
    Dict,
    Keyset,
    Tuple,
    Shape,
}

impl Ty {
    pub fn named(name: &str) -> Ty {
        Ty::Named { name: name.to_string(), args: Vec::new() }
    }

    pub fn generic(name: &str, args: Vec<Ty>) -> Ty {
        Ty::Named { name: name.to_string(), args }
    }

    pub fn function(params: Vec<Ty>, ret: Ty, effect: Option<EffectLevel>) -> Ty {
        Ty::Function(FnTy { params, ret: Box::new(ret), effect })
    }

    pub fn vec_of(elem: Ty) -> Ty {
        Ty::Vec { elem: Box::new(elem) }
    }

    pub fn dict_of(key: Ty, value: Ty) -> Ty {
        Ty::Dict { key: Box::new(key), value: Box::new(value) }
    }

    pub fn as_function(&self) -> Option<&FnTy> {
        match self {
            Ty::Function(f) => Some(f),
            Ty::Nullable { inner } => inner.as_function(),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.as_function().is_some()
    }

    /// Name of the class or interface, looking through nullability.
    pub fn nominal_name(&self) -> Option<&str> {
        match self {
            Ty::Named { name, .. } => Some(name),
            Ty::Nullable { inner } => inner.nominal_name(),
            _ => None,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Ty::Vec { .. } => Some(ContainerKind::Vec),
            Ty::Dict { .. } => Some(ContainerKind::Dict),
            Ty::Keyset { .. } => Some(ContainerKind::Keyset),
            Ty::Tuple { .. } => Some(ContainerKind::Tuple),
            Ty::Shape { .. } => Some(ContainerKind::Shape),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::String => write!(f, "string"),
            Ty::Bool => write!(f, "bool"),
            Ty::Num => write!(f, "num"),
            Ty::ArrayKey => write!(f, "arraykey"),
            Ty::Null => write!(f, "null"),
            Ty::Void => write!(f, "void"),
            Ty::Mixed => write!(f, "mixed"),
            Ty::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<{}>", join(args))?;
                }
                Ok(())
            }
            Ty::Nullable { inner } => write!(f, "?{}", inner),
            Ty::Function(fun) => write!(f, "(function({}): {})", join(&fun.params), fun.ret),
            Ty::Vec { elem } => write!(f, "vec<{}>", elem),
            Ty::Dict { key, value } => write!(f, "dict<{}, {}>", key, value),
            Ty::Keyset { elem } => write!(f, "keyset<{}>", elem),
            Ty::Tuple { elems } => write!(f, "({})", join(elems)),
            Ty::Shape { fields } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| format!("'{}' => {}", field.name, field.ty))
                    .collect();
                write!(f, "shape({})", fields.join(", "))
            }
        }
    }
}

fn join(tys: &[Ty]) -> String {
    tys.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_source_syntax() {
        assert_eq!(Ty::generic("Box", vec![Ty::String]).to_string(), "Box<string>");
        assert_eq!(
            Ty::function(vec![Ty::Int], Ty::String, None).to_string(),
            "(function(int): string)"
        );
        let shape = Ty::Shape {
            fields: vec![ShapeField { name: "x".into(), ty: Ty::Int }],
        };
        assert_eq!(shape.to_string(), "shape('x' => int)");
        assert_eq!(Ty::dict_of(Ty::String, Ty::Mixed).to_string(), "dict<string, mixed>");
    }

    #[test]
    fn test_function_is_seen_through_nullable() {
        let f = Ty::Nullable {
            inner: Box::new(Ty::function(vec![], Ty::Void, Some(EffectLevel::Pure))),
        };
        assert_eq!(f.as_function().and_then(|f| f.effect), Some(EffectLevel::Pure));
        assert!(!Ty::Int.is_function());
    }

    #[test]
    fn test_deserialize_tagged_types() {
        let ty: Ty = serde_json::from_str(
            r#"{"kind": "named", "name": "Box", "args": [{"kind": "string"}]}"#,
        )
        .unwrap();
        assert_eq!(ty, Ty::generic("Box", vec![Ty::String]));

        let f: Ty = serde_json::from_str(
            r#"{"kind": "function", "params": [{"kind": "int"}], "ret": {"kind": "int"}, "effect": "pure"}"#,
        )
        .unwrap();
        assert_eq!(f, Ty::function(vec![Ty::Int], Ty::Int, Some(EffectLevel::Pure)));
    }

    #[test]
    fn test_container_kinds() {
        assert_eq!(Ty::vec_of(Ty::Int).container_kind(), Some(ContainerKind::Vec));
        let pair = Ty::Tuple { elems: vec![Ty::Int, Ty::Int] };
        assert_eq!(pair.container_kind(), Some(ContainerKind::Tuple));
        assert_eq!(Ty::named("C").container_kind(), None);
    }
}
