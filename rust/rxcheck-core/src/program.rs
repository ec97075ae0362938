//! The declaration table produced by the front end.
//!
//! Bodies are not carried as syntax. Each function lists the facts the
//! checker needs from it: its call sites (with resolved callees and argument
//! types), the places it writes to, and the locals bound to fresh objects.

use crate::effect::EffectLevel;
use crate::span::Span;
use crate::types::{ContainerKind, Ty};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub enums: Vec<EnumClassDecl>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.name == name)
    }
}

// ── Functions ───────────────────────────────────────────────────────

/// A raw `<<__Name(args)>>` attribute as written on a declaration or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub span: Span,
}

impl Attribute {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), args: Vec::new(), span: Span::dummy() }
    }

    pub fn with_arg(name: &str, arg: &str) -> Self {
        Self { name: name.to_string(), args: vec![arg.to_string()], span: Span::dummy() }
    }
}

/// One entry of a function's bracketed capability list, e.g. `[write_props]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub span: Span,
}

impl Param {
    pub fn new(name: &str, ty: Ty) -> Self {
        Self { name: name.to_string(), ty, attributes: Vec::new(), span: Span::dummy() }
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }
}

/// A function or method, keyed by its qualified name (`f`, `C::m`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityRef>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub calls: Vec<CallSite>,
    #[serde(default)]
    pub mutations: Vec<MutationSite>,
    #[serde(default)]
    pub allocations: Vec<AllocationSite>,
}

impl FunctionDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            span: Span::dummy(),
            attributes: Vec::new(),
            capabilities: Vec::new(),
            params: Vec::new(),
            calls: Vec::new(),
            mutations: Vec::new(),
            allocations: Vec::new(),
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn attr(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn capability(mut self, name: &str) -> Self {
        self.capabilities.push(CapabilityRef { name: name.to_string(), span: self.span });
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn call(mut self, call: CallSite) -> Self {
        self.calls.push(call);
        self
    }

    pub fn mutate(mut self, place: Place) -> Self {
        let span = self.span;
        self.mutations.push(MutationSite { place, span });
        self
    }

    pub fn alloc(mut self, site: AllocationSite) -> Self {
        self.allocations.push(site);
        self
    }

    pub fn allocation_for(&self, local: &str) -> Option<&AllocationSite> {
        self.allocations.iter().find(|a| a.local == local)
    }
}

// ── Call sites ──────────────────────────────────────────────────────

/// What a call expression invokes, as resolved by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Callee {
    /// A declared function or method.
    Declaration { name: String },
    /// One of the calling function's own parameters.
    Parameter { index: usize },
    /// Some other function value whose effect the front end already knows.
    Value { effect: EffectLevel },
}

/// What a function-valued argument refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FunctionValue {
    Lambda { effect: EffectLevel },
    Named { name: String },
    Parameter { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub ty: Ty,
    #[serde(default)]
    pub function: Option<FunctionValue>,
    #[serde(default)]
    pub span: Span,
}

impl Argument {
    pub fn of_type(ty: Ty) -> Self {
        Self { ty, function: None, span: Span::dummy() }
    }

    pub fn lambda(ty: Ty, effect: EffectLevel) -> Self {
        Self { ty, function: Some(FunctionValue::Lambda { effect }), span: Span::dummy() }
    }

    pub fn named_function(ty: Ty, name: &str) -> Self {
        Self {
            ty,
            function: Some(FunctionValue::Named { name: name.to_string() }),
            span: Span::dummy(),
        }
    }

    pub fn forwarded_param(ty: Ty, index: usize) -> Self {
        Self { ty, function: Some(FunctionValue::Parameter { index }), span: Span::dummy() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    pub callee: Callee,
    #[serde(default)]
    pub args: Vec<Argument>,
    /// A local block that narrows the effect in force, if any.
    #[serde(default)]
    pub tightened: Option<EffectLevel>,
    #[serde(default)]
    pub span: Span,
}

impl CallSite {
    pub fn to(name: &str) -> Self {
        Self {
            callee: Callee::Declaration { name: name.to_string() },
            args: Vec::new(),
            tightened: None,
            span: Span::dummy(),
        }
    }

    pub fn to_param(index: usize) -> Self {
        Self {
            callee: Callee::Parameter { index },
            args: Vec::new(),
            tightened: None,
            span: Span::dummy(),
        }
    }

    pub fn arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn tightened_to(mut self, level: EffectLevel) -> Self {
        self.tightened = Some(level);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

// ── Mutation sites ──────────────────────────────────────────────────

/// An assignable location, as an access path from a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Place {
    Local { name: String },
    Parameter { index: usize },
    This,
    Property { base: Box<Place>, name: String },
    Element { base: Box<Place>, container: ContainerKind },
}

impl Place {
    pub fn local(name: &str) -> Place {
        Place::Local { name: name.to_string() }
    }

    pub fn param(index: usize) -> Place {
        Place::Parameter { index }
    }

    pub fn prop(self, name: &str) -> Place {
        Place::Property { base: Box::new(self), name: name.to_string() }
    }

    pub fn elem(self, container: ContainerKind) -> Place {
        Place::Element { base: Box::new(self), container }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Local { name } => write!(f, "${}", name),
            Place::Parameter { index } => write!(f, "$param#{}", index),
            Place::This => write!(f, "$this"),
            Place::Property { base, name } => write!(f, "{}->{}", base, name),
            Place::Element { base, .. } => write!(f, "{}[...]", base),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationSite {
    pub place: Place,
    #[serde(default)]
    pub span: Span,
}

/// A local bound to `new Class(...)` inside the function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSite {
    pub local: String,
    pub class: String,
    /// Verdict of the front end's escape analysis, when it ran one.
    #[serde(default)]
    pub non_escaping: bool,
    #[serde(default)]
    pub span: Span,
}

impl AllocationSite {
    pub fn new(local: &str, class: &str, non_escaping: bool) -> Self {
        Self {
            local: local.to_string(),
            class: class.to_string(),
            non_escaping,
            span: Span::dummy(),
        }
    }
}

// ── Classes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub span: Span,
}

impl ClassDecl {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ClassKind::Class,
            extends: Vec::new(),
            implements: Vec::new(),
            span: Span::dummy(),
        }
    }

    pub fn interface(name: &str) -> Self {
        Self { kind: ClassKind::Interface, ..Self::class(name) }
    }

    pub fn extending(mut self, parent: &str) -> Self {
        self.extends.push(parent.to_string());
        self
    }

    pub fn implementing(mut self, iface: &str) -> Self {
        self.implements.push(iface.to_string());
        self
    }
}

// ── Enum classes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumKind {
    /// `enum class E : Base { ... }`
    EnumClass,
    /// `enum E : int { ... }`
    Enum,
}

/// A `use X;` line or an `extends X` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRef {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

impl CompositionRef {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), span: Span::dummy() }
    }
}

/// The initializer of an enum member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberValue {
    Literal { text: String },
    New { class: String, #[serde(default)] args: Vec<String> },
}

impl MemberValue {
    pub fn literal(text: &str) -> Self {
        MemberValue::Literal { text: text.to_string() }
    }

    pub fn new_object(class: &str, args: &[&str]) -> Self {
        MemberValue::New {
            class: class.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Literal { text } => write!(f, "{}", text),
            MemberValue::New { class, args } => write!(f, "new {}({})", class, args.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    /// Declared type; plain enum members leave this out and take the base.
    #[serde(default)]
    pub ty: Option<Ty>,
    pub value: MemberValue,
    #[serde(default)]
    pub span: Span,
}

impl MemberDecl {
    pub fn new(name: &str, ty: Option<Ty>, value: MemberValue) -> Self {
        Self { name: name.to_string(), ty, value, span: Span::dummy() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumClassDecl {
    pub name: String,
    pub kind: EnumKind,
    #[serde(default)]
    pub base: Option<Ty>,
    #[serde(default)]
    pub extends: Option<CompositionRef>,
    #[serde(default)]
    pub uses: Vec<CompositionRef>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    #[serde(default)]
    pub span: Span,
}

impl EnumClassDecl {
    pub fn enum_class(name: &str, base: Ty) -> Self {
        Self {
            name: name.to_string(),
            kind: EnumKind::EnumClass,
            base: Some(base),
            extends: None,
            uses: Vec::new(),
            members: Vec::new(),
            span: Span::dummy(),
        }
    }

    pub fn plain_enum(name: &str, base: Ty) -> Self {
        Self { kind: EnumKind::Enum, ..Self::enum_class(name, base) }
    }

    pub fn extending(mut self, source: &str) -> Self {
        self.extends = Some(CompositionRef::new(source));
        self
    }

    pub fn using(mut self, source: &str) -> Self {
        self.uses.push(CompositionRef::new(source));
        self
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    /// Composition sources in the order they are written: the `extends`
    /// link first, then each `use`.
    pub fn sources(&self) -> impl Iterator<Item = &CompositionRef> {
        self.extends.iter().chain(self.uses.iter())
    }
}
