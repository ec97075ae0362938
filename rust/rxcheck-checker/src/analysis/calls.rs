//! Call-site effect checking.
//!
//! A call is admissible when the callee's effect, resolved at this call
//! site, is at least as restrictive as the effect in force at the caller.
//! The check is local to one call expression; it only needs the caller's and
//! callee's normalized descriptors.

use crate::analysis::annotations::{
    DescriptorTable, EffectDescriptor, EffectSpec, ParamPolymorphism,
};
use crate::analysis::errors::EffectError;
use crate::analysis::hierarchy::TypeRelation;
use rxcheck_core::program::{Argument, CallSite, Callee, FunctionDecl, FunctionValue};
use rxcheck_core::EffectLevel;

/// The calling function and the tables a call-site check reads.
pub struct CallContext<'a> {
    pub caller: &'a FunctionDecl,
    pub caller_effect: &'a EffectDescriptor,
    pub descriptors: &'a DescriptorTable,
    pub types: &'a dyn TypeRelation,
}

/// One call expression being resolved.
pub struct CallSiteView<'a> {
    pub ctx: &'a CallContext<'a>,
    pub call: &'a CallSite,
    pub callee: &'a str,
    /// Effect in force at the call, after local tightening.
    pub context: EffectLevel,
}

impl CallContext<'_> {
    /// The caller's body effect, narrowed by the call's enclosing block.
    pub fn effect_at(&self, call: &CallSite) -> EffectLevel {
        let base = self.caller_effect.base;
        call.tightened.map_or(base, |t| base.meet(t))
    }

    /// Effect of calling the caller's own parameter `index`.
    fn parameter_effect(&self, index: usize) -> EffectLevel {
        if self.caller_effect.param(index) == Some(&ParamPolymorphism::AsFunction) {
            return self.caller_effect.base;
        }
        self.caller
            .params
            .get(index)
            .and_then(|p| p.ty.as_function())
            .and_then(|f| f.effect)
            .unwrap_or(EffectLevel::Unrestricted)
    }
}

/// Resolve a single ceiling at a call site.
pub fn resolve(spec: &EffectSpec, site: &CallSiteView<'_>) -> Result<EffectLevel, EffectError> {
    match spec {
        EffectSpec::Fixed(level) => Ok(*level),
        EffectSpec::AsCaller => Ok(site.context),
        EffectSpec::AsArgFunction(index) => {
            // A defaulted argument contributes nothing.
            let Some(arg) = site.call.args.get(*index) else {
                return Ok(EffectLevel::Pure);
            };
            function_effect(site, arg).ok_or_else(|| EffectError::NotAFunctionArgument {
                caller: site.ctx.caller.name.clone(),
                callee: site.callee.to_string(),
                index: *index,
                ty: arg.ty.to_string(),
                span: site.call.span,
            })
        }
        EffectSpec::AsArgIfImplements(index, interface) => {
            let Some(arg) = site.call.args.get(*index) else {
                return Ok(EffectLevel::Pure);
            };
            if site.ctx.types.implements(&arg.ty, interface) {
                Ok(function_effect(site, arg).unwrap_or(EffectLevel::Pure))
            } else {
                Err(EffectError::UnprovableCapabilityImplementation {
                    caller: site.ctx.caller.name.clone(),
                    callee: site.callee.to_string(),
                    index: *index,
                    ty: arg.ty.to_string(),
                    interface: interface.clone(),
                    span: site.call.span,
                })
            }
        }
    }
}

/// Resolve every ceiling of a descriptor and join them.
pub fn resolve_descriptor(
    descriptor: &EffectDescriptor,
    site: &CallSiteView<'_>,
) -> Result<EffectLevel, Vec<EffectError>> {
    let mut errors = Vec::new();
    let mut level = EffectLevel::Pure;
    for spec in &descriptor.specs {
        match resolve(spec, site) {
            Ok(l) => level = level.join(l),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(level)
    } else {
        Err(errors)
    }
}

/// Effect of a function-valued argument, or `None` if it is not a function.
fn function_effect(site: &CallSiteView<'_>, arg: &Argument) -> Option<EffectLevel> {
    let ctx = site.ctx;
    match &arg.function {
        Some(FunctionValue::Lambda { effect }) => Some(*effect),
        Some(FunctionValue::Parameter { index }) => Some(ctx.parameter_effect(*index)),
        Some(FunctionValue::Named { name }) => match ctx.descriptors.get(name) {
            Some(descriptor) => Some(value_ceiling(descriptor, site.context)),
            None => declared_effect(arg),
        },
        None => declared_effect(arg),
    }
}

fn declared_effect(arg: &Argument) -> Option<EffectLevel> {
    arg.ty.as_function().map(|f| f.effect.unwrap_or(EffectLevel::Unrestricted))
}

/// Effect of a named function used as a value. Its eventual arguments are
/// unknown, so argument-dependent ceilings count as unrestricted.
fn value_ceiling(descriptor: &EffectDescriptor, context: EffectLevel) -> EffectLevel {
    EffectLevel::join_all(descriptor.specs.iter().map(|spec| match spec {
        EffectSpec::Fixed(level) => *level,
        EffectSpec::AsCaller => context,
        EffectSpec::AsArgFunction(_) | EffectSpec::AsArgIfImplements(..) => {
            EffectLevel::Unrestricted
        }
    }))
}

/// Check one call expression.
pub fn check_call(ctx: &CallContext<'_>, call: &CallSite) -> Vec<EffectError> {
    let context = ctx.effect_at(call);
    let (callee_name, resolved) = match &call.callee {
        Callee::Declaration { name } => {
            let Some(descriptor) = ctx.descriptors.get(name) else {
                return vec![EffectError::UnknownCallee {
                    caller: ctx.caller.name.clone(),
                    callee: name.clone(),
                    span: call.span,
                }];
            };
            let site = CallSiteView { ctx, call, callee: name, context };
            match resolve_descriptor(descriptor, &site) {
                Ok(level) => (name.clone(), level),
                Err(errors) => return errors,
            }
        }
        Callee::Parameter { index } => {
            let name = ctx
                .caller
                .params
                .get(*index)
                .map_or_else(|| format!("$param#{}", index), |p| format!("${}", p.name));
            (name, ctx.parameter_effect(*index))
        }
        Callee::Value { effect } => ("<closure>".to_string(), *effect),
    };

    if resolved.leq(context) {
        tracing::trace!(
            caller = %ctx.caller.name,
            callee = %callee_name,
            %resolved,
            %context,
            "call admitted"
        );
        Vec::new()
    } else {
        vec![EffectError::EffectEscalation {
            caller: ctx.caller.name.clone(),
            context,
            callee: callee_name,
            callee_effect: resolved,
            span: call.span,
        }]
    }
}
