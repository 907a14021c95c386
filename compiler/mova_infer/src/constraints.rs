//! Ability bounds of call sites.

use mova_ir::{Name, NodeId, NodeKind};
use mova_types::{AbilitySet, Type};

use crate::expr::{infer_args, resolve_callee};
use crate::InferEngine;

/// A type argument that lacks abilities its parameter requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub call: NodeId,
    /// The declared type parameter.
    pub param: Name,
    /// The type argument bound to it.
    pub ty: Type,
    pub required: AbilitySet,
    pub missing: AbilitySet,
}

impl InferEngine<'_> {
    /// Check the type arguments of `call`, explicit or inferred, against the
    /// bounds of the callee's type parameters.
    ///
    /// Parameters left unbound and arguments containing `Unknown` are not
    /// reported. Nothing is reported for nodes that are not calls or whose
    /// callee does not resolve.
    pub fn check_call_constraints(&mut self, call: NodeId) -> Vec<ConstraintViolation> {
        let Some(NodeKind::Call { callee, args }) = self.kind(call) else {
            return Vec::new();
        };
        let arg_types = infer_args(self, callee, args);
        let Some(resolved) = resolve_callee(self, callee) else {
            return Vec::new();
        };
        let subst = resolved.substitution(&arg_types);
        resolved
            .sig
            .type_params
            .iter()
            .filter(|param| !param.constraints.is_empty())
            .filter_map(|param| {
                let ty = subst.get(param.name)?;
                if ty.contains_unknown() {
                    return None;
                }
                let missing = param.constraints.difference(self.abilities_of(ty));
                (!missing.is_empty()).then(|| ConstraintViolation {
                    call,
                    param: param.name,
                    ty: ty.clone(),
                    required: param.constraints,
                    missing,
                })
            })
            .collect()
    }
}
