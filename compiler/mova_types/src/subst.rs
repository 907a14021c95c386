//! Generic substitution.

use mova_ir::Name;
use rustc_hash::FxHashMap;

use crate::Type;

/// A mapping from type parameter names to types.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Substitution {
    map: FxHashMap<Name, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair declared parameters with arguments positionally. Surplus
    /// parameters or arguments are ignored.
    pub fn from_params(params: &[Name], args: &[Type]) -> Self {
        Substitution {
            map: params.iter().copied().zip(args.iter().cloned()).collect(),
        }
    }

    /// Bind `name` unless it is already bound. Returns whether the binding
    /// was added or agrees with the existing one.
    pub fn bind(&mut self, name: Name, ty: Type) -> bool {
        match self.map.get(&name) {
            Some(existing) => *existing == ty,
            None => {
                self.map.insert(name, ty);
                true
            }
        }
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Type> {
        self.map.get(&name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rewrite every mapped `TypeVariable` in `ty`. Unmapped variables pass
    /// through unchanged.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.map.is_empty() || !ty.has_type_variables() {
            return ty.clone();
        }
        match ty {
            Type::TypeVariable { name, .. } => {
                self.map.get(name).cloned().unwrap_or_else(|| ty.clone())
            }
            Type::Generic { base, args } => Type::Generic {
                base: *base,
                args: args.iter().map(|a| self.apply(a)).collect(),
            },
            Type::Reference { inner, mutable } => Type::reference(self.apply(inner), *mutable),
            Type::Tuple(elems) => Type::Tuple(elems.iter().map(|e| self.apply(e)).collect()),
            Type::Function { params, ret } => Type::function(
                params.iter().map(|p| self.apply(p)).collect(),
                self.apply(ret),
            ),
            Type::Primitive(_) | Type::Named(_) | Type::Unknown => ty.clone(),
        }
    }

    /// Bind the parameters in `params` by structurally matching a declared
    /// type against an actual one (`vector<T>` against `vector<u8>` binds
    /// `T = u8`).
    ///
    /// The first binding of a parameter wins; later conflicting ones are
    /// ignored. `Unknown` never binds.
    pub fn match_types(&mut self, params: &[Name], declared: &Type, actual: &Type) {
        match (declared, actual) {
            (_, Type::Unknown) => {}
            (Type::TypeVariable { name, .. }, _) if params.contains(name) => {
                if !self.bind(*name, actual.clone()) {
                    tracing::trace!(?name, "conflicting type argument ignored");
                }
            }
            (
                Type::Generic { base, args },
                Type::Generic {
                    base: actual_base,
                    args: actual_args,
                },
            ) if base == actual_base => {
                for (d, a) in args.iter().zip(actual_args) {
                    self.match_types(params, d, a);
                }
            }
            (Type::Reference { inner, .. }, Type::Reference { inner: actual, .. }) => {
                self.match_types(params, inner, actual);
            }
            (Type::Reference { inner, .. }, _) => self.match_types(params, inner, actual),
            (Type::Tuple(elems), Type::Tuple(actual_elems)) => {
                for (d, a) in elems.iter().zip(actual_elems) {
                    self.match_types(params, d, a);
                }
            }
            (
                Type::Function { params: dp, ret: dr },
                Type::Function {
                    params: ap,
                    ret: ar,
                },
            ) => {
                for (d, a) in dp.iter().zip(ap) {
                    self.match_types(params, d, a);
                }
                self.match_types(params, dr, ar);
            }
            _ => {}
        }
    }
}

/// Replace the declared `type_params` in `ty` with `type_args`, positionally.
pub fn resolve_type_variables(ty: &Type, type_args: &[Type], type_params: &[Name]) -> Type {
    Substitution::from_params(type_params, type_args).apply(ty)
}
