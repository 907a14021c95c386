//! Call inference and generic instantiation.

use mova_framework::FunctionInfo;
use mova_ir::{Name, NodeId, NodeKind, NodeRange};
use mova_types::{QualifiedName, Substitution, Type, TypeParamInfo};

use crate::InferEngine;

/// A callable's declared signature, over its own type variables.
pub(crate) struct Signature {
    pub type_params: Vec<TypeParamInfo>,
    pub params: Vec<Type>,
    pub ret: Type,
}

impl Signature {
    fn from_framework(info: &FunctionInfo) -> Self {
        Signature {
            type_params: info.type_params.clone(),
            params: info.params.clone(),
            ret: info.ret.clone(),
        }
    }

    pub fn type_param_names(&self) -> Vec<Name> {
        self.type_params.iter().map(|p| p.name).collect()
    }

    /// The signature as a `Function` type.
    pub fn into_type(self) -> Type {
        Type::function(self.params, self.ret)
    }
}

/// The callee of a call site with the type arguments written there.
pub(crate) struct ResolvedCall {
    pub sig: Signature,
    pub explicit: Vec<Type>,
}

impl ResolvedCall {
    /// Type arguments of this call: the explicit ones when written,
    /// otherwise whatever structural matching of the declared parameter
    /// types against `args` binds.
    pub fn substitution(&self, args: &[Type]) -> Substitution {
        let names = self.sig.type_param_names();
        if !self.explicit.is_empty() {
            return Substitution::from_params(&names, &self.explicit);
        }
        let mut subst = Substitution::new();
        for (declared, actual) in self.sig.params.iter().zip(args) {
            subst.match_types(&names, declared, actual);
        }
        subst
    }
}

/// `callee(args)`: the callee's return type with its type parameters
/// instantiated. Unresolvable callees yield `Unknown`.
pub(crate) fn infer_call(engine: &mut InferEngine<'_>, callee: NodeId, args: NodeRange) -> Type {
    let arg_types = infer_args(engine, callee, args);
    match resolve_callee(engine, callee) {
        Some(call) => call.substitution(&arg_types).apply(&call.sig.ret),
        None => Type::Unknown,
    }
}

pub(crate) fn infer_args(engine: &mut InferEngine<'_>, callee: NodeId, args: NodeRange) -> Vec<Type> {
    engine
        .list(callee.file(), args)
        .iter()
        .map(|arg| engine.infer(*arg))
        .collect()
}

/// Signature and explicit type arguments of the function a callee path
/// names: a live declaration, a local of function type, or a framework
/// function.
pub(crate) fn resolve_callee(engine: &mut InferEngine<'_>, callee: NodeId) -> Option<ResolvedCall> {
    let NodeKind::Path { type_args, .. } = engine.kind(callee)? else {
        return None;
    };
    let explicit = engine
        .list(callee.file(), type_args)
        .iter()
        .map(|ty| engine.lower(*ty))
        .collect();
    let sig = match engine.cx.resolver.resolve(callee) {
        Some(decl) => {
            engine.note_file(decl.file());
            match engine.kind(decl)? {
                NodeKind::Function { .. } => local_signature(engine, decl)?,
                _ => match engine.infer(decl) {
                    Type::Function { params, ret } => Signature {
                        type_params: Vec::new(),
                        params,
                        ret: *ret,
                    },
                    _ => return None,
                },
            }
        }
        None => {
            let path = engine.cx.resolver.canonical_path(callee)?;
            let info = engine.cx.framework.function(&QualifiedName::from(path))?;
            Signature::from_framework(&info)
        }
    };
    Some(ResolvedCall { sig, explicit })
}

/// Signature of a live function declaration. The return type defaults to
/// unit; parameters without an annotation are `Unknown`.
pub(crate) fn local_signature(engine: &mut InferEngine<'_>, decl: NodeId) -> Option<Signature> {
    let NodeKind::Function {
        type_params,
        params,
        ret,
        ..
    } = engine.kind(decl)?
    else {
        return None;
    };
    let file = decl.file();
    let type_params = engine.cx.type_params(file, type_params);
    let params = engine
        .list(file, params)
        .iter()
        .map(|param| match engine.kind(*param) {
            Some(NodeKind::Param { ty: Some(ty), .. }) => engine.lower(ty),
            _ => Type::Unknown,
        })
        .collect();
    let ret = ret.map_or(Type::UNIT, |ret| engine.lower(ret));
    Some(Signature {
        type_params,
        params,
        ret,
    })
}
