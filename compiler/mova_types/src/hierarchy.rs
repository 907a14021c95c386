//! Per-declaration metadata for nominal types.

use std::sync::Arc;

use mova_ir::Name;
use rustc_hash::FxHashMap;

use crate::{AbilitySet, QualifiedName, Substitution, Type};

/// A declared type parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParamInfo {
    pub name: Name,
    pub constraints: AbilitySet,
    pub is_phantom: bool,
}

/// A declared field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldInfo {
    pub name: Name,
    pub ty: Type,
}

/// Everything the engine needs to know about a struct or enum declaration.
///
/// Records are replaced wholesale when their declaration is re-indexed,
/// never edited in place.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeHierarchyInfo {
    pub name: QualifiedName,
    /// Declared supertypes. The language has no subtyping, so this is
    /// normally empty.
    pub supertypes: Vec<QualifiedName>,
    pub abilities: AbilitySet,
    pub type_params: Vec<TypeParamInfo>,
    pub is_enum: bool,
    pub module_address: Option<Name>,
    pub module_name: Option<Name>,
    pub fields: Vec<FieldInfo>,
}

impl TypeHierarchyInfo {
    pub fn new(name: QualifiedName, abilities: AbilitySet) -> Self {
        TypeHierarchyInfo {
            name,
            supertypes: Vec::new(),
            abilities,
            type_params: Vec::new(),
            is_enum: false,
            module_address: name.address,
            module_name: name.module,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<TypeParamInfo>) -> Self {
        self.type_params = type_params;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldInfo>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: Name) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared type of a field with the struct's type parameters replaced
    /// by `args`.
    pub fn field_type(&self, name: Name, args: &[Type]) -> Option<Type> {
        let field = self.field(name)?;
        if args.is_empty() || self.type_params.is_empty() {
            return Some(field.ty.clone());
        }
        let params: Vec<Name> = self.type_params.iter().map(|p| p.name).collect();
        Some(Substitution::from_params(&params, args).apply(&field.ty))
    }

    /// Whether the `idx`th type parameter is phantom. Extra arguments count
    /// as non-phantom.
    pub fn is_phantom_param(&self, idx: usize) -> bool {
        self.type_params.get(idx).is_some_and(|p| p.is_phantom)
    }

    /// The declaration's own type: `Named` or `Generic` over its parameters.
    pub fn declared_type(&self) -> Type {
        let args = self
            .type_params
            .iter()
            .map(|p| Type::type_var(p.name, p.constraints))
            .collect();
        Type::named(self.name, args)
    }
}

/// Find hierarchy records by qualified name.
pub trait HierarchyLookup {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>>;
}

impl<T: HierarchyLookup + ?Sized> HierarchyLookup for &T {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        (**self).lookup(name)
    }
}

impl HierarchyLookup for FxHashMap<QualifiedName, Arc<TypeHierarchyInfo>> {
    fn lookup(&self, name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        self.get(name).cloned()
    }
}

/// A lookup that knows nothing.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoHierarchy;

impl HierarchyLookup for NoHierarchy {
    fn lookup(&self, _name: &QualifiedName) -> Option<Arc<TypeHierarchyInfo>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mova_ir::StringInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn generic_field_types_are_substituted() {
        let interner = StringInterner::new();
        let t = interner.intern("T");
        let value = interner.intern("value");
        let boxed = QualifiedName::new(Name::ADDR_0X1, interner.intern("m"), interner.intern("Box"));
        let info = TypeHierarchyInfo::new(boxed, AbilitySet::STORE)
            .with_type_params(vec![TypeParamInfo {
                name: t,
                constraints: AbilitySet::STORE,
                is_phantom: false,
            }])
            .with_fields(vec![FieldInfo {
                name: value,
                ty: Type::vector(Type::type_var(t, AbilitySet::STORE)),
            }]);

        assert_eq!(info.field_type(value, &[Type::U8]), Some(Type::vector(Type::U8)));
        assert_eq!(info.field_type(interner.intern("missing"), &[]), None);
        assert_eq!(
            info.declared_type(),
            Type::named(boxed, vec![Type::type_var(t, AbilitySet::STORE)])
        );
        assert_eq!(info.module_address, Some(Name::ADDR_0X1));
        assert!(!info.is_phantom_param(0));
        assert!(!info.is_phantom_param(3));
    }
}
