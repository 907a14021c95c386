//! The `Type` value.
//!
//! Types are plain immutable trees compared structurally: two types are
//! equal iff they have the same variant and recursively equal fields. That
//! equality doubles as the unification test and as a cache key, so the type
//! is `Eq + Hash` and carries no interned handles of its own beyond `Name`s.

use std::fmt;

use mova_ir::{ItemPath, Name, StringInterner};

use crate::{AbilitySet, PrimitiveKind};

/// Fully qualified identity of a nominal type: `address::module::name`.
///
/// Address and module are absent for built-ins (`vector`) and for types
/// whose declaring module is not known.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct QualifiedName {
    pub address: Option<Name>,
    pub module: Option<Name>,
    pub name: Name,
}

impl QualifiedName {
    pub const VECTOR: QualifiedName = QualifiedName::builtin(Name::VECTOR);

    pub const fn new(address: Name, module: Name, name: Name) -> Self {
        QualifiedName {
            address: Some(address),
            module: Some(module),
            name,
        }
    }

    /// A name with no declaring module.
    pub const fn builtin(name: Name) -> Self {
        QualifiedName {
            address: None,
            module: None,
            name,
        }
    }

    /// `0x1::string::String`, which is treated as a primitive.
    pub fn is_std_string(&self) -> bool {
        self.address == Some(Name::ADDR_0X1)
            && self.module == Some(Name::STRING_MODULE)
            && self.name == Name::STRING
    }

    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> impl fmt::Display + 'a {
        DisplayQualified {
            name: self,
            interner,
        }
    }
}

impl From<ItemPath> for QualifiedName {
    fn from(path: ItemPath) -> Self {
        QualifiedName {
            address: path.address,
            module: path.module,
            name: path.name,
        }
    }
}

/// A type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// A struct or enum, without type arguments.
    Named(QualifiedName),
    /// A parameterised type: `vector<u8>`, `Coin<SUI>`.
    Generic {
        base: QualifiedName,
        args: Vec<Type>,
    },
    /// `&T` or `&mut T`.
    Reference { inner: Box<Type>, mutable: bool },
    /// Non-empty tuple; the empty tuple is `Primitive(Unit)`.
    Tuple(Vec<Type>),
    /// An unresolved generic parameter with its declared bounds.
    TypeVariable { name: Name, constraints: AbilitySet },
    /// Signature of a callable; not a first-class value type.
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Inference gave no answer.
    Unknown,
}

impl Type {
    pub const BOOL: Type = Type::Primitive(PrimitiveKind::Bool);
    pub const U8: Type = Type::Primitive(PrimitiveKind::U8);
    pub const U16: Type = Type::Primitive(PrimitiveKind::U16);
    pub const U32: Type = Type::Primitive(PrimitiveKind::U32);
    pub const U64: Type = Type::Primitive(PrimitiveKind::U64);
    pub const U128: Type = Type::Primitive(PrimitiveKind::U128);
    pub const U256: Type = Type::Primitive(PrimitiveKind::U256);
    pub const ADDRESS: Type = Type::Primitive(PrimitiveKind::Address);
    pub const SIGNER: Type = Type::Primitive(PrimitiveKind::Signer);
    pub const UNIT: Type = Type::Primitive(PrimitiveKind::Unit);
    pub const STRING: Type = Type::Primitive(PrimitiveKind::String);

    /// `vector<elem>`
    pub fn vector(elem: Type) -> Type {
        Type::Generic {
            base: QualifiedName::VECTOR,
            args: vec![elem],
        }
    }

    /// A nominal type, with arguments when there are any.
    ///
    /// `0x1::string::String` becomes `Primitive(String)`.
    pub fn named(base: QualifiedName, args: Vec<Type>) -> Type {
        if base.is_std_string() && args.is_empty() {
            return Type::STRING;
        }
        if args.is_empty() {
            Type::Named(base)
        } else {
            Type::Generic { base, args }
        }
    }

    pub fn reference(inner: Type, mutable: bool) -> Type {
        Type::Reference {
            inner: Box::new(inner),
            mutable,
        }
    }

    /// A tuple; `()` is `Unit` and a one-element tuple is its element.
    pub fn tuple(elems: Vec<Type>) -> Type {
        match elems.len() {
            0 => Type::UNIT,
            1 => elems.into_iter().next().unwrap_or(Type::UNIT),
            _ => Type::Tuple(elems),
        }
    }

    pub fn type_var(name: Name, constraints: AbilitySet) -> Type {
        Type::TypeVariable { name, constraints }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    #[inline]
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.primitive().is_some_and(PrimitiveKind::is_integer)
    }

    /// The type behind any number of references.
    pub fn strip_references(&self) -> &Type {
        let mut current = self;
        while let Type::Reference { inner, .. } = current {
            current = inner;
        }
        current
    }

    /// Element type of a `vector<T>`, looking through references.
    pub fn vector_element(&self) -> Option<&Type> {
        match self.strip_references() {
            Type::Generic { base, args } if *base == QualifiedName::VECTOR => args.first(),
            _ => None,
        }
    }

    /// Nominal identity, looking through references.
    pub fn nominal(&self) -> Option<(&QualifiedName, &[Type])> {
        match self.strip_references() {
            Type::Named(name) => Some((name, &[])),
            Type::Generic { base, args } => Some((base, args)),
            _ => None,
        }
    }

    /// Whether any `TypeVariable` occurs in this type.
    pub fn has_type_variables(&self) -> bool {
        match self {
            Type::TypeVariable { .. } => true,
            Type::Generic { args: elems, .. } | Type::Tuple(elems) => {
                elems.iter().any(Type::has_type_variables)
            }
            Type::Reference { inner, .. } => inner.has_type_variables(),
            Type::Function { params, ret } => {
                params.iter().any(Type::has_type_variables) || ret.has_type_variables()
            }
            Type::Primitive(_) | Type::Named(_) | Type::Unknown => false,
        }
    }

    /// Whether `Unknown` occurs anywhere in this type.
    pub fn contains_unknown(&self) -> bool {
        match self {
            Type::Unknown => true,
            Type::Generic { args: elems, .. } | Type::Tuple(elems) => {
                elems.iter().any(Type::contains_unknown)
            }
            Type::Reference { inner, .. } => inner.contains_unknown(),
            Type::Function { params, ret } => {
                params.iter().any(Type::contains_unknown) || ret.contains_unknown()
            }
            Type::Primitive(_) | Type::Named(_) | Type::TypeVariable { .. } => false,
        }
    }

    /// Source-like rendering.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> impl fmt::Display + 'a {
        DisplayType { ty: self, interner }
    }
}

struct DisplayQualified<'a> {
    name: &'a QualifiedName,
    interner: &'a StringInterner,
}

impl fmt::Display for DisplayQualified<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(address) = self.name.address {
            write!(f, "{}::", self.interner.lookup(address))?;
        }
        if let Some(module) = self.name.module {
            write!(f, "{}::", self.interner.lookup(module))?;
        }
        f.write_str(self.interner.lookup(self.name.name))
    }
}

struct DisplayType<'a> {
    ty: &'a Type,
    interner: &'a StringInterner,
}

impl DisplayType<'_> {
    fn list(&self, f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
        for (idx, ty) in types.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty.display(self.interner))?;
        }
        Ok(())
    }
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Primitive(kind) => f.write_str(kind.as_str()),
            Type::Named(name) => write!(f, "{}", name.display(self.interner)),
            Type::Generic { base, args } => {
                write!(f, "{}<", base.display(self.interner))?;
                self.list(f, args)?;
                f.write_str(">")
            }
            Type::Reference { inner, mutable } => {
                f.write_str(if *mutable { "&mut " } else { "&" })?;
                write!(f, "{}", inner.display(self.interner))
            }
            Type::Tuple(elems) => {
                f.write_str("(")?;
                self.list(f, elems)?;
                f.write_str(")")
            }
            Type::TypeVariable { name, .. } => f.write_str(self.interner.lookup(*name)),
            Type::Function { params, ret } => {
                f.write_str("fun(")?;
                self.list(f, params)?;
                write!(f, "): {}", ret.display(self.interner))
            }
            Type::Unknown => f.write_str("?"),
        }
    }
}
