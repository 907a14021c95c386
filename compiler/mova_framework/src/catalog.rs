//! Catalog data: the serialized form and the indexed, typed form.

use std::sync::Arc;

use mova_ir::{AddressAliases, Name, StringInterner};
use mova_types::{FieldInfo, PrimitiveKind, QualifiedName, Type, TypeHierarchyInfo, TypeParamInfo};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::error::{CatalogError, SignatureError};
use crate::signature::{parse_abilities, parse_type, parse_type_param, SignatureContext};

// === Serialized form ===

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogFile {
    /// Named addresses, e.g. `"std": "0x1"`.
    #[serde(default)]
    aliases: FxHashMap<String, String>,
    modules: Vec<ModuleDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleDecl {
    address: String,
    name: String,
    #[serde(default)]
    structs: Vec<StructDecl>,
    #[serde(default)]
    functions: Vec<FunctionDecl>,
    #[serde(default)]
    constants: Vec<ConstantDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructDecl {
    name: String,
    #[serde(default)]
    abilities: Vec<String>,
    #[serde(default)]
    type_params: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldDecl>,
    #[serde(default)]
    is_enum: bool,
    /// Primitive the struct stands for (`std::string::String`).
    #[serde(default)]
    primitive: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionDecl {
    name: String,
    #[serde(default)]
    type_params: Vec<String>,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default = "unit")]
    ret: String,
}

fn unit() -> String {
    "()".to_owned()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstantDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

// === Typed form ===

/// A framework function signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: QualifiedName,
    pub type_params: Vec<TypeParamInfo>,
    pub params: Vec<Type>,
    pub ret: Type,
}

impl FunctionInfo {
    /// The signature as a `Function` type.
    pub fn signature(&self) -> Type {
        Type::function(self.params.clone(), self.ret.clone())
    }

    pub fn type_param_names(&self) -> Vec<Name> {
        self.type_params.iter().map(|p| p.name).collect()
    }
}

/// A framework constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantInfo {
    pub name: QualifiedName,
    pub ty: Type,
}

/// One framework module.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
    pub address: Name,
    pub name: Name,
    pub structs: Vec<Arc<TypeHierarchyInfo>>,
    pub functions: Vec<Arc<FunctionInfo>>,
    pub constants: Vec<ConstantInfo>,
}

/// The indexed catalog.
#[derive(Default)]
pub(crate) struct Catalog {
    pub modules: Vec<ModuleInfo>,
    pub by_module: FxHashMap<(Name, Name), usize>,
    pub structs: FxHashMap<QualifiedName, Arc<TypeHierarchyInfo>>,
    pub primitives: FxHashMap<QualifiedName, PrimitiveKind>,
    pub functions: FxHashMap<QualifiedName, Arc<FunctionInfo>>,
    pub constants: FxHashMap<QualifiedName, Type>,
}

impl Catalog {
    /// Parse and index a JSON catalog. Aliases it declares are added to
    /// `aliases`.
    pub fn from_json(
        json: &str,
        interner: &StringInterner,
        aliases: &mut AddressAliases,
    ) -> Result<Catalog, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for (alias, address) in &file.aliases {
            aliases.insert(interner.intern(alias), interner.intern(address));
        }
        let mut catalog = Catalog::default();
        for module in &file.modules {
            catalog.add_module(module, interner, aliases)?;
        }
        catalog
            .modules
            .sort_by_key(|m| (interner.lookup(m.address), interner.lookup(m.name)));
        catalog.by_module = catalog
            .modules
            .iter()
            .enumerate()
            .map(|(idx, m)| ((m.address, m.name), idx))
            .collect();
        Ok(catalog)
    }

    fn add_module(
        &mut self,
        decl: &ModuleDecl,
        interner: &StringInterner,
        aliases: &AddressAliases,
    ) -> Result<(), CatalogError> {
        let address = aliases.normalize(interner.intern(&decl.address), interner);
        let module = interner.intern(&decl.name);
        let item = |name: &str| format!("{}::{}::{}", decl.address, decl.name, name);
        if self
            .modules
            .iter()
            .any(|m| m.address == address && m.name == module)
        {
            return Err(CatalogError::DuplicateModule {
                module: format!("{}::{}", decl.address, decl.name),
            });
        }
        let local_structs: FxHashSet<Name> = decl
            .structs
            .iter()
            .map(|s| interner.intern(&s.name))
            .collect();
        let base = SignatureContext {
            interner,
            aliases,
            address,
            module,
            local_structs: &local_structs,
            type_params: &[],
        };
        let sig_err = |name: &str| {
            let item = item(name);
            move |source: SignatureError| CatalogError::Signature { item, source }
        };

        let mut info = ModuleInfo {
            address,
            name: module,
            structs: Vec::with_capacity(decl.structs.len()),
            functions: Vec::with_capacity(decl.functions.len()),
            constants: Vec::with_capacity(decl.constants.len()),
        };

        for s in &decl.structs {
            let name = QualifiedName::new(address, module, interner.intern(&s.name));
            let type_params = parse_params(&s.type_params, interner).map_err(sig_err(&s.name))?;
            let cx = SignatureContext {
                type_params: &type_params,
                ..base
            };
            let fields = s
                .fields
                .iter()
                .map(|f| {
                    Ok(FieldInfo {
                        name: interner.intern(&f.name),
                        ty: parse_type(&f.ty, &cx)?,
                    })
                })
                .collect::<Result<Vec<_>, SignatureError>>()
                .map_err(sig_err(&s.name))?;
            let abilities = parse_abilities(s.abilities.iter().map(String::as_str))
                .map_err(sig_err(&s.name))?;
            if let Some(alias) = &s.primitive {
                let kind = primitive_alias(alias).ok_or_else(|| CatalogError::UnknownPrimitive {
                    item: item(&s.name),
                    alias: alias.clone(),
                })?;
                self.primitives.insert(name, kind);
            }
            let mut record = TypeHierarchyInfo::new(name, abilities)
                .with_type_params(type_params)
                .with_fields(fields);
            record.is_enum = s.is_enum;
            let record = Arc::new(record);
            self.structs.insert(name, Arc::clone(&record));
            info.structs.push(record);
        }

        for f in &decl.functions {
            let name = QualifiedName::new(address, module, interner.intern(&f.name));
            let type_params = parse_params(&f.type_params, interner).map_err(sig_err(&f.name))?;
            let cx = SignatureContext {
                type_params: &type_params,
                ..base
            };
            let params = f
                .params
                .iter()
                .map(|p| parse_type(p, &cx))
                .collect::<Result<Vec<_>, _>>()
                .map_err(sig_err(&f.name))?;
            let ret = parse_type(&f.ret, &cx).map_err(sig_err(&f.name))?;
            let function = Arc::new(FunctionInfo {
                name,
                type_params,
                params,
                ret,
            });
            self.functions.insert(name, Arc::clone(&function));
            info.functions.push(function);
        }

        for c in &decl.constants {
            let name = QualifiedName::new(address, module, interner.intern(&c.name));
            let ty = parse_type(&c.ty, &base).map_err(sig_err(&c.name))?;
            self.constants.insert(name, ty.clone());
            info.constants.push(ConstantInfo { name, ty });
        }

        self.modules.push(info);
        Ok(())
    }
}

fn parse_params(decls: &[String], interner: &StringInterner) -> Result<Vec<TypeParamInfo>, SignatureError> {
    decls.iter().map(|d| parse_type_param(d, interner)).collect()
}

fn primitive_alias(text: &str) -> Option<PrimitiveKind> {
    match text {
        "String" => Some(PrimitiveKind::String),
        other => PrimitiveKind::from_suffix(other).or(match other {
            "bool" => Some(PrimitiveKind::Bool),
            "address" => Some(PrimitiveKind::Address),
            _ => None,
        }),
    }
}
