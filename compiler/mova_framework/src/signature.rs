//! Parser for the type strings used in catalogs.
//!
//! Catalog entries spell types in surface syntax: `u64`, `vector<u8>`,
//! `&mut Coin<T>`, `(bool, u64)`, `0x2::object::UID`. Unqualified names are
//! type parameters, primitives or structs of the same module;
//! `module::Name` stays at the module's address.

use mova_ir::{AddressAliases, Name, StringInterner};
use mova_types::{Ability, AbilitySet, PrimitiveKind, QualifiedName, Type, TypeParamInfo};
use rustc_hash::FxHashSet;

use crate::error::SignatureError;

/// Names visible while parsing the types of one module item.
pub struct SignatureContext<'a> {
    pub interner: &'a StringInterner,
    pub aliases: &'a AddressAliases,
    /// Normalised address of the declaring module.
    pub address: Name,
    pub module: Name,
    /// Structs declared by the module.
    pub local_structs: &'a FxHashSet<Name>,
    /// Type parameters of the item being parsed.
    pub type_params: &'a [TypeParamInfo],
}

/// Parse a complete type string.
pub fn parse_type(text: &str, cx: &SignatureContext<'_>) -> Result<Type, SignatureError> {
    let mut parser = Parser { text, pos: 0, cx };
    let ty = parser.ty()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(ty),
        Some(found) => Err(parser.unexpected(found)),
    }
}

/// Parse a type parameter declaration: `T`, `T: copy + drop`, `phantom T`.
pub fn parse_type_param(text: &str, interner: &StringInterner) -> Result<TypeParamInfo, SignatureError> {
    let text = text.trim();
    let (is_phantom, rest) = match text.strip_prefix("phantom ") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let (name, bounds) = rest.split_once(':').unwrap_or((rest, ""));
    let name = name.trim();
    if let Some(found) = name.chars().find(|c| !is_ident_char(*c)) {
        return Err(SignatureError::UnexpectedChar {
            text: text.to_owned(),
            offset: text.find(found).unwrap_or(0),
            found,
        });
    }
    if name.is_empty() {
        return Err(SignatureError::UnexpectedEnd {
            text: text.to_owned(),
        });
    }
    Ok(TypeParamInfo {
        name: interner.intern(name),
        constraints: parse_abilities(bounds.split('+'))?,
        is_phantom,
    })
}

/// Parse ability keywords, skipping blanks.
pub fn parse_abilities<'s>(keywords: impl IntoIterator<Item = &'s str>) -> Result<AbilitySet, SignatureError> {
    keywords
        .into_iter()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| {
            Ability::from_str_keyword(k).ok_or_else(|| SignatureError::UnknownAbility {
                ability: k.to_owned(),
            })
        })
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Parser<'t, 'c> {
    text: &'t str,
    pos: usize,
    cx: &'c SignatureContext<'c>,
}

impl<'t> Parser<'t, '_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> SignatureError {
        SignatureError::UnexpectedChar {
            text: self.text.to_owned(),
            offset: self.pos,
            found,
        }
    }

    fn end(&self) -> SignatureError {
        SignatureError::UnexpectedEnd {
            text: self.text.to_owned(),
        }
    }

    fn expect_any(&mut self) -> Result<char, SignatureError> {
        self.skip_ws();
        self.bump().ok_or_else(|| self.end())
    }

    fn ty(&mut self) -> Result<Type, SignatureError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.end()),
            Some('&') => {
                self.bump();
                self.skip_ws();
                let rest = &self.text[self.pos..];
                let mutable = rest.starts_with("mut") && !rest[3..].starts_with(is_ident_char);
                if mutable {
                    self.pos += 3;
                }
                Ok(Type::reference(self.ty()?, mutable))
            }
            Some('(') => {
                self.bump();
                let elems = self.list(')')?;
                Ok(Type::tuple(elems))
            }
            Some(c) if is_ident_char(c) => self.path(),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    /// Comma-separated types up to `close`, which is consumed.
    fn list(&mut self, close: char) -> Result<Vec<Type>, SignatureError> {
        let mut elems = Vec::new();
        self.skip_ws();
        if self.peek() == Some(close) {
            self.bump();
            return Ok(elems);
        }
        loop {
            elems.push(self.ty()?);
            match self.expect_any()? {
                ',' => {}
                c if c == close => return Ok(elems),
                c => {
                    self.pos -= c.len_utf8();
                    return Err(self.unexpected(c));
                }
            }
        }
    }

    fn ident(&mut self) -> Result<&'t str, SignatureError> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(c) => self.unexpected(c),
                None => self.end(),
            });
        }
        Ok(&self.text[start..self.pos])
    }

    fn path(&mut self) -> Result<Type, SignatureError> {
        let mut segments = vec![self.ident()?];
        while self.text[self.pos..].starts_with("::") {
            self.pos += 2;
            segments.push(self.ident()?);
        }
        self.skip_ws();
        let args = if self.peek() == Some('<') {
            self.bump();
            self.list('>')?
        } else {
            Vec::new()
        };
        self.resolve(&segments, args)
    }

    fn resolve(&self, segments: &[&str], args: Vec<Type>) -> Result<Type, SignatureError> {
        let cx = self.cx;
        let intern = |s: &str| cx.interner.intern(s);
        match *segments {
            [name] => {
                if let Some(param) = cx
                    .type_params
                    .iter()
                    .find(|p| cx.interner.lookup(p.name) == name)
                {
                    return Ok(Type::type_var(param.name, param.constraints));
                }
                if name == "vector" {
                    return Ok(Type::Generic {
                        base: QualifiedName::VECTOR,
                        args,
                    });
                }
                if let Some(kind) = cx.interner.get(name).and_then(PrimitiveKind::from_name) {
                    return Ok(Type::Primitive(kind));
                }
                let name = intern(name);
                if cx.local_structs.contains(&name) {
                    return Ok(Type::named(
                        QualifiedName::new(cx.address, cx.module, name),
                        args,
                    ));
                }
                Err(self.unknown(segments))
            }
            [module, name] => Ok(Type::named(
                QualifiedName::new(cx.address, intern(module), intern(name)),
                args,
            )),
            [address, module, name] => Ok(Type::named(
                QualifiedName::new(
                    cx.aliases.normalize(intern(address), cx.interner),
                    intern(module),
                    intern(name),
                ),
                args,
            )),
            _ => Err(self.unknown(segments)),
        }
    }

    fn unknown(&self, segments: &[&str]) -> SignatureError {
        SignatureError::UnknownType {
            text: self.text.to_owned(),
            name: segments.join("::"),
        }
    }
}
