//! Built-in primitive types.

use mova_ir::Name;

use crate::AbilitySet;

/// The primitive types of the language.
///
/// `Unit` is the empty tuple; `String` stands in for `0x1::string::String`,
/// which the language treats as a built-in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Unit,
    String,
}

impl PrimitiveKind {
    pub const INTEGERS: [PrimitiveKind; 6] = [
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::U128,
        PrimitiveKind::U256,
    ];

    /// The primitive a type keyword names, if any.
    ///
    /// `String` is not a keyword; it only becomes a primitive once resolved
    /// to `0x1::string::String`.
    pub fn from_name(name: Name) -> Option<Self> {
        Some(match name {
            Name::BOOL => PrimitiveKind::Bool,
            Name::U8 => PrimitiveKind::U8,
            Name::U16 => PrimitiveKind::U16,
            Name::U32 => PrimitiveKind::U32,
            Name::U64 => PrimitiveKind::U64,
            Name::U128 => PrimitiveKind::U128,
            Name::U256 => PrimitiveKind::U256,
            Name::ADDRESS => PrimitiveKind::Address,
            Name::SIGNER => PrimitiveKind::Signer,
            _ => return None,
        })
    }

    /// Integer type for a literal suffix (`u8` .. `u256`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "u8" => PrimitiveKind::U8,
            "u16" => PrimitiveKind::U16,
            "u32" => PrimitiveKind::U32,
            "u64" => PrimitiveKind::U64,
            "u128" => PrimitiveKind::U128,
            "u256" => PrimitiveKind::U256,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::U128 => "u128",
            PrimitiveKind::U256 => "u256",
            PrimitiveKind::Address => "address",
            PrimitiveKind::Signer => "signer",
            PrimitiveKind::Unit => "()",
            PrimitiveKind::String => "String",
        }
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::U8
                | PrimitiveKind::U16
                | PrimitiveKind::U32
                | PrimitiveKind::U64
                | PrimitiveKind::U128
                | PrimitiveKind::U256
        )
    }

    /// Fixed ability set: `signer` is `drop` only, everything else is
    /// `copy + drop + store`.
    pub const fn abilities(self) -> AbilitySet {
        match self {
            PrimitiveKind::Signer => AbilitySet::DROP,
            _ => AbilitySet::PRIMITIVE,
        }
    }
}
