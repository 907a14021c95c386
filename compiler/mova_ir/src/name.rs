//! Interned identifiers.
//!
//! A [`Name`] is 32 bits: the top four select an interner shard and the
//! rest index into it. Shard 0 starts with a fixed table of well-known
//! names (type and ability keywords, the standard named addresses) so the
//! type engine can use them as constants without an interner at hand.

use std::fmt;

/// An interned string. Compare and hash it freely; only an interner can
/// turn it back into text.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

/// Strings pre-interned at fixed positions of shard 0.
///
/// The position of each entry is the local index of the matching constant
/// on [`Name`]; keep the two in sync.
pub(crate) const WELL_KNOWN: [&str; 28] = [
    "", "vector", "bool", "u8", "u16", "u32", "u64", "u128", "u256", "address", "signer", "copy",
    "drop", "store", "key", "std", "sui", "0x1", "0x2", "string", "String", "true", "false",
    "option", "Option", "ascii", "Self", "_",
];

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);
    pub const VECTOR: Name = Name::new(0, 1);
    pub const BOOL: Name = Name::new(0, 2);
    pub const U8: Name = Name::new(0, 3);
    pub const U16: Name = Name::new(0, 4);
    pub const U32: Name = Name::new(0, 5);
    pub const U64: Name = Name::new(0, 6);
    pub const U128: Name = Name::new(0, 7);
    pub const U256: Name = Name::new(0, 8);
    pub const ADDRESS: Name = Name::new(0, 9);
    pub const SIGNER: Name = Name::new(0, 10);
    pub const COPY: Name = Name::new(0, 11);
    pub const DROP: Name = Name::new(0, 12);
    pub const STORE: Name = Name::new(0, 13);
    pub const KEY: Name = Name::new(0, 14);
    pub const STD: Name = Name::new(0, 15);
    pub const SUI: Name = Name::new(0, 16);
    pub const ADDR_0X1: Name = Name::new(0, 17);
    pub const ADDR_0X2: Name = Name::new(0, 18);
    /// Module name `string`.
    pub const STRING_MODULE: Name = Name::new(0, 19);
    /// Struct name `String`.
    pub const STRING: Name = Name::new(0, 20);
    pub const TRUE: Name = Name::new(0, 21);
    pub const FALSE: Name = Name::new(0, 22);
    pub const OPTION_MODULE: Name = Name::new(0, 23);
    pub const OPTION: Name = Name::new(0, 24);
    pub const ASCII_MODULE: Name = Name::new(0, 25);
    pub const SELF_MODULE: Name = Name::new(0, 26);
    pub const WILDCARD: Name = Name::new(0, 27);

    const SHARD_SHIFT: u32 = 28;

    pub const MAX_LOCAL: u32 = (1 << Self::SHARD_SHIFT) - 1;
    pub const NUM_SHARDS: usize = 16;

    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << Self::SHARD_SHIFT) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::SHARD_SHIFT) as usize
    }

    /// Slot within the shard.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// A name from its packed form. Tests use it to make names without an
    /// interner.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// The static text of a well-known name, without an interner.
    pub fn well_known_str(self) -> Option<&'static str> {
        if self.shard() == 0 {
            WELL_KNOWN.get(self.local()).copied()
        } else {
            None
        }
    }
}

/// Position of `s` in the well-known table.
pub(crate) fn well_known_index(s: &str) -> Option<u32> {
    WELL_KNOWN
        .iter()
        .position(|known| *known == s)
        .and_then(|idx| u32::try_from(idx).ok())
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.well_known_str() {
            Some(text) => write!(f, "Name({text:?})"),
            None => write!(f, "Name(shard={}, local={})", self.shard(), self.local()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_and_slot_round_trip() {
        let name = Name::new(5, 1000);
        assert_eq!((name.shard(), name.local()), (5, 1000));
        assert_eq!(Name::default(), Name::EMPTY);
    }

    #[test]
    fn well_known_constants_match_table() {
        assert_eq!(Name::VECTOR.well_known_str(), Some("vector"));
        assert_eq!(Name::U256.well_known_str(), Some("u256"));
        assert_eq!(Name::KEY.well_known_str(), Some("key"));
        assert_eq!(Name::STRING.well_known_str(), Some("String"));
        assert_eq!(Name::WILDCARD.well_known_str(), Some("_"));
        assert_eq!(well_known_index("signer"), Some(Name::SIGNER.raw()));
    }

    #[test]
    fn dynamic_names_are_not_well_known() {
        assert_eq!(Name::new(3, 7).well_known_str(), None);
        assert_eq!(Name::new(0, 5000).well_known_str(), None);
    }
}
