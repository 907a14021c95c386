//! Named addresses.
//!
//! Source code may spell an account address as a literal (`0x1`, `0x0002`,
//! `@0x2`) or through a named alias (`std`, `sui`). Everything that compares
//! addresses goes through [`AddressAliases::normalize`] first.

use rustc_hash::FxHashMap;

use crate::{Name, StringInterner};

/// Alias table plus canonical hex formatting.
#[derive(Clone, Debug)]
pub struct AddressAliases {
    aliases: FxHashMap<Name, Name>,
}

impl AddressAliases {
    /// No aliases; only literal normalisation applies.
    pub fn empty() -> Self {
        Self {
            aliases: FxHashMap::default(),
        }
    }

    /// The framework aliases: `std` = `0x1`, `sui` = `0x2`.
    pub fn standard() -> Self {
        let mut aliases = Self::empty();
        aliases.insert(Name::STD, Name::ADDR_0X1);
        aliases.insert(Name::SUI, Name::ADDR_0X2);
        aliases
    }

    pub fn insert(&mut self, alias: Name, address: Name) {
        self.aliases.insert(alias, address);
    }

    /// Resolve an alias, if `alias` is one.
    pub fn get(&self, alias: Name) -> Option<Name> {
        self.aliases.get(&alias).copied()
    }

    /// Canonical form of an address: aliases are expanded, a leading `@` is
    /// dropped and hex literals lose their leading zeros (`0x0002` -> `0x2`).
    /// Anything else is returned unchanged.
    pub fn normalize(&self, address: Name, interner: &StringInterner) -> Name {
        if let Some(target) = self.get(address) {
            return target;
        }
        let text = interner.lookup(address);
        let bare = text.strip_prefix('@').unwrap_or(text);
        if let Some(target) = interner.get(bare).and_then(|n| self.get(n)) {
            return target;
        }
        match canonical_hex(bare) {
            Some(hex) if hex != text => interner.intern(&hex),
            Some(_) => address,
            None if bare.len() != text.len() => interner.intern(bare),
            None => address,
        }
    }

    /// Whether two spellings denote the same address.
    pub fn same(&self, a: Name, b: Name, interner: &StringInterner) -> bool {
        a == b || self.normalize(a, interner) == self.normalize(b, interner)
    }
}

impl Default for AddressAliases {
    fn default() -> Self {
        Self::standard()
    }
}

/// `0x00aB` -> `0xab`. `None` when `text` is not a hex literal.
fn canonical_hex(text: &str) -> Option<String> {
    let digits = text.strip_prefix("0x")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let trimmed = digits.trim_start_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    Some(format!("0x{}", trimmed.to_ascii_lowercase()))
}
