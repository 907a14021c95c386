//! Abilities and ability sets.
//!
//! An ability is a capability tag constraining what may be done with a
//! value: `copy` (duplicate), `drop` (discard), `store` (keep inside other
//! values in global storage) and `key` (be a top-level storage object).

use std::fmt;

use bitflags::bitflags;
use mova_ir::Name;

/// A single ability.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ability {
    Copy,
    Drop,
    Store,
    Key,
}

impl Ability {
    pub const ALL: [Ability; 4] = [Ability::Copy, Ability::Drop, Ability::Store, Ability::Key];

    /// Parse an ability keyword.
    pub fn from_name(name: Name) -> Option<Self> {
        match name {
            Name::COPY => Some(Ability::Copy),
            Name::DROP => Some(Ability::Drop),
            Name::STORE => Some(Ability::Store),
            Name::KEY => Some(Ability::Key),
            _ => None,
        }
    }

    /// Parse an ability keyword from text.
    pub fn from_str_keyword(text: &str) -> Option<Self> {
        match text {
            "copy" => Some(Ability::Copy),
            "drop" => Some(Ability::Drop),
            "store" => Some(Ability::Store),
            "key" => Some(Ability::Key),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Ability::Copy => "copy",
            Ability::Drop => "drop",
            Ability::Store => "store",
            Ability::Key => "key",
        }
    }

    pub const fn set(self) -> AbilitySet {
        match self {
            Ability::Copy => AbilitySet::COPY,
            Ability::Drop => AbilitySet::DROP,
            Ability::Store => AbilitySet::STORE,
            Ability::Key => AbilitySet::KEY,
        }
    }

    /// The ability a type argument must have for a generic struct to keep
    /// this ability. `key` structs need `store` arguments.
    pub const fn required_of_arguments(self) -> Ability {
        match self {
            Ability::Key => Ability::Store,
            other => other,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of abilities.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct AbilitySet: u8 {
        const COPY = 1 << 0;
        const DROP = 1 << 1;
        const STORE = 1 << 2;
        const KEY = 1 << 3;

        /// Abilities of every primitive except `signer`.
        const PRIMITIVE = Self::COPY.bits() | Self::DROP.bits() | Self::STORE.bits();
        /// Abilities of every reference.
        const REFERENCE = Self::COPY.bits() | Self::DROP.bits();
    }
}

impl AbilitySet {
    #[inline]
    pub fn has(self, ability: Ability) -> bool {
        self.contains(ability.set())
    }

    /// The individual abilities in the set, in declaration order.
    pub fn abilities(self) -> impl Iterator<Item = Ability> {
        Ability::ALL.into_iter().filter(move |a| self.has(*a))
    }

    /// Collect ability keywords, ignoring anything that is not one.
    pub fn from_names(names: impl IntoIterator<Item = Name>) -> Self {
        names
            .into_iter()
            .filter_map(Ability::from_name)
            .fold(AbilitySet::empty(), |set, a| set | a.set())
    }
}

impl From<Ability> for AbilitySet {
    fn from(ability: Ability) -> Self {
        ability.set()
    }
}

impl FromIterator<Ability> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        iter.into_iter().fold(AbilitySet::empty(), |set, a| set | a.set())
    }
}

impl fmt::Display for AbilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, ability) in self.abilities().enumerate() {
            if idx > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(ability.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_parsing() {
        assert_eq!(Ability::from_name(Name::STORE), Some(Ability::Store));
        assert_eq!(Ability::from_name(Name::VECTOR), None);
        assert_eq!(Ability::from_str_keyword("key"), Some(Ability::Key));
    }

    #[test]
    fn sets_from_names_and_display() {
        let set = AbilitySet::from_names([Name::KEY, Name::STORE, Name::BOOL]);
        assert_eq!(set, AbilitySet::KEY | AbilitySet::STORE);
        assert_eq!(set.to_string(), "store + key");
        assert_eq!(AbilitySet::REFERENCE.abilities().count(), 2);
        let collected: AbilitySet = [Ability::Copy, Ability::Drop].into_iter().collect();
        assert_eq!(collected, AbilitySet::REFERENCE);
    }

    #[test]
    fn key_requires_store_of_arguments() {
        assert_eq!(Ability::Key.required_of_arguments(), Ability::Store);
        assert_eq!(Ability::Copy.required_of_arguments(), Ability::Copy);
    }
}
