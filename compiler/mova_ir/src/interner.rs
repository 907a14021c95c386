//! Concurrent interner for identifiers and literal text.
//!
//! Files are analysed on several threads at once and all of them intern
//! into one table, so the table is split into [`Name::NUM_SHARDS`] shards,
//! each behind its own lock. A string always lands in the same shard, and
//! shard 0 starts out holding the well-known names at their fixed slots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::name::{well_known_index, WELL_KNOWN};
use super::Name;

/// A shard ran out of local indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternError {
    #[error("interner shard {shard} is full ({count} strings, limit {})", Name::MAX_LOCAL)]
    ShardFull { shard: usize, count: usize },
}

#[derive(Default)]
struct Shard {
    slots: FxHashMap<&'static str, u32>,
    texts: Vec<&'static str>,
}

impl Shard {
    fn preloaded() -> Self {
        let mut shard = Shard::default();
        for text in WELL_KNOWN {
            shard.push(text);
        }
        shard
    }

    /// Store `text` in the next slot. The caller checked capacity.
    fn push(&mut self, text: &'static str) -> u32 {
        let slot = u32::try_from(self.texts.len()).unwrap_or(u32::MAX);
        self.texts.push(text);
        self.slots.insert(text, slot);
        slot
    }
}

/// The interning table. Share it through [`SharedInterner`].
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
    len: AtomicUsize,
}

impl StringInterner {
    pub fn new() -> Self {
        StringInterner {
            shards: std::array::from_fn(|idx| {
                RwLock::new(if idx == 0 {
                    Shard::preloaded()
                } else {
                    Shard::default()
                })
            }),
            len: AtomicUsize::new(WELL_KNOWN.len()),
        }
    }

    /// Shard of `text`, from a hash of its first bytes.
    fn shard_of(text: &str) -> u32 {
        let hash = text
            .bytes()
            .take(8)
            .fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));
        hash % Name::NUM_SHARDS as u32
    }

    /// Intern `text`, failing only when its shard is full.
    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(text) {
            return Ok(name);
        }
        let shard = Self::shard_of(text);
        let mut guard = self.shards[shard as usize].write();
        // Another thread may have won the race for the write lock.
        if let Some(&slot) = guard.slots.get(text) {
            return Ok(Name::new(shard, slot));
        }
        let count = guard.texts.len();
        if u32::try_from(count).map_or(true, |slot| slot > Name::MAX_LOCAL) {
            return Err(InternError::ShardFull {
                shard: shard as usize,
                count,
            });
        }
        let slot = guard.push(Box::leak(text.to_owned().into_boxed_str()));
        self.len.fetch_add(1, Ordering::Relaxed);
        Ok(Name::new(shard, slot))
    }

    /// Intern `text`.
    ///
    /// # Panics
    /// If the shard of `text` is full. See [`try_intern`](Self::try_intern).
    #[inline]
    pub fn intern(&self, text: &str) -> Name {
        self.try_intern(text).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Text of `name`. Names from another interner come back empty.
    pub fn lookup(&self, name: Name) -> &'static str {
        name.well_known_str().unwrap_or_else(|| {
            self.shards[name.shard()]
                .read()
                .texts
                .get(name.local())
                .copied()
                .unwrap_or("")
        })
    }

    /// The name of `text` if it was interned already.
    pub fn get(&self, text: &str) -> Option<Name> {
        if let Some(slot) = well_known_index(text) {
            return Some(Name::new(0, slot));
        }
        let shard = Self::shard_of(text);
        let slot = *self.shards[shard as usize].read().slots.get(text)?;
        Some(Name::new(shard, slot))
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Always false: the well-known names are present from the start.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference-counted handle to one [`StringInterner`].
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}
