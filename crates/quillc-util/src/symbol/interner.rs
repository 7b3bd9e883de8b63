//! String interner backed by `DashMap` for lock-free concurrent access.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use super::Symbol;

/// Number of symbols reserved for known keywords/identifiers; see
/// [`super::RESERVED_SYMBOLS_END`].
const RESERVED_SYMBOLS_END: u32 = 256;

pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

pub struct StringTable {
    map: DashMap<u64, (&'static str, u32)>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(128),
            next_index: AtomicU32::new(RESERVED_SYMBOLS_END),
        }
    }

    fn initialize_known_symbols(&self) {
        for (idx, word) in super::KNOWN_SYMBOLS.iter().enumerate() {
            let idx = idx as u32;
            if idx < RESERVED_SYMBOLS_END {
                let interned: &'static str = Box::leak(word.to_string().into_boxed_str());
                self.map.insert(Self::hash_string(word), (interned, idx));
            }
        }
    }

    pub fn intern(&self, string: &str) -> Symbol {
        let hash = Self::hash_string(string);

        if let Some(entry) = self.map.get(&hash) {
            if entry.value().0 == string {
                return Symbol { index: entry.value().1 };
            }
        }

        match self.map.entry(hash) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                if entry.get().0 == string {
                    return Symbol { index: entry.get().1 };
                }
                self.handle_collision(string, hash)
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                entry.insert((interned, idx));
                Symbol { index: idx }
            }
        }
    }

    fn handle_collision(&self, string: &str, original_hash: u64) -> Symbol {
        const MAX_PROBES: u64 = 32;
        const PROBE_PRIME: u64 = 0x9e3779b97f4a7c15;

        for i in 1u64..=MAX_PROBES {
            let probe_hash = original_hash.wrapping_add(i.wrapping_mul(PROBE_PRIME));
            if let Some(entry) = self.map.get(&probe_hash) {
                if entry.value().0 == string {
                    return Symbol { index: entry.value().1 };
                }
            } else {
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                self.map.insert(probe_hash, (interned, idx));
                return Symbol { index: idx };
            }
        }

        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.map.insert(original_hash, (interned, idx));
        Symbol { index: idx }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.map
            .iter()
            .find(|entry| entry.value().1 == symbol.index)
            .map(|entry| entry.value().0)
    }

    #[inline]
    fn hash_string(string: &str) -> u64 {
        let mut hasher = AHasher::default();
        string.hash(&mut hasher);
        hasher.finish()
    }
}
