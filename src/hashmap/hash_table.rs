use log::{debug, warn};

use super::chain::{self, Entry};
use crate::TableError;

/// A hash table resolving collisions with one singly linked chain per
/// bucket slot.
///
/// `store` is the only operation that can grow the table: once the load
/// factor would pass [`Self::MAX_LOAD_FACTOR`], every entry is rehashed
/// into a fresh table of twice the capacity and the new table replaces
/// `self`. A failed rehash is dropped wholesale and the original table
/// keeps serving, so callers never observe a half-migrated state.
#[derive(Debug)]
pub struct HashTable {
    buckets: Vec<Option<Box<Entry>>>,
    items: usize,
}

impl HashTable {
    /// Requested capacities below this fall back to [`Self::DEFAULT_CAPACITY`]
    pub const MIN_CAPACITY: usize = 4;
    pub const DEFAULT_CAPACITY: usize = 10;
    pub const GROWTH_FACTOR: usize = 2;
    pub const MAX_LOAD_FACTOR: f32 = 1.5;

    const HASH_PRIME: u64 = 31;

    /// Creates an empty table with `capacity` bucket slots, subject to
    /// the minimum capacity floor.
    pub fn new_with_capacity(capacity: usize) -> Result<Self, TableError> {
        let capacity = if capacity < Self::MIN_CAPACITY {
            debug!(
                "requested capacity {capacity} below floor {}, using {}",
                Self::MIN_CAPACITY,
                Self::DEFAULT_CAPACITY
            );
            Self::DEFAULT_CAPACITY
        } else {
            capacity
        };

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::AllocationFailure)?;
        buckets.resize_with(capacity, || None);

        Ok(Self { buckets, items: 0 })
    }

    /// Returns the number of stored entries (distinct keys)
    pub fn used(&self) -> usize {
        self.items
    }

    /// Shorthand for `self.used() == 0`
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Returns the number of buckets, or "slots" of the table
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the load factor of the table,
    /// computed as num of items / num of buckets
    pub fn load_factor(&self) -> f32 {
        if self.capacity() == 0 {
            0f32
        } else {
            self.items as f32 / self.capacity() as f32
        }
    }

    /// Maps `key` onto a bucket index in `[0, capacity)` with a
    /// polynomial rolling hash over the key's codepoints.
    ///
    /// Deterministic: the same key and capacity always land on the same
    /// slot. Changing the capacity changes the whole mapping, which is
    /// why a resize re-inserts every entry instead of moving nodes.
    pub fn bucket_index(key: &str, capacity: usize) -> usize {
        if capacity == 0 {
            return 0;
        }
        let mut hash: u64 = 0;
        for c in key.chars() {
            hash = hash
                .wrapping_mul(Self::HASH_PRIME)
                .wrapping_add(c as u64)
                % capacity as u64;
        }
        hash as usize
    }

    /// Inserts or updates `key`, returning the displaced value on an
    /// update and `None` on a fresh insert.
    ///
    /// Checked pre-emptively: if this insert would push the load factor
    /// past the threshold, the table grows first. A failed grow is only
    /// a warning, the store still runs against the unresized table.
    pub fn store(&mut self, key: &str, value: &str) -> Result<Option<String>, TableError> {
        if key.is_empty() {
            return Err(TableError::InvalidArgument("key must not be empty"));
        }
        // bounds are enforced on the update path too, an oversized value
        // must never replace a valid one
        chain::check_bounds(key, value)?;

        if self.needs_resize() {
            debug!(
                "load factor {:.2} past threshold, growing from {} buckets",
                self.load_factor(),
                self.capacity()
            );
            if let Err(err) = self.grow() {
                warn!(
                    "could not resize ({err}), keeping {} buckets and retrying on a later store",
                    self.capacity()
                );
            }
        }

        let i = Self::bucket_index(key, self.capacity());

        let mut current = self.buckets[i].as_deref_mut();
        while let Some(entry) = current {
            if entry.key == key {
                let old = std::mem::replace(&mut entry.value, value.into());
                return Ok(Some(old));
            }
            current = entry.next.as_deref_mut();
        }

        let mut entry = Entry::create(key, value)?;
        entry.next = self.buckets[i].take();
        self.buckets[i] = Some(entry);
        self.items += 1;
        Ok(None)
    }

    /// Looks up `key` and returns an owned copy of its value
    pub fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        let i = Self::bucket_index(key, self.capacity());
        chain::value_of(self.buckets[i].as_deref(), key)
    }

    /// Removes the entry stored under `key`, reporting whether one was
    /// actually removed. The table never shrinks on removal.
    pub fn remove(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let i = Self::bucket_index(key, self.capacity());
        match chain::unlink(&mut self.buckets[i], key) {
            Some(_) => {
                self.items -= 1;
                true
            }
            None => {
                debug!("no entry under key {key:?}");
                false
            }
        }
    }

    /// Frees every chain in every slot and returns how many entries
    /// were freed. The slot array keeps its capacity.
    pub fn clear(&mut self) -> usize {
        let mut freed = 0;
        for slot in &mut self.buckets {
            freed += chain::clear(slot);
        }
        self.items = 0;
        freed
    }

    // [private]

    /// True iff storing one more entry would push the load factor past
    /// the threshold. Evaluated before the insert, never after.
    fn needs_resize(&self) -> bool {
        (self.items + 1) as f32 / self.capacity() as f32 > Self::MAX_LOAD_FACTOR
    }

    /// Rehashes everything into a new table of twice the capacity.
    ///
    /// Re-insertion goes through the public `store` path so collisions
    /// in the new table are handled like any other. On any failure the
    /// partially built table is a local and simply drops, leaving
    /// `self` untouched and fully usable. Only a complete migration
    /// replaces `self`; the replaced table frees its chains on drop.
    fn grow(&mut self) -> Result<(), TableError> {
        let mut next = Self::new_with_capacity(self.capacity() * Self::GROWTH_FACTOR)?;

        for slot in &self.buckets {
            let mut current = slot.as_deref();
            while let Some(entry) = current {
                next.store(&entry.key, &entry.value)?;
                current = entry.next.as_deref();
            }
        }

        debug!(
            "rehashed {} entries into {} buckets",
            next.items,
            next.capacity()
        );
        *self = next;
        Ok(())
    }
}

impl Drop for HashTable {
    fn drop(&mut self) {
        // chains are freed iteratively, a recursive Box drop would
        // overflow the stack on a long chain
        for slot in &mut self.buckets {
            chain::clear(slot);
        }
    }
}
