use log::debug;

use crate::TableError;

pub const MAX_KEY_LEN: usize = 256;
pub const MAX_VALUE_LEN: usize = 256;

/// A single key-value entry, owned by the bucket chain it is linked into.
///
/// Entries never move between chains: a resize re-creates them in the new
/// table, so a node is owned by exactly one chain for its whole lifetime.
#[derive(Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub next: Option<Box<Entry>>,
}

impl Entry {
    /// Allocates a fresh, unlinked entry after validating the bounds
    pub(crate) fn create(key: &str, value: &str) -> Result<Box<Entry>, TableError> {
        check_bounds(key, value)?;
        alloc_guard()?;

        Ok(Box::new(Entry {
            key: key.into(),
            value: value.into(),
            next: None,
        }))
    }
}

pub(crate) fn check_bounds(key: &str, value: &str) -> Result<(), TableError> {
    if key.len() > MAX_KEY_LEN {
        return Err(TableError::LengthExceeded {
            what: "key",
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(TableError::LengthExceeded {
            what: "value",
            len: value.len(),
            max: MAX_VALUE_LEN,
        });
    }
    Ok(())
}

/// Walks the chain for `key` and hands back an owned copy of the value,
/// so the caller never holds a reference into the table.
pub(crate) fn value_of(head: Option<&Entry>, key: &str) -> Option<String> {
    let mut current = head;
    while let Some(entry) = current {
        if entry.key == key {
            return Some(entry.value.clone());
        }
        current = entry.next.as_deref();
    }
    None
}

/// Unlinks the first entry matching `key` and returns it.
///
/// A match at the head repoints the slot itself, a match further down
/// repoints the previous entry around the removed one. Either way the
/// rest of the chain keeps its order.
pub(crate) fn unlink(slot: &mut Option<Box<Entry>>, key: &str) -> Option<Box<Entry>> {
    if slot.as_deref().is_some_and(|entry| entry.key == key) {
        let mut removed = slot.take()?;
        *slot = removed.next.take();
        return Some(removed);
    }

    let mut prev = slot.as_deref_mut()?;
    loop {
        if prev.next.as_deref().is_some_and(|entry| entry.key == key) {
            let mut removed = prev.next.take()?;
            prev.next = removed.next.take();
            return Some(removed);
        }
        prev = prev.next.as_deref_mut()?;
    }
}

/// Frees every entry of the chain iteratively (a naive drop of the head
/// would recurse once per node) and leaves the slot empty. Returns how
/// many entries were freed.
pub(crate) fn clear(slot: &mut Option<Box<Entry>>) -> usize {
    let mut freed = 0;
    let mut current = slot.take();
    while let Some(mut entry) = current {
        current = entry.next.take();
        freed += 1;
    }
    if freed > 0 {
        debug!("cleared {freed} entries, chain is now empty");
    }
    freed
}

#[cfg(not(test))]
#[inline]
fn alloc_guard() -> Result<(), TableError> {
    Ok(())
}

#[cfg(test)]
fn alloc_guard() -> Result<(), TableError> {
    fault::check()
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::boxentry;

    #[test]
    fn create() {
        let entry = Entry::create("greeting", "hey how are you?").unwrap();
        assert_eq!(entry.key, "greeting");
        assert_eq!(entry.value, "hey how are you?");
        assert!(entry.next.is_none());
    }

    #[test]
    fn create_rejects_overlong_key() {
        let long = "!".repeat(MAX_KEY_LEN + 20);
        let err = Entry::create(&long, "fine").unwrap_err();
        assert_eq!(
            err,
            TableError::LengthExceeded {
                what: "key",
                len: long.len(),
                max: MAX_KEY_LEN
            }
        );

        let err = Entry::create("fine", &long).unwrap_err();
        assert!(matches!(err, TableError::LengthExceeded { what: "value", .. }));
    }

    #[test]
    fn create_rejects_exhausted_allocator() {
        fault::arm(0);
        assert_eq!(
            Entry::create("key", "value").unwrap_err(),
            TableError::AllocationFailure
        );
        // the injector is one-shot, the retry goes through
        assert!(Entry::create("key", "value").is_ok());
    }

    fn chain_of(pairs: &[(&str, &str)]) -> Option<Box<Entry>> {
        let mut head = None;
        for (key, value) in pairs.iter().rev() {
            let mut entry = boxentry!(*key, *value);
            entry.next = head;
            head = Some(entry);
        }
        head
    }

    fn keys_of(slot: &Option<Box<Entry>>) -> Vec<String> {
        let mut keys = Vec::new();
        let mut current = slot.as_deref();
        while let Some(entry) = current {
            keys.push(entry.key.clone());
            current = entry.next.as_deref();
        }
        keys
    }

    #[test]
    fn value_lookup() {
        let slot = chain_of(&[("meh", "meh"), ("target key", "you found me"), ("meh2", "meh")]);

        assert_eq!(
            value_of(slot.as_deref(), "target key"),
            Some("you found me".into())
        );
        assert_eq!(value_of(slot.as_deref(), "im not there"), None);
        assert_eq!(value_of(None, "target key"), None);
    }

    #[test]
    fn unlink_head() {
        let mut slot = chain_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let removed = unlink(&mut slot, "a").unwrap();
        assert_eq!(removed.key, "a");
        assert!(removed.next.is_none(), "removed entry must be detached");
        assert_eq!(keys_of(&slot), ["b", "c"]);
    }

    #[test]
    fn unlink_mid_and_tail() {
        let mut slot = chain_of(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);

        let removed = unlink(&mut slot, "c").unwrap();
        assert_eq!(removed.key, "c");
        assert_eq!(keys_of(&slot), ["a", "b", "d"]);

        let removed = unlink(&mut slot, "d").unwrap();
        assert_eq!(removed.key, "d");
        assert_eq!(keys_of(&slot), ["a", "b"]);
    }

    #[test]
    fn unlink_miss() {
        let mut slot = chain_of(&[("a", "1"), ("b", "2")]);
        assert!(unlink(&mut slot, "nope").is_none());
        assert_eq!(keys_of(&slot), ["a", "b"]);

        let mut empty = None;
        assert!(unlink(&mut empty, "a").is_none());
    }

    #[test]
    fn clear_counts_freed_entries() {
        let mut slot = chain_of(&[("to delete", "x"); 10]);
        assert_eq!(clear(&mut slot), 10);
        assert!(slot.is_none());
        assert_eq!(clear(&mut slot), 0);
    }
}
