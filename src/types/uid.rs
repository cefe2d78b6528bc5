// Copyright (c) 2024 Mike Tsao

//! Identifiers for elements and their audio slots, and a factory that helps
//! ensure element identifiers are in fact unique.

use core::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Identifies one element of the observed tree. The platform that owns the
/// tree decides how these are minted; the only requirement is that an
/// element keeps the same [ElementUid] for as long as it exists.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ElementUid(pub usize);

/// Mints [ElementUid]s for documents that don't have their own identity
/// scheme. Every call returns a value never returned before.
#[derive(Debug)]
pub struct ElementUidFactory {
    next_uid_value: AtomicUsize,
}
impl ElementUidFactory {
    /// Creates a factory whose first uid is `first_uid`.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
        }
    }

    /// Generates the next unique uid.
    pub fn mint_next(&self) -> ElementUid {
        ElementUid(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }
}
impl Default for ElementUidFactory {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Addresses one slot of one element: the `slot`-th entry across all of the
/// element's declared property lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlotKey {
    /// The element that declared the slot.
    pub element: ElementUid,
    /// Zero-based position within the element's property lists.
    pub slot: usize,
}
impl SlotKey {
    #[allow(missing_docs)]
    pub fn new(element: ElementUid, slot: usize) -> Self {
        Self { element, slot }
    }
}
impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.element, self.slot)
    }
}
