//! Generation-checked ownership of loaded units.
//!
//! Each loaded unit occupies a slot. Disposing a unit drops its storage and
//! bumps the slot's generation, so every wrapper holding the old generation
//! fails its next check without being visited.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cxtree_frontend::UnitStorage;
use line_index::LineIndex;

use crate::{BindingError, Result};

/// Identifies one loaded unit: the owning index, its slot, and the slot's
/// generation at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitKey {
    pub(crate) index: u32,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}@{}", self.index, self.slot, self.generation)
    }
}

pub(crate) struct LoadedUnit {
    pub(crate) storage: UnitStorage,
    pub(crate) lines: LineIndex,
}

struct Slot {
    generation: u32,
    unit: Option<LoadedUnit>,
}

#[derive(Default)]
pub(crate) struct LivenessTable {
    slots: RefCell<Vec<Slot>>,
    free: RefCell<Vec<u32>>,
}

impl LivenessTable {
    /// Claims a slot for `unit`, reusing a released one when possible.
    pub(crate) fn insert(&self, index: u32, unit: LoadedUnit) -> UnitKey {
        let mut slots = self.slots.borrow_mut();
        let slot = match self.free.borrow_mut().pop() {
            Some(slot) => slot,
            None => {
                slots.push(Slot { generation: 0, unit: None });
                u32::try_from(slots.len() - 1).unwrap_or(u32::MAX)
            }
        };
        let entry = &mut slots[slot as usize];
        entry.unit = Some(unit);
        UnitKey { index, slot, generation: entry.generation }
    }

    pub(crate) fn is_live(&self, key: UnitKey) -> bool {
        self.slots
            .borrow()
            .get(key.slot as usize)
            .is_some_and(|slot| slot.generation == key.generation && slot.unit.is_some())
    }

    /// Runs `f` against the unit if `key` is still live.
    pub(crate) fn with_unit<R>(&self, key: UnitKey, f: impl FnOnce(&LoadedUnit) -> R) -> Result<R> {
        let slots = self.slots.borrow();
        match slots.get(key.slot as usize) {
            Some(Slot { generation, unit: Some(unit) }) if *generation == key.generation => {
                Ok(f(unit))
            }
            _ => Err(BindingError::UseAfterDispose { unit: key }),
        }
    }

    /// Invalidates `key` and hands back its unit. A stale key is a no-op.
    pub(crate) fn release(&self, key: UnitKey) -> Option<LoadedUnit> {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(key.slot as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let unit = slot.unit.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.borrow_mut().push(key.slot);
        Some(unit)
    }
}

/// Liveness token carried by every wrapper.
#[derive(Clone)]
pub(crate) struct Liveness {
    table: Rc<LivenessTable>,
    key: UnitKey,
}

impl Liveness {
    pub(crate) fn new(table: Rc<LivenessTable>, key: UnitKey) -> Self {
        Self { table, key }
    }

    pub(crate) fn key(&self) -> UnitKey {
        self.key
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.table.is_live(self.key) {
            Ok(())
        } else {
            Err(BindingError::UseAfterDispose { unit: self.key })
        }
    }

    pub(crate) fn with_unit<R>(&self, f: impl FnOnce(&LoadedUnit) -> R) -> Result<R> {
        self.table.with_unit(self.key, f)
    }

    pub(crate) fn release(&self) -> Option<LoadedUnit> {
        self.table.release(self.key)
    }
}

impl fmt::Debug for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Liveness").field(&self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use cxtree_frontend::{Builder, NodeData};
    use line_index::LineIndex;

    use super::{LivenessTable, LoadedUnit, Liveness};
    use crate::BindingError;

    fn empty_unit() -> LoadedUnit {
        let mut b = Builder::new("empty.c", "");
        let tu = b.start(NodeData::TranslationUnit);
        tu.complete(&mut b);
        LoadedUnit { storage: b.finish(), lines: LineIndex::new("") }
    }

    #[test]
    fn release_invalidates_outstanding_tokens() {
        let table = Rc::new(LivenessTable::default());
        let key = table.insert(0, empty_unit());
        let token = Liveness::new(Rc::clone(&table), key);
        assert_eq!(token.check(), Ok(()));

        assert!(table.release(key).is_some());
        assert_eq!(token.check(), Err(BindingError::UseAfterDispose { unit: key }));
        assert!(table.release(key).is_none());
    }

    #[test]
    fn reused_slots_get_a_fresh_generation() {
        let table = Rc::new(LivenessTable::default());
        let first = table.insert(0, empty_unit());
        drop(table.release(first));
        let second = table.insert(0, empty_unit());

        assert_eq!(first.slot, second.slot);
        assert_ne!(first.generation, second.generation);
        assert!(!table.is_live(first));
        assert!(table.is_live(second));
        assert!(table.with_unit(first, |_| ()).is_err());
    }
}
