//! Units and the index that owns them.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use camino::Utf8PathBuf;
use cxtree_frontend::UnitStorage;
use line_index::LineIndex;
use text_size::{TextRange, TextSize};
use tracing::instrument;

use crate::cursor::{self, OpaqueCursor, Resolved};
use crate::errors::InvalidReason;
use crate::liveness::{Liveness, LivenessTable, LoadedUnit};
use crate::tokens::{Token, tokens_in};
use crate::{BindingError, Node, Registry, Result, UnitKey};

/// Index ids start at 1; 0 is what the null cursor carries.
static NEXT_INDEX: AtomicU32 = AtomicU32::new(1);

/// Owns the liveness table for every unit loaded through it, and the registry
/// their nodes are wrapped with.
///
/// An index and everything derived from it stay on one thread.
pub struct Index {
    id: u32,
    table: Rc<LivenessTable>,
    registry: Rc<Registry>,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    pub fn new() -> Self {
        Self::with_registry(Registry::default())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            id: NEXT_INDEX.fetch_add(1, Ordering::Relaxed),
            table: Rc::default(),
            registry: Rc::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Takes ownership of a front-end unit.
    #[instrument(level = "debug", skip_all, fields(path = %storage.path()))]
    pub fn load(&self, storage: UnitStorage) -> TranslationUnit {
        let lines = LineIndex::new(storage.text());
        let key = self.table.insert(self.id, LoadedUnit { storage, lines });
        tracing::debug!(slot = key.slot, generation = key.generation, "loaded translation unit");
        TranslationUnit {
            liveness: Liveness::new(Rc::clone(&self.table), key),
            registry: Rc::clone(&self.registry),
        }
    }

    /// Validates a cursor without wrapping it.
    pub fn resolve(&self, cursor: &OpaqueCursor) -> Result<Resolved> {
        cursor::resolve(&self.table, &self.registry, self.id, cursor)
    }

    /// Builds the wrapper for a resolved cursor.
    #[expect(unsafe_code)]
    pub fn wrap(&self, resolved: Resolved) -> Result<Node> {
        if resolved.unit.index != self.id {
            return Err(BindingError::InvalidCursor { reason: InvalidReason::ForeignIndex });
        }
        let liveness = Liveness::new(Rc::clone(&self.table), resolved.unit);
        // SAFETY: the node was validated against this unit and the unit is
        // borrowed for the duration of the call.
        liveness.with_unit(|_| unsafe { self.registry.wrap_ptr(&liveness, resolved.node) })?
    }

    /// Resolves and wraps `cursor`.
    pub fn node(&self, cursor: &OpaqueCursor) -> Result<Node> {
        let resolved = self.resolve(cursor)?;
        self.wrap(resolved)
    }
}

/// A loaded translation unit.
///
/// Dropping it (or calling [`dispose`](Self::dispose)) frees the unit's
/// storage; wrappers and tokens derived from it fail with `UseAfterDispose`
/// from then on.
pub struct TranslationUnit {
    liveness: Liveness,
    registry: Rc<Registry>,
}

impl TranslationUnit {
    pub fn key(&self) -> UnitKey {
        self.liveness.key()
    }

    pub fn path(&self) -> Result<Utf8PathBuf> {
        self.liveness.with_unit(|unit| unit.storage.path().to_owned())
    }

    pub fn text(&self) -> Result<String> {
        self.liveness.with_unit(|unit| unit.storage.text().to_owned())
    }

    pub fn root(&self) -> Result<Node> {
        self.wrap_with(|unit| unit.storage.root())
    }

    /// Innermost visible node covering `offset`.
    pub fn node_at(&self, offset: TextSize) -> Result<Node> {
        self.wrap_with(|unit| unit.storage.node_at(offset))
    }

    pub fn cursor(&self) -> Result<OpaqueCursor> {
        self.root()?.cursor()
    }

    pub fn cursor_at(&self, offset: TextSize) -> Result<OpaqueCursor> {
        self.node_at(offset)?.cursor()
    }

    /// Non-whitespace tokens intersecting `range`, in source order.
    pub fn tokens(&self, range: TextRange) -> Result<Vec<Token>> {
        tokens_in(&self.liveness, range)
    }

    pub fn dispose(self) {
        drop(self);
    }

    #[expect(unsafe_code)]
    fn wrap_with(&self, pick: impl FnOnce(&LoadedUnit) -> cxtree_frontend::NodePtr) -> Result<Node> {
        // SAFETY: `pick` returns a node of the borrowed, live unit.
        self.liveness.with_unit(|unit| unsafe {
            self.registry.wrap_ptr(&self.liveness, pick(unit))
        })?
    }
}

impl Drop for TranslationUnit {
    fn drop(&mut self) {
        if let Some(unit) = self.liveness.release() {
            let key = self.liveness.key();
            tracing::debug!(
                slot = key.slot,
                generation = key.generation,
                path = %unit.storage.path(),
                "disposed translation unit"
            );
        }
    }
}
