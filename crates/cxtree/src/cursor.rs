//! Opaque cursors and their validation.

use std::hash::{Hash, Hasher};

use cxtree_frontend::{NodeClass, NodePtr};

use crate::errors::InvalidReason;
use crate::liveness::LivenessTable;
use crate::{BindingError, Registry, Result, UnitKey};

/// Coarse category recorded in a cursor when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorClass {
    Null,
    Decl,
    Stmt,
    Expr,
}

impl CursorClass {
    pub(crate) fn of(class: NodeClass) -> Self {
        if class.is_decl() {
            Self::Decl
        } else if class.is_expr() {
            Self::Expr
        } else if class.is_stmt() {
            Self::Stmt
        } else {
            Self::Null
        }
    }
}

/// A plain-data handle to a node, as handed across the host boundary.
///
/// Cursors can be copied, stored and compared freely; they carry no lifetime
/// and are validated by [`Index::resolve`](crate::Index::resolve) before use.
#[derive(Clone, Copy, Debug)]
pub struct OpaqueCursor {
    class: CursorClass,
    node: *const (),
    unit: UnitKey,
}

impl OpaqueCursor {
    pub fn null() -> Self {
        Self {
            class: CursorClass::Null,
            node: std::ptr::null(),
            unit: UnitKey { index: 0, slot: 0, generation: 0 },
        }
    }

    pub(crate) fn new(class: CursorClass, node: NodePtr, unit: UnitKey) -> Self {
        Self { class, node: node.as_ptr().cast(), unit }
    }

    /// Reassembles a cursor from its parts, e.g. after a round trip through
    /// host storage. Nothing is checked until it is resolved.
    pub fn from_raw_parts(class: CursorClass, node: *const (), unit: UnitKey) -> Self {
        Self { class, node, unit }
    }

    pub fn class(&self) -> CursorClass {
        self.class
    }

    pub fn node_addr(&self) -> *const () {
        self.node
    }

    pub fn unit(&self) -> UnitKey {
        self.unit
    }

    pub fn is_null(&self) -> bool {
        self.class == CursorClass::Null || self.node.is_null()
    }
}

impl PartialEq for OpaqueCursor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.unit == other.unit
    }
}

impl Eq for OpaqueCursor {}

impl Hash for OpaqueCursor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        self.unit.hash(state);
    }
}

/// A validated cursor, pointing at the node a wrapper would be built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub(crate) node: NodePtr,
    pub(crate) class: NodeClass,
    pub(crate) unit: UnitKey,
}

impl Resolved {
    /// Dynamic class of the visible node. Cursors to transparent classes
    /// resolve to the node those classes wrap.
    pub fn class(&self) -> NodeClass {
        self.class
    }

    pub fn category(&self) -> CursorClass {
        CursorClass::of(self.class)
    }

    pub fn unit(&self) -> UnitKey {
        self.unit
    }
}

/// Validates `cursor` against the units of index `index`.
///
/// Allocation-free; the node header is only read once the address is known to
/// be a node of a live unit.
pub(crate) fn resolve(
    table: &LivenessTable,
    registry: &Registry,
    index: u32,
    cursor: &OpaqueCursor,
) -> Result<Resolved> {
    let invalid = |reason| BindingError::InvalidCursor { reason };
    if cursor.is_null() {
        return Err(invalid(InvalidReason::Null));
    }
    if cursor.unit.index != index {
        return Err(invalid(InvalidReason::ForeignIndex));
    }
    let Some(node) = NodePtr::new(cursor.node.cast()) else {
        return Err(invalid(InvalidReason::Null));
    };
    table
        .with_unit(cursor.unit, |unit| {
            if !node.is_aligned() {
                return Err(invalid(InvalidReason::Misaligned));
            }
            if !unit.storage.contains(node) {
                return Err(invalid(InvalidReason::NotInUnit));
            }
            // SAFETY: `node` is an allocation of a live unit.
            #[expect(unsafe_code)]
            let class = unsafe { node.get() }.class();
            if CursorClass::of(class) != cursor.class {
                return Err(invalid(InvalidReason::ClassMismatch));
            }
            // SAFETY: as above; transparent nodes only lead to their children.
            #[expect(unsafe_code)]
            let (node, class) = unsafe {
                let visible = registry.visible(node);
                (visible, visible.get().class())
            };
            Ok(Resolved { node, class, unit: cursor.unit })
        })
        .unwrap_or_else(|_| Err(invalid(InvalidReason::Disposed)))
}
