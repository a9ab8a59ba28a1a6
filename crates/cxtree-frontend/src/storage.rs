use camino::{Utf8Path, Utf8PathBuf};
use cxtree_tokenizer::Token;
use text_size::TextSize;

use crate::maybe_dangling::MaybeDangling;
use crate::node::NodePtr;

pub(crate) struct Allocation {
    pub(crate) ptr: NodePtr,
    pub(crate) free: unsafe fn(NodePtr),
}

/// Arena for one translation unit.
///
/// Owns the source text, the token buffer and every node. Dropping it frees all
/// of them at once; any `NodePtr` into it dangles afterwards.
pub struct UnitStorage {
    path: Utf8PathBuf,
    text: Box<str>,
    tokens: Box<[Token]>,
    root: NodePtr,
    allocations: Box<[Allocation]>,
    /// Node addresses, sorted.
    addresses: Box<[usize]>,
    /// Child slots referenced by every `NodeBase::children`.
    _slots: MaybeDangling<Box<[Option<NodePtr>]>>,
}

impl UnitStorage {
    pub(crate) fn new(
        path: Utf8PathBuf,
        text: Box<str>,
        tokens: Box<[Token]>,
        root: NodePtr,
        allocations: Box<[Allocation]>,
        slots: MaybeDangling<Box<[Option<NodePtr>]>>,
    ) -> Self {
        let mut addresses: Box<[usize]> =
            allocations.iter().map(|allocation| allocation.ptr.addr()).collect();
        addresses.sort_unstable();
        Self { path, text, tokens, root, allocations, addresses, _slots: slots }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every token except whitespace, in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn root(&self) -> NodePtr {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.allocations.len()
    }

    /// Whether `ptr` is the address of a node allocated in this unit.
    ///
    /// Only compares addresses, so it is safe to ask about arbitrary pointers.
    pub fn contains(&self, ptr: NodePtr) -> bool {
        self.addresses.binary_search(&ptr.addr()).is_ok()
    }

    /// Innermost node whose range contains `offset`; the root when no child
    /// does.
    #[expect(unsafe_code)]
    pub fn node_at(&self, offset: TextSize) -> NodePtr {
        let mut node = self.root;
        // SAFETY: every pointer reachable from the root belongs to `self`.
        'descend: loop {
            for child in unsafe { node.get() }.children() {
                if unsafe { child.get() }.range().contains(offset) {
                    node = child;
                    continue 'descend;
                }
            }
            return node;
        }
    }
}

impl Drop for UnitStorage {
    #[expect(unsafe_code)]
    fn drop(&mut self) {
        for allocation in &self.allocations {
            // SAFETY: each allocation is freed exactly once, here.
            unsafe { (allocation.free)(allocation.ptr) };
        }
    }
}
