//! Tree navigation over node wrappers.
//!
//! Iterators are lazy and re-check the unit's liveness on every step: once the
//! unit is disposed they yield a single `UseAfterDispose` error and stop.

use std::iter::FusedIterator;

use cxtree_frontend::NodePtr;

use crate::{Node, Result};

/// Children of a node in the front-end's order, skipping absent slots.
pub struct Children {
    parent: Node,
    next_slot: usize,
    done: bool,
}

impl Children {
    fn new(parent: Node) -> Self {
        Self { parent, next_slot: 0, done: false }
    }
}

impl Iterator for Children {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next_slot = &mut self.next_slot;
        let step = self.parent.with_base(|_, base| {
            let slots = base.child_slots();
            while let Some(&slot) = slots.get(*next_slot) {
                *next_slot += 1;
                if let Some(child) = slot {
                    return Some(self.parent.wrap_sibling(child));
                }
            }
            None
        });
        match step {
            Ok(Some(child)) => Some(child),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Children {}

/// Preorder walk event for nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkEvent {
    Enter(Node),
    Leave(Node),
}

/// Preorder traversal, built by stacking [`Children`] iterators.
pub struct Preorder {
    stack: Vec<(Node, Children)>,
    root: Option<Node>,
}

impl Preorder {
    fn new(start: Node) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the subtree of the node most recently entered.
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl Iterator for Preorder {
    type Item = Result<WalkEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            if let Err(err) = root.kind() {
                return Some(Err(err));
            }
            self.stack.push((root.clone(), Children::new(root.clone())));
            return Some(Ok(WalkEvent::Enter(root)));
        };
        match active_node.next() {
            Some(Ok(child)) => {
                self.stack.push((child.clone(), Children::new(child.clone())));
                Some(Ok(WalkEvent::Enter(child)))
            }
            Some(Err(err)) => {
                self.stack.clear();
                Some(Err(err))
            }
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(Ok(WalkEvent::Leave(exited_node)))
            }
        }
    }
}

impl Node {
    pub fn children(&self) -> Result<Children> {
        self.kind()?;
        Ok(Children::new(self.clone()))
    }

    pub fn preorder(&self) -> Result<Preorder> {
        self.kind()?;
        Ok(Preorder::new(self.clone()))
    }

    /// This node and everything below it, in preorder.
    pub fn descendants(&self) -> Result<impl Iterator<Item = Result<Node>>> {
        Ok(self.preorder()?.filter_map(|event| match event {
            Ok(WalkEvent::Enter(node)) => Some(Ok(node)),
            Ok(WalkEvent::Leave(_)) => None,
            Err(err) => Some(Err(err)),
        }))
    }

    /// Nearest visible ancestor; `None` for the translation unit.
    pub fn parent(&self) -> Result<Option<Node>> {
        self.with_base(|_, _| match self.container().1 {
            Some(parent) => self.wrap_sibling(parent).map(Some),
            None => Ok(None),
        })?
    }

    /// Ancestors from the parent up to the translation unit.
    pub fn ancestors(&self) -> impl Iterator<Item = Result<Node>> {
        let mut next = Some(self.parent());
        std::iter::from_fn(move || match next.take()? {
            Ok(Some(node)) => {
                next = Some(node.parent());
                Some(Ok(node))
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        })
    }

    pub fn next_sibling(&self) -> Result<Option<Node>> {
        self.sibling(|slots, at| slots[at + 1..].iter().flatten().next().copied())
    }

    pub fn prev_sibling(&self) -> Result<Option<Node>> {
        self.sibling(|slots, at| slots[..at].iter().rev().flatten().next().copied())
    }

    fn sibling(
        &self,
        pick: impl FnOnce(&[Option<NodePtr>], usize) -> Option<NodePtr>,
    ) -> Result<Option<Node>> {
        self.with_base(|_, _| {
            let (slot_owner, parent) = self.container();
            let Some(parent) = parent else { return Ok(None) };
            // SAFETY: `parent` was read from a node of the live unit.
            #[expect(unsafe_code)]
            let slots = unsafe { parent.get() }.child_slots();
            let Some(at) = slots.iter().position(|&slot| slot == Some(slot_owner)) else {
                return Ok(None);
            };
            pick(slots, at).map(|ptr| self.wrap_sibling(ptr)).transpose()
        })?
    }

    /// The pointer that occupies this node's slot in its visible parent (a
    /// transparent wrapper, if any) and that parent. Call inside `with_base`.
    #[expect(unsafe_code)]
    fn container(&self) -> (NodePtr, Option<NodePtr>) {
        let registry = self.registry();
        let mut slot_owner = self.ptr();
        // SAFETY: callers hold the unit borrowed.
        let mut parent = unsafe { slot_owner.get() }.parent();
        while let Some(ptr) = parent {
            if !registry.is_transparent(unsafe { ptr.get() }.class()) {
                break;
            }
            slot_owner = ptr;
            parent = unsafe { ptr.get() }.parent();
        }
        (slot_owner, parent)
    }
}
