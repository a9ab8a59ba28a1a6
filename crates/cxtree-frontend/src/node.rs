use std::ptr::NonNull;

use text_size::TextRange;

use crate::NodeClass;

/// Header shared by every node, at offset 0 of each allocation.
#[repr(C)]
pub struct NodeBase {
    pub(crate) class: NodeClass,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodePtr>,
    /// Child slots in syntactic order; `None` marks an absent optional part.
    pub(crate) children: NonNull<[Option<NodePtr>]>,
}

impl NodeBase {
    pub(crate) fn new(class: NodeClass, range: TextRange) -> Self {
        Self {
            class,
            range,
            parent: None,
            children: NonNull::slice_from_raw_parts(NonNull::dangling(), 0),
        }
    }

    pub fn class(&self) -> NodeClass {
        self.class
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn parent(&self) -> Option<NodePtr> {
        self.parent
    }

    #[expect(unsafe_code)]
    pub fn child_slots(&self) -> &[Option<NodePtr>] {
        // SAFETY: the slot buffer lives in the same `UnitStorage` as `self`.
        unsafe { self.children.as_ref() }
    }

    pub fn children(&self) -> impl Iterator<Item = NodePtr> + '_ {
        self.child_slots().iter().flatten().copied()
    }
}

/// Marks a node type as a `#[repr(C)]` extension of [`NodeBase`].
///
/// # Safety
///
/// `Self` must be `#[repr(C)]` with its parent class as the first field, all
/// the way down to `NodeBase`, and `classof` must accept only classes that are
/// allocated as `Self` or one of its subclasses.
#[expect(unsafe_code)]
pub unsafe trait Subclass {
    fn classof(class: NodeClass) -> bool;
}

#[expect(unsafe_code)]
unsafe impl Subclass for NodeBase {
    fn classof(_: NodeClass) -> bool {
        true
    }
}

/// Raw, non-owning pointer to a node.
///
/// Copying it is free; dereferencing it is only sound while the owning
/// `UnitStorage` is alive.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePtr(pub(crate) NonNull<NodeBase>);

impl NodePtr {
    pub fn new(ptr: *const NodeBase) -> Option<Self> {
        NonNull::new(ptr.cast_mut()).map(Self)
    }

    pub fn as_ptr(self) -> *const NodeBase {
        self.0.as_ptr()
    }

    pub fn addr(self) -> usize {
        self.as_ptr().addr()
    }

    pub fn is_aligned(self) -> bool {
        self.as_ptr().is_aligned()
    }

    /// # Safety
    ///
    /// The node must belong to a `UnitStorage` that stays alive for `'a`.
    #[expect(unsafe_code)]
    pub unsafe fn get<'a>(self) -> &'a NodeBase {
        unsafe { self.0.as_ref() }
    }

    /// Checked downcast: `Some` only when the dynamic class is `T` or one of
    /// its subclasses.
    ///
    /// # Safety
    ///
    /// Same as [`NodePtr::get`].
    #[expect(unsafe_code)]
    pub unsafe fn downcast<'a, T: Subclass>(self) -> Option<&'a T> {
        let class = unsafe { self.get() }.class;
        // SAFETY: `classof` guarantees the allocation is at least a `T`, and the
        // pointer carries the provenance of the whole allocation.
        T::classof(class).then(|| unsafe { self.0.cast::<T>().as_ref() })
    }
}

macro_rules! subclass {
    ($ty:ident : $parent:ty => $field:ident, $($class:ident)|+) => {
        #[expect(unsafe_code)]
        unsafe impl $crate::node::Subclass for $ty {
            fn classof(class: $crate::NodeClass) -> bool {
                matches!(class, $($crate::NodeClass::$class)|+)
            }
        }

        impl std::ops::Deref for $ty {
            type Target = $parent;

            fn deref(&self) -> &$parent {
                &self.$field
            }
        }
    };
}

pub(crate) use subclass;
