//! `MaybeDangling` as specified in <https://github.com/rust-lang/rfcs/pull/3336>,
//! polyfilled via `MaybeUninit`.
//!
//! Node headers keep raw pointers into the child-slot buffer; wrapping the
//! buffer keeps those pointers valid while the owning `UnitStorage` moves.

use std::mem::MaybeUninit;
use std::ops::Deref;

#[repr(transparent)]
pub(crate) struct MaybeDangling<T> {
    value: MaybeUninit<T>,
}

impl<T> MaybeDangling<T> {
    #[inline]
    pub(crate) const fn new(value: T) -> Self {
        Self { value: MaybeUninit::new(value) }
    }
}

impl<T> Deref for MaybeDangling<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { self.value.assume_init_ref() }
    }
}

impl<T> Drop for MaybeDangling<T> {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_ptr().drop_in_place();
        }
    }
}
