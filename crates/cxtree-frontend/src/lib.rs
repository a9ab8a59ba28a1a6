//! The front-end's internal object model.
//!
//! Nodes are `#[repr(C)]` structs that begin with a [`NodeBase`] header and are
//! linked by raw pointers. Nothing here is lifetime-checked: a [`NodePtr`] is
//! only meaningful while its [`UnitStorage`] is alive, and the binding layer is
//! responsible for enforcing that.

mod builder;
mod class;
pub mod decl;
pub mod expr;
mod maybe_dangling;
mod node;
mod ops;
mod storage;
mod ty;

pub use builder::{Builder, FunctionData, Marker, MethodFlags, NodeData, NodeRef};
pub use class::{FRONTEND_VERSION, FrontendVersion, NodeClass};
pub use node::{NodeBase, NodePtr, Subclass};
pub use ops::{BinaryOperatorKind, CastKind, StorageClass, TagTypeKind, UnaryOperatorKind};
pub use storage::UnitStorage;
pub use ty::QualType;

#[cfg(test)]
mod tests;
