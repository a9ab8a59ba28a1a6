//! Safe, stable access to a C/C++ front-end's syntax trees.
//!
//! The front-end hands out raw, version-specific nodes that are freed in bulk
//! when their unit goes away. This crate puts a checked layer on top:
//!
//! - [`OpaqueCursor`]s are plain data that [`Index::resolve`] validates before
//!   anything is read through them;
//! - [`Node`]s expose a stable [`NodeKind`] and kind-specific accessors chosen
//!   by the [`Registry`];
//! - every wrapper carries a liveness token, so once a [`TranslationUnit`] is
//!   disposed all queries fail with [`BindingError::UseAfterDispose`] instead
//!   of touching freed memory;
//! - tokens are read straight from the unit's token buffer.

mod accessor;
mod config;
mod cursor;
mod dump;
mod errors;
mod index;
mod kind;
mod kind_set;
mod liveness;
mod location;
mod node;
mod payload;
mod registry;
mod tokens;
mod traverse;
mod values;

pub use accessor::{Accessor, AccessorSet};
pub use config::{RegistryConfig, UnknownKindPolicy};
pub use cursor::{CursorClass, OpaqueCursor, Resolved};
pub use errors::{BindingError, InvalidReason, Result};
pub use index::{Index, TranslationUnit};
pub use kind::NodeKind;
pub use kind_set::KindSet;
pub use liveness::UnitKey;
pub use location::{SourceLocation, SourceRange};
pub use node::Node;
pub use registry::{Entry, Registry, RegistryBuilder};
pub use tokens::{Token, TokenKind};
pub use traverse::{Children, Preorder, WalkEvent};
pub use values::{
    BinaryOpcode, CastKind, LiteralValue, QualifiedType, StorageClass, TagKind, UnaryOpcode, Value,
};
