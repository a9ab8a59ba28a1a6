//! Typed pointers cached by a wrapper at construction time.

use std::ptr::NonNull;

use cxtree_frontend::decl::{
    CXXMethodDecl, EnumConstantDecl, EnumDecl, FieldDecl, FunctionDecl, NamedDecl, ParmVarDecl,
    RecordDecl, TypedefDecl, ValueDecl, VarDecl,
};
use cxtree_frontend::expr::{
    BinaryOperator, CXXBoolLiteralExpr, CastExpr, CharacterLiteral, CompoundAssignOperator,
    DeclRefExpr, Expr, FixedPointLiteral, FloatingLiteral, IntegerLiteral, MemberExpr,
    StringLiteral, UnaryOperator,
};
use cxtree_frontend::{NodeBase, NodePtr, Subclass};

macro_rules! payloads {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A node pointer already downcast to its most derived payload type.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub(crate) enum Concrete {
            $($variant(NonNull<$ty>),)*
        }

        #[derive(Clone, Copy)]
        pub(crate) enum Payload<'a> {
            $($variant(&'a $ty),)*
        }

        impl Concrete {
            /// # Safety
            ///
            /// The unit owning the node must stay alive for `'a`.
            #[expect(unsafe_code)]
            pub(crate) unsafe fn payload<'a>(self) -> Payload<'a> {
                match self {
                    $(Self::$variant(ptr) => Payload::$variant(unsafe { ptr.as_ref() }),)*
                }
            }
        }
    };
}

payloads! {
    Base(NodeBase),
    Named(NamedDecl),
    Typedef(TypedefDecl),
    Record(RecordDecl),
    Enum(EnumDecl),
    Field(FieldDecl),
    EnumConstant(EnumConstantDecl),
    Function(FunctionDecl),
    Method(CXXMethodDecl),
    Var(VarDecl),
    Parm(ParmVarDecl),
    Expr(Expr),
    Integer(IntegerLiteral),
    Floating(FloatingLiteral),
    FixedPoint(FixedPointLiteral),
    Character(CharacterLiteral),
    String(StringLiteral),
    Bool(CXXBoolLiteralExpr),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    CompoundAssign(CompoundAssignOperator),
    DeclRef(DeclRefExpr),
    Member(MemberExpr),
    Cast(CastExpr),
}

/// Checked downcast used by the registry tables.
///
/// # Safety
///
/// `ptr` must be a node of a live unit.
#[expect(unsafe_code)]
pub(crate) unsafe fn downcast<T: Subclass>(ptr: NodePtr) -> Option<NonNull<T>> {
    unsafe { ptr.downcast::<T>() }.map(NonNull::from)
}

impl<'a> Payload<'a> {
    pub(crate) fn named(self) -> Option<&'a NamedDecl> {
        Some(match self {
            Self::Named(it) => it,
            Self::Typedef(it) => &**it,
            Self::Record(it) => &**it,
            Self::Enum(it) => &**it,
            _ => return self.value_decl().map(|it| &**it),
        })
    }

    pub(crate) fn value_decl(self) -> Option<&'a ValueDecl> {
        Some(match self {
            Self::Field(it) => &**it,
            Self::EnumConstant(it) => &**it,
            _ => return self.var().map(|it| &**it).or_else(|| self.function().map(|it| &**it)),
        })
    }

    pub(crate) fn var(self) -> Option<&'a VarDecl> {
        match self {
            Self::Var(it) => Some(it),
            Self::Parm(it) => Some(&**it),
            _ => None,
        }
    }

    pub(crate) fn function(self) -> Option<&'a FunctionDecl> {
        match self {
            Self::Function(it) => Some(it),
            Self::Method(it) => Some(&**it),
            _ => None,
        }
    }

    pub(crate) fn expr(self) -> Option<&'a Expr> {
        Some(match self {
            Self::Expr(it) => it,
            Self::Integer(it) => &**it,
            Self::Floating(it) => &**it,
            Self::FixedPoint(it) => &**it,
            Self::Character(it) => &**it,
            Self::String(it) => &**it,
            Self::Bool(it) => &**it,
            Self::Unary(it) => &**it,
            Self::DeclRef(it) => &**it,
            Self::Member(it) => &**it,
            Self::Cast(it) => &**it,
            _ => return self.binary().map(|it| &**it),
        })
    }

    pub(crate) fn binary(self) -> Option<&'a BinaryOperator> {
        match self {
            Self::Binary(it) => Some(it),
            Self::CompoundAssign(it) => Some(&**it),
            _ => None,
        }
    }
}
