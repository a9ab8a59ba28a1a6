//! Expression payloads. Statements other than expressions carry no payload
//! beyond their `NodeBase`.

use crate::node::{NodeBase, NodePtr, subclass};
use crate::{BinaryOperatorKind, CastKind, QualType, UnaryOperatorKind};

#[repr(C)]
pub struct Expr {
    pub(crate) base: NodeBase,
    pub(crate) ty: QualType,
}

subclass!(Expr: NodeBase => base,
    IntegerLiteral | FloatingLiteral | FixedPointLiteral | CharacterLiteral | StringLiteral
        | CXXBoolLiteralExpr | CXXNullPtrLiteralExpr | ParenExpr | UnaryOperator
        | BinaryOperator | CompoundAssignOperator | ConditionalOperator | CallExpr
        | DeclRefExpr | MemberExpr | ArraySubscriptExpr | ImplicitCastExpr | CStyleCastExpr
        | InitListExpr | ConstantExpr | CoawaitExpr);

impl Expr {
    pub fn ty(&self) -> &QualType {
        &self.ty
    }
}

#[repr(C)]
pub struct IntegerLiteral {
    pub(crate) expr: Expr,
    pub(crate) value: u64,
}

subclass!(IntegerLiteral: Expr => expr, IntegerLiteral);

impl IntegerLiteral {
    pub fn value(&self) -> u64 {
        self.value
    }
}

#[repr(C)]
pub struct FloatingLiteral {
    pub(crate) expr: Expr,
    pub(crate) value: f64,
}

subclass!(FloatingLiteral: Expr => expr, FloatingLiteral);

impl FloatingLiteral {
    pub fn value(&self) -> f64 {
        self.value
    }
}

#[repr(C)]
pub struct FixedPointLiteral {
    pub(crate) expr: Expr,
    pub(crate) value: i64,
    pub(crate) scale: u32,
}

subclass!(FixedPointLiteral: Expr => expr, FixedPointLiteral);

impl FixedPointLiteral {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

#[repr(C)]
pub struct CharacterLiteral {
    pub(crate) expr: Expr,
    pub(crate) value: u32,
}

subclass!(CharacterLiteral: Expr => expr, CharacterLiteral);

impl CharacterLiteral {
    pub fn value(&self) -> u32 {
        self.value
    }
}

#[repr(C)]
pub struct StringLiteral {
    pub(crate) expr: Expr,
    pub(crate) bytes: Box<[u8]>,
}

subclass!(StringLiteral: Expr => expr, StringLiteral);

impl StringLiteral {
    /// Contents without quotes, escapes already processed.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[repr(C)]
pub struct CXXBoolLiteralExpr {
    pub(crate) expr: Expr,
    pub(crate) value: bool,
}

subclass!(CXXBoolLiteralExpr: Expr => expr, CXXBoolLiteralExpr);

impl CXXBoolLiteralExpr {
    pub fn value(&self) -> bool {
        self.value
    }
}

#[repr(C)]
pub struct UnaryOperator {
    pub(crate) expr: Expr,
    pub(crate) opcode: UnaryOperatorKind,
}

subclass!(UnaryOperator: Expr => expr, UnaryOperator);

impl UnaryOperator {
    pub fn opcode(&self) -> UnaryOperatorKind {
        self.opcode
    }
}

#[repr(C)]
pub struct BinaryOperator {
    pub(crate) expr: Expr,
    pub(crate) opcode: BinaryOperatorKind,
}

subclass!(BinaryOperator: Expr => expr, BinaryOperator | CompoundAssignOperator);

impl BinaryOperator {
    pub fn opcode(&self) -> BinaryOperatorKind {
        self.opcode
    }
}

#[repr(C)]
pub struct CompoundAssignOperator {
    pub(crate) binary: BinaryOperator,
}

subclass!(CompoundAssignOperator: BinaryOperator => binary, CompoundAssignOperator);

#[repr(C)]
pub struct DeclRefExpr {
    pub(crate) expr: Expr,
    pub(crate) name: Box<str>,
    pub(crate) decl: Option<NodePtr>,
}

subclass!(DeclRefExpr: Expr => expr, DeclRefExpr);

impl DeclRefExpr {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced declaration, if it lives in the same unit.
    pub fn decl(&self) -> Option<NodePtr> {
        self.decl
    }
}

#[repr(C)]
pub struct MemberExpr {
    pub(crate) expr: Expr,
    pub(crate) member: Box<str>,
    pub(crate) is_arrow: bool,
    pub(crate) decl: Option<NodePtr>,
}

subclass!(MemberExpr: Expr => expr, MemberExpr);

impl MemberExpr {
    pub fn member_name(&self) -> &str {
        &self.member
    }

    pub fn is_arrow(&self) -> bool {
        self.is_arrow
    }

    pub fn member_decl(&self) -> Option<NodePtr> {
        self.decl
    }
}

#[repr(C)]
pub struct CastExpr {
    pub(crate) expr: Expr,
    pub(crate) kind: CastKind,
}

subclass!(CastExpr: Expr => expr, ImplicitCastExpr | CStyleCastExpr);

impl CastExpr {
    pub fn cast_kind(&self) -> CastKind {
        self.kind
    }
}
