//! Stable host-facing values.
//!
//! The front-end's enumerations are renumbered between releases; everything
//! here has fixed discriminants, and internal values without a stable
//! counterpart map to `Unexposed`.

use std::fmt;

use cxtree_frontend as fe;

use crate::Node;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOpcode {
    Unexposed = 0,
    PtrMemD = 1,
    PtrMemI = 2,
    Mul = 3,
    Div = 4,
    Rem = 5,
    Add = 6,
    Sub = 7,
    Shl = 8,
    Shr = 9,
    Cmp = 10,
    LT = 11,
    GT = 12,
    LE = 13,
    GE = 14,
    EQ = 15,
    NE = 16,
    And = 17,
    Xor = 18,
    Or = 19,
    LAnd = 20,
    LOr = 21,
    Assign = 22,
    MulAssign = 23,
    DivAssign = 24,
    RemAssign = 25,
    AddAssign = 26,
    SubAssign = 27,
    ShlAssign = 28,
    ShrAssign = 29,
    AndAssign = 30,
    XorAssign = 31,
    OrAssign = 32,
    Comma = 33,
}

impl From<fe::BinaryOperatorKind> for BinaryOpcode {
    fn from(kind: fe::BinaryOperatorKind) -> Self {
        use fe::BinaryOperatorKind as K;
        match kind {
            K::PtrMemD => Self::PtrMemD,
            K::PtrMemI => Self::PtrMemI,
            K::Mul => Self::Mul,
            K::Div => Self::Div,
            K::Rem => Self::Rem,
            K::Add => Self::Add,
            K::Sub => Self::Sub,
            K::Shl => Self::Shl,
            K::Shr => Self::Shr,
            K::Cmp => Self::Cmp,
            K::LT => Self::LT,
            K::GT => Self::GT,
            K::LE => Self::LE,
            K::GE => Self::GE,
            K::EQ => Self::EQ,
            K::NE => Self::NE,
            K::And => Self::And,
            K::Xor => Self::Xor,
            K::Or => Self::Or,
            K::LAnd => Self::LAnd,
            K::LOr => Self::LOr,
            K::Assign => Self::Assign,
            K::MulAssign => Self::MulAssign,
            K::DivAssign => Self::DivAssign,
            K::RemAssign => Self::RemAssign,
            K::AddAssign => Self::AddAssign,
            K::SubAssign => Self::SubAssign,
            K::ShlAssign => Self::ShlAssign,
            K::ShrAssign => Self::ShrAssign,
            K::AndAssign => Self::AndAssign,
            K::XorAssign => Self::XorAssign,
            K::OrAssign => Self::OrAssign,
            K::Comma => Self::Comma,
            _ => Self::Unexposed,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOpcode {
    Unexposed = 0,
    PostInc = 1,
    PostDec = 2,
    PreInc = 3,
    PreDec = 4,
    AddrOf = 5,
    Deref = 6,
    Plus = 7,
    Minus = 8,
    Not = 9,
    LNot = 10,
    Real = 11,
    Imag = 12,
    Extension = 13,
    Coawait = 14,
}

impl From<fe::UnaryOperatorKind> for UnaryOpcode {
    fn from(kind: fe::UnaryOperatorKind) -> Self {
        use fe::UnaryOperatorKind as K;
        match kind {
            K::PostInc => Self::PostInc,
            K::PostDec => Self::PostDec,
            K::PreInc => Self::PreInc,
            K::PreDec => Self::PreDec,
            K::AddrOf => Self::AddrOf,
            K::Deref => Self::Deref,
            K::Plus => Self::Plus,
            K::Minus => Self::Minus,
            K::Not => Self::Not,
            K::LNot => Self::LNot,
            K::Real => Self::Real,
            K::Imag => Self::Imag,
            K::Extension => Self::Extension,
            K::Coawait => Self::Coawait,
            _ => Self::Unexposed,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Unexposed = 0,
    None = 1,
    Extern = 2,
    Static = 3,
    PrivateExtern = 4,
    Auto = 5,
    Register = 6,
}

impl From<fe::StorageClass> for StorageClass {
    fn from(storage: fe::StorageClass) -> Self {
        use fe::StorageClass as S;
        match storage {
            S::None => Self::None,
            S::Extern => Self::Extern,
            S::Static => Self::Static,
            S::PrivateExtern => Self::PrivateExtern,
            S::Auto => Self::Auto,
            S::Register => Self::Register,
            _ => Self::Unexposed,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Unexposed = 0,
    Struct = 1,
    Class = 2,
    Union = 3,
    Enum = 4,
}

impl From<fe::TagTypeKind> for TagKind {
    fn from(tag: fe::TagTypeKind) -> Self {
        use fe::TagTypeKind as T;
        match tag {
            T::Struct => Self::Struct,
            T::Class => Self::Class,
            T::Union => Self::Union,
            T::Enum => Self::Enum,
            _ => Self::Unexposed,
        }
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastKind {
    Unexposed = 0,
    BitCast = 1,
    LValueToRValue = 2,
    NoOp = 3,
    ArrayToPointerDecay = 4,
    FunctionToPointerDecay = 5,
    NullToPointer = 6,
    IntegralCast = 7,
    IntegralToBoolean = 8,
    IntegralToFloating = 9,
    FloatingToIntegral = 10,
    FloatingToBoolean = 11,
    FloatingCast = 12,
    PointerToBoolean = 13,
    ToVoid = 14,
}

impl From<fe::CastKind> for CastKind {
    fn from(kind: fe::CastKind) -> Self {
        use fe::CastKind as C;
        match kind {
            C::BitCast => Self::BitCast,
            C::LValueToRValue => Self::LValueToRValue,
            C::NoOp => Self::NoOp,
            C::ArrayToPointerDecay => Self::ArrayToPointerDecay,
            C::FunctionToPointerDecay => Self::FunctionToPointerDecay,
            C::NullToPointer => Self::NullToPointer,
            C::IntegralCast => Self::IntegralCast,
            C::IntegralToBoolean => Self::IntegralToBoolean,
            C::IntegralToFloating => Self::IntegralToFloating,
            C::FloatingToIntegral => Self::FloatingToIntegral,
            C::FloatingToBoolean => Self::FloatingToBoolean,
            C::FloatingCast => Self::FloatingCast,
            C::PointerToBoolean => Self::PointerToBoolean,
            C::ToVoid => Self::ToVoid,
            _ => Self::Unexposed,
        }
    }
}

/// Value of a literal expression.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Integer(u64),
    Floating(f64),
    FixedPoint { value: i64, scale: u32 },
    Character(u32),
    String(Vec<u8>),
    Bool(bool),
    NullPtr,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Floating(value) => write!(f, "{value}"),
            Self::FixedPoint { value, scale } => {
                write!(f, "{}", *value as f64 / f64::from(2u32).powi(*scale as i32))
            }
            Self::Character(value) => match char::from_u32(*value) {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "\\U{value:08x}"),
            },
            Self::String(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::Bool(value) => write!(f, "{value}"),
            Self::NullPtr => f.write_str("nullptr"),
        }
    }
}

/// A type as spelled by the front-end, with its qualifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedType {
    pub spelling: String,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_restrict: bool,
}

impl From<&fe::QualType> for QualifiedType {
    fn from(ty: &fe::QualType) -> Self {
        Self {
            spelling: ty.to_string(),
            is_const: ty.is_const(),
            is_volatile: ty.is_volatile(),
            is_restrict: ty.is_restrict(),
        }
    }
}

/// Result of a dynamic [`Node::get`](crate::Node::get) call.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An optional scalar that is not present, e.g. the width of a plain field.
    Absent,
    Bool(bool),
    Int(i64),
    Text(String),
    BinaryOpcode(BinaryOpcode),
    UnaryOpcode(UnaryOpcode),
    StorageClass(StorageClass),
    TagKind(TagKind),
    CastKind(CastKind),
    Literal(LiteralValue),
    Type(QualifiedType),
    Node(Option<Node>),
    Nodes(Vec<Node>),
}

#[cfg(test)]
mod tests {
    use cxtree_frontend as fe;

    use super::{BinaryOpcode, LiteralValue, StorageClass, TagKind};

    #[test]
    fn internal_values_map_to_stable_ones() {
        assert_eq!(BinaryOpcode::from(fe::BinaryOperatorKind::Add), BinaryOpcode::Add);
        assert_eq!(BinaryOpcode::Add as u8, 6);
        assert_eq!(StorageClass::from(fe::StorageClass::Static), StorageClass::Static);
        assert_eq!(TagKind::from(fe::TagTypeKind::Interface), TagKind::Unexposed);
    }

    #[test]
    fn literal_spellings() {
        assert_eq!(LiteralValue::Integer(42).to_string(), "42");
        assert_eq!(LiteralValue::Floating(1.5).to_string(), "1.5");
        assert_eq!(LiteralValue::FixedPoint { value: 3, scale: 1 }.to_string(), "1.5");
        assert_eq!(LiteralValue::Character(u32::from('a')).to_string(), "a");
        assert_eq!(LiteralValue::String(b"hi".to_vec()).to_string(), "hi");
        assert_eq!(LiteralValue::Bool(false).to_string(), "false");
    }
}
