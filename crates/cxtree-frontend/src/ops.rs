//! Internal enumerations stored in node payloads.
//!
//! Variant order follows the front-end's own tables and is not stable across
//! releases.

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    PtrMemD,
    PtrMemI,
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Cmp,
    LT,
    GT,
    LE,
    GE,
    EQ,
    NE,
    And,
    Xor,
    Or,
    LAnd,
    LOr,
    Assign,
    MulAssign,
    DivAssign,
    RemAssign,
    AddAssign,
    SubAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,
    Comma,
}

impl BinaryOperatorKind {
    pub fn spelling(self) -> &'static str {
        match self {
            Self::PtrMemD => ".*",
            Self::PtrMemI => "->*",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Cmp => "<=>",
            Self::LT => "<",
            Self::GT => ">",
            Self::LE => "<=",
            Self::GE => ">=",
            Self::EQ => "==",
            Self::NE => "!=",
            Self::And => "&",
            Self::Xor => "^",
            Self::Or => "|",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Assign => "=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::RemAssign => "%=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AndAssign => "&=",
            Self::XorAssign => "^=",
            Self::OrAssign => "|=",
            Self::Comma => ",",
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    PostInc,
    PostDec,
    PreInc,
    PreDec,
    AddrOf,
    Deref,
    Plus,
    Minus,
    Not,
    LNot,
    Real,
    Imag,
    Extension,
    Coawait,
}

impl UnaryOperatorKind {
    pub fn spelling(self) -> &'static str {
        match self {
            Self::PostInc | Self::PreInc => "++",
            Self::PostDec | Self::PreDec => "--",
            Self::AddrOf => "&",
            Self::Deref => "*",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "~",
            Self::LNot => "!",
            Self::Real => "__real",
            Self::Imag => "__imag",
            Self::Extension => "__extension__",
            Self::Coawait => "co_await",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastKind {
    Dependent,
    BitCast,
    LValueToRValue,
    NoOp,
    ArrayToPointerDecay,
    FunctionToPointerDecay,
    NullToPointer,
    IntegralCast,
    IntegralToBoolean,
    IntegralToFloating,
    FloatingToIntegral,
    FloatingToBoolean,
    FloatingCast,
    PointerToBoolean,
    ToVoid,
    FixedPointCast,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StorageClass {
    #[default]
    None,
    Extern,
    Static,
    PrivateExtern,
    Auto,
    Register,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagTypeKind {
    Struct,
    Interface,
    Union,
    Class,
    Enum,
}
