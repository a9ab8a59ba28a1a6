use std::fmt;

/// A named, kind-specific operation on a [`Node`](crate::Node).
///
/// Like [`NodeKind`](crate::NodeKind), discriminants are stable and
/// append-only.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Accessor {
    BinaryOpcode,
    UnaryOpcode,
    OperatorSpelling,
    LiteralValue,
    LiteralSpelling,
    DeclaredName,
    QualifiedType,
    StorageClass,
    IsVirtual,
    IsPureVirtual,
    IsStatic,
    IsConst,
    IsInline,
    IsDefinition,
    IsVariadic,
    IsScoped,
    IsArrow,
    IsPostfix,
    BitWidth,
    EnumValue,
    TagKind,
    CastKind,
    UnderlyingType,
    Referenced,
    Lhs,
    Rhs,
    SubExpr,
    Callee,
    Arguments,
    Parameters,
    Initializer,
    Condition,
    ThenBranch,
    ElseBranch,
    ForInit,
    ForIncrement,
    Body,
    ReturnValue,
}

impl Accessor {
    pub const ALL: &[Accessor] = &[
        Self::BinaryOpcode,
        Self::UnaryOpcode,
        Self::OperatorSpelling,
        Self::LiteralValue,
        Self::LiteralSpelling,
        Self::DeclaredName,
        Self::QualifiedType,
        Self::StorageClass,
        Self::IsVirtual,
        Self::IsPureVirtual,
        Self::IsStatic,
        Self::IsConst,
        Self::IsInline,
        Self::IsDefinition,
        Self::IsVariadic,
        Self::IsScoped,
        Self::IsArrow,
        Self::IsPostfix,
        Self::BitWidth,
        Self::EnumValue,
        Self::TagKind,
        Self::CastKind,
        Self::UnderlyingType,
        Self::Referenced,
        Self::Lhs,
        Self::Rhs,
        Self::SubExpr,
        Self::Callee,
        Self::Arguments,
        Self::Parameters,
        Self::Initializer,
        Self::Condition,
        Self::ThenBranch,
        Self::ElseBranch,
        Self::ForInit,
        Self::ForIncrement,
        Self::Body,
        Self::ReturnValue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BinaryOpcode => "binary_opcode",
            Self::UnaryOpcode => "unary_opcode",
            Self::OperatorSpelling => "operator_spelling",
            Self::LiteralValue => "literal",
            Self::LiteralSpelling => "literal_spelling",
            Self::DeclaredName => "name",
            Self::QualifiedType => "qualified_type",
            Self::StorageClass => "storage_class",
            Self::IsVirtual => "is_virtual",
            Self::IsPureVirtual => "is_pure_virtual",
            Self::IsStatic => "is_static",
            Self::IsConst => "is_const",
            Self::IsInline => "is_inline",
            Self::IsDefinition => "is_definition",
            Self::IsVariadic => "is_variadic",
            Self::IsScoped => "is_scoped",
            Self::IsArrow => "is_arrow",
            Self::IsPostfix => "is_postfix",
            Self::BitWidth => "bit_width",
            Self::EnumValue => "enum_value",
            Self::TagKind => "tag_kind",
            Self::CastKind => "cast_kind",
            Self::UnderlyingType => "underlying_type",
            Self::Referenced => "referenced",
            Self::Lhs => "lhs",
            Self::Rhs => "rhs",
            Self::SubExpr => "sub_expr",
            Self::Callee => "callee",
            Self::Arguments => "arguments",
            Self::Parameters => "parameters",
            Self::Initializer => "initializer",
            Self::Condition => "condition",
            Self::ThenBranch => "then_branch",
            Self::ElseBranch => "else_branch",
            Self::ForInit => "for_init",
            Self::ForIncrement => "for_increment",
            Self::Body => "body",
            Self::ReturnValue => "return_value",
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of accessors a kind supports.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct AccessorSet(u64);

impl AccessorSet {
    pub const EMPTY: Self = Self(0);

    pub const fn new<const N: usize>(accessors: [Accessor; N]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < accessors.len() {
            bits |= 1 << accessors[i] as u8;
            i += 1;
        }
        Self(bits)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, accessor: Accessor) -> bool {
        self.0 & (1 << accessor as u8) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Accessor> {
        Accessor::ALL.iter().copied().filter(move |&accessor| self.contains(accessor))
    }
}

impl fmt::Debug for AccessorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Accessor, AccessorSet};

    #[test]
    fn fits_in_one_word() {
        assert!(Accessor::ALL.len() <= 64);
        for (index, &accessor) in Accessor::ALL.iter().enumerate() {
            assert_eq!(accessor as usize, index, "{accessor}");
        }
    }

    #[test]
    fn union_and_membership() {
        let lhs = AccessorSet::new([Accessor::Lhs]);
        let both = lhs.union(AccessorSet::new([Accessor::Rhs]));
        assert!(both.contains(Accessor::Lhs) && both.contains(Accessor::Rhs));
        assert!(!lhs.contains(Accessor::Rhs));
        assert_eq!(both.iter().collect::<Vec<_>>(), [Accessor::Lhs, Accessor::Rhs]);
    }
}
